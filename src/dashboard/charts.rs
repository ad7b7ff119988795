//! Chart specifications and the dashboard chart registry.
//!
//! Charts are declarative: one bar-chart spec per department, valued by
//! authored report counts per person. The registry tracks the dashboard's
//! render state machine and the bar cursor used for select-to-filter.

use super::WorkingSet;
use log::*;

/// A single department bar chart: bars labeled by person display name.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartSpec {
    pub department_id: i64,
    pub title: String,
    pub bars: Vec<(String, u64)>,
}

/// Dashboard render phases.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardPhase {
    Uninitialized,
    Loading,
    Ready { rendered: bool },
}

/// Build one chart spec per department from the aggregated series.
/// Departments with no series or no members are skipped, not errors.
///
pub fn build_chart_specs(ws: &WorkingSet) -> Vec<ChartSpec> {
    let mut specs = Vec::with_capacity(ws.departments.len());
    for dept in &ws.departments {
        match ws.chart_data.get(&dept.id) {
            Some(series) if !series.labels.is_empty() => {
                specs.push(ChartSpec {
                    department_id: dept.id,
                    title: dept.name.clone(),
                    bars: series
                        .labels
                        .iter()
                        .cloned()
                        .zip(series.values.iter().copied())
                        .collect(),
                });
            }
            _ => {
                debug!("No chart series for department '{}'; skipping.", dept.name);
            }
        }
    }
    specs
}

/// Owns the built chart specs and the selection cursor. Chart instances are
/// rendering artifacts: rebuilding always starts from a cleared registry,
/// and leaving the dashboard clears it so a return re-renders from scratch.
///
#[derive(Debug, Default)]
pub struct ChartRegistry {
    specs: Vec<ChartSpec>,
    loading: bool,
    rendered: bool,
    chart_index: usize,
    bar_index: usize,
}

impl ChartRegistry {
    /// Current phase of the dashboard state machine.
    ///
    pub fn phase(&self) -> DashboardPhase {
        if self.loading {
            DashboardPhase::Loading
        } else if self.specs.is_empty() && !self.rendered {
            DashboardPhase::Uninitialized
        } else {
            DashboardPhase::Ready {
                rendered: self.rendered,
            }
        }
    }

    /// Mark a load cycle in flight; clears any stale charts.
    ///
    pub fn begin_loading(&mut self) {
        self.clear();
        self.loading = true;
    }

    /// Install freshly built specs. This is the explicit "data ready"
    /// signal the render pass waits for.
    ///
    pub fn install(&mut self, specs: Vec<ChartSpec>) {
        self.clear();
        self.specs = specs;
    }

    /// Record that the render pass has drawn the current specs.
    ///
    pub fn mark_rendered(&mut self) {
        self.loading = false;
        self.rendered = true;
    }

    /// Tear down every chart. Called before any rebuild and whenever the
    /// dashboard view deactivates.
    ///
    pub fn clear(&mut self) {
        self.specs.clear();
        self.loading = false;
        self.rendered = false;
        self.chart_index = 0;
        self.bar_index = 0;
    }

    pub fn specs(&self) -> &[ChartSpec] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.chart_index, self.bar_index)
    }

    /// Display name under the bar cursor, used for select-to-filter.
    ///
    pub fn selected_person(&self) -> Option<&str> {
        self.specs
            .get(self.chart_index)
            .and_then(|spec| spec.bars.get(self.bar_index))
            .map(|(name, _)| name.as_str())
    }

    pub fn next_chart(&mut self) {
        if self.specs.is_empty() {
            return;
        }
        self.chart_index = (self.chart_index + 1) % self.specs.len();
        self.bar_index = 0;
    }

    pub fn prev_chart(&mut self) {
        if self.specs.is_empty() {
            return;
        }
        self.chart_index = if self.chart_index == 0 {
            self.specs.len() - 1
        } else {
            self.chart_index - 1
        };
        self.bar_index = 0;
    }

    pub fn next_bar(&mut self) {
        if let Some(spec) = self.specs.get(self.chart_index) {
            if !spec.bars.is_empty() {
                self.bar_index = (self.bar_index + 1) % spec.bars.len();
            }
        }
    }

    pub fn prev_bar(&mut self) {
        if let Some(spec) = self.specs.get(self.chart_index) {
            if !spec.bars.is_empty() {
                self.bar_index = if self.bar_index == 0 {
                    spec.bars.len() - 1
                } else {
                    self.bar_index - 1
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::aggregate::ChartSeries;
    use crate::backend::Department;

    fn working_set_with_series() -> WorkingSet {
        let mut ws = WorkingSet::default();
        ws.departments = vec![
            Department {
                id: 10,
                name: "Engineering".to_string(),
                total_users: 2,
                total_tasks: 8,
            },
            Department {
                id: 20,
                name: "Design".to_string(),
                total_users: 0,
                total_tasks: 0,
            },
        ];
        ws.chart_data.insert(
            10,
            ChartSeries {
                labels: vec!["Alice Chen".to_string(), "Bob Tan".to_string()],
                values: vec![2, 1],
            },
        );
        ws.chart_data.insert(20, ChartSeries::default());
        ws
    }

    #[test]
    fn build_skips_departments_without_series() {
        let ws = working_set_with_series();
        let specs = build_chart_specs(&ws);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].title, "Engineering");
        assert_eq!(specs[0].bars, vec![("Alice Chen".to_string(), 2), ("Bob Tan".to_string(), 1)]);
    }

    #[test]
    fn registry_state_machine() {
        let mut registry = ChartRegistry::default();
        assert_eq!(registry.phase(), DashboardPhase::Uninitialized);

        registry.begin_loading();
        assert_eq!(registry.phase(), DashboardPhase::Loading);

        let ws = working_set_with_series();
        registry.install(build_chart_specs(&ws));
        assert_eq!(registry.phase(), DashboardPhase::Ready { rendered: false });

        registry.mark_rendered();
        assert_eq!(registry.phase(), DashboardPhase::Ready { rendered: true });

        // Leaving the dashboard tears charts down so a return re-renders
        registry.clear();
        assert_eq!(registry.phase(), DashboardPhase::Uninitialized);
        assert!(registry.is_empty());
    }

    #[test]
    fn bar_cursor_selects_person() {
        let ws = working_set_with_series();
        let mut registry = ChartRegistry::default();
        registry.install(build_chart_specs(&ws));
        assert_eq!(registry.selected_person(), Some("Alice Chen"));
        registry.next_bar();
        assert_eq!(registry.selected_person(), Some("Bob Tan"));
        registry.next_bar();
        assert_eq!(registry.selected_person(), Some("Alice Chen"));
        registry.prev_bar();
        assert_eq!(registry.selected_person(), Some("Bob Tan"));
    }
}
