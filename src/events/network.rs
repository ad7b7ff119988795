use crate::backend::Backend;
use crate::dashboard::loader;
use crate::state::State;
use anyhow::Result;
use log::*;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    Bootstrap {
        department_id: Option<i64>,
        department_name: Option<String>,
    },
    LoadAll {
        generation: u64,
    },
    LoadDepartment {
        generation: u64,
        department_id: i64,
    },
    DepartmentReports {
        generation: u64,
        department_id: i64,
    },
    RecomputeStats,
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    backend: &'a mut Backend,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, backend: &'a mut Backend) -> Self {
        Handler { state, backend }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::Bootstrap {
                department_id,
                department_name,
            } => self.bootstrap(department_id, department_name).await?,
            Event::LoadAll { generation } => self.load_all(generation).await,
            Event::LoadDepartment {
                generation,
                department_id,
            } => self.load_department(generation, department_id).await,
            Event::DepartmentReports {
                generation,
                department_id,
            } => self.department_reports(generation, department_id).await,
            Event::RecomputeStats => self.recompute_stats().await,
        }
        Ok(())
    }

    /// Classify the caller's role, resolve any startup department scope, and
    /// run the first load cycle.
    ///
    async fn bootstrap(
        &mut self,
        department_id: Option<i64>,
        department_name: Option<String>,
    ) -> Result<()> {
        info!("Preparing initial application data...");
        let role = self.backend.classify_role().await;
        info!("Classified caller as {:?}.", role);

        let mut scope = department_id;
        if scope.is_none() {
            if let Some(name) = department_name {
                scope = self.resolve_department(&name).await;
            }
        }

        let generation;
        {
            let mut state = self.state.lock().await;
            state.set_role(role);
            state.set_department_scope(scope);
            generation = state.begin_load();
        }
        match scope {
            Some(id) => self.load_department(generation, id).await,
            None => self.load_all(generation).await,
        }
        info!("Loaded initial application data.");
        Ok(())
    }

    /// Resolve a department name to its id. An unknown name degrades to the
    /// unscoped load.
    async fn resolve_department(&mut self, name: &str) -> Option<i64> {
        match self
            .backend
            .departments(json!([["name", "=", name]]))
            .await
        {
            Ok(departments) => match departments.first() {
                Some(department) => Some(department.id),
                None => {
                    warn!("No department named '{}'; loading full scope.", name);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to resolve department '{}': {}", name, e);
                None
            }
        }
    }

    /// Run a full load cycle and install the result under its generation
    /// tag. A failed load installs the empty fallback instead.
    ///
    async fn load_all(&mut self, generation: u64) {
        match loader::load_all(self.backend).await {
            Ok(working_set) => {
                info!(
                    "Loaded {} people, {} departments, {} reports.",
                    working_set.people.len(),
                    working_set.departments.len(),
                    working_set.reports.len()
                );
                let mut state = self.state.lock().await;
                state.install_working_set(working_set, generation);
            }
            Err(e) => {
                error!("Failed to load working set: {}", e);
                let mut state = self.state.lock().await;
                state.load_failed(generation, format!("Load failed: {}", e));
            }
        }
    }

    /// Load a working set scoped to one department.
    ///
    async fn load_department(&mut self, generation: u64, department_id: i64) {
        match loader::load_for_department(self.backend, department_id).await {
            Ok(working_set) => {
                let mut state = self.state.lock().await;
                state.install_working_set(working_set, generation);
            }
            Err(e) => {
                error!("Failed to load department {}: {}", department_id, e);
                let mut state = self.state.lock().await;
                state.load_failed(generation, format!("Load failed: {}", e));
            }
        }
    }

    /// Load one department's reports and dynamic columns for the detail
    /// view.
    ///
    async fn department_reports(&mut self, generation: u64, department_id: i64) {
        match loader::load_department_reports(self.backend, department_id).await {
            Ok((reports, columns)) => {
                info!(
                    "Loaded {} reports ({} dynamic columns) for department {}.",
                    reports.len(),
                    columns.len(),
                    department_id
                );
                let mut state = self.state.lock().await;
                state.set_department_reports(reports, columns, generation);
            }
            Err(e) => {
                error!(
                    "Failed to load reports for department {}: {}",
                    department_id, e
                );
                let mut state = self.state.lock().await;
                state.load_failed(generation, format!("Load failed: {}", e));
            }
        }
    }

    /// Ask the server to recompute summary statistics, then reload so the
    /// fresh counters are visible.
    ///
    async fn recompute_stats(&mut self) {
        match self.backend.recompute_statistics().await {
            Ok(()) => {
                let generation;
                {
                    let mut state = self.state.lock().await;
                    state.set_notice("Statistics recomputed.".to_string());
                    generation = state.begin_load();
                }
                self.load_all(generation).await;
            }
            Err(e) => {
                error!("Failed to recompute statistics: {}", e);
                let mut state = self.state.lock().await;
                state.set_notice(format!("Recompute failed: {}", e));
            }
        }
    }
}
