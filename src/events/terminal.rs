use crate::dashboard::SortField;
use crate::state::{State, View, REPORT_COLUMNS};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            if event::poll(tick_rate).unwrap() {
                if let CrosstermEvent::Key(key) = event::read().unwrap() {
                    if key.kind == KeyEventKind::Press {
                        tx_clone.send(Event::Input(key)).unwrap();
                    }
                }
            }
            tx_clone.send(Event::Tick).unwrap();
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(key) => {
                if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
                    debug!("Processing exit terminal event '{:?}'...", key);
                    return Ok(false);
                }
                if state.is_search_mode() {
                    return Ok(Self::handle_search_key(state, key));
                }
                Self::handle_key(state, key)
            }
            Event::Tick => {
                state.advance_spinner_index();
                Ok(true)
            }
        }
    }

    /// Keys while the incremental search prompt is active.
    ///
    fn handle_search_key(state: &mut State, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                state.add_search_char(c);
            }
            KeyCode::Backspace => {
                state.backspace_search();
            }
            KeyCode::Esc | KeyCode::Enter => {
                state.exit_search_mode();
            }
            _ => {}
        }
        true
    }

    fn handle_key(state: &mut State, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => {
                debug!("Processing exit terminal event '{:?}'...", key);
                return Ok(false);
            }
            KeyCode::Char('~') => {
                state.toggle_debug_mode();
            }
            KeyCode::Tab => {
                state.next_tab();
            }
            KeyCode::BackTab => {
                state.previous_tab();
            }
            KeyCode::Char('r') => {
                state.request_refresh();
            }
            KeyCode::Char('R') => {
                state.request_recompute();
            }
            KeyCode::Esc => {
                if state.notice().is_some() {
                    state.clear_notice();
                } else if state.is_debug_mode() {
                    state.toggle_debug_mode();
                } else if state.current_view() == View::DepartmentDetail {
                    state.pop_view();
                }
            }
            _ => return Ok(Self::handle_view_key(state, key)),
        }
        Ok(true)
    }

    /// Keys routed by the active view.
    ///
    fn handle_view_key(state: &mut State, key: KeyEvent) -> bool {
        match state.current_view() {
            View::Dashboard => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    state.charts_mut().prev_bar();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    state.charts_mut().next_bar();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    state.charts_mut().prev_chart();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    state.charts_mut().next_chart();
                }
                KeyCode::Enter => {
                    state.select_chart_bar();
                }
                _ => {}
            },
            View::People => match key.code {
                KeyCode::Char('/') => {
                    state.enter_search_mode();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    state.next_person();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    state.previous_person();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    state.next_people_page();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    state.previous_people_page();
                }
                KeyCode::Char('f') => {
                    state.cycle_department_filter();
                }
                KeyCode::Char('o') => {
                    state.cycle_role_filter();
                }
                KeyCode::Char('t') => {
                    state.cycle_status_filter();
                }
                KeyCode::Char('c') => {
                    state.clear_filters();
                }
                KeyCode::Char('s') => {
                    state.cycle_sort_field();
                }
                KeyCode::Char('S') => {
                    state.toggle_sort(SortField::TotalTasks);
                }
                KeyCode::Char('x') => {
                    state.toggle_sort_direction();
                }
                _ => {}
            },
            View::Departments => match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    state.next_department();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    state.previous_department();
                }
                KeyCode::Enter => {
                    state.open_department_detail();
                }
                _ => {}
            },
            View::DepartmentDetail | View::Reports => match key.code {
                KeyCode::Right | KeyCode::Char('l') => {
                    state.next_report_page();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    state.previous_report_page();
                }
                KeyCode::Char('s') => {
                    state.cycle_report_sort();
                }
                KeyCode::Char('x') => {
                    if let Some((field, _)) = state.report_sort() {
                        state.toggle_report_sort(field);
                    }
                }
                KeyCode::Char(c @ '1'..='8') => {
                    let index = c as usize - '1' as usize;
                    state.toggle_column(REPORT_COLUMNS[index]);
                }
                _ => {}
            },
        }
        true
    }
}
