use super::schedule::WalkForwardSchedule;
use crate::data::{ReturnTable, TurnoverTable};
use crate::engines::selection::{SelectionParams, SelectionUnit};
use crate::error::Result;
use crate::functions::RegisteredScore;
use crate::types::{SelectionResult, WindowSelection, WindowSlice};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Runs the selection unit on every window of a schedule.
pub struct WalkForwardRunner<'a> {
    returns: &'a ReturnTable,
    turnover: Option<&'a TurnoverTable>,
    schedule: &'a WalkForwardSchedule,
    params: &'a SelectionParams,
    scorer: &'a RegisteredScore,
}

impl<'a> WalkForwardRunner<'a> {
    pub fn new(
        returns: &'a ReturnTable,
        turnover: Option<&'a TurnoverTable>,
        schedule: &'a WalkForwardSchedule,
        params: &'a SelectionParams,
        scorer: &'a RegisteredScore,
    ) -> Self {
        Self { returns, turnover, schedule, params, scorer }
    }

    /// One selection per window, in schedule order. Windows run in parallel.
    pub fn run(&self) -> Result<Vec<WindowSelection>> {
        self.schedule
            .get_slices()
            .par_iter()
            .map(|window| self.select_window(*window))
            .collect()
    }

    /// Selections keyed by "start to end" period label.
    pub fn run_labeled(&self) -> Result<BTreeMap<String, SelectionResult>> {
        Ok(self
            .run()?
            .into_iter()
            .map(|ws| (ws.label(), ws.selection))
            .collect())
    }

    fn select_window(&self, window: WindowSlice) -> Result<WindowSelection> {
        let returns = self.returns.slice_dates(window.start, window.end);
        let turnover = self.turnover.map(|t| t.slice_dates(window.start, window.end));

        if returns.is_empty() {
            log::warn!("In-sample window {} has no rows", window.label());
        }

        let selection = SelectionUnit::new(&returns, turnover.as_ref(), self.params)
            .perform_selection(self.scorer)?;

        log::debug!(
            "Window {}: {} rows, selected {}, kept {}",
            window.label(),
            returns.height(),
            selection.selected.len(),
            selection.filtered.len()
        );

        Ok(WindowSelection { window, selection })
    }
}
