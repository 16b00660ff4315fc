use serde::Serialize;

use crate::address::{AddressRecord, Suggestion};
use crate::errors::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Querying,
    Suggesting,
    Failed,
    Selecting,
    Resolved,
}

/// Mutable state of one input session.
///
/// Every search takes a fresh generation; only the response carrying the
/// current generation is applied. While a selection is resolving the phase
/// stays `Selecting` even if a search settles underneath it.
#[derive(Debug, Clone)]
pub struct ResolutionState {
    query: String,
    suggestions: Vec<Suggestion>,
    error: Option<String>,
    selected_value: String,
    phase: Phase,
    open: bool,
    generation: u64,
    searching: Option<u64>,
    resolving: bool,
}

impl ResolutionState {
    pub fn new(initial_value: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            error: None,
            selected_value: initial_value.into(),
            phase: Phase::Idle,
            open: false,
            generation: 0,
            searching: None,
            resolving: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Authoritative suggestions. Empty while a newer search is in flight.
    pub fn suggestions(&self) -> &[Suggestion] {
        if self.searching.is_some() {
            &[]
        } else {
            &self.suggestions
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_value(&self) -> &str {
        &self.selected_value
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn loading(&self) -> bool {
        self.searching.is_some() || self.resolving
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn input_changed(&mut self, text: &str) {
        self.query = text.to_string();
        if self.phase == Phase::Resolved || text.is_empty() {
            self.settle(Phase::Idle);
        }
    }

    /// Starts a search for `query`, superseding any search still in flight.
    /// Returns the generation to report back with, or `None` when the query
    /// is not searchable and was settled locally as an empty result.
    pub fn begin_search(&mut self, query: &str, searchable: bool) -> Option<u64> {
        self.generation += 1;
        self.error = None;
        if !searchable {
            self.searching = None;
            self.suggestions.clear();
            self.settle(if query.is_empty() {
                Phase::Idle
            } else {
                Phase::Suggesting
            });
            return None;
        }
        self.searching = Some(self.generation);
        self.settle(Phase::Querying);
        Some(self.generation)
    }

    /// Applies a search outcome. Returns `false`, leaving state untouched,
    /// when `generation` has been superseded.
    pub fn finish_search(
        &mut self,
        generation: u64,
        outcome: Result<Vec<Suggestion>, FetchError>,
    ) -> bool {
        if self.searching != Some(generation) {
            return false;
        }
        self.searching = None;
        match outcome {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                self.error = None;
                self.settle(Phase::Suggesting);
            }
            Err(err) => {
                self.suggestions.clear();
                self.error = Some(err.to_string());
                self.settle(Phase::Failed);
            }
        }
        true
    }

    /// Invalidates any in-flight search without starting a new one.
    pub fn supersede_searches(&mut self) {
        self.generation += 1;
        self.searching = None;
    }

    pub fn begin_selection(&mut self, fetches_details: bool) {
        self.phase = Phase::Selecting;
        self.resolving = fetches_details;
    }

    /// Ends the selection cycle. The previous search error is cleared so
    /// manual entry is only offered again after a new failed search.
    pub fn finish_selection(&mut self, record: &AddressRecord) {
        self.resolving = false;
        self.error = None;
        self.selected_value = record.full_address.clone();
        self.open = false;
        self.phase = Phase::Resolved;
    }

    /// Text usable for manual entry: only after a failed search, and only
    /// when something has been typed.
    pub fn manual_entry_text(&self) -> Option<&str> {
        if self.phase != Phase::Failed || self.query.trim().is_empty() {
            return None;
        }
        Some(&self.query)
    }

    fn settle(&mut self, phase: Phase) {
        if !self.resolving {
            self.phase = phase;
        }
    }
}
