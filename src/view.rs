use serde::Serialize;

use crate::session::InputProps;
use crate::state::{Phase, ResolutionState};

/// What the presentation layer should draw for the current session state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub label: Option<String>,
    pub required: bool,
    pub placeholder: String,
    pub trigger_text: String,
    pub input_text: String,
    pub open: bool,
    pub loading: bool,
    pub phase: Phase,
    pub external_error: Option<String>,
    pub list: ListDisplay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListDisplay {
    Loading,
    Error {
        message: String,
        manual_entry_enabled: bool,
    },
    Empty,
    Suggestions {
        items: Vec<SuggestionItem>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionItem {
    pub description: String,
    pub id: String,
    pub selected: bool,
}

impl SessionView {
    pub fn new(props: &InputProps, state: &ResolutionState) -> Self {
        let trigger_text = if state.selected_value().is_empty() {
            props.placeholder.clone()
        } else {
            state.selected_value().to_string()
        };
        Self {
            label: props.label.clone(),
            required: props.required,
            placeholder: props.placeholder.clone(),
            trigger_text,
            input_text: state.query().to_string(),
            open: state.is_open(),
            loading: state.loading(),
            phase: state.phase(),
            external_error: props.error.clone(),
            list: ListDisplay::from_state(state),
        }
    }
}

impl ListDisplay {
    fn from_state(state: &ResolutionState) -> Self {
        if state.loading() {
            return ListDisplay::Loading;
        }
        if let Some(message) = state.error() {
            return ListDisplay::Error {
                message: message.to_string(),
                manual_entry_enabled: state.manual_entry_text().is_some(),
            };
        }
        let suggestions = state.suggestions();
        if suggestions.is_empty() {
            return ListDisplay::Empty;
        }
        ListDisplay::Suggestions {
            items: suggestions
                .iter()
                .map(|suggestion| SuggestionItem {
                    description: suggestion.description.clone(),
                    id: suggestion.id.clone(),
                    selected: suggestion.description == state.selected_value(),
                })
                .collect(),
        }
    }
}
