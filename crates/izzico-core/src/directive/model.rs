//! Directive and action result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type tags the application ships handlers or field schemas for.
pub mod action_types {
    pub const NAVIGATE: &str = "navigate";
    pub const SET_FILTERS: &str = "setFilters";
    pub const OPEN_MODAL: &str = "openModal";
    pub const HIGHLIGHT_ELEMENT: &str = "highlightElement";
    pub const SCROLL_TO_SECTION: &str = "scrollToSection";
    pub const START_TOUR: &str = "startTour";
    pub const COPY_TO_CLIPBOARD: &str = "copyToClipboard";
    pub const TOGGLE_PREFERENCE: &str = "togglePreference";
}

/// A machine-actionable instruction extracted from one assistant message.
///
/// `sequence` is unique within the message, starts at 0 and follows the order
/// of appearance; results are correlated to directives through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDirective {
    pub sequence: usize,
    #[serde(rename = "type")]
    pub action_type: String,
    pub payload: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ActionDirective {
    /// Returns a payload field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.payload.get(name).map(String::as_str)
    }

    pub fn is_navigation(&self) -> bool {
        self.action_type == action_types::NAVIGATE
    }

    /// Whether running this directive may leave the current page.
    ///
    /// `setFilters` moves to the search page when it is not already shown.
    /// Callers must persist widget state before running such a directive.
    pub fn unloads_page(&self) -> bool {
        matches!(
            self.action_type.as_str(),
            action_types::NAVIGATE | action_types::SET_FILTERS
        )
    }

    /// Human-readable label used in feedback messages.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .or_else(|| self.payload.values().next().map(String::as_str))
            .unwrap_or(&self.action_type)
    }
}

/// Outcome of executing one directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub sequence: usize,
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn success(sequence: usize, message: impl Into<String>) -> Self {
        Self {
            sequence,
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(sequence: usize, message: impl Into<String>) -> Self {
        Self {
            sequence,
            success: false,
            message: message.into(),
        }
    }
}

/// Output of the directive parser.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReply {
    pub clean_text: String,
    pub directives: Vec<ActionDirective>,
}

impl ParsedReply {
    pub fn has_navigation(&self) -> bool {
        self.directives.iter().any(ActionDirective::is_navigation)
    }

    pub fn unloads_page(&self) -> bool {
        self.directives.iter().any(ActionDirective::unloads_page)
    }
}
