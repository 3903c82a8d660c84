// * Page Command Protocol
// * Requests arrive as JSON objects tagged by `action`; every reply is
// * `{ success, result?, error? }`.

use crate::analysis::AnalysisResult;
use crate::backend::BackendError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const ACTIONS: &[&str] = &[
    "analyzePage",
    "analyzeSelection",
    "highlightContent",
    "clearHighlights",
    "jumpToContent",
    "toggleSidebarMode",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    AnalyzePage,
    AnalyzeSelection {
        #[serde(rename = "selectionText")]
        selection_text: String,
    },
    HighlightContent {
        analysis: AnalysisResult,
    },
    ClearHighlights,
    JumpToContent,
    ToggleSidebarMode,
}

impl Command {
    /// Decodes a raw message; unknown or missing actions are rejected before
    /// payload validation so they always read "Unknown action".
    pub fn parse(message: Value) -> Result<Self, EngineError> {
        let action = message.get("action").and_then(Value::as_str);
        match action {
            Some(action) if ACTIONS.contains(&action) => Ok(serde_json::from_value(message)?),
            other => Err(EngineError::UnknownAction(other.map(str::to_string))),
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Command::AnalyzePage => "analyzePage",
            Command::AnalyzeSelection { .. } => "analyzeSelection",
            Command::HighlightContent { .. } => "highlightContent",
            Command::ClearHighlights => "clearHighlights",
            Command::JumpToContent => "jumpToContent",
            Command::ToggleSidebarMode => "toggleSidebarMode",
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown action")]
    UnknownAction(Option<String>),

    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Reply envelope for every command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            result: None,
            error: None,
        }
    }

    pub fn with_result(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.to_string()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Where "jump to content" lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JumpKind {
    Container,
    FirstParagraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpTarget {
    pub kind: JumpKind,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub preview: String,
}
