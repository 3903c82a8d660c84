// * Orchestration Layer
// * Owns the user configuration and the summarizer collaborator. The page-resident
// * engine reaches it only through the `AnalysisBackend` channel.

pub mod client;
pub mod errors;
pub mod prompt;
pub mod service;

use crate::analysis::AnalysisResult;
use crate::refinery::PageContent;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use client::{resolve_endpoint, AuthStyle, ChatClient, ChatRequest};
pub use errors::BackendError;
pub use prompt::build_prompt;
pub use service::Orchestrator;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

/// What the engine sends for analysis: a whole extracted page or a raw selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPayload {
    Page(PageContent),
    Selection(String),
}

impl ContentPayload {
    /// The text the summarizer should read
    pub fn text(&self) -> &str {
        match self {
            ContentPayload::Page(page) => &page.content,
            ContentPayload::Selection(text) => text,
        }
    }
}

/// External summarization service: one prompt in, raw completion text out
pub trait Summarizer: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BackendFuture<'a, String>;
}

/// Message channel from the page to the orchestration layer
pub trait AnalysisBackend: Send + Sync {
    fn analyze(&self, payload: ContentPayload) -> BackendFuture<'_, AnalysisResult>;
}

impl<T: Summarizer + ?Sized> Summarizer for Arc<T> {
    fn complete<'a>(&'a self, prompt: &'a str) -> BackendFuture<'a, String> {
        (**self).complete(prompt)
    }
}

impl<T: AnalysisBackend + ?Sized> AnalysisBackend for Arc<T> {
    fn analyze(&self, payload: ContentPayload) -> BackendFuture<'_, AnalysisResult> {
        (**self).analyze(payload)
    }
}
