// * TLDR Lens: page-resident content extraction, relevance scoring and highlighting.
// * The document is a live `scraper::Html` mutated in place through its `ego_tree` arena.

pub mod analysis;
pub mod backend;
pub mod config;
pub mod dom;
pub mod engine;
pub mod highlight;
pub mod ops;
pub mod projector;
pub mod refinery;

pub use analysis::{parse_response, AnalysisResult, ScoredSection, SectionKind};
pub use backend::{AnalysisBackend, BackendError, ContentPayload, Orchestrator, Summarizer};
pub use config::{ConfigStore, Provider, UserConfig};
pub use engine::{Command, ContentEngine, Response};
pub use highlight::{clear, highlight, ClearReport};
pub use projector::{HighlightState, PanelMode, Projector};
pub use refinery::{extract_page, PageContent};
