// * Content Engine
// * Page-resident command handler. Owns the live document and the projector, and
// * talks to the orchestration layer only through the `AnalysisBackend` channel.

use crate::analysis::AnalysisResult;
use crate::backend::{AnalysisBackend, ContentPayload};
use crate::config::constants::JUMP_PREVIEW_CHARS;
use crate::dom;
use crate::dom::text::preview;
use crate::engine::messages::{Command, EngineError, JumpKind, JumpTarget, Response};
use crate::highlight::ClearReport;
use crate::projector::{HighlightState, PanelMode, Projector};
use crate::refinery::{extract_page, locate, PageContent};
use ego_tree::NodeId;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static SELECTOR_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid paragraph selector"));

pub struct ContentEngine<B: AnalysisBackend> {
    document: Html,
    projector: Projector,
    backend: B,
    url: Option<String>,
}

impl<B: AnalysisBackend> ContentEngine<B> {
    pub fn new(document: Html, backend: B) -> Self {
        Self {
            document,
            projector: Projector::new(),
            backend,
            url: None,
        }
    }

    /// Records the page address reported with extracted content
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Direct document access for page-side events (hover, click, close buttons)
    pub fn document_mut(&mut self) -> &mut Html {
        &mut self.document
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Document and projector together, for interaction handlers
    pub fn parts_mut(&mut self) -> (&mut Html, &mut Projector) {
        (&mut self.document, &mut self.projector)
    }

    pub fn state(&self) -> &HighlightState {
        self.projector.state()
    }

    pub fn extract(&self) -> PageContent {
        extract_page(&self.document, self.url.as_deref())
    }

    /// Extracts the page and sends it through the backend channel
    pub async fn analyze_page(&self) -> Result<AnalysisResult, EngineError> {
        let page = self.extract();
        Ok(self.backend.analyze(ContentPayload::Page(page)).await?)
    }

    pub async fn analyze_selection(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        Ok(self
            .backend
            .analyze(ContentPayload::Selection(text.to_string()))
            .await?)
    }

    pub fn highlight_content(&mut self, analysis: &AnalysisResult) -> &HighlightState {
        self.projector.apply(&mut self.document, analysis)
    }

    pub fn clear_highlights(&mut self) -> ClearReport {
        self.projector.clear(&mut self.document)
    }

    /// Main container when one validates, else the first paragraph
    pub fn jump_to_content(&self) -> Option<JumpTarget> {
        let (kind, id) = match locate(&self.document) {
            Some(id) => (JumpKind::Container, id),
            None => (
                JumpKind::FirstParagraph,
                dom::select_attached(&self.document, &SELECTOR_PARAGRAPH).next()?.id(),
            ),
        };
        self.jump_target(kind, id)
    }

    fn jump_target(&self, kind: JumpKind, id: NodeId) -> Option<JumpTarget> {
        let element = dom::element_ref(&self.document, id)?;
        let text = dom::text_content(*element);
        Some(JumpTarget {
            kind,
            tag: element.value().name().to_string(),
            id: element.value().id().map(str::to_string),
            preview: preview(&text, JUMP_PREVIEW_CHARS),
        })
    }

    pub fn toggle_sidebar_mode(&mut self) -> PanelMode {
        self.projector.toggle_sidebar(&mut self.document)
    }

    /// Executes one decoded command and returns its result payload
    pub async fn execute(&mut self, command: Command) -> Result<Option<Value>, EngineError> {
        debug!(action = command.action(), "command received");
        match command {
            Command::AnalyzePage => {
                let result = self.analyze_page().await?;
                Ok(Some(serde_json::to_value(result)?))
            }
            Command::AnalyzeSelection { selection_text } => {
                let result = self.analyze_selection(&selection_text).await?;
                Ok(Some(serde_json::to_value(result)?))
            }
            Command::HighlightContent { analysis } => {
                let state = self.highlight_content(&analysis);
                info!(
                    highlights = state.highlight_count,
                    marks = state.marks.len(),
                    "analysis projected"
                );
                Ok(None)
            }
            Command::ClearHighlights => {
                self.clear_highlights();
                Ok(None)
            }
            Command::JumpToContent => Ok(self
                .jump_to_content()
                .map(serde_json::to_value)
                .transpose()?),
            Command::ToggleSidebarMode => {
                let mode = self.toggle_sidebar_mode();
                Ok(Some(serde_json::to_value(mode)?))
            }
        }
    }

    /// Decodes and executes a raw message; never fails, errors become `{ success: false }`
    pub async fn handle_message(&mut self, message: Value) -> Response {
        let outcome = match Command::parse(message) {
            Ok(command) => self.execute(command).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(Some(result)) => Response::with_result(result),
            Ok(None) => Response::ok(),
            Err(e) => {
                warn!(error = %e, "command failed");
                Response::failure(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendFuture};
    use crate::refinery::taxonomy::{ID_FLOATING_PANEL, ID_SIDEBAR};
    use serde_json::json;
    use std::sync::Mutex;

    /// Echoes the payload text back as the summary
    #[derive(Default)]
    struct EchoBackend {
        seen: Mutex<Vec<ContentPayload>>,
    }

    impl AnalysisBackend for EchoBackend {
        fn analyze(&self, payload: ContentPayload) -> BackendFuture<'_, AnalysisResult> {
            let summary = payload.text().to_string();
            self.seen.lock().unwrap().push(payload);
            Box::pin(async move {
                Ok(AnalysisResult {
                    summary,
                    key_points: vec!["Enterprise plan".to_string()],
                    keywords: vec!["enterprise".to_string()],
                    sections: None,
                })
            })
        }
    }

    struct DownBackend;

    impl AnalysisBackend for DownBackend {
        fn analyze(&self, _payload: ContentPayload) -> BackendFuture<'_, AnalysisResult> {
            Box::pin(async { Err(BackendError::Channel("receiving end does not exist".to_string())) })
        }
    }

    const PAGE: &str = r#"<html><head><title>Plans</title></head><body>
        <nav><a href="/">Home</a></nav>
        <article id="story">
            <h1>Choosing a plan</h1>
            <p>The Enterprise plan includes single sign-on and audit logging for every workspace.</p>
            <p>Smaller teams usually start on the standard plan and upgrade once they grow.</p>
        </article>
    </body></html>"#;

    fn engine() -> ContentEngine<EchoBackend> {
        ContentEngine::new(Html::parse_document(PAGE), EchoBackend::default())
            .with_url("https://example.com/plans")
    }

    #[tokio::test]
    async fn test_analyze_page_sends_extracted_content() {
        let mut engine = engine();
        let response = engine.handle_message(json!({"action": "analyzePage"})).await;

        assert!(response.success);
        let summary = response.result.unwrap()["summary"].as_str().unwrap().to_string();
        assert!(summary.contains("single sign-on"));

        let seen = engine.backend.seen.lock().unwrap();
        let ContentPayload::Page(page) = &seen[0] else {
            panic!("expected page payload");
        };
        assert_eq!(page.title, "Choosing a plan");
        assert_eq!(page.url.as_deref(), Some("https://example.com/plans"));
    }

    #[tokio::test]
    async fn test_analyze_selection_sends_raw_text() {
        let mut engine = engine();
        let response = engine
            .handle_message(json!({"action": "analyzeSelection", "selectionText": "just this"}))
            .await;

        assert_eq!(response.result.unwrap()["summary"], "just this");
    }

    #[tokio::test]
    async fn test_highlight_then_clear() {
        let mut engine = engine();
        let before = engine.document().html();

        let response = engine
            .handle_message(json!({
                "action": "highlightContent",
                "analysis": {"summary": "s", "keyPoints": ["k"], "keywords": ["Enterprise plan"]}
            }))
            .await;
        assert_eq!(response, Response::ok());
        assert_eq!(engine.state().highlight_count, 1);
        assert!(dom::element_by_id(engine.document(), ID_FLOATING_PANEL).is_some());

        let response = engine.handle_message(json!({"action": "clearHighlights"})).await;
        assert!(response.success);
        assert_eq!(engine.document().html(), before);
        assert!(!engine.state().is_active());
    }

    #[tokio::test]
    async fn test_jump_to_content() {
        let mut engine = engine();
        let response = engine.handle_message(json!({"action": "jumpToContent"})).await;
        let target: JumpTarget = serde_json::from_value(response.result.unwrap()).unwrap();

        assert_eq!(target.kind, JumpKind::Container);
        assert_eq!(target.tag, "article");
        assert_eq!(target.id.as_deref(), Some("story"));
        assert!(target.preview.starts_with("Choosing a plan"));
    }

    #[test]
    fn test_jump_falls_back_to_first_paragraph() {
        let engine = ContentEngine::new(
            Html::parse_document("<html><body><div><p>Short intro.</p></div></body></html>"),
            EchoBackend::default(),
        );
        let target = engine.jump_to_content().unwrap();
        assert_eq!(target.kind, JumpKind::FirstParagraph);
        assert_eq!(target.preview, "Short intro.");
    }

    #[tokio::test]
    async fn test_jump_with_nothing_to_land_on() {
        let mut engine = ContentEngine::new(
            Html::parse_document("<html><body><div>bare</div></body></html>"),
            EchoBackend::default(),
        );
        let response = engine.handle_message(json!({"action": "jumpToContent"})).await;
        assert_eq!(response, Response::ok());
    }

    #[test]
    fn test_jump_ignores_removed_panel() {
        let mut engine = ContentEngine::new(
            Html::parse_document("<html><body><div>bare</div></body></html>"),
            EchoBackend::default(),
        );
        let analysis = AnalysisResult {
            summary: "Panel summary".to_string(),
            ..AnalysisResult::default()
        };
        engine.highlight_content(&analysis);
        assert_eq!(engine.jump_to_content().map(|t| t.tag), Some("p".to_string()));

        crate::highlight::clear(engine.document_mut());
        assert!(engine.jump_to_content().is_none());

        engine.highlight_content(&analysis);
        engine.clear_highlights();
        assert!(engine.jump_to_content().is_none());
    }

    #[tokio::test]
    async fn test_toggle_sidebar_mode() {
        let mut engine = engine();

        let response = engine.handle_message(json!({"action": "toggleSidebarMode"})).await;
        assert_eq!(response.result, Some(json!("sidebar")));
        assert!(dom::element_by_id(engine.document(), ID_SIDEBAR).is_some());

        let response = engine.handle_message(json!({"action": "toggleSidebarMode"})).await;
        assert_eq!(response.result, Some(json!("none")));
        assert!(dom::element_by_id(engine.document(), ID_SIDEBAR).is_none());
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let mut engine = engine();
        let response = engine.handle_message(json!({"action": "selfDestruct"})).await;
        assert_eq!(response, Response::failure("Unknown action"));
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported() {
        let mut engine = ContentEngine::new(Html::parse_document(PAGE), DownBackend);
        let response = engine.handle_message(json!({"action": "analyzePage"})).await;

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Connection failed: receiving end does not exist")
        );
    }
}
