// * Orchestrator
// * Reads the user configuration on every request and either answers locally
// * (no API key) or forwards one prompt to the summarizer. No retries.

use crate::analysis::{parse_response, AnalysisResult};
use crate::backend::client::ChatClient;
use crate::backend::errors::BackendError;
use crate::backend::prompt::build_prompt;
use crate::backend::{AnalysisBackend, BackendFuture, ContentPayload, Summarizer};
use crate::config::{ConfigStore, UserConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Orchestrator<C: ConfigStore> {
    store: C,
    summarizer: Option<Arc<dyn Summarizer>>,
    timeout: Option<Duration>,
}

impl<C: ConfigStore> Orchestrator<C> {
    /// Talks to the provider named in the stored configuration
    pub fn new(store: C) -> Self {
        Self {
            store,
            summarizer: None,
            timeout: None,
        }
    }

    /// Uses a fixed summarizer instead of building an HTTP client per request
    pub fn with_summarizer(store: C, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            store,
            summarizer: Some(summarizer),
            timeout: None,
        }
    }

    /// Bounds each HTTP completion call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn config(&self) -> Result<UserConfig, BackendError> {
        Ok(self.store.load()?)
    }

    pub fn save_config(&self, config: &UserConfig) -> Result<(), BackendError> {
        self.store.save(config)?;
        info!(provider = ?config.provider, local_only = config.is_local_only(), "configuration saved");
        Ok(())
    }

    /// Analyses a page or selection; failures read "AI analysis failed: ..."
    pub async fn analyze_content(&self, payload: ContentPayload) -> Result<AnalysisResult, BackendError> {
        self.run(payload).await.map_err(BackendError::analysis_failed)
    }

    async fn run(&self, payload: ContentPayload) -> Result<AnalysisResult, BackendError> {
        let config = self.store.load()?;
        if config.is_local_only() {
            debug!("no API key configured, answering locally");
            return Ok(AnalysisResult::local_fallback());
        }

        let prompt = build_prompt(&payload);
        let raw = match &self.summarizer {
            Some(summarizer) => summarizer.complete(&prompt).await,
            None => ChatClient::new(&config, self.timeout)?.complete(&prompt).await,
        }
        .inspect_err(|e| warn!(error = %e, provider = ?config.provider, "summarizer call failed"))?;

        let result = parse_response(&raw);
        info!(
            key_points = result.key_points.len(),
            keywords = result.keywords.len(),
            sections = result.scored_sections().len(),
            "analysis received"
        );
        Ok(result)
    }
}

impl<C: ConfigStore> AnalysisBackend for Orchestrator<C> {
    fn analyze(&self, payload: ContentPayload) -> BackendFuture<'_, AnalysisResult> {
        Box::pin(self.analyze_content(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PLACEHOLDER_SUMMARY;
    use crate::config::MemoryConfigStore;
    use std::sync::Mutex;

    /// Replays a canned completion and records prompts
    struct CannedSummarizer {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedSummarizer {
        fn new(reply: Result<&str, u16>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl Summarizer for CannedSummarizer {
        fn complete<'a>(&'a self, prompt: &'a str) -> BackendFuture<'a, String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let reply = self.reply.clone();
            Box::pin(async move {
                reply.map_err(|status| BackendError::Status {
                    status,
                    body: "quota exceeded".to_string(),
                })
            })
        }
    }

    fn keyed_store() -> MemoryConfigStore {
        MemoryConfigStore::new(UserConfig {
            api_key: Some("sk-test".to_string()),
            ..UserConfig::default()
        })
    }

    #[tokio::test]
    async fn test_local_only_without_key() {
        let summarizer = CannedSummarizer::new(Ok("unused"));
        let orchestrator = Orchestrator::with_summarizer(MemoryConfigStore::default(), summarizer.clone());

        let result = orchestrator
            .analyze_content(ContentPayload::Selection("text".to_string()))
            .await
            .unwrap();

        assert_eq!(result, AnalysisResult::local_fallback());
        assert!(summarizer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_completion_is_parsed() {
        let reply = "```json\n{\"summary\":\"Plans compared\",\"keyPoints\":[\"Enterprise plan adds SSO\"],\"keywords\":[\"Enterprise plan\"]}\n```";
        let summarizer = CannedSummarizer::new(Ok(reply));
        let orchestrator = Orchestrator::with_summarizer(keyed_store(), summarizer.clone());

        let result = orchestrator
            .analyze_content(ContentPayload::Selection("Enterprise plan adds SSO.".to_string()))
            .await
            .unwrap();

        assert_eq!(result.summary, "Plans compared");
        assert_eq!(result.keywords, vec!["Enterprise plan"]);
        let prompts = summarizer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("Enterprise plan adds SSO."));
    }

    #[tokio::test]
    async fn test_unstructured_completion_degrades() {
        let summarizer = CannedSummarizer::new(Ok("I cannot help with that."));
        let orchestrator = Orchestrator::with_summarizer(keyed_store(), summarizer);

        let result = orchestrator
            .analyze_content(ContentPayload::Selection("x".to_string()))
            .await
            .unwrap();

        assert_eq!(result.summary, PLACEHOLDER_SUMMARY);
    }

    #[tokio::test]
    async fn test_failure_is_wrapped() {
        let summarizer = CannedSummarizer::new(Err(429));
        let orchestrator = Orchestrator::with_summarizer(keyed_store(), summarizer);

        let err = orchestrator
            .analyze_content(ContentPayload::Selection("x".to_string()))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "AI analysis failed: API request failed with status 429: quota exceeded"
        );
    }

    #[tokio::test]
    async fn test_through_backend_channel() {
        let summarizer = CannedSummarizer::new(Ok("Summary: Short\n- One\n- Two"));
        let backend: Arc<dyn AnalysisBackend> =
            Arc::new(Orchestrator::with_summarizer(keyed_store(), summarizer));

        let result = backend
            .analyze(ContentPayload::Selection("x".to_string()))
            .await
            .unwrap();

        assert_eq!(result.summary, "Short");
        assert_eq!(result.key_points, vec!["One", "Two"]);
    }

    #[test]
    fn test_save_config_switches_mode() {
        let orchestrator = Orchestrator::new(MemoryConfigStore::default());
        assert!(orchestrator.config().unwrap().is_local_only());

        orchestrator
            .save_config(&UserConfig {
                api_key: Some("k".to_string()),
                ..UserConfig::default()
            })
            .unwrap();
        assert!(!orchestrator.config().unwrap().is_local_only());
    }
}
