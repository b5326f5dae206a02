// InfoExtractor Orchestrator - mode selection and fallback
//
// Strategy:
// 1. Try backends in the order the configured mode implies
// 2. Media that cannot be served (private, removed, unsupported) is final
// 3. Missing tools, 403/rate limiting/bot checks and generic failures move on
//    to the next backend

use async_trait::async_trait;

use super::cli::CliInfoExtractor;
use super::python::PythonInfoExtractor;
use super::traits::{ExtractorConfig, ExtractorMode, InfoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaDocument;

/// Orchestrator over the CLI and Python extractors
pub struct InfoExtractorOrchestrator {
    backends: Vec<Box<dyn InfoExtractor>>,
}

impl InfoExtractorOrchestrator {
    pub fn new(config: ExtractorConfig) -> Self {
        let mut orchestrator = Self::empty();
        match config.mode {
            ExtractorMode::Cli => {
                orchestrator.add_backend(Box::new(CliInfoExtractor::new(config)));
            }
            ExtractorMode::Python => {
                orchestrator.add_backend(Box::new(PythonInfoExtractor::new(config)));
            }
            ExtractorMode::Auto => {
                orchestrator.add_backend(Box::new(CliInfoExtractor::new(config.clone())));
                orchestrator.add_backend(Box::new(PythonInfoExtractor::new(config)));
            }
        }
        orchestrator
    }

    pub fn empty() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    pub fn add_backend(&mut self, backend: Box<dyn InfoExtractor>) {
        self.backends.push(backend);
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }
}

#[async_trait]
impl InfoExtractor for InfoExtractorOrchestrator {
    fn name(&self) -> &'static str {
        "orchestrator"
    }

    async fn is_available(&self) -> bool {
        for backend in &self.backends {
            if backend.is_available().await {
                return true;
            }
        }
        false
    }

    async fn extract(&self, url: &str) -> Result<MediaDocument, DownloadError> {
        let mut last_error: Option<DownloadError> = None;

        for backend in &self.backends {
            tracing::debug!("[Orchestrator] Trying backend: {}", backend.name());

            match backend.extract(url).await {
                Ok(doc) => {
                    tracing::info!(
                        "[Orchestrator] {} extracted '{}' ({} formats)",
                        backend.name(),
                        doc.title,
                        doc.formats.len()
                    );
                    return Ok(doc);
                }
                Err(e) if !e.is_retryable() => {
                    tracing::info!("[Orchestrator] {} reports media unavailable: {}", backend.name(), e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("[Orchestrator] {} failed: {}", backend.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DownloadError::ToolNotFound("No extractor backend configured".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::extractors::diagnostics::FailureReason;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeExtractor {
        result: Result<MediaDocument, DownloadError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl InfoExtractor for FakeExtractor {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn extract(&self, _url: &str) -> Result<MediaDocument, DownloadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn fake(result: Result<MediaDocument, DownloadError>) -> (Box<dyn InfoExtractor>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = FakeExtractor {
            result,
            calls: Arc::clone(&calls),
        };
        (Box::new(backend), calls)
    }

    fn titled(title: &str) -> MediaDocument {
        MediaDocument {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_auto_mode_order() {
        let orchestrator = InfoExtractorOrchestrator::new(ExtractorConfig::default());
        assert_eq!(orchestrator.backend_names(), vec!["cli-yt-dlp", "python-yt-dlp"]);

        let python_only = InfoExtractorOrchestrator::new(
            ExtractorConfig::default().with_mode(ExtractorMode::Python),
        );
        assert_eq!(python_only.backend_names(), vec!["python-yt-dlp"]);
    }

    #[tokio::test]
    async fn test_falls_back_after_missing_tool() {
        let mut orchestrator = InfoExtractorOrchestrator::empty();
        let (first, _) = fake(Err(DownloadError::ToolNotFound("yt-dlp".to_string())));
        let (second, second_calls) = fake(Ok(titled("from python")));
        orchestrator.add_backend(first);
        orchestrator.add_backend(second);

        let doc = orchestrator.extract("https://example.com").await.unwrap();
        assert_eq!(doc.title, "from python");
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_is_final() {
        let mut orchestrator = InfoExtractorOrchestrator::empty();
        let (first, _) = fake(Err(DownloadError::Unavailable {
            reason: FailureReason::PrivateVideo,
            diagnostic: "ERROR: Private video".to_string(),
        }));
        let (second, second_calls) = fake(Ok(titled("never")));
        orchestrator.add_backend(first);
        orchestrator.add_backend(second);

        let err = orchestrator.extract("https://example.com").await.unwrap_err();
        assert!(err.is_not_found_class());
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_forbidden_falls_back() {
        let mut orchestrator = InfoExtractorOrchestrator::empty();
        let (first, _) = fake(Err(DownloadError::Unavailable {
            reason: FailureReason::Http403Forbidden,
            diagnostic: "ERROR: unable to download video data: HTTP Error 403: Forbidden".to_string(),
        }));
        let (second, second_calls) = fake(Ok(titled("from python")));
        orchestrator.add_backend(first);
        orchestrator.add_backend(second);

        let doc = orchestrator.extract("https://example.com").await.unwrap();
        assert_eq!(doc.title, "from python");
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_on_every_backend_is_reported() {
        let rate_limited = || {
            Err(DownloadError::Unavailable {
                reason: FailureReason::RateLimited,
                diagnostic: "ERROR: HTTP Error 429: Too Many Requests".to_string(),
            })
        };
        let mut orchestrator = InfoExtractorOrchestrator::empty();
        let (first, _) = fake(rate_limited());
        let (second, second_calls) = fake(rate_limited());
        orchestrator.add_backend(first);
        orchestrator.add_backend(second);

        let err = orchestrator.extract("https://example.com").await.unwrap_err();
        assert!(err.is_not_found_class());
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_all_fail() {
        let mut orchestrator = InfoExtractorOrchestrator::empty();
        let (first, _) = fake(Err(DownloadError::ToolNotFound("yt-dlp".to_string())));
        let (second, _) = fake(Err(DownloadError::Timeout(60)));
        orchestrator.add_backend(first);
        orchestrator.add_backend(second);

        let err = orchestrator.extract("https://example.com").await.unwrap_err();
        assert!(matches!(err, DownloadError::Timeout(60)));
    }

    #[tokio::test]
    async fn test_empty_orchestrator() {
        let orchestrator = InfoExtractorOrchestrator::empty();
        let err = orchestrator.extract("https://example.com").await.unwrap_err();
        assert!(matches!(err, DownloadError::ToolNotFound(_)));
    }
}
