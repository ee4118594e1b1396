//! Drives one session through seed, upload and analyze.
//!
//! The session lock is never held across the inference call; the generation
//! ticket taken before the call decides whether its result is still wanted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use finscope_core::{EncodedImage, FinscopeError, SessionState, VisionClient};
use finscope_markdown::{format_analysis, DisplayBlock};
use finscope_media::{load_default_image, MediaPayload, UploadPolicy};
use finscope_understanding::FISH_PROMPT;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::example::EXAMPLE_ANALYSIS;

pub type SharedSession = Arc<RwLock<SessionState>>;

const NO_IMAGE_MESSAGE: &str = "Please upload a fish photo first";

pub struct FishAnalyzer {
    client: Arc<dyn VisionClient>,
    policy: UploadPolicy,
    default_image: PathBuf,
    prompt: String,
}

impl FishAnalyzer {
    pub fn new(client: Arc<dyn VisionClient>, policy: UploadPolicy, default_image: impl Into<PathBuf>) -> Self {
        Self {
            client,
            policy,
            default_image: default_image.into(),
            prompt: FISH_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    pub fn default_image(&self) -> &Path {
        &self.default_image
    }

    pub fn provider(&self) -> &str {
        self.client.name()
    }

    pub fn new_session() -> SharedSession {
        Arc::new(RwLock::new(SessionState::new()))
    }

    /// Show the bundled photo with the bundled sample analysis. No API call is made.
    #[instrument(skip_all)]
    pub async fn seed_with_example(&self, session: &SharedSession) -> Result<(), FinscopeError> {
        session.write().await.loading = true;

        match load_default_image(&self.default_image).await {
            Ok(image) => {
                session.write().await.seed(image, EXAMPLE_ANALYSIS);
                info!(path = %self.default_image.display(), "Seeded session with example");
                Ok(())
            }
            Err(e) => {
                let mut state = session.write().await;
                state.loading = false;
                state.set_error(&e);
                Err(e)
            }
        }
    }

    /// Validate a user upload, make it the current image, then analyze it.
    ///
    /// A rejected upload records the error and never reaches the vision client.
    #[instrument(skip_all, fields(source = %payload.source, mime = %payload.mime_type))]
    pub async fn upload(&self, session: &SharedSession, payload: MediaPayload) -> Result<(), FinscopeError> {
        let image = match self.policy.accept(&payload) {
            Ok(image) => image,
            Err(e) => {
                session.write().await.set_error(&e);
                return Err(e);
            }
        };

        session.write().await.set_image(image);
        self.analyze(session).await
    }

    /// Analyze the session's current image.
    ///
    /// Returns [`FinscopeError::AnalysisSuperseded`] if a newer analysis (or a
    /// re-seed) started while this one was in flight; its result is dropped.
    #[instrument(skip_all)]
    pub async fn analyze(&self, session: &SharedSession) -> Result<(), FinscopeError> {
        let (image, ticket) = {
            let mut state = session.write().await;
            let Some(image) = state.image.clone() else {
                let err = FinscopeError::Validation(NO_IMAGE_MESSAGE.to_string());
                state.set_error(&err);
                return Err(err);
            };
            (image, state.begin_analysis())
        };

        debug!(generation = ticket.generation(), provider = self.client.name(), "Sending image for analysis");
        let result = self.client.describe(&image, &self.prompt).await;

        let outcome = session.write().await.finish_analysis(ticket, result);
        match &outcome {
            Ok(()) => info!(generation = ticket.generation(), "Analysis complete"),
            Err(FinscopeError::AnalysisSuperseded) => {
                debug!(generation = ticket.generation(), "Analysis result superseded")
            }
            Err(e) => warn!(generation = ticket.generation(), error = %e, "Analysis failed"),
        }
        outcome
    }

    pub async fn dismiss_error(&self, session: &SharedSession) {
        session.write().await.dismiss_error();
    }

    /// One-shot analysis outside any session.
    pub async fn analyze_image(&self, image: &EncodedImage) -> Result<Vec<DisplayBlock>, FinscopeError> {
        let text = self.client.describe(image, &self.prompt).await?;
        Ok(format_analysis(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use finscope_core::{AnalysisSource, ErrorKind};
    use tokio::sync::Notify;

    use crate::snapshot::SessionSnapshot;

    /// Scripted vision client. The first call optionally blocks on `gate`.
    struct MockVision {
        calls: AtomicUsize,
        response: Result<String, String>,
        gate: Option<Arc<Notify>>,
    }

    impl MockVision {
        fn ok(text: &str) -> Self {
            Self { calls: AtomicUsize::new(0), response: Ok(text.into()), gate: None }
        }
        fn failing(msg: &str) -> Self {
            Self { calls: AtomicUsize::new(0), response: Err(msg.into()), gate: None }
        }
        fn gated(gate: Arc<Notify>) -> Self {
            Self { calls: AtomicUsize::new(0), response: Ok(String::new()), gate: Some(gate) }
        }
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VisionClient for MockVision {
        fn name(&self) -> &str {
            "mock"
        }

        async fn describe(&self, _image: &EncodedImage, _prompt: &str) -> Result<String, FinscopeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                if n == 0 {
                    gate.notified().await;
                }
                return Ok(format!("response {n}"));
            }
            self.response.clone().map_err(FinscopeError::Request)
        }
    }

    fn analyzer(client: Arc<MockVision>) -> FishAnalyzer {
        FishAnalyzer::new(client, UploadPolicy::default(), "/nonexistent/default-fish.jpg")
    }

    fn png(len: usize) -> MediaPayload {
        MediaPayload::new("fish.png", "image/png", Bytes::from(vec![0u8; len]))
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected_without_analysis() {
        let client = Arc::new(MockVision::ok("unused"));
        let analyzer = analyzer(client.clone());
        let session = FishAnalyzer::new_session();

        let payload = MediaPayload::new("notes.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
        let err = analyzer.upload(&session, payload).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(client.calls(), 0);
        let state = session.read().await;
        assert!(state.image.is_none());
        assert_eq!(state.error.as_ref().unwrap().message, "Please upload a valid image file");
    }

    #[tokio::test]
    async fn oversize_upload_mentions_limit() {
        let client = Arc::new(MockVision::ok("unused"));
        let analyzer = analyzer(client.clone());
        let session = FishAnalyzer::new_session();

        let err = analyzer.upload(&session, png(25 * 1024 * 1024)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("20MB"));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn successful_upload_yields_five_sections() {
        let client = Arc::new(MockVision::ok(EXAMPLE_ANALYSIS));
        let analyzer = analyzer(client.clone());
        let session = FishAnalyzer::new_session();

        analyzer.upload(&session, png(16)).await.unwrap();

        assert_eq!(client.calls(), 1);
        let snap = SessionSnapshot::from(&*session.read().await);
        let headers: Vec<&str> = snap
            .blocks
            .iter()
            .filter_map(|b| match b {
                DisplayBlock::SectionHeader { title } => Some(title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headers,
            vec![
                "Fish Identification:",
                "Habitat & Distribution:",
                "Biology & Behavior:",
                "Conservation & Aquarium Care:",
                "Additional Information:",
            ]
        );
        assert_eq!(snap.source, AnalysisSource::Live);
        assert!(!snap.loading);
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn request_failure_keeps_previous_analysis() {
        let client = Arc::new(MockVision::failing("Gemini error (500): internal"));
        let analyzer = analyzer(client.clone());
        let session = FishAnalyzer::new_session();
        session
            .write()
            .await
            .seed(EncodedImage::new("image/png", "AAAA", 3), "1. Previous");

        let err = analyzer.analyze(&session).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);

        let state = session.read().await;
        assert_eq!(state.analysis, "1. Previous");
        assert_eq!(state.error.as_ref().unwrap().message, "Gemini error (500): internal");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn analyze_without_image_is_validation_error() {
        let client = Arc::new(MockVision::ok("unused"));
        let analyzer = analyzer(client.clone());
        let session = FishAnalyzer::new_session();

        let err = analyzer.analyze(&session).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn seed_uses_bundled_asset_without_api_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default-fish.jpg");
        std::fs::write(&path, b"\xff\xd8\xff").unwrap();

        let client = Arc::new(MockVision::ok("unused"));
        let analyzer = FishAnalyzer::new(client.clone(), UploadPolicy::default(), &path);
        let session = FishAnalyzer::new_session();

        analyzer.seed_with_example(&session).await.unwrap();

        assert_eq!(client.calls(), 0);
        let state = session.read().await;
        assert_eq!(state.source, AnalysisSource::Example);
        assert_eq!(state.analysis, EXAMPLE_ANALYSIS);
        assert_eq!(state.image.as_ref().unwrap().mime_type, "image/jpeg");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn seed_failure_records_load_error() {
        let client = Arc::new(MockVision::ok("unused"));
        let analyzer = analyzer(client);
        let session = FishAnalyzer::new_session();

        let err = analyzer.seed_with_example(&session).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);

        let state = session.read().await;
        assert_eq!(state.error.as_ref().unwrap().message, "Failed to load default image");
        assert!(!state.loading);
        assert!(state.image.is_none());
    }

    #[tokio::test]
    async fn stale_response_is_dropped() {
        let gate = Arc::new(Notify::new());
        let client = Arc::new(MockVision::gated(gate.clone()));
        let analyzer = Arc::new(analyzer(client.clone()));
        let session = FishAnalyzer::new_session();
        session.write().await.set_image(EncodedImage::new("image/png", "AAAA", 3));

        let first = {
            let analyzer = analyzer.clone();
            let session = session.clone();
            tokio::spawn(async move { analyzer.analyze(&session).await })
        };
        while client.calls() == 0 {
            tokio::task::yield_now().await;
        }

        analyzer.analyze(&session).await.unwrap();
        gate.notify_one();
        let stale = first.await.unwrap();

        assert!(matches!(stale, Err(FinscopeError::AnalysisSuperseded)));
        let state = session.read().await;
        assert_eq!(state.analysis, "response 1");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn dismiss_clears_error() {
        let analyzer = analyzer(Arc::new(MockVision::ok("unused")));
        let session = FishAnalyzer::new_session();
        let _ = analyzer.analyze(&session).await;
        assert!(session.read().await.error.is_some());

        analyzer.dismiss_error(&session).await;
        assert!(session.read().await.error.is_none());
    }

    #[tokio::test]
    async fn one_shot_analysis_formats_blocks() {
        let analyzer = analyzer(Arc::new(MockVision::ok("1. Title\n- Name: Nemo\n- orange")));
        let blocks = analyzer
            .analyze_image(&EncodedImage::new("image/png", "AAAA", 3))
            .await
            .unwrap();
        assert_eq!(blocks.len(), 3);
    }
}
