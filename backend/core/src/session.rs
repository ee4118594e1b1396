//! Per-session UI state: current image, current analysis, loading flag and error.
//!
//! Every live analysis is stamped with a generation number. Starting a new
//! analysis (or seeding the example) bumps the generation, so a response that
//! arrives for an older request is dropped instead of overwriting newer state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ErrorKind, FinscopeError};
use crate::types::EncodedImage;

/// Where the current analysis text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Nothing analyzed yet.
    #[default]
    Empty,
    /// Bundled sample analysis, no API round trip.
    Example,
    /// Response from the inference endpoint.
    Live,
}

/// Dismissible error shown inline to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&FinscopeError> for SessionError {
    fn from(err: &FinscopeError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Proof that an analysis was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub image: Option<EncodedImage>,
    pub analysis: String,
    pub loading: bool,
    pub error: Option<SessionError>,
    pub source: AnalysisSource,
    pub updated_at: DateTime<Utc>,
    generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            image: None,
            analysis: String::new(),
            loading: false,
            error: None,
            source: AnalysisSource::Empty,
            updated_at: Utc::now(),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace image and analysis with the bundled example.
    ///
    /// Any analysis still in flight is invalidated.
    pub fn seed(&mut self, image: EncodedImage, analysis: impl Into<String>) {
        self.generation += 1;
        self.image = Some(image);
        self.analysis = analysis.into();
        self.source = AnalysisSource::Example;
        self.loading = false;
        self.error = None;
        self.touch();
    }

    /// Set a freshly uploaded image and clear any pending error.
    pub fn set_image(&mut self, image: EncodedImage) {
        self.image = Some(image);
        self.error = None;
        self.touch();
    }

    pub fn set_error(&mut self, err: &FinscopeError) {
        self.error = Some(SessionError::from(err));
        self.touch();
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.touch();
    }

    /// Mark an analysis as started and hand back its ticket.
    pub fn begin_analysis(&mut self) -> AnalysisTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.touch();
        debug!(generation = self.generation, "Analysis started");
        AnalysisTicket {
            generation: self.generation,
        }
    }

    /// Whether a response for `ticket` would still be applied.
    pub fn is_current(&self, ticket: AnalysisTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply the outcome of an analysis.
    ///
    /// Stale tickets leave the state untouched and yield
    /// [`FinscopeError::AnalysisSuperseded`]. A failed analysis records the
    /// error and keeps the previous analysis text.
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: Result<String, FinscopeError>,
    ) -> Result<(), FinscopeError> {
        if !self.is_current(ticket) {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale analysis response"
            );
            return Err(FinscopeError::AnalysisSuperseded);
        }

        self.loading = false;
        self.touch();
        match result {
            Ok(text) => {
                self.analysis = text;
                self.source = AnalysisSource::Live;
                Ok(())
            }
            Err(e) => {
                self.error = Some(SessionError::from(&e));
                Err(e)
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> EncodedImage {
        EncodedImage::new("image/png", "AAAA", 3)
    }

    #[test]
    fn new_session_is_empty() {
        let s = SessionState::new();
        assert!(s.image.is_none());
        assert!(s.analysis.is_empty());
        assert!(!s.loading);
        assert_eq!(s.source, AnalysisSource::Empty);
    }

    #[test]
    fn successful_analysis_replaces_text() {
        let mut s = SessionState::new();
        s.set_image(image());
        let ticket = s.begin_analysis();
        assert!(s.loading);
        s.finish_analysis(ticket, Ok("1. Fish".into())).unwrap();
        assert!(!s.loading);
        assert_eq!(s.analysis, "1. Fish");
        assert_eq!(s.source, AnalysisSource::Live);
    }

    #[test]
    fn failed_analysis_keeps_previous_text() {
        let mut s = SessionState::new();
        s.seed(image(), "1. Example");
        let ticket = s.begin_analysis();
        let err = s
            .finish_analysis(ticket, Err(FinscopeError::Request("upstream 500".into())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(s.analysis, "1. Example");
        assert_eq!(s.source, AnalysisSource::Example);
        assert_eq!(s.error.as_ref().unwrap().message, "upstream 500");
        assert!(!s.loading);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut s = SessionState::new();
        s.set_image(image());
        let first = s.begin_analysis();
        let second = s.begin_analysis();

        let err = s.finish_analysis(first, Ok("old".into())).unwrap_err();
        assert!(matches!(err, FinscopeError::AnalysisSuperseded));
        assert!(s.loading, "newer request is still pending");
        assert!(s.analysis.is_empty());

        s.finish_analysis(second, Ok("new".into())).unwrap();
        assert_eq!(s.analysis, "new");
    }

    #[test]
    fn seeding_invalidates_in_flight_analysis() {
        let mut s = SessionState::new();
        s.set_image(image());
        let ticket = s.begin_analysis();
        s.seed(image(), "1. Example");
        assert!(!s.is_current(ticket));
        assert!(s.finish_analysis(ticket, Ok("late".into())).is_err());
        assert_eq!(s.analysis, "1. Example");
    }

    #[test]
    fn begin_clears_error_and_dismiss_works() {
        let mut s = SessionState::new();
        s.set_error(&FinscopeError::Validation("bad".into()));
        assert!(s.error.is_some());
        s.dismiss_error();
        assert!(s.error.is_none());

        s.set_error(&FinscopeError::Validation("bad".into()));
        s.begin_analysis();
        assert!(s.error.is_none());
    }
}
