//! Serializable view of a session, with the analysis already formatted.

use chrono::{DateTime, Utc};
use finscope_core::{AnalysisSource, SessionError, SessionState};
use finscope_markdown::{format_analysis, DisplayBlock};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// `data:` URL of the current image, if any.
    pub image: Option<String>,
    pub loading: bool,
    pub error: Option<SessionError>,
    pub source: AnalysisSource,
    /// Freshly derived from the current analysis text on every snapshot.
    pub blocks: Vec<DisplayBlock>,
    pub generation: u64,
    pub updated_at: DateTime<Utc>,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            image: state.image.as_ref().map(|img| img.data_url()),
            loading: state.loading,
            error: state.error.clone(),
            source: state.source,
            blocks: format_analysis(&state.analysis),
            generation: state.generation(),
            updated_at: state.updated_at,
        }
    }
}
