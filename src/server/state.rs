//! Shared application state

use crate::pipeline::ArtifactSet;
use std::sync::Arc;

/// State shared by all request handlers
///
/// The artifacts are loaded once at startup and never mutated, so a plain
/// `Arc` is enough.
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<ArtifactSet>,
}

impl AppState {
    pub fn new(artifacts: ArtifactSet) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }
}
