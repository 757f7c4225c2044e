//! Collaborator ports consumed by the playback session.
//!
//! The session never talks to a backend directly. Hosts inject these traits
//! through [`PlaybackPorts`], and tests substitute in-memory or mock versions.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use segue_model::{InteractionRecord, Video, VideoID, Viewer, ViewerID};

use crate::error::{PurchaseError, Result};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    async fn get_video(&self, video_id: VideoID) -> Result<Video>;
}

/// Supplies the ordered next-video candidates for a video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn get_related_videos(&self, video_id: VideoID) -> Result<Vec<Video>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionLedger: Send + Sync {
    /// Returns the record, creating an empty one on first access.
    async fn get_interaction(
        &self,
        viewer_id: ViewerID,
        video_id: VideoID,
    ) -> Result<InteractionRecord>;

    /// Idempotent.
    async fn mark_watched(&self, viewer_id: ViewerID, video_id: VideoID) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storefront: Send + Sync {
    async fn has_purchased(&self, viewer_id: ViewerID, video_id: VideoID) -> Result<bool>;

    async fn purchase(
        &self,
        viewer_id: ViewerID,
        video_id: VideoID,
    ) -> std::result::Result<(), PurchaseError>;

    async fn refresh_viewer(&self, viewer_id: ViewerID) -> Result<Viewer>;
}

/// Receives navigation requests. Routing itself is the host's business.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, video_id: VideoID);
}

/// Bundle of collaborators handed to a [`crate::session::PlaybackSession`].
#[derive(Clone)]
pub struct PlaybackPorts {
    pub catalog: Arc<dyn VideoCatalog>,
    pub candidates: Arc<dyn CandidateSource>,
    pub interactions: Arc<dyn InteractionLedger>,
    pub store: Arc<dyn Storefront>,
    pub navigator: Arc<dyn Navigator>,
}

impl PlaybackPorts {
    /// Use one backend object for every data port.
    pub fn from_backend<B>(backend: Arc<B>, navigator: Arc<dyn Navigator>) -> Self
    where
        B: VideoCatalog + CandidateSource + InteractionLedger + Storefront + 'static,
    {
        Self {
            catalog: backend.clone(),
            candidates: backend.clone(),
            interactions: backend.clone(),
            store: backend,
            navigator,
        }
    }
}

impl fmt::Debug for PlaybackPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackPorts").finish_non_exhaustive()
    }
}
