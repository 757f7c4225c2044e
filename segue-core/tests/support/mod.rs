//! Shared fixtures for segue-core integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, Once};
use std::time::Duration;

use async_trait::async_trait;
use segue_core::{
    CandidateSource, InteractionLedger, Navigator, PlaybackConfig, PlaybackError,
    PlaybackPorts, PlaybackSession, PurchaseError, Result, Storefront, VideoCatalog,
};
use segue_model::{Credits, InteractionRecord, Role, Video, VideoID, Viewer, ViewerID};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "segue_core=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn video(title: &str, price: Credits) -> Video {
    Video {
        id: VideoID::new(),
        title: title.to_string(),
        price,
        duration: Duration::from_secs(120),
        creator_id: ViewerID::new(),
        creator_role: Role::User,
    }
}

pub fn viewer(balance: Credits, auto_purchase_limit: Credits) -> Viewer {
    let mut viewer = Viewer::new(ViewerID::new(), Role::parse("user"));
    viewer.balance = balance;
    viewer.auto_purchase_limit = auto_purchase_limit;
    viewer
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub videos: HashMap<VideoID, Video>,
    pub related: HashMap<VideoID, Vec<VideoID>>,
    pub interactions: HashMap<(ViewerID, VideoID), InteractionRecord>,
    pub purchases: HashSet<(ViewerID, VideoID)>,
    pub viewers: HashMap<ViewerID, Viewer>,
    pub video_fetches: usize,
    pub purchase_calls: usize,
    pub mark_watched_calls: usize,
    pub fail_next_purchase: Option<PurchaseError>,
    pub fail_video_fetch: bool,
    pub fail_mark_watched: bool,
}

/// Backend double that behaves like the real service: purchases debit the
/// viewer's balance and interaction records are created on first read.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

impl InMemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().expect("backend state poisoned")
    }

    pub fn add_viewer(&self, viewer: &Viewer) {
        self.state().viewers.insert(viewer.id, viewer.clone());
    }

    pub fn add_video(&self, video: &Video) {
        self.state().videos.insert(video.id, video.clone());
    }

    /// Register `current` with `candidates` as its ordered related list.
    pub fn relate(&self, current: &Video, candidates: &[&Video]) {
        let mut state = self.state();
        state.videos.insert(current.id, current.clone());
        for candidate in candidates {
            state.videos.insert(candidate.id, (*candidate).clone());
        }
        state
            .related
            .insert(current.id, candidates.iter().map(|c| c.id).collect());
    }

    pub fn mark_watched_now(&self, viewer_id: ViewerID, video_id: VideoID) {
        self.state()
            .interactions
            .entry((viewer_id, video_id))
            .or_insert_with(|| InteractionRecord::new(viewer_id, video_id))
            .mark_watched();
    }

    pub fn grant_purchase(&self, viewer_id: ViewerID, video_id: VideoID) {
        self.state().purchases.insert((viewer_id, video_id));
    }

    pub fn set_balance(&self, viewer_id: ViewerID, balance: Credits) {
        if let Some(viewer) = self.state().viewers.get_mut(&viewer_id) {
            viewer.balance = balance;
        }
    }

    pub fn balance(&self, viewer_id: ViewerID) -> Credits {
        self.state()
            .viewers
            .get(&viewer_id)
            .map(|viewer| viewer.balance)
            .unwrap_or_default()
    }

    pub fn is_watched(&self, viewer_id: ViewerID, video_id: VideoID) -> bool {
        self.state()
            .interactions
            .get(&(viewer_id, video_id))
            .is_some_and(InteractionRecord::is_watched)
    }
}

#[async_trait]
impl VideoCatalog for InMemoryBackend {
    async fn get_video(&self, video_id: VideoID) -> Result<Video> {
        let mut state = self.state();
        state.video_fetches += 1;
        if state.fail_video_fetch {
            return Err(PlaybackError::Collaborator("catalog offline".to_string()));
        }
        state
            .videos
            .get(&video_id)
            .cloned()
            .ok_or(PlaybackError::NotFound(video_id))
    }
}

#[async_trait]
impl CandidateSource for InMemoryBackend {
    async fn get_related_videos(&self, video_id: VideoID) -> Result<Vec<Video>> {
        let state = self.state();
        let ids = state.related.get(&video_id).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| state.videos.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl InteractionLedger for InMemoryBackend {
    async fn get_interaction(
        &self,
        viewer_id: ViewerID,
        video_id: VideoID,
    ) -> Result<InteractionRecord> {
        Ok(self
            .state()
            .interactions
            .entry((viewer_id, video_id))
            .or_insert_with(|| InteractionRecord::new(viewer_id, video_id))
            .clone())
    }

    async fn mark_watched(&self, viewer_id: ViewerID, video_id: VideoID) -> Result<()> {
        let mut state = self.state();
        state.mark_watched_calls += 1;
        if state.fail_mark_watched {
            return Err(PlaybackError::Collaborator("ledger offline".to_string()));
        }
        state
            .interactions
            .entry((viewer_id, video_id))
            .or_insert_with(|| InteractionRecord::new(viewer_id, video_id))
            .mark_watched();
        Ok(())
    }
}

#[async_trait]
impl Storefront for InMemoryBackend {
    async fn has_purchased(&self, viewer_id: ViewerID, video_id: VideoID) -> Result<bool> {
        Ok(self.state().purchases.contains(&(viewer_id, video_id)))
    }

    async fn purchase(
        &self,
        viewer_id: ViewerID,
        video_id: VideoID,
    ) -> std::result::Result<(), PurchaseError> {
        let mut state = self.state();
        state.purchase_calls += 1;

        if let Some(err) = state.fail_next_purchase.take() {
            return Err(err);
        }
        if state.purchases.contains(&(viewer_id, video_id)) {
            return Ok(());
        }

        let price = state
            .videos
            .get(&video_id)
            .map(|video| video.price)
            .ok_or_else(|| PurchaseError::Rejected("unknown video".to_string()))?;
        let viewer = state
            .viewers
            .get_mut(&viewer_id)
            .ok_or_else(|| PurchaseError::Rejected("unknown viewer".to_string()))?;

        viewer.balance = viewer
            .balance
            .checked_sub(price)
            .ok_or(PurchaseError::InsufficientFunds)?;
        state.purchases.insert((viewer_id, video_id));
        Ok(())
    }

    async fn refresh_viewer(&self, viewer_id: ViewerID) -> Result<Viewer> {
        self.state()
            .viewers
            .get(&viewer_id)
            .cloned()
            .ok_or_else(|| PlaybackError::Collaborator("unknown viewer".to_string()))
    }
}

/// Records every navigation request in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<VideoID>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<VideoID> {
        self.visited.lock().expect("navigator poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, video_id: VideoID) {
        self.visited.lock().expect("navigator poisoned").push(video_id);
    }
}

pub struct Harness {
    pub backend: Arc<InMemoryBackend>,
    pub navigator: Arc<RecordingNavigator>,
    pub viewer: Viewer,
}

impl Harness {
    pub fn new(viewer: Viewer) -> Self {
        init_tracing();
        let backend = InMemoryBackend::new();
        backend.add_viewer(&viewer);
        Self {
            backend,
            navigator: Arc::new(RecordingNavigator::default()),
            viewer,
        }
    }

    pub fn ports(&self) -> PlaybackPorts {
        PlaybackPorts::from_backend(self.backend.clone(), self.navigator.clone())
    }

    pub fn session(&self) -> PlaybackSession {
        PlaybackSession::new(self.viewer.clone(), self.ports(), PlaybackConfig::default())
    }
}
