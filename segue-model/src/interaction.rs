use crate::ids::{VideoID, ViewerID};

/// Per viewer×video interaction flags.
///
/// Records are created lazily by the backend on first fetch. `is_watched`
/// only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionRecord {
    pub viewer_id: ViewerID,
    pub video_id: VideoID,
    pub liked: bool,
    pub disliked: bool,
    is_watched: bool,
}

impl InteractionRecord {
    /// Fresh record with every flag cleared.
    pub fn new(viewer_id: ViewerID, video_id: VideoID) -> Self {
        Self {
            viewer_id,
            video_id,
            liked: false,
            disliked: false,
            is_watched: false,
        }
    }

    pub fn watched(viewer_id: ViewerID, video_id: VideoID) -> Self {
        let mut record = Self::new(viewer_id, video_id);
        record.mark_watched();
        record
    }

    pub fn is_watched(&self) -> bool {
        self.is_watched
    }

    /// Returns `true` if the flag changed.
    pub fn mark_watched(&mut self) -> bool {
        let changed = !self.is_watched;
        self.is_watched = true;
        changed
    }

    /// Fold a freshly fetched record into this one without ever clearing the
    /// watched flag.
    pub fn merge(&mut self, fetched: &InteractionRecord) {
        self.liked = fetched.liked;
        self.disliked = fetched.disliked;
        self.is_watched |= fetched.is_watched;
    }
}
