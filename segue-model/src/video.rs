use std::time::Duration;

use crate::credits::Credits;
use crate::ids::{VideoID, ViewerID};
use crate::role::Role;

/// A playable video. Immutable once loaded for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Video {
    pub id: VideoID,
    pub title: String,
    pub price: Credits,
    pub duration: Duration,
    pub creator_id: ViewerID,
    /// Role of the creator at upload time. VIP access covers videos authored
    /// by admins only.
    pub creator_role: Role,
}

impl Video {
    pub fn is_authored_by(&self, viewer_id: ViewerID) -> bool {
        self.creator_id == viewer_id
    }
}
