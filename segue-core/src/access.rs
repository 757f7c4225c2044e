//! Access resolution
//!
//! A viewer may play a video when any of the following holds:
//!
//! - they purchased it (purchases are permanent)
//! - they are an admin
//! - they created it
//! - their VIP tier is still running and the video was authored by an admin
//!
//! The resolver is pure. The purchase fact and the current instant are passed
//! in, so the same inputs always produce the same answer.

use segue_model::{AccessState, Video, Viewer};

/// The clause that granted access, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessGrant {
    /// The viewer bought the video.
    Purchased,
    /// Admins can play everything.
    Admin,
    /// The viewer uploaded the video.
    Creator,
    /// Unexpired VIP tier on an admin-authored video.
    Vip,
}

impl AccessGrant {
    /// Stable lowercase name, used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessGrant::Purchased => "purchased",
            AccessGrant::Admin => "admin",
            AccessGrant::Creator => "creator",
            AccessGrant::Vip => "vip",
        }
    }
}

impl std::fmt::Display for AccessGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless entry point for the access predicate.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessResolver;

impl AccessResolver {
    /// Which clause, if any, lets `viewer` play `video`.
    pub fn grant(
        viewer: &Viewer,
        video: &Video,
        purchased: bool,
        now_epoch_secs: i64,
    ) -> Option<AccessGrant> {
        if purchased {
            return Some(AccessGrant::Purchased);
        }
        if viewer.role.is_admin() {
            return Some(AccessGrant::Admin);
        }
        if video.is_authored_by(viewer.id) {
            return Some(AccessGrant::Creator);
        }
        if viewer.is_vip_at(now_epoch_secs) && video.creator_role.is_admin() {
            return Some(AccessGrant::Vip);
        }
        None
    }

    /// `true` when any clause grants access.
    pub fn resolve(
        viewer: &Viewer,
        video: &Video,
        purchased: bool,
        now_epoch_secs: i64,
    ) -> bool {
        Self::grant(viewer, video, purchased, now_epoch_secs).is_some()
    }

    /// [`Self::resolve`] expressed as the lock shown to the viewer.
    pub fn state(
        viewer: &Viewer,
        video: &Video,
        purchased: bool,
        now_epoch_secs: i64,
    ) -> AccessState {
        AccessState::from_entitled(Self::resolve(
            viewer,
            video,
            purchased,
            now_epoch_secs,
        ))
    }
}
