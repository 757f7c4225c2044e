use std::collections::HashSet;

use crate::credits::Credits;
use crate::ids::{VideoID, ViewerID};
use crate::role::Role;

/// The signed-in viewer as last reported by the backend.
///
/// `balance` changes only through purchases; callers refresh the whole
/// record instead of patching it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewer {
    pub id: ViewerID,
    pub balance: Credits,
    /// Highest price bought without asking for confirmation.
    pub auto_purchase_limit: Credits,
    pub role: Role,
    /// VIP tier end, in epoch seconds. `None` means never subscribed.
    pub vip_expiry: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub watch_later: HashSet<VideoID>,
}

impl Viewer {
    pub fn new(id: ViewerID, role: Role) -> Self {
        Self {
            id,
            balance: Credits::ZERO,
            auto_purchase_limit: Credits::ZERO,
            role,
            vip_expiry: None,
            watch_later: HashSet::new(),
        }
    }

    /// VIP is active while the expiry lies strictly in the future.
    pub fn is_vip_at(&self, now_epoch_secs: i64) -> bool {
        self.vip_expiry
            .is_some_and(|expiry| expiry > now_epoch_secs)
    }

    pub fn can_afford(&self, price: Credits) -> bool {
        self.balance >= price
    }

    pub fn within_auto_purchase_limit(&self, price: Credits) -> bool {
        price <= self.auto_purchase_limit
    }

    pub fn has_in_watch_later(&self, video_id: &VideoID) -> bool {
        self.watch_later.contains(video_id)
    }
}
