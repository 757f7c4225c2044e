//! End-of-video continuation planning
//!
//! Classification looks at the head candidate only. The remaining candidates
//! matter solely when a watched head has to be skipped, and that lookup
//! happens at execution time through [`resolve_skip_target`].
//!
//! Precedence, highest first:
//!
//! 1. head already watched → [`ContinuationStatus::SkippingWatched`]
//! 2. viewer entitled to head → [`ContinuationStatus::PlayingNext`]
//! 3. price within limit and balance → [`ContinuationStatus::AutoBuying`]
//! 4. otherwise → [`ContinuationStatus::WaitingConfirmation`]

use std::collections::HashSet;

use segue_model::{ContinuationStatus, Video, VideoID, Viewer};
use tracing::debug;

use crate::access::AccessResolver;
use crate::config::PlaybackConfig;

/// Watched and purchased flags gathered from the backend before planning.
#[derive(Debug, Clone, Default)]
pub struct CandidateFacts {
    watched: HashSet<VideoID>,
    purchased: HashSet<VideoID>,
}

impl CandidateFacts {
    /// No facts: nothing watched, nothing purchased.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::record`] for a watched video.
    pub fn with_watched(mut self, video_id: VideoID) -> Self {
        self.watched.insert(video_id);
        self
    }

    /// Builder form of [`Self::record`] for a purchased video.
    pub fn with_purchased(mut self, video_id: VideoID) -> Self {
        self.purchased.insert(video_id);
        self
    }

    /// Record the backend's flags for one candidate.
    pub fn record(&mut self, video_id: VideoID, watched: bool, purchased: bool) {
        if watched {
            self.watched.insert(video_id);
        }
        if purchased {
            self.purchased.insert(video_id);
        }
    }

    /// Whether the viewer has already watched `video_id`.
    pub fn is_watched(&self, video_id: &VideoID) -> bool {
        self.watched.contains(video_id)
    }

    /// Whether the viewer owns `video_id`.
    pub fn has_purchased(&self, video_id: &VideoID) -> bool {
        self.purchased.contains(video_id)
    }
}

/// The single live plan for what follows the current video.
///
/// The countdown is present exactly when the status starts one, and it never
/// goes below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationDecision {
    status: ContinuationStatus,
    target: Video,
    countdown_seconds: Option<u32>,
}

impl ContinuationDecision {
    /// Build a decision. `countdown_seconds` is dropped for statuses that do
    /// not count down.
    pub fn new(
        status: ContinuationStatus,
        target: Video,
        countdown_seconds: u32,
    ) -> Self {
        let countdown_seconds =
            status.starts_countdown().then_some(countdown_seconds);
        Self {
            status,
            target,
            countdown_seconds,
        }
    }

    /// Current status. Changes only through [`Self::downgrade`].
    pub fn status(&self) -> ContinuationStatus {
        self.status
    }

    /// The head candidate the decision was made for.
    pub fn target(&self) -> &Video {
        &self.target
    }

    /// Seconds left on the overlay, `None` when no countdown runs.
    pub fn countdown_seconds(&self) -> Option<u32> {
        self.countdown_seconds
    }

    /// Accept a remaining value reported by the timer. Values that would move
    /// the countdown backwards are ignored.
    pub fn sync_countdown(&mut self, remaining: u32) {
        if let Some(current) = self.countdown_seconds.as_mut() {
            *current = (*current).min(remaining);
        }
    }

    /// Skip whatever is left of the countdown.
    pub fn force_zero(&mut self) {
        if let Some(current) = self.countdown_seconds.as_mut() {
            *current = 0;
        }
    }

    /// Turn a failed auto-purchase into a confirmation prompt.
    pub fn downgrade(&mut self) {
        self.status = ContinuationStatus::WaitingConfirmation;
        self.countdown_seconds = None;
    }
}

/// Pure classifier from candidates and viewer facts to one decision.
#[derive(Debug, Clone)]
pub struct ContinuationPlanner {
    countdown_seconds: u32,
}

impl Default for ContinuationPlanner {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}

impl ContinuationPlanner {
    /// Planner whose decisions count down from `countdown_seconds`.
    pub fn new(countdown_seconds: u32) -> Self {
        Self { countdown_seconds }
    }

    /// Planner using [`PlaybackConfig::countdown_seconds`].
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.countdown_seconds)
    }

    /// Countdown length given to new decisions.
    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    /// Classify `candidates` into one decision, or `None` when there is
    /// nothing to continue to.
    pub fn plan(
        &self,
        candidates: &[Video],
        viewer: &Viewer,
        facts: &CandidateFacts,
        now_epoch_secs: i64,
    ) -> Option<ContinuationDecision> {
        let head = candidates.first()?;
        let status = classify(head, viewer, facts, now_epoch_secs);

        debug!(
            target_id = %head.id,
            price = %head.price,
            balance = %viewer.balance,
            limit = %viewer.auto_purchase_limit,
            %status,
            "planned continuation"
        );

        Some(ContinuationDecision::new(
            status,
            head.clone(),
            self.countdown_seconds,
        ))
    }
}

fn classify(
    candidate: &Video,
    viewer: &Viewer,
    facts: &CandidateFacts,
    now_epoch_secs: i64,
) -> ContinuationStatus {
    if facts.is_watched(&candidate.id) {
        return ContinuationStatus::SkippingWatched;
    }

    let purchased = facts.has_purchased(&candidate.id);
    if AccessResolver::resolve(viewer, candidate, purchased, now_epoch_secs) {
        return ContinuationStatus::PlayingNext;
    }

    if viewer.within_auto_purchase_limit(candidate.price)
        && viewer.can_afford(candidate.price)
    {
        return ContinuationStatus::AutoBuying;
    }

    ContinuationStatus::WaitingConfirmation
}

/// Where a `SkippingWatched` decision actually lands: the first unwatched
/// candidate, or the head when everything has been watched.
pub fn resolve_skip_target<F>(candidates: &[Video], is_watched: F) -> Option<&Video>
where
    F: Fn(&Video) -> bool,
{
    candidates
        .iter()
        .find(|&candidate| !is_watched(candidate))
        .or_else(|| candidates.first())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use segue_model::{Credits, Role, ViewerID};

    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn cents(value: i64) -> Credits {
        Credits::from_cents(value).unwrap()
    }

    fn video(price: Credits) -> Video {
        Video {
            id: VideoID::new(),
            title: "Next up".to_string(),
            price,
            duration: Duration::from_secs(300),
            creator_id: ViewerID::new(),
            creator_role: Role::User,
        }
    }

    fn viewer(balance: Credits, limit: Credits) -> Viewer {
        let mut viewer = Viewer::new(ViewerID::new(), Role::User);
        viewer.balance = balance;
        viewer.auto_purchase_limit = limit;
        viewer
    }

    fn status_for(price: Credits, balance: Credits, limit: Credits) -> ContinuationStatus {
        let candidates = vec![video(price)];
        ContinuationPlanner::default()
            .plan(&candidates, &viewer(balance, limit), &CandidateFacts::new(), NOW)
            .map(|decision| decision.status())
            .unwrap()
    }

    #[test]
    fn empty_candidates_plan_nothing() {
        let planner = ContinuationPlanner::default();
        let viewer = viewer(Credits::whole(10), Credits::whole(5));
        assert!(planner.plan(&[], &viewer, &CandidateFacts::new(), NOW).is_none());
    }

    #[test]
    fn watched_head_outranks_entitlement() {
        let head = video(Credits::whole(1));
        let facts = CandidateFacts::new()
            .with_watched(head.id)
            .with_purchased(head.id);
        let candidates = vec![head.clone(), video(Credits::whole(1))];

        let decision = ContinuationPlanner::default()
            .plan(&candidates, &viewer(Credits::ZERO, Credits::ZERO), &facts, NOW)
            .unwrap();

        assert_eq!(decision.status(), ContinuationStatus::SkippingWatched);
        assert_eq!(decision.target().id, head.id);
        assert_eq!(decision.countdown_seconds(), Some(5));
    }

    #[test]
    fn entitlement_outranks_spending() {
        let head = video(Credits::whole(2));
        let facts = CandidateFacts::new().with_purchased(head.id);

        let decision = ContinuationPlanner::default()
            .plan(
                &[head],
                &viewer(Credits::whole(10), Credits::whole(5)),
                &facts,
                NOW,
            )
            .unwrap();
        assert_eq!(decision.status(), ContinuationStatus::PlayingNext);
    }

    #[test]
    fn only_the_head_is_classified() {
        let head = video(Credits::whole(8));
        let owned_second = video(Credits::whole(1));
        let facts = CandidateFacts::new().with_purchased(owned_second.id);

        let decision = ContinuationPlanner::default()
            .plan(
                &[head.clone(), owned_second],
                &viewer(Credits::whole(10), Credits::whole(5)),
                &facts,
                NOW,
            )
            .unwrap();

        assert_eq!(decision.status(), ContinuationStatus::WaitingConfirmation);
        assert_eq!(decision.target().id, head.id);
        assert_eq!(decision.countdown_seconds(), None);
    }

    #[test]
    fn auto_buy_limit_boundary() {
        let balance = Credits::whole(10);
        let limit = Credits::whole(5);

        assert_eq!(status_for(cents(500), balance, limit), ContinuationStatus::AutoBuying);
        assert_eq!(
            status_for(cents(501), balance, limit),
            ContinuationStatus::WaitingConfirmation
        );
        assert_eq!(status_for(cents(499), balance, limit), ContinuationStatus::AutoBuying);
    }

    #[test]
    fn auto_buy_balance_boundary() {
        let limit = Credits::whole(10);
        let price = Credits::whole(3);

        assert_eq!(status_for(price, cents(300), limit), ContinuationStatus::AutoBuying);
        assert_eq!(
            status_for(price, cents(299), limit),
            ContinuationStatus::WaitingConfirmation
        );
        assert_eq!(status_for(price, cents(301), limit), ContinuationStatus::AutoBuying);
    }

    #[test]
    fn countdown_follows_status() {
        let mut decision = ContinuationDecision::new(
            ContinuationStatus::AutoBuying,
            video(Credits::whole(1)),
            5,
        );
        decision.sync_countdown(3);
        decision.sync_countdown(4);
        assert_eq!(decision.countdown_seconds(), Some(3));

        decision.downgrade();
        assert_eq!(decision.status(), ContinuationStatus::WaitingConfirmation);
        assert_eq!(decision.countdown_seconds(), None);

        decision.force_zero();
        assert_eq!(decision.countdown_seconds(), None);
    }

    #[test]
    fn skip_target_is_first_unwatched() {
        let videos: Vec<Video> = (0..4).map(|_| video(Credits::whole(1))).collect();
        let watched: HashSet<VideoID> = [videos[0].id, videos[1].id].into();

        let target = resolve_skip_target(&videos, |v| watched.contains(&v.id)).unwrap();
        assert_eq!(target.id, videos[2].id);
    }

    #[test]
    fn skip_target_falls_back_to_head() {
        let videos: Vec<Video> = (0..3).map(|_| video(Credits::whole(1))).collect();

        let target = resolve_skip_target(&videos, |_| true).unwrap();
        assert_eq!(target.id, videos[0].id);
        assert!(resolve_skip_target(&[], |_| false).is_none());
    }
}
