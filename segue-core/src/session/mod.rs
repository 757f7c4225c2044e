//! Per-video playback session.
//!
//! A [`PlaybackSession`] owns everything that happens between loading a video
//! and leaving it: the access check, the end-of-video plan, the countdown and
//! the single execution of the plan. All intents take `&mut self`, so a
//! cancel is always processed before the next queued timer event is looked
//! at, and timer events carry the ticket of the decision they were started
//! for. Together that means a decision that was cancelled or replaced can
//! never be executed.
//!
//! Hosts drive the countdown either by polling [`PlaybackSession::next_timer_event`]
//! inside their own event loop and feeding the result to
//! [`PlaybackSession::handle_timer_event`], or by awaiting
//! [`PlaybackSession::run_countdown`].

mod overlay;
mod phase;

use std::sync::Arc;

use segue_model::{
    AccessState, ContinuationStatus, InteractionRecord, Video, VideoID, Viewer,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::access::AccessResolver;
use crate::action::{ExecutionOutcome, ResolvedAction};
use crate::clock::{Clock, SystemClock};
use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::planner::{CandidateFacts, ContinuationDecision, ContinuationPlanner};
use crate::ports::PlaybackPorts;
use crate::timer::{ContinuationTimer, CountdownTicket, TimerEvent};

pub use overlay::OverlayView;
pub use phase::{EndedPhase, SessionPhase};

/// The video a session is currently showing, with the facts fetched for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedVideo {
    pub video: Video,
    pub interaction: InteractionRecord,
    pub purchased: bool,
}

#[derive(Debug)]
struct LiveDecision {
    ticket: CountdownTicket,
    decision: ContinuationDecision,
}

#[derive(Debug)]
pub struct PlaybackSession {
    config: PlaybackConfig,
    ports: PlaybackPorts,
    clock: Arc<dyn Clock>,
    planner: ContinuationPlanner,
    viewer: Viewer,
    current: Option<LoadedVideo>,
    phase: SessionPhase,
    live: Option<LiveDecision>,
    candidates: Vec<Video>,
    timer: ContinuationTimer,
    timer_events: mpsc::UnboundedReceiver<TimerEvent>,
    next_ticket: CountdownTicket,
    purchase_error: Option<String>,
}

impl PlaybackSession {
    pub fn new(viewer: Viewer, ports: PlaybackPorts, config: PlaybackConfig) -> Self {
        let (timer, timer_events) = ContinuationTimer::channel(config.tick_interval());
        Self {
            planner: ContinuationPlanner::from_config(&config),
            config,
            ports,
            clock: Arc::new(SystemClock),
            viewer,
            current: None,
            phase: SessionPhase::Loading,
            live: None,
            candidates: Vec::new(),
            timer,
            timer_events,
            next_ticket: CountdownTicket::first(),
            purchase_error: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn current(&self) -> Option<&LoadedVideo> {
        self.current.as_ref()
    }

    pub fn decision(&self) -> Option<&ContinuationDecision> {
        self.live.as_ref().map(|live| &live.decision)
    }

    pub fn candidates(&self) -> &[Video] {
        &self.candidates
    }

    pub fn purchase_error(&self) -> Option<&str> {
        self.purchase_error.as_deref()
    }

    pub fn overlay(&self) -> OverlayView {
        let decision = self.decision();
        OverlayView {
            lock: self.phase.access(),
            status: decision.map(ContinuationDecision::status),
            target_title: decision.map(|d| d.target().title.clone()),
            target_price: decision.map(|d| d.target().price),
            remaining_seconds: decision.and_then(ContinuationDecision::countdown_seconds),
            purchase_error: self.purchase_error.clone(),
        }
    }

    /// Start (or restart) the session for `video_id`.
    ///
    /// The video, the viewer's interaction record and the purchase fact are
    /// fetched concurrently. Any failure leaves the session `Unavailable`.
    ///
    /// Reloading the same video keeps a locally recorded watched flag even
    /// if the backend has not caught up yet.
    pub async fn load(&mut self, video_id: VideoID) -> Result<AccessState> {
        self.discard_decision();
        self.candidates.clear();
        let previous = self
            .current
            .take()
            .filter(|loaded| loaded.video.id == video_id)
            .map(|loaded| loaded.interaction);
        self.purchase_error = None;
        self.phase = SessionPhase::Loading;

        let viewer_id = self.viewer.id;
        let fetched = tokio::try_join!(
            self.ports.catalog.get_video(video_id),
            self.ports.interactions.get_interaction(viewer_id, video_id),
            self.ports.store.has_purchased(viewer_id, video_id),
        );

        let (video, fetched_interaction, purchased) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(%video_id, error = %err, "failed to load video");
                self.phase = SessionPhase::Unavailable {
                    reason: err.to_string(),
                };
                return Err(err);
            }
        };

        let grant = AccessResolver::grant(
            &self.viewer,
            &video,
            purchased,
            self.clock.now_epoch_secs(),
        );
        let access = AccessState::from_entitled(grant.is_some());
        let interaction = match previous {
            Some(mut local) => {
                local.merge(&fetched_interaction);
                local
            }
            None => fetched_interaction,
        };
        info!(
            %video_id,
            ?access,
            grant = grant.map(|g| g.as_str()).unwrap_or("none"),
            "video loaded"
        );

        self.current = Some(LoadedVideo {
            video,
            interaction,
            purchased,
        });
        self.phase = SessionPhase::Ready(access);
        Ok(access)
    }

    /// Buy the current video from the locked view.
    ///
    /// On failure the error is kept for the buy affordance and the session
    /// stays locked.
    pub async fn buy_current(&mut self) -> Result<AccessState> {
        match self.phase {
            SessionPhase::Ready(AccessState::Locked) => {}
            SessionPhase::Ready(AccessState::Unlocked) => {
                return Ok(AccessState::Unlocked);
            }
            _ => return Err(self.invalid("buy the current video")),
        }
        let Some(video_id) = self.current.as_ref().map(|c| c.video.id) else {
            return Err(self.invalid("buy the current video"));
        };

        self.purchase_error = None;
        if let Err(reason) = self.ports.store.purchase(self.viewer.id, video_id).await {
            warn!(%video_id, error = %reason, "manual purchase failed");
            self.purchase_error = Some(reason.to_string());
            return Err(reason.into());
        }

        if let Err(err) = self.refresh_viewer().await {
            warn!(error = %err, "viewer refresh after purchase failed");
        }

        let now = self.clock.now_epoch_secs();
        let Some(current) = self.current.as_mut() else {
            return Err(self.invalid("buy the current video"));
        };
        current.purchased = true;
        let access = AccessResolver::state(&self.viewer, &current.video, true, now);

        info!(%video_id, ?access, "purchased current video");
        self.phase = SessionPhase::Ready(access);
        Ok(access)
    }

    /// The media reached end-of-stream. Plans the continuation exactly once.
    ///
    /// Returns the planned status, or `None` when there is nothing to
    /// continue to.
    pub async fn on_media_ended(&mut self) -> Result<Option<ContinuationStatus>> {
        if self.phase != SessionPhase::Ready(AccessState::Unlocked) {
            return Err(self.invalid("end playback"));
        }
        let Some(current_id) = self.current.as_ref().map(|c| c.video.id) else {
            return Err(self.invalid("end playback"));
        };

        self.mark_current_watched(current_id).await;

        let candidates = match self.ports.candidates.get_related_videos(current_id).await
        {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(video_id = %current_id, error = %err, "failed to fetch candidates");
                self.phase = SessionPhase::Ended(EndedPhase::NoDecision);
                return Err(err);
            }
        };

        match self.plan_continuation(candidates).await {
            Ok(status) => Ok(status),
            Err(err) => {
                warn!(video_id = %current_id, error = %err, "continuation planning failed");
                self.discard_decision();
                self.phase = SessionPhase::Ended(EndedPhase::NoDecision);
                Err(err)
            }
        }
    }

    /// Wait for the next countdown event. Pending forever while no countdown
    /// runs, so hosts should race it against their other event sources.
    pub async fn next_timer_event(&mut self) -> Option<TimerEvent> {
        self.timer_events.recv().await
    }

    /// Apply one countdown event. Events for anything but the live decision
    /// are dropped.
    pub async fn handle_timer_event(
        &mut self,
        event: TimerEvent,
    ) -> Result<Option<ExecutionOutcome>> {
        let live_ticket = self.live.as_ref().map(|live| live.ticket);
        if live_ticket != Some(event.ticket()) || !self.phase.is_counting_down() {
            debug!(ticket = %event.ticket(), "dropping stale timer event");
            return Ok(None);
        }

        match event {
            TimerEvent::Tick { remaining, .. } => {
                if let Some(live) = self.live.as_mut() {
                    live.decision.sync_countdown(remaining);
                }
                Ok(None)
            }
            TimerEvent::Expired { ticket } => {
                self.timer.finish(ticket);
                if let Some(live) = self.live.as_mut() {
                    live.decision.force_zero();
                }
                self.execute_live().await
            }
        }
    }

    /// Drive the running countdown until it executes or is cleared.
    pub async fn run_countdown(&mut self) -> Result<Option<ExecutionOutcome>> {
        while self.phase.is_counting_down() {
            let Some(event) = self.timer_events.recv().await else {
                break;
            };
            if let Some(outcome) = self.handle_timer_event(event).await? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// Skip the rest of the countdown. While waiting for confirmation this
    /// counts as the confirmation itself.
    pub async fn play_now(&mut self) -> Result<Option<ExecutionOutcome>> {
        match self.phase {
            SessionPhase::Ended(EndedPhase::CountingDown) => {
                self.timer.cancel();
                if let Some(live) = self.live.as_mut() {
                    live.decision.force_zero();
                }
                self.execute_live().await
            }
            SessionPhase::Ended(EndedPhase::IdleWaiting) => {
                let Some(target) = self.live.as_ref().map(|l| l.decision.target().id)
                else {
                    return Err(self.invalid("play now"));
                };
                self.confirm_and_navigate(target);
                Ok(Some(ExecutionOutcome::Navigated {
                    target,
                    purchased: false,
                }))
            }
            _ => Err(self.invalid("play now")),
        }
    }

    /// Dismiss the overlay without executing anything.
    pub fn cancel(&mut self) {
        if self.discard_decision() {
            info!("continuation cancelled");
        }
        if matches!(self.phase, SessionPhase::Ended(_)) {
            self.phase = SessionPhase::Ended(EndedPhase::NoDecision);
        }
    }

    /// Explicit navigation chosen by the viewer. Never purchases.
    pub fn confirm_and_navigate(&mut self, target: VideoID) {
        self.discard_decision();
        self.candidates.clear();
        info!(video_id = %target, "navigating on viewer request");
        self.ports.navigator.navigate(target);
        self.phase = SessionPhase::NavigatedAway { target };
    }

    /// Stop the countdown and forget the decision. Called when the hosting
    /// view goes away; dropping the session has the same effect.
    pub fn teardown(&mut self) {
        self.cancel();
        self.candidates.clear();
    }

    async fn plan_continuation(
        &mut self,
        candidates: Vec<Video>,
    ) -> Result<Option<ContinuationStatus>> {
        let Some(head_id) = candidates.first().map(|head| head.id) else {
            info!("no continuation candidates");
            self.phase = SessionPhase::Ended(EndedPhase::NoDecision);
            return Ok(None);
        };

        self.refresh_viewer().await?;

        let viewer_id = self.viewer.id;
        let (head_interaction, head_purchased) = tokio::try_join!(
            self.ports.interactions.get_interaction(viewer_id, head_id),
            self.ports.store.has_purchased(viewer_id, head_id),
        )?;
        let mut facts = CandidateFacts::new();
        facts.record(head_id, head_interaction.is_watched(), head_purchased);

        let Some(decision) = self.planner.plan(
            &candidates,
            &self.viewer,
            &facts,
            self.clock.now_epoch_secs(),
        ) else {
            self.phase = SessionPhase::Ended(EndedPhase::NoDecision);
            return Ok(None);
        };

        self.candidates = candidates;
        Ok(Some(self.install(decision)))
    }

    fn install(&mut self, decision: ContinuationDecision) -> ContinuationStatus {
        self.discard_decision();

        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        let status = decision.status();

        match decision.countdown_seconds() {
            Some(seconds) => {
                self.timer.start(ticket, seconds);
                self.phase = SessionPhase::Ended(EndedPhase::CountingDown);
            }
            None => {
                self.phase = SessionPhase::Ended(EndedPhase::IdleWaiting);
            }
        }

        info!(
            %ticket,
            %status,
            target_id = %decision.target().id,
            "continuation decided"
        );
        self.live = Some(LiveDecision { ticket, decision });
        status
    }

    async fn execute_live(&mut self) -> Result<Option<ExecutionOutcome>> {
        let Some(mut live) = self.live.take() else {
            debug!("no live decision to execute");
            return Ok(None);
        };
        self.timer.cancel();

        let result = ResolvedAction::new(&self.ports)
            .execute(&mut live.decision, &self.candidates, &mut self.viewer)
            .await;

        match result {
            Ok(outcome) => {
                match &outcome {
                    ExecutionOutcome::Navigated { target, .. } => {
                        self.candidates.clear();
                        self.phase = SessionPhase::NavigatedAway { target: *target };
                    }
                    ExecutionOutcome::Downgraded { .. }
                    | ExecutionOutcome::AwaitingConfirmation => {
                        self.phase = SessionPhase::Ended(EndedPhase::IdleWaiting);
                        self.live = Some(live);
                    }
                }
                Ok(Some(outcome))
            }
            Err(err) => {
                warn!(ticket = %live.ticket, error = %err, "continuation failed");
                self.phase = SessionPhase::Ended(EndedPhase::NoDecision);
                Err(err)
            }
        }
    }

    async fn mark_current_watched(&mut self, video_id: VideoID) {
        if let Err(err) = self
            .ports
            .interactions
            .mark_watched(self.viewer.id, video_id)
            .await
        {
            warn!(%video_id, error = %err, "failed to mark video watched");
        }
        if let Some(current) = self.current.as_mut() {
            current.interaction.mark_watched();
        }
    }

    async fn refresh_viewer(&mut self) -> Result<()> {
        self.viewer = self.ports.store.refresh_viewer(self.viewer.id).await?;
        Ok(())
    }

    /// Returns `true` if a decision was live.
    fn discard_decision(&mut self) -> bool {
        self.timer.cancel();
        while self.timer_events.try_recv().is_ok() {}
        self.live.take().is_some()
    }

    fn invalid(&self, intent: &'static str) -> PlaybackError {
        PlaybackError::InvalidState {
            state: self.phase.name(),
            intent,
        }
    }
}
