//! Carrying out a continuation decision.

use std::collections::HashSet;

use futures::future::try_join_all;
use segue_model::{ContinuationStatus, Video, VideoID, Viewer};
use tracing::{info, warn};

use crate::error::{PurchaseError, Result};
use crate::planner::{ContinuationDecision, resolve_skip_target};
use crate::ports::PlaybackPorts;

/// What executing a decision did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Navigation was issued. `purchased` is set when an auto-purchase
    /// preceded it.
    Navigated { target: VideoID, purchased: bool },
    /// The auto-purchase failed and the decision now waits for confirmation.
    Downgraded {
        target: VideoID,
        reason: PurchaseError,
    },
    /// Nothing happens until the viewer confirms.
    AwaitingConfirmation,
}

#[derive(Debug)]
pub struct ResolvedAction<'a> {
    ports: &'a PlaybackPorts,
}

impl<'a> ResolvedAction<'a> {
    pub fn new(ports: &'a PlaybackPorts) -> Self {
        Self { ports }
    }

    /// Run the side effects for `decision`.
    ///
    /// A failed auto-purchase is not an error: the decision is downgraded in
    /// place and the viewer is left unchanged.
    pub async fn execute(
        &self,
        decision: &mut ContinuationDecision,
        candidates: &[Video],
        viewer: &mut Viewer,
    ) -> Result<ExecutionOutcome> {
        match decision.status() {
            ContinuationStatus::SkippingWatched => {
                let target = self.skip_target(decision, candidates, viewer).await?;
                info!(video_id = %target, "skipping watched candidate");
                self.ports.navigator.navigate(target);
                Ok(ExecutionOutcome::Navigated {
                    target,
                    purchased: false,
                })
            }
            ContinuationStatus::PlayingNext => {
                let target = decision.target().id;
                self.ports.navigator.navigate(target);
                Ok(ExecutionOutcome::Navigated {
                    target,
                    purchased: false,
                })
            }
            ContinuationStatus::AutoBuying => self.auto_buy(decision, viewer).await,
            ContinuationStatus::WaitingConfirmation => {
                Ok(ExecutionOutcome::AwaitingConfirmation)
            }
        }
    }

    async fn auto_buy(
        &self,
        decision: &mut ContinuationDecision,
        viewer: &mut Viewer,
    ) -> Result<ExecutionOutcome> {
        let target = decision.target().id;

        if let Err(reason) = self.ports.store.purchase(viewer.id, target).await {
            warn!(
                video_id = %target,
                error = %reason,
                "auto-purchase failed; waiting for confirmation"
            );
            decision.downgrade();
            return Ok(ExecutionOutcome::Downgraded { target, reason });
        }

        match self.ports.store.refresh_viewer(viewer.id).await {
            Ok(fresh) => *viewer = fresh,
            Err(err) => {
                warn!(error = %err, "viewer refresh after purchase failed");
            }
        }

        info!(
            video_id = %target,
            price = %decision.target().price,
            balance = %viewer.balance,
            "auto-purchased next video"
        );
        self.ports.navigator.navigate(target);
        Ok(ExecutionOutcome::Navigated {
            target,
            purchased: true,
        })
    }

    async fn skip_target(
        &self,
        decision: &ContinuationDecision,
        candidates: &[Video],
        viewer: &Viewer,
    ) -> Result<VideoID> {
        let interactions = try_join_all(candidates.iter().map(|candidate| {
            self.ports.interactions.get_interaction(viewer.id, candidate.id)
        }))
        .await?;

        let watched: HashSet<VideoID> = candidates
            .iter()
            .zip(&interactions)
            .filter(|(_, record)| record.is_watched())
            .map(|(candidate, _)| candidate.id)
            .collect();

        Ok(resolve_skip_target(candidates, |video| watched.contains(&video.id))
            .map(|video| video.id)
            .unwrap_or(decision.target().id))
    }
}
