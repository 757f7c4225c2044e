//! # Segue Core
//!
//! Access resolution and end-of-video continuation for playback clients.
//!
//! ## Overview
//!
//! When a video ends, a client has to decide what plays next without asking a
//! server to orchestrate it. `segue-core` reconciles four signals into one
//! deterministic decision:
//!
//! - **Entitlement**: purchases, admin role, authorship
//! - **VIP tier**: time-bounded access to admin-authored videos
//! - **Spend limits**: auto-purchase ceiling and current balance
//! - **History**: whether the next candidate was already watched
//!
//! The decision runs under a cancellable countdown and executes at most once.
//! A failed auto-purchase downgrades to a confirmation prompt instead of
//! surfacing an error.
//!
//! ## Architecture
//!
//! - [`access`]: the pure entitlement predicate
//! - [`planner`]: classifies candidates into a [`planner::ContinuationDecision`]
//! - [`timer`]: owned countdown clock with cancellation tokens
//! - [`action`]: runs a decision's side effects (purchase, navigation)
//! - [`session`]: per-video state machine tying everything together
//! - [`ports`]: collaborator traits injected by the host
//!
//! ## Example
//!
//! ```no_run
//! use segue_core::{PlaybackConfig, PlaybackPorts, PlaybackSession};
//! use segue_model::{VideoID, Viewer};
//!
//! async fn watch(
//!     viewer: Viewer,
//!     ports: PlaybackPorts,
//!     video_id: VideoID,
//! ) -> segue_core::Result<()> {
//!     let mut session = PlaybackSession::new(viewer, ports, PlaybackConfig::default());
//!     session.load(video_id).await?;
//!
//!     // ...media plays until end-of-stream...
//!     if session.on_media_ended().await?.is_some() {
//!         session.run_countdown().await?;
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod access;
pub mod action;
pub mod clock;
pub mod config;
pub mod error;
pub mod planner;
pub mod ports;
pub mod session;
pub mod timer;

pub use access::{AccessGrant, AccessResolver};
pub use action::{ExecutionOutcome, ResolvedAction};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PlaybackConfig;
pub use error::{PlaybackError, PurchaseError, Result};
pub use planner::{
    CandidateFacts, ContinuationDecision, ContinuationPlanner, resolve_skip_target,
};
pub use ports::{
    CandidateSource, InteractionLedger, Navigator, PlaybackPorts, Storefront,
    VideoCatalog,
};
pub use session::{EndedPhase, LoadedVideo, OverlayView, PlaybackSession, SessionPhase};
pub use timer::{ContinuationTimer, CountdownTicket, TimerEvent};
