//! Countdown clock for continuation decisions.
//!
//! The timer never touches decision state. It runs a small tokio task that
//! reports ticks and expiry as [`TimerEvent`]s over a channel, each tagged with
//! the [`CountdownTicket`] of the decision it was started for. The owner
//! compares tickets when handling events, so an event for a decision that has
//! been cancelled or replaced is dropped even if it was already queued.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Identity of one live decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountdownTicket(u64);

impl CountdownTicket {
    pub fn first() -> Self {
        CountdownTicket(1)
    }

    pub fn next(self) -> Self {
        CountdownTicket(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CountdownTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick {
        ticket: CountdownTicket,
        remaining: u32,
    },
    Expired {
        ticket: CountdownTicket,
    },
}

impl TimerEvent {
    pub fn ticket(&self) -> CountdownTicket {
        match self {
            TimerEvent::Tick { ticket, .. } | TimerEvent::Expired { ticket } => *ticket,
        }
    }
}

struct ActiveCountdown {
    ticket: CountdownTicket,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// At most one countdown runs at a time. Starting a new one cancels the
/// previous one, and dropping the timer cancels whatever is running.
pub struct ContinuationTimer {
    tick_interval: Duration,
    events: mpsc::UnboundedSender<TimerEvent>,
    active: Option<ActiveCountdown>,
}

impl fmt::Debug for ContinuationTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuationTimer")
            .field("tick_interval", &self.tick_interval)
            .field("active_ticket", &self.active_ticket())
            .finish()
    }
}

impl ContinuationTimer {
    pub fn new(
        tick_interval: Duration,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            tick_interval,
            events,
            active: None,
        }
    }

    /// Timer plus the receiving end of its event channel.
    pub fn channel(
        tick_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tick_interval, tx), rx)
    }

    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, ticket: CountdownTicket, seconds: u32) {
        self.cancel();

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_countdown(
            ticket,
            seconds,
            self.tick_interval,
            token.clone(),
            self.events.clone(),
        ));

        debug!(%ticket, seconds, "countdown started");
        self.active = Some(ActiveCountdown {
            ticket,
            token,
            handle,
        });
    }

    /// Returns `true` if a countdown was running.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.token.cancel();
                active.handle.abort();
                debug!(ticket = %active.ticket, "countdown cancelled");
                true
            }
            None => false,
        }
    }

    /// Forget a countdown whose expiry has been delivered.
    pub fn finish(&mut self, ticket: CountdownTicket) {
        if self.active_ticket() == Some(ticket) {
            self.active = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_ticket(&self) -> Option<CountdownTicket> {
        self.active.as_ref().map(|active| active.ticket)
    }
}

impl Drop for ContinuationTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_countdown(
    ticket: CountdownTicket,
    seconds: u32,
    tick_interval: Duration,
    token: CancellationToken,
    events: mpsc::UnboundedSender<TimerEvent>,
) {
    let mut ticks =
        tokio::time::interval_at(Instant::now() + tick_interval, tick_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut remaining = seconds;
    while remaining > 0 {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = ticks.tick() => {}
        }

        remaining -= 1;
        if remaining > 0
            && events.send(TimerEvent::Tick { ticket, remaining }).is_err()
        {
            return;
        }
    }

    if !token.is_cancelled() {
        let _ = events.send(TimerEvent::Expired { ticket });
    }
}
