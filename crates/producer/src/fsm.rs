//! Producer connection state machine
//!
//! Pure transitions, no IO and no timers. The producer loop drives this
//! machine and owns the sockets and sleeps; the machine owns the retry
//! accounting and the answer to "retry or give up".
//!
//! ```text
//! Disconnected -> Connecting -> Connected
//!       ^             |            |
//!       |         (failed)      (lost)
//!       |             v            v
//!       +---- ReconnectScheduled --+
//!                     |
//!               (exhausted)
//!                     v
//!                  Stopped
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

/// Where the producer connection currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection and none being attempted
    Disconnected,
    /// A connect is in flight
    Connecting,
    /// Connected and sending batches
    Connected,
    /// Waiting out the reconnect interval
    ReconnectScheduled,
    /// Gave up or was told to stop; terminal
    Stopped,
}

/// Retry accounting parameters
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Delay before each reconnect attempt
    pub reconnect_interval: Duration,

    /// Give up after this many consecutive failures; 0 retries forever
    pub max_attempts: u32,
}

/// What the driver should do after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep this long, then try to connect again
    RetryAfter(Duration),
    /// Attempts exhausted; the machine is now `Stopped`
    GiveUp,
}

/// Read-only view of the connection state
///
/// Cheap to clone; remains valid after the producer loop consumes the
/// machine.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    shared: Arc<RwLock<ConnectionState>>,
}

impl ConnectionStatus {
    /// Current state
    pub fn state(&self) -> ConnectionState {
        *self.shared.read()
    }
}

/// The connection state machine
#[derive(Debug)]
pub struct ConnectionFsm {
    policy: RetryPolicy,
    attempts: u32,
    state: ConnectionState,
    shared: Arc<RwLock<ConnectionState>>,
}

impl ConnectionFsm {
    /// Create a machine in `Disconnected`
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            state: ConnectionState::Disconnected,
            shared: Arc::new(RwLock::new(ConnectionState::Disconnected)),
        }
    }

    /// Current state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Consecutive failed connect attempts since the last success
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Get a shareable status handle
    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            shared: Arc::clone(&self.shared),
        }
    }

    /// A connect attempt is starting
    pub fn connect_started(&mut self) {
        self.transition(ConnectionState::Connecting);
    }

    /// The connect attempt succeeded; failure accounting resets
    pub fn connect_succeeded(&mut self) {
        self.attempts = 0;
        self.transition(ConnectionState::Connected);
    }

    /// The connect attempt failed
    pub fn connect_failed(&mut self) -> RetryDecision {
        self.record_failure()
    }

    /// An established connection dropped
    pub fn connection_lost(&mut self) -> RetryDecision {
        self.record_failure()
    }

    /// Stop for good; terminal
    pub fn stop(&mut self) {
        self.transition(ConnectionState::Stopped);
    }

    fn record_failure(&mut self) -> RetryDecision {
        self.attempts += 1;

        if self.policy.max_attempts > 0 && self.attempts >= self.policy.max_attempts {
            self.transition(ConnectionState::Stopped);
            return RetryDecision::GiveUp;
        }

        self.transition(ConnectionState::ReconnectScheduled);
        RetryDecision::RetryAfter(self.policy.reconnect_interval)
    }

    fn transition(&mut self, next: ConnectionState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, attempts = self.attempts, "connection state");
        }
        self.state = next;
        *self.shared.write() = next;
    }
}

#[cfg(test)]
#[path = "fsm_test.rs"]
mod fsm_test;
