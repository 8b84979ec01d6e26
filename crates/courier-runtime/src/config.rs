//! Runtime configuration from environment variables.

use std::env;
use std::time::Duration;

use courier_bus::DEFAULT_MAILBOX_CAPACITY;

/// Configuration for the demo scenarios.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Messages each producer publishes per scenario
    pub messages_per_producer: usize,

    /// Capacity of each consumer's bounded mailbox
    pub consumer_capacity: usize,

    /// How long a consumer waits on one `recv` before logging an idle window
    pub recv_window: Duration,

    /// Consecutive empty windows after which a consumer gives up
    pub idle_limit: u32,

    /// Upper bound for the random pacing delay roles sleep between steps
    pub max_pace: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            messages_per_producer: 3,
            consumer_capacity: DEFAULT_MAILBOX_CAPACITY,
            recv_window: Duration::from_secs(2),
            idle_limit: 3,
            max_pace: Duration::from_millis(80),
        }
    }
}

impl RuntimeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `COURIER_MESSAGES`: messages per producer (default: 3)
    /// - `COURIER_MAILBOX_CAPACITY`: consumer mailbox capacity (default: 20)
    /// - `COURIER_RECV_WINDOW_MS`: consumer receive window (default: 2000)
    /// - `COURIER_IDLE_LIMIT`: empty windows before a consumer stops (default: 3)
    /// - `COURIER_MAX_PACE_MS`: upper bound on role pacing jitter (default: 80)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            messages_per_producer: parsed_var("COURIER_MESSAGES")
                .unwrap_or(defaults.messages_per_producer),
            consumer_capacity: parsed_var("COURIER_MAILBOX_CAPACITY")
                .unwrap_or(defaults.consumer_capacity),
            recv_window: parsed_var("COURIER_RECV_WINDOW_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.recv_window),
            idle_limit: parsed_var("COURIER_IDLE_LIMIT").unwrap_or(defaults.idle_limit),
            max_pace: parsed_var("COURIER_MAX_PACE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_pace),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
