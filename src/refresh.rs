//! Background refresh timer
//!
//! Sends a `RefreshDue` message on a fixed interval over a tokio channel. The
//! main loop reacts by reloading the dashboard, so network work stays on the
//! same task that owns the app state.

use std::time::Duration;
use tokio::sync::mpsc;

/// Messages sent from the background timer to the main app
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshMessage {
    /// The refresh interval elapsed
    RefreshDue,
}

/// Configuration for the refresh interval
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between refreshes
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::from_minutes(15)
    }
}

impl RefreshConfig {
    /// Builds a config from a minute count, where 0 disables refreshing
    pub fn from_minutes(minutes: u64) -> Self {
        Self {
            interval: Duration::from_secs(minutes.saturating_mul(60)),
            enabled: minutes > 0,
        }
    }
}

/// Handle for controlling the background refresh timer
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Creates a new RefreshHandle and spawns the timer task
    ///
    /// # Arguments
    /// * `config` - Configuration for the refresh interval
    ///
    /// # Returns
    /// A RefreshHandle that receives ticks via the `receiver` channel
    pub fn spawn(config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(4);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled && !config.interval.is_zero() {
            let period = config.interval;
            tracing::debug!(seconds = period.as_secs(), "auto-refresh enabled");

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            // A full channel means a refresh is already pending
                            if let Err(mpsc::error::TrySendError::Closed(_)) =
                                msg_tx.try_send(RefreshMessage::RefreshDue)
                            {
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Shuts down the background timer
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for pending refresh messages without blocking
///
/// # Arguments
/// * `handle` - The RefreshHandle to check
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
