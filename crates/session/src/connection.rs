//! Connection state of the generation stream.

use derive_more::Display;
use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum ConnectionStatus {
    #[default]
    #[display(fmt = "disconnected")]
    Disconnected,

    #[display(fmt = "connecting")]
    Connecting,

    #[display(fmt = "connected")]
    Connected,

    #[display(fmt = "reconnecting")]
    Reconnecting,
}

impl ConnectionStatus {
    /// Connecting, connected or reconnecting.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

/// Connection status plus the number of reconnect attempts since the last
/// successful connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    status: ConnectionStatus,
    retry_count: u32,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn connect(&mut self) {
        self.transition(ConnectionStatus::Connecting);
    }

    pub fn connected(&mut self) {
        self.retry_count = 0;
        self.transition(ConnectionStatus::Connected);
    }

    pub fn reconnect(&mut self) {
        self.retry_count += 1;
        self.transition(ConnectionStatus::Reconnecting);
    }

    /// Retry count is kept so callers can report how many attempts were made.
    pub fn disconnect(&mut self) {
        self.transition(ConnectionStatus::Disconnected);
    }

    fn transition(&mut self, status: ConnectionStatus) {
        if self.status != status {
            debug!(
                "Connection {} -> {} (retries: {})",
                self.status, status, self.retry_count
            );
        }
        self.status = status;
    }
}
