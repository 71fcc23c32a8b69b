//! Registry server state

use std::net::SocketAddr;
use std::time::Instant;

/// Runtime facts about the serving registry
#[derive(Debug)]
pub struct RegistryState {
    pub bind_address: SocketAddr,
    pub server_start_time: Instant,
}

impl RegistryState {
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            server_start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn get_uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }
}
