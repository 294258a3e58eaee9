//! Hub tuning knobs.

use crate::domain::DEFAULT_MAX_BODY_LEN;

/// Default capacity of the dispatcher's inbound channel.
pub const DEFAULT_INBOUND_CAPACITY: usize = 256;

/// Default capacity of each connection's outbound buffer.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// Longest accepted message body, in characters
    pub max_body_len: usize,
    /// Events the dispatcher may have queued before producers wait
    pub inbound_capacity: usize,
    /// Frames a connection may have pending before it is evicted
    pub outbound_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_body_len: DEFAULT_MAX_BODY_LEN,
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}
