//! Command-line and environment configuration for the server binary.

use clap::Parser;

use crate::{
    domain::DEFAULT_MAX_BODY_LEN,
    hub::{DEFAULT_INBOUND_CAPACITY, DEFAULT_OUTBOUND_CAPACITY, HubConfig},
};

/// Real-time chat hub server
#[derive(Parser, Debug, Clone)]
#[command(name = "huddle-server", version, about = "Real-time chat hub server")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "HUDDLE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "HUDDLE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "HUDDLE_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,

    /// Maximum message body length in characters
    #[arg(long, env = "HUDDLE_MAX_BODY_LEN", default_value_t = DEFAULT_MAX_BODY_LEN)]
    pub max_body_len: usize,

    /// Capacity of the dispatcher's inbound queue
    #[arg(long, env = "HUDDLE_INBOUND_CAPACITY", default_value_t = DEFAULT_INBOUND_CAPACITY)]
    pub inbound_capacity: usize,

    /// Outbound frames buffered per connection before it is evicted
    #[arg(long, env = "HUDDLE_OUTBOUND_CAPACITY", default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub outbound_capacity: usize,

    /// Maximum messages stored per room (unbounded when unset)
    #[arg(long, env = "HUDDLE_MESSAGE_CAPACITY")]
    pub message_capacity: Option<usize>,
}

impl ServerConfig {
    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            max_body_len: self.max_body_len,
            inbound_capacity: self.inbound_capacity,
            outbound_capacity: self.outbound_capacity,
        }
    }

    /// `host:port`, resolved when the listener binds.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
