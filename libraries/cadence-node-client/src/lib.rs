//! Cadence Node Client
//!
//! HTTP client for a Lavalink v4 audio node, exposed as a
//! [`cadence_core::PlaybackEngine`].
//!
//! # Features
//!
//! - **Resolve**: `/v4/loadtracks` with search-platform prefixing for plain text
//! - **Players**: play, pause, stop, volume and destroy via the session player API
//! - **Session id**: taken from config or supplied later from the node's ready event
//!
//! Node websocket events are not read here. Whatever bridges the websocket
//! forwards them as [`cadence_core::EngineEvent`]s and, on `NodeConnect`,
//! calls [`LavalinkClient::set_session_id`].
//!
//! # Example
//!
//! ```ignore
//! use cadence_core::{PlaybackEngine, UserId};
//! use cadence_node_client::{LavalinkClient, NodeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::new("http://localhost:2333", "youshallnotpass");
//!     let client = LavalinkClient::new(config)?;
//!
//!     let result = client.resolve("daft punk", &UserId::new("1")).await?;
//!     println!("Resolved {} tracks", result.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod player;
mod types;

// Re-export main types
pub use client::LavalinkClient;
pub use error::{NodeClientError, Result};
pub use types::NodeConfig;
