//! # Anthropic Claude API Client
//!
//! Small client for the non-streaming Anthropic Messages API.
//!
//! ## Example
//!
//! ```no_run
//! use helpdesk_anthropic::{AnthropicClient, AnthropicConfig, MessagesRequest};
//! use helpdesk_anthropic::types::Message;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnthropicConfig::new("sk-ant-...").with_timeout(Duration::from_secs(10));
//!     let client = AnthropicClient::new(config)?;
//!
//!     let request = MessagesRequest::new(vec![Message::user("Hello, Claude!")])
//!         .with_max_tokens(128);
//!
//!     let response = client.messages(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod types;

// Re-export main types for convenience
pub use client::AnthropicClient;
pub use config::AnthropicConfig;
pub use error::ClaudeError;
pub use messages::{MessagesRequest, MessagesResponse};
pub use types::{ContentBlock, Message, Role, StopReason, Usage};
