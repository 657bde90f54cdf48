//! Backend collaborator for citeline.
//!
//! Submits questions to the RAG backend, buffers its replies, and turns them
//! into chat messages via `citeline-normalize`.
//!
//! # Example
//! ```no_run
//! use citeline_backend::{create_client, send_message, AnalyzeRequest};
//! use citeline_core::config::BackendConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_client(&BackendConfig::default())?;
//! let request = AnalyzeRequest::new("Can my landlord keep the deposit?");
//! let reply = send_message(client.as_ref(), &request, false).await;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use chat::{send_message, ChatLog, ChatMessage};
pub use client::{collect_body, AnalyzeReply, AnalyzeRequest, Attachment, BackendClient, BodyStream};
pub use factory::create_client;
pub use providers::HttpBackendClient;
