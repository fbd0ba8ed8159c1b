//! # Actors Module
//!
//! The dual-path classification engine and the actor fronting it.
//!
//! ## Components
//! - `messages`: Mailbox messages and the remote wire types
//! - `traits`: Seams for the remote service and the latency padding
//! - `remote`: HTTP client for the classification service
//! - `latency`: Simulated processing delay on the Tokio timer
//! - `orchestrator`: Remote-first classification with local fallback, and its handle

pub mod latency;
pub mod messages;
pub mod orchestrator;
pub mod remote;
pub mod traits;

pub use orchestrator::{ClassificationOrchestrator, ClassifierHandle, ProductionOrchestrator};
