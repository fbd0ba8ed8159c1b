// Inbox Triage V1 Classification Core
// Remote-first email classification with a local keyword fallback

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod models;
pub mod preflight;
pub mod telemetry;
pub mod text_extract;

#[cfg(test)]
mod tests;
