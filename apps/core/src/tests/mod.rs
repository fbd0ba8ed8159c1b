//! Test Module
//!
//! Cross-component test suite for the Inbox Triage core.
//!
//! ## Test Categories
//! - `brain_tests`: Keyword scoring, category decision, confidence bounds, reply selection
//! - `orchestrator_tests`: Remote-first classification, fallback, batch and the actor handle
//! - `remote_tests`: HTTP client against a mock classification service
//! - `config_tests`: Environment configuration loading and validation
//! - `text_extract_tests`: Attachment text extraction and MIME detection

pub mod brain_tests;
