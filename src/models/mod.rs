//! Data Models
//!
//! Request/response types for the chat boundary and the application
//! configuration.

pub mod chat;
pub mod settings;
