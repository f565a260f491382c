//! Business Logic Services
//!
//! - `dispatcher` - Agent Dispatcher: strategy selection, tool aggregation, trace
//! - `chat` - Resolves a chat request's stack and history and runs the dispatcher

pub mod chat;
pub mod dispatcher;
