//! Storage Layer
//!
//! Configuration loading. Stack and session persistence lives behind the
//! `StackSource` / `HistorySource` traits in `agent-stack-core`.

pub mod config;
