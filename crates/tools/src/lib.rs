//! Agent Stack Tools
//!
//! Tool adapters that a stack can attach to its agent:
//! - `DuckDuckGoTool` - keyless web search (search + process)
//! - `GitHubTool` - repository search (search + process)
//! - `WeatherTool` - OpenWeatherMap current weather (process)
//! - `GmailTool` - read-only mailbox lookup (process)
//!
//! Adapters implement the `StackTool` trait and are constructed through
//! `build_tool` from a `ToolSpec` produced by the config extractor.

pub mod duckduckgo;
pub mod error;
pub mod github;
pub mod gmail;
pub mod http;
pub mod registry;
pub mod trait_def;
pub mod weather;

// Re-export core types
pub use duckduckgo::DuckDuckGoTool;
pub use error::{ToolError, ToolResult};
pub use github::{GitHubTool, RepoSummary};
pub use gmail::{GmailCredentials, GmailTool, MessageSummary};
pub use http::build_http_client;
pub use registry::{build_tool, ToolDefaults};
pub use trait_def::{SearchHit, StackTool};
pub use weather::{extract_location, WeatherReport, WeatherTool};
