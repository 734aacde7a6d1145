pub mod api;
pub mod command;

pub use api::{ChatCompletionResponse, TokenUsage, Usage};
pub use command::{CommandEntry, CommandSet, CompletionResult};
