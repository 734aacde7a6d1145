pub mod catalog;
pub mod client;
#[cfg(test)]
pub mod mock_client;

pub use catalog::{CostPerToken, ModelCatalog, ModelSpec};
pub use client::CompletionClient;
