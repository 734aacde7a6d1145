pub mod api;
pub mod app;
pub mod config;
pub mod cost;
pub mod error;
pub mod inject;
pub mod logging;
pub mod runtime;
pub mod terminal;
pub mod types;
pub mod ui;
pub mod util;

#[cfg(test)]
mod test_support;
