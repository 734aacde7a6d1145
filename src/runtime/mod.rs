pub mod frontend;

pub use frontend::{FrontendAdapter, TerminalFrontend};
