pub mod cost_table;
pub mod render;
pub mod selector;
pub mod spinner;

pub use selector::{select, CommandSelector, SelectorAction, SelectorOutcome};
pub use spinner::Spinner;
