//! CLI command implementations.

pub mod interrupt;
pub mod run;
pub mod search;
pub mod shelf;

pub use interrupt::{on_interrupt, Interrupt};
pub use run::RunCommand;
pub use search::SearchCommand;
pub use shelf::ShelfCommand;
