//! Command-line interface

pub mod args;
pub mod mode;

pub use args::Args;
pub use mode::Mode;
