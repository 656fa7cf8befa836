//! CPU selection
//!
//! - `range_parser`: parse `3`, `0-3` and comma-separated lists into ranges
//! - `mask`: fold ranges into a [`CpuMask`](crate::domain::CpuMask)
//! - `cpuset`: read the CPU list of a named cgroup cpuset
//! - `selector`: decide between the two and produce the final mask

pub mod cpuset;
pub mod mask;
pub mod range_parser;
pub mod selector;

pub use cpuset::CpusetResolver;
pub use mask::compute;
pub use range_parser::parse;
pub use selector::{select, CpuSelection};
