//! Shared helpers
//!
//! Selection-expression parsing, path handling, and filesystem utilities
//! used across the runner.

pub mod fs;
pub mod input;
pub mod path;

// Re-export main helpers
pub use fs::*;
pub use input::*;
pub use path::*;
