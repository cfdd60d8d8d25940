//! Classification and extraction through an external archive tool.
//!
//! The tool is a black box: classification scans the free-text listing
//! output for type indicator lines, extraction passes an overwrite-all,
//! empty-password policy so prompts never occur. Both calls block with no
//! timeout.

pub use error::{Error, Result};
pub use tool::{ArchiveTool, SevenZip};

mod error;
mod tool;
