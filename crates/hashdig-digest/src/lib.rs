//! Streaming file digests for hash database generation.
//!
//! One call per (file, algorithm); nothing is cached here. Callers that
//! need the same digest for several output formats are expected to hold
//! onto the returned string for the duration of that file's processing
//! step.

pub use error::{DigestError, Result};
pub use hasher::{Algorithm, digest_file};

mod error;
mod hasher;
