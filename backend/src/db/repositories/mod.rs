//! Cache repository implementations.
//!
//! - `local`: in-memory implementation for tests and local runs
#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
