//! Configuration module for pocketbook
//!
//! Provides platform-appropriate path resolution for the persisted data files.

pub mod paths;

pub use paths::PocketbookPaths;
