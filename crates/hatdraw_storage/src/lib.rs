#![forbid(unsafe_code)]

pub mod repo;
pub mod roster;

pub use roster::{RosterStore, StorageError, DEFAULT_SEED_NAMES};
