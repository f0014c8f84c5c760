#![forbid(unsafe_code)]

pub mod common;
pub mod roster;

pub use common::{ContractViolation, Validate};
