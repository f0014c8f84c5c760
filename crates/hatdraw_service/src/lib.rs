#![forbid(unsafe_code)]

pub mod claim_flow;

pub use claim_flow::{
    ClaimService, ClaimServiceConfig, RosterStats, SelectOutcome, ServiceError,
};
