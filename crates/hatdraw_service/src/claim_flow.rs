#![forbid(unsafe_code)]

use std::fmt;

use hatdraw_contracts::roster::{ClaimId, ClaimantLabel, NameId, NameStatusRow, RosterTotals};
use hatdraw_storage::repo::RosterRepo;
use hatdraw_storage::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimServiceConfig {
    /// Label recorded on every claim. Selections are anonymous; this is
    /// a placeholder, not an identity.
    pub claimant_label: ClaimantLabel,
}

impl ClaimServiceConfig {
    pub fn mvp_v1() -> Self {
        Self {
            claimant_label: ClaimantLabel::anonymous(),
        }
    }
}

#[derive(Debug)]
pub enum ServiceError {
    InvalidInput { reason: &'static str },
    Store(StorageError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::InvalidInput { reason } => write!(f, "{reason}"),
            ServiceError::Store(err) => write!(f, "{err}"),
        }
    }
}

/// Result of one claim attempt. A conflict is a normal user-visible
/// outcome, not a fault: racing requests for the same name resolve to
/// exactly one `Selected` and one `AlreadyClaimed`, arbitrated by the
/// store's uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected { claim_id: ClaimId },
    AlreadyClaimed { name_id: NameId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterStats {
    pub total: u32,
    pub selected: u32,
    pub remaining: u32,
}

impl RosterStats {
    pub fn from_totals(totals: RosterTotals) -> Self {
        Self {
            total: totals.total,
            selected: totals.claimed,
            remaining: totals.remaining(),
        }
    }
}

pub struct ClaimService<R>
where
    R: RosterRepo,
{
    config: ClaimServiceConfig,
    repo: R,
}

impl<R> ClaimService<R>
where
    R: RosterRepo,
{
    pub fn new(config: ClaimServiceConfig, repo: R) -> Self {
        Self { config, repo }
    }

    pub fn list_names(&self) -> Result<Vec<NameStatusRow>, ServiceError> {
        self.repo.list_names_with_status().map_err(ServiceError::Store)
    }

    pub fn stats(&self) -> Result<RosterStats, ServiceError> {
        let totals = self.repo.count_totals().map_err(ServiceError::Store)?;
        Ok(RosterStats::from_totals(totals))
    }

    /// Attempts to claim a name. `name_id` comes straight off the wire,
    /// so absence and non-positive values are rejected here; existence
    /// and uniqueness are left to the store's constraints.
    pub fn select_name(&mut self, name_id: Option<i64>) -> Result<SelectOutcome, ServiceError> {
        let Some(raw) = name_id else {
            return Err(ServiceError::InvalidInput {
                reason: "Name ID is required",
            });
        };
        let name_id = NameId::new(raw).map_err(|_| ServiceError::InvalidInput {
            reason: "Name ID must be a positive integer",
        })?;
        match self.repo.insert_claim(name_id, &self.config.claimant_label) {
            Ok(claim_id) => Ok(SelectOutcome::Selected { claim_id }),
            Err(StorageError::ClaimConflict { name_id }) => {
                Ok(SelectOutcome::AlreadyClaimed { name_id })
            }
            Err(StorageError::UnknownName { .. }) => Err(ServiceError::InvalidInput {
                reason: "Name ID does not match a known name",
            }),
            Err(err) => Err(ServiceError::Store(err)),
        }
    }

    /// Administrative reset; deletes every claim and reports how many
    /// were removed.
    pub fn reset_claims(&mut self) -> Result<u64, ServiceError> {
        self.repo.delete_all_claims().map_err(ServiceError::Store)
    }
}
