#![forbid(unsafe_code)]

use hatdraw_contracts::roster::{
    ClaimId, ClaimRecord, ClaimantLabel, NameId, NameRecord, NameStatusRow, RosterTotals,
};

use crate::roster::StorageError;

/// Typed repository interface for roster persistence wiring. The claim
/// uniqueness invariant is enforced by the storage engine itself;
/// callers must treat `insert_claim` as the single atomic
/// check-then-insert step.
pub trait RosterRepo {
    /// All names joined with their claims, sorted by display text
    /// ascending.
    fn list_names_with_status(&self) -> Result<Vec<NameStatusRow>, StorageError>;

    fn count_totals(&self) -> Result<RosterTotals, StorageError>;

    /// Fails with `StorageError::ClaimConflict` when the name already
    /// has a claim, and `StorageError::UnknownName` when it does not
    /// exist. Neither failure creates a row.
    fn insert_claim(
        &mut self,
        name_id: NameId,
        claimant: &ClaimantLabel,
    ) -> Result<ClaimId, StorageError>;

    /// Administrative-only. Returns the number of rows removed; 0 when
    /// the name had no claim.
    fn delete_claim(&mut self, name_id: NameId) -> Result<u64, StorageError>;

    /// Administrative reset. Returns the number of rows removed.
    fn delete_all_claims(&mut self) -> Result<u64, StorageError>;

    fn claim_for_name(&self, name_id: NameId) -> Result<Option<ClaimRecord>, StorageError>;

    fn name_by_text(&self, text: &str) -> Result<Option<NameRecord>, StorageError>;
}
