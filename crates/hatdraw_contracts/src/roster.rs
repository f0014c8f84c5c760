#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{ContractViolation, Validate};

/// Row identifier for a seeded name. Storage generates these; request
/// paths must only accept positive values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NameId(pub i64);

impl NameId {
    pub fn new(value: i64) -> Result<Self, ContractViolation> {
        if value <= 0 {
            return Err(ContractViolation::InvalidValue {
                field: "name_id",
                reason: "must be a positive integer",
            });
        }
        Ok(Self(value))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClaimId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NameText(String);

impl NameText {
    pub fn new(text: impl Into<String>) -> Result<Self, ContractViolation> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "name_text",
                reason: "must not be empty",
            });
        }
        if text.len() > 120 {
            return Err(ContractViolation::InvalidValue {
                field: "name_text",
                reason: "must be <= 120 chars",
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClaimantLabel(String);

impl ClaimantLabel {
    pub fn new(label: impl Into<String>) -> Result<Self, ContractViolation> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "claimant_label",
                reason: "must not be empty",
            });
        }
        if label.len() > 120 {
            return Err(ContractViolation::InvalidValue {
                field: "claimant_label",
                reason: "must be <= 120 chars",
            });
        }
        Ok(Self(label))
    }

    /// The fixed placeholder recorded for every claim; there is no
    /// per-user identity.
    pub fn anonymous() -> Self {
        Self("Anonymous".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name_id: NameId,
    pub text: NameText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_id: ClaimId,
    pub name_id: NameId,
    pub selected_by: ClaimantLabel,
    pub selected_at: String,
}

/// One entry of the roster listing: a name joined with whatever claims
/// reference it. `selection_count` is bounded to 0 or 1 by the storage
/// constraint, but the read model reports whatever it finds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameStatusRow {
    pub name_id: NameId,
    pub text: String,
    pub selection_count: u32,
    pub is_selected: bool,
    pub selected_by: Vec<String>,
}

impl NameStatusRow {
    pub fn v1(name_id: NameId, text: String, selected_by: Vec<String>) -> Self {
        let selection_count = selected_by.len() as u32;
        Self {
            name_id,
            text,
            selection_count,
            is_selected: selection_count > 0,
            selected_by,
        }
    }
}

impl Validate for NameStatusRow {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.is_selected != (self.selection_count > 0) {
            return Err(ContractViolation::InvalidValue {
                field: "name_status_row.is_selected",
                reason: "must match selection_count > 0",
            });
        }
        if self.selection_count as usize != self.selected_by.len() {
            return Err(ContractViolation::InvalidValue {
                field: "name_status_row.selection_count",
                reason: "must match number of claimant labels",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterTotals {
    pub total: u32,
    pub claimed: u32,
}

impl RosterTotals {
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_id_rejects_non_positive_values() {
        assert!(NameId::new(0).is_err());
        assert!(NameId::new(-3).is_err());
        assert_eq!(NameId::new(7).unwrap(), NameId(7));
    }

    #[test]
    fn name_text_rejects_blank_and_oversized_values() {
        assert!(NameText::new("").is_err());
        assert!(NameText::new("   ").is_err());
        assert!(NameText::new("x".repeat(121)).is_err());
        assert_eq!(NameText::new("Miran").unwrap().as_str(), "Miran");
    }

    #[test]
    fn claimant_label_placeholder_is_valid() {
        let label = ClaimantLabel::anonymous();
        assert_eq!(label.as_str(), "Anonymous");
        assert!(ClaimantLabel::new(label.as_str().to_string()).is_ok());
    }

    #[test]
    fn status_row_flag_tracks_claimant_labels() {
        let unclaimed = NameStatusRow::v1(NameId(1), "Rita".to_string(), Vec::new());
        assert!(!unclaimed.is_selected);
        assert_eq!(unclaimed.selection_count, 0);
        assert!(unclaimed.validate().is_ok());

        let claimed = NameStatusRow::v1(
            NameId(2),
            "Endrit".to_string(),
            vec!["Anonymous".to_string()],
        );
        assert!(claimed.is_selected);
        assert_eq!(claimed.selection_count, 1);
        assert!(claimed.validate().is_ok());
    }

    #[test]
    fn status_row_validate_catches_drifted_flag() {
        let mut row = NameStatusRow::v1(NameId(3), "Rigon".to_string(), Vec::new());
        row.is_selected = true;
        assert!(row.validate().is_err());
    }

    #[test]
    fn totals_remaining_never_underflows() {
        let totals = RosterTotals {
            total: 14,
            claimed: 1,
        };
        assert_eq!(totals.remaining(), 13);

        let degenerate = RosterTotals {
            total: 1,
            claimed: 2,
        };
        assert_eq!(degenerate.remaining(), 0);
    }
}
