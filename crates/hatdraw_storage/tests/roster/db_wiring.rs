#![forbid(unsafe_code)]

use hatdraw_contracts::roster::{ClaimantLabel, NameId};
use hatdraw_contracts::Validate;
use hatdraw_storage::repo::RosterRepo;
use hatdraw_storage::roster::{RosterStore, StorageError, DEFAULT_SEED_NAMES};

fn store() -> RosterStore {
    RosterStore::open_in_memory().unwrap()
}

fn seeded_name_id(store: &RosterStore, text: &str) -> NameId {
    store
        .name_by_text(text)
        .unwrap()
        .unwrap_or_else(|| panic!("seed name {text} missing"))
        .name_id
}

#[test]
fn at_roster_db_01_open_seeds_default_names_once() {
    let s = store();
    let totals = s.count_totals().unwrap();
    assert_eq!(totals.total, DEFAULT_SEED_NAMES.len() as u32);
    assert_eq!(totals.claimed, 0);

    // Re-running the seed step against a populated table is a no-op.
    assert_eq!(s.seed_names_if_empty(&DEFAULT_SEED_NAMES).unwrap(), 0);
    assert_eq!(s.count_totals().unwrap().total, 14);
}

#[test]
fn at_roster_db_02_duplicate_claim_is_rejected_atomically() {
    let mut s = store();
    let target = seeded_name_id(&s, "Miran");
    let label = ClaimantLabel::anonymous();

    s.insert_claim(target, &label).unwrap();
    let err = s.insert_claim(target, &label).unwrap_err();
    assert!(matches!(
        err,
        StorageError::ClaimConflict { name_id } if name_id == target
    ));

    let row = s
        .list_names_with_status()
        .unwrap()
        .into_iter()
        .find(|row| row.name_id == target)
        .unwrap();
    assert_eq!(row.selection_count, 1);
}

#[test]
fn at_roster_db_03_unknown_name_claim_is_rejected() {
    let mut s = store();
    let err = s
        .insert_claim(NameId(9_999), &ClaimantLabel::anonymous())
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::UnknownName { name_id } if name_id == NameId(9_999)
    ));
    assert_eq!(s.count_totals().unwrap().claimed, 0);
}

#[test]
fn at_roster_db_04_listing_sorted_by_text_with_consistent_flags() {
    let mut s = store();
    let target = seeded_name_id(&s, "Endrit");
    s.insert_claim(target, &ClaimantLabel::anonymous()).unwrap();

    let listing = s.list_names_with_status().unwrap();
    assert_eq!(listing.len(), 14);
    assert_eq!(listing[0].text, "A. Halilaj");
    assert_eq!(listing[13].text, "Yllka");
    assert!(listing.windows(2).all(|pair| pair[0].text < pair[1].text));

    for row in &listing {
        row.validate().unwrap();
    }
    let claimed = listing.iter().find(|row| row.name_id == target).unwrap();
    assert!(claimed.is_selected);
    assert_eq!(claimed.selected_by, vec!["Anonymous".to_string()]);

    // Read path is idempotent with no intervening writes.
    assert_eq!(s.list_names_with_status().unwrap(), listing);
}

#[test]
fn at_roster_db_05_totals_track_claims() {
    let mut s = store();
    let target = seeded_name_id(&s, "Rita");

    let before = s.count_totals().unwrap();
    assert_eq!((before.total, before.claimed, before.remaining()), (14, 0, 14));

    s.insert_claim(target, &ClaimantLabel::anonymous()).unwrap();
    let after = s.count_totals().unwrap();
    assert_eq!((after.total, after.claimed, after.remaining()), (14, 1, 13));
}

#[test]
fn at_roster_db_06_delete_claim_is_noop_when_absent() {
    let mut s = store();
    let target = seeded_name_id(&s, "Rigon");

    assert_eq!(s.delete_claim(target).unwrap(), 0);

    s.insert_claim(target, &ClaimantLabel::anonymous()).unwrap();
    assert_eq!(s.delete_claim(target).unwrap(), 1);
    assert!(s.claim_for_name(target).unwrap().is_none());

    // Deletion returns the name to the claimable state.
    s.insert_claim(target, &ClaimantLabel::anonymous()).unwrap();
}

#[test]
fn at_roster_db_07_reopen_preserves_claims_without_reseeding() {
    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("roster.db");

    let target = {
        let mut s = RosterStore::open_at(&db_path).unwrap();
        let target = seeded_name_id(&s, "Sheraida");
        s.insert_claim(target, &ClaimantLabel::anonymous()).unwrap();
        target
    };

    let reopened = RosterStore::open_at(&db_path).unwrap();
    let totals = reopened.count_totals().unwrap();
    assert_eq!((totals.total, totals.claimed), (14, 1));

    let claim = reopened.claim_for_name(target).unwrap().unwrap();
    assert_eq!(claim.name_id, target);
    assert_eq!(claim.selected_by.as_str(), "Anonymous");
    assert!(!claim.selected_at.is_empty());
}

#[test]
fn at_roster_db_08_name_lookup_by_display_text() {
    let s = store();
    let record = s.name_by_text("Kastriot").unwrap().unwrap();
    assert_eq!(record.text.as_str(), "Kastriot");
    assert!(s.name_by_text("nobody").unwrap().is_none());
}
