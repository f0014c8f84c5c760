#![forbid(unsafe_code)]

use hatdraw_storage::repo::RosterRepo;
use hatdraw_storage::RosterStore;

pub const USAGE: &str = "usage: hatdraw <release|reset> [name]";

/// Runs one administrative command against an already-opened store and
/// returns the line to print. Claims removed here bypass the network
/// API on purpose; this is the out-of-band reset path.
pub fn execute_admin_command(
    store: &mut RosterStore,
    subcommand: &str,
    name: Option<&str>,
) -> Result<String, String> {
    match subcommand {
        "release" => {
            let name = name.ok_or_else(|| "usage: hatdraw release <name>".to_string())?;
            release_name(store, name)
        }
        "reset" => {
            let removed = store.delete_all_claims().map_err(|err| err.to_string())?;
            Ok(format!("removed {removed} selection(s)"))
        }
        _ => Err(USAGE.to_string()),
    }
}

fn release_name(store: &mut RosterStore, name: &str) -> Result<String, String> {
    let record = store
        .name_by_text(name)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("name \"{name}\" not found"))?;

    let claim = match store
        .claim_for_name(record.name_id)
        .map_err(|err| err.to_string())?
    {
        Some(claim) => claim,
        None => return Ok(format!("no selection found for \"{name}\"")),
    };

    store
        .delete_claim(record.name_id)
        .map_err(|err| err.to_string())?;
    Ok(format!(
        "removed selection for \"{name}\" (selected by {} at {})",
        claim.selected_by.as_str(),
        claim.selected_at
    ))
}
