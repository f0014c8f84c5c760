#![forbid(unsafe_code)]

use std::env;
use std::path::Path;

use hatdraw_storage::RosterStore;
use hatdraw_tools::admin_cli::{execute_admin_command, USAGE};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let subcommand = args.first().ok_or_else(|| USAGE.to_string())?;
    let name = args.get(1).map(String::as_str);

    let db_path = env::var("HATDRAW_DB_PATH").unwrap_or_else(|_| "./hatdraw.db".to_string());
    let mut store = RosterStore::open_at(Path::new(&db_path))
        .map_err(|err| format!("failed to open roster store at {db_path}: {err}"))?;

    let output = execute_admin_command(&mut store, subcommand, name)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
