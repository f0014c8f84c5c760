#![forbid(unsafe_code)]

pub mod admin_cli;

pub use admin_cli::execute_admin_command;
