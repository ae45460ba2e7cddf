#![deny(clippy::all, clippy::pedantic)]

use serde::Serialize;

use crate::client::CliError;

pub fn print_json<T: Serialize>(val: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(val)?;
    println!("{out}");
    Ok(())
}
