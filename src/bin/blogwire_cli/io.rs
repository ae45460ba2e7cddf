#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::client::CliError;

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_value(val: Option<String>, file: Option<PathBuf>) -> Result<String, CliError> {
    if let Some(path) = file {
        read_file(&path)
    } else if let Some(v) = val {
        Ok(v)
    } else {
        Err(CliError::InvalidInput("value required".into()))
    }
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        return read_file(&path).map(Some);
    }
    Ok(val)
}

/// Environment variable holding the password; never exposed as an argument.
pub const PASSWORD_ENV: &str = "BLOGWIRE_PASSWORD";

/// Password from `--password-file` (trimmed) or the environment.
pub fn read_password(env: Option<String>, file: Option<PathBuf>) -> Result<String, CliError> {
    let password = match file {
        Some(path) => read_file(&path)?.trim().to_string(),
        None => env.ok_or(CliError::MissingPassword)?,
    };
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(password)
}

pub fn parse_variables(
    raw: Option<String>,
) -> Result<serde_json::Map<String, serde_json::Value>, CliError> {
    let Some(raw) = raw else {
        return Ok(serde_json::Map::new());
    };
    match serde_json::from_str(&raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::InvalidInput(
            "variables must be a JSON object".into(),
        )),
        Err(err) => Err(CliError::InvalidInput(format!("invalid variables: {err}"))),
    }
}
