//! Environment-sourced credentials for drivers that reach real backends.
//!
//! A variable that is unset, not valid Unicode, or empty counts as missing.
//! Resolution happens before any phase runs, so a missing credential is a
//! setup failure rather than a driver error.

use std::collections::HashMap;

use crate::error::CredentialError;

/// Reads a required environment variable.
///
/// # Errors
///
/// Returns [`CredentialError::Missing`] when the variable is unset or empty.
pub fn required_env(name: &str) -> Result<String, CredentialError> {
    lookup(name).ok_or_else(|| CredentialError::Missing {
        names: vec![name.to_owned()],
    })
}

/// Reads every named variable, reporting all missing ones at once.
///
/// # Errors
///
/// Returns [`CredentialError::Missing`] naming each unset or empty variable.
pub fn collect_required<'a, I>(names: I) -> Result<HashMap<String, String>, CredentialError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found = HashMap::new();
    let mut missing = Vec::new();
    for name in names {
        match lookup(name) {
            Some(value) => {
                found.insert(name.to_owned(), value);
            }
            None => missing.push(name.to_owned()),
        }
    }
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(CredentialError::Missing { names: missing })
    }
}

fn lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
