//! This module persists agent credentials as `<name>-credentials.json`.
use crate::types::AgentCredentials;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("no credentials block found in text")]
    NotFound,
    #[error("credentials block is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("credentials file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("'{0}' cannot be used in a file name (letters, digits, '-' and '_' only)")]
    InvalidName(String),
}

/// Returns the credentials file path for an agent name inside `dir`.
///
/// # Errors
///
/// Returns [`CredentialsError::InvalidName`] unless the name is made of
/// letters, digits, `-` and `_`, so the file always lands inside `dir`.
pub fn credentials_path(dir: impl AsRef<Path>, name: &str) -> Result<PathBuf, CredentialsError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(CredentialsError::InvalidName(name.to_string()));
    }
    Ok(dir.as_ref().join(format!("{}-credentials.json", name)))
}

/// Finds the first `{ ... }` block in free text that parses as credentials.
///
/// # Errors
///
/// Returns [`CredentialsError::NotFound`] when no block mentions both keys,
/// and [`CredentialsError::Malformed`] when such a block is not valid JSON.
pub fn extract_credentials(text: &str) -> Result<AgentCredentials, CredentialsError> {
    let mut malformed = None;

    for (start, _) in text.match_indices('{') {
        let rest = &text[start..];
        let mut blocks = serde_json::Deserializer::from_str(rest).into_iter::<AgentCredentials>();
        match blocks.next() {
            Some(Ok(credentials)) => return Ok(credentials),
            Some(Err(e)) if malformed.is_none() && mentions_keys(rest) => malformed = Some(e),
            _ => {}
        }
    }

    Err(malformed.map_or(CredentialsError::NotFound, CredentialsError::Malformed))
}

fn mentions_keys(text: &str) -> bool {
    text.contains("\"accountId\"") && text.contains("\"privateKey\"")
}

/// Saves the credentials as pretty JSON.
///
/// # Arguments
///
/// * `path` - The path to the credentials file.
/// * `credentials` - The credentials to write.
///
/// # Errors
///
/// This function will return an error if the file cannot be written.
pub fn save(path: impl AsRef<Path>, credentials: &AgentCredentials) -> Result<(), CredentialsError> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(credentials)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, content)?;
    Ok(())
}

/// Loads credentials from a file.
///
/// # Errors
///
/// This function will return an error if the file cannot be read or parsed.
pub fn load(path: impl AsRef<Path>) -> Result<AgentCredentials, CredentialsError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn extracts_block_from_agent_output() {
        let output = r#"Agent registered! Credentials:
{
  "accountId": "0.0.4500003",
  "privateKey": "302e0201"
}
Keep them safe."#;

        let creds = extract_credentials(output).unwrap();
        assert_eq!(creds.account_id, "0.0.4500003");
        assert_eq!(creds.private_key, "302e0201");
    }

    #[test]
    fn extraction_errors_are_distinct() {
        assert!(matches!(
            extract_credentials("nothing here"),
            Err(CredentialsError::NotFound)
        ));
        assert!(matches!(
            extract_credentials(r#"{"accountId": 0.0.1, "privateKey": }"#),
            Err(CredentialsError::Malformed(_))
        ));
    }

    #[test]
    fn extraction_ignores_surrounding_braces() {
        let block = r#"{"accountId": "0.0.4500007", "privateKey": "beef"}"#;

        let trailing = format!("Registered:\n{}\nNext step: {{done}}", block);
        assert_eq!(extract_credentials(&trailing).unwrap().account_id, "0.0.4500007");

        let leading = format!("{{ module: 'HCS-11' }} profile created\n{}", block);
        assert_eq!(extract_credentials(&leading).unwrap().private_key, "beef");

        let nested = format!(r#"{{"result": {}, "ok": true}}"#, block);
        assert_eq!(extract_credentials(&nested).unwrap().account_id, "0.0.4500007");
    }

    #[test]
    fn names_that_leave_the_directory_are_rejected() {
        let dir = TempDir::new().unwrap();
        for name in ["../escaped", "a/b", "..", "", "x\\y", "/abs"] {
            assert!(
                matches!(
                    credentials_path(dir.path(), name),
                    Err(CredentialsError::InvalidName(_))
                ),
                "accepted {name:?}"
            );
        }
        assert!(credentials_path(dir.path(), "Scout_2-b").is_ok());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = credentials_path(dir.path().join("agents"), "FaustoAgent").unwrap();
        assert!(path.ends_with("FaustoAgent-credentials.json"));

        let creds = AgentCredentials {
            account_id: "0.0.9".into(),
            private_key: "abc".into(),
        };
        save(&path, &creds).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"accountId\": \"0.0.9\""));
        assert_eq!(load(&path).unwrap(), creds);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load(dir.path().join("missing.json")),
            Err(CredentialsError::Io(_))
        ));
    }
}
