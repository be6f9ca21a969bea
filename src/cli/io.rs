//! File and stdout handling for CLI
//!
//! Inputs are JSON files; results go to stdout as a single JSON object
//! (`{"status": "ok", "data": ...}`) or as raw text for CSV.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read and deserialize a JSON file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::io_error(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write text to stdout unchanged
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeDefinition;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("attrs.json");
        fs::write(
            &path,
            r#"[{"name": "Signed", "attribute_type": "checklist_criteria", "criteria_text": "Signed off"}]"#,
        )
        .unwrap();

        let defs: Vec<AttributeDefinition> = read_json_file(&path).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].criteria_text.as_deref(), Some("Signed off"));
    }

    #[test]
    fn test_read_json_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = read_json_file::<Value>(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(missing.code_str(), "AUDIT_CLI_IO_ERROR");

        let path = dir.path().join("bad.json");
        fs::write(&path, "[").unwrap();
        let bad = read_json_file::<Value>(&path).unwrap_err();
        assert!(bad.message().contains("Invalid JSON"));
    }
}
