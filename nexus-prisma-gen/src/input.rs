//! Input file loading
//!
//! Reads the DMMF document and the settings file from disk.

use std::path::Path;

use nexus_prisma::{Document, GeneratorError, Settings};

/// Read and parse a DMMF document
pub fn read_document(path: &Path) -> Result<Document, GeneratorError> {
    let content = read(path)?;
    Document::from_json(&content)
}

/// Read settings, falling back to defaults when no file is given
pub fn read_settings(path: Option<&Path>) -> Result<Settings, GeneratorError> {
    match path {
        Some(path) => parse_settings(&read(path)?),
        None => Ok(Settings::default()),
    }
}

fn parse_settings(content: &str) -> Result<Settings, GeneratorError> {
    Ok(serde_json::from_str(content)?)
}

fn read(path: &Path) -> Result<String, GeneratorError> {
    std::fs::read_to_string(path)
        .map_err(|e| GeneratorError::Parse(format!("failed to read {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_file_means_defaults() {
        assert_eq!(read_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_parse_partial_settings() {
        let settings = parse_settings(r#"{"output": {"esm": false}}"#).unwrap();
        assert!(!settings.output.esm);
        assert!(settings.output.cjs);
    }

    #[test]
    fn test_unreadable_file_names_the_path() {
        let err = read_document(Path::new("/nonexistent/dmmf.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dmmf.json"));
    }
}
