use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{AdvisorError, AdvisorResult};

/// A grounding snippet handed to the model alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub title: String,
    pub snippet: String,
}

/// Load a JSON array of `{title, snippet}` objects, keeping file order.
pub fn load_context(path: &Path) -> AdvisorResult<Vec<ContextDocument>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AdvisorError::NotFound(format!(
                "context file {} does not exist",
                path.display()
            )));
        }
        Err(e) => return Err(AdvisorError::Io(e)),
    };

    let docs: Vec<ContextDocument> = serde_json::from_str(&data).map_err(|e| {
        AdvisorError::Format(format!(
            "context file {} is not a JSON array of {{title, snippet}} objects: {e}",
            path.display()
        ))
    })?;

    log::info!("Loaded {} context document(s) from {}", docs.len(), path.display());
    Ok(docs)
}

/// Resolve the documents for this run: none unless a path is configured.
pub fn resolve_context(path: Option<&Path>) -> AdvisorResult<Vec<ContextDocument>> {
    match path {
        Some(p) => load_context(p),
        None => {
            log::debug!("No context file configured; sending no documents");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn preserves_length_and_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "docs.json",
            r#"[
                {"title": "Tall penguins", "snippet": "Emperor penguins are the tallest."},
                {"title": "Penguin habitats", "snippet": "Emperor penguins only live in Antarctica."},
                {"title": "What are animals?", "snippet": "Animals are different from plants."}
            ]"#,
        );

        let docs = load_context(&path).unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Tall penguins", "Penguin habitats", "What are animals?"]
        );
        assert_eq!(docs[1].snippet, "Emperor penguins only live in Antarctica.");
    }

    #[test]
    fn empty_array_is_fine() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "docs.json", "[]");

        assert!(load_context(&path).unwrap().is_empty());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "docs.json",
            r#"[{"title": "a", "snippet": "b", "url": "https://example.com"}]"#,
        );

        assert_eq!(
            load_context(&path).unwrap(),
            vec![ContextDocument {
                title: "a".into(),
                snippet: "b".into()
            }]
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_context(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AdvisorError::NotFound(_)));
    }

    #[test]
    fn invalid_json_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "docs.json", "not json");

        let err = load_context(&path).unwrap_err();
        assert!(matches!(err, AdvisorError::Format(_)));
    }

    #[test]
    fn wrong_shape_is_format_error() {
        let dir = TempDir::new().unwrap();
        let object = write(&dir, "object.json", r#"{"title": "a", "snippet": "b"}"#);
        let missing_snippet = write(&dir, "partial.json", r#"[{"title": "a"}]"#);

        assert!(matches!(
            load_context(&object).unwrap_err(),
            AdvisorError::Format(_)
        ));
        assert!(matches!(
            load_context(&missing_snippet).unwrap_err(),
            AdvisorError::Format(_)
        ));
    }

    #[test]
    fn no_path_means_no_documents() {
        assert!(resolve_context(None).unwrap().is_empty());
    }
}
