//! Results file
//!
//! `alt_text_results.json`: a pretty-printed JSON array of
//! `{url, element_id, generated_alt_text}`. Loading also accepts
//! `{"results": [...]}` and the relay's `alt_text` key.

use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{Candidate, GenerationResult};

pub const RESULTS_FILE_NAME: &str = "alt_text_results.json";

#[derive(Deserialize)]
#[serde(untagged)]
enum ResultsFile {
    List(Vec<GenerationResult>),
    Wrapped { results: Vec<GenerationResult> },
}

/// Records for every candidate that has a generated description.
pub fn results_from_candidates(candidates: &[Candidate]) -> Vec<GenerationResult> {
    candidates
        .iter()
        .filter_map(GenerationResult::from_candidate)
        .collect()
}

pub fn parse_results(content: &str, path: &str) -> AppResult<Vec<GenerationResult>> {
    let file: ResultsFile =
        serde_json::from_str(content).map_err(|e| AppError::json_parse_failed(path, e))?;
    Ok(match file {
        ResultsFile::List(results) | ResultsFile::Wrapped { results } => results,
    })
}

pub async fn load_results(path: &Path) -> AppResult<Vec<GenerationResult>> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;
    let results = parse_results(&content, &path_str)?;
    info!("📁 Loaded {} results from {}", results.len(), path_str);
    Ok(results)
}

pub async fn write_results(path: &Path, results: &[GenerationResult]) -> AppResult<()> {
    let content = serde_json::to_string_pretty(results)
        .map_err(|e| AppError::serialize_failed("results", e))?;
    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    info!("💾 Saved {} results to {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;
    use crate::models::NodeId;

    #[test]
    fn accepts_wrapped_file_from_site_generator() {
        let content = r#"{
            "site_url": "https://example.framer.app",
            "images_processed": 1,
            "results": [
                {"url": "https://cdn/a.png", "selector": "img#hero", "element_id": "hero",
                 "generated_alt_text": "A hero image"}
            ]
        }"#;
        let results = parse_results(content, "test.json").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].element_id.as_deref(), Some("hero"));
    }

    #[test]
    fn accepts_bare_array() {
        let results =
            parse_results(r#"[{"url":"a.png","generated_alt_text":"A"}]"#, "test.json").unwrap();
        assert_eq!(results, vec![GenerationResult::new("a.png", "A")]);
    }

    #[test]
    fn rejects_other_shapes() {
        let err = parse_results(r#"{"items": 3}"#, "test.json").unwrap_err();
        assert!(matches!(err, AppError::File(FileError::JsonParseFailed { .. })));
    }

    #[tokio::test]
    async fn written_file_is_two_space_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULTS_FILE_NAME);
        let mut candidate = Candidate::new(NodeId::new("n1"), "a.png");
        candidate.attach_description("A red bicycle.");
        let results = results_from_candidates(&[candidate, Candidate::new(NodeId::new("n2"), "b.png")]);

        write_results(&path, &results).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {\n    \"url\": \"a.png\""));
        assert_eq!(load_results(&path).await.unwrap(), results);
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = load_results(Path::new("/nonexistent/alt_text_results.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }
}
