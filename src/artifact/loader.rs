//! Artifact resolution and load-once caching.

use crate::artifact::estimator::PredictiveArtifact;
use crate::artifact::format::ArtifactFile;
use crate::error::{EstimatorError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Anchor year substituted when a bundle carries none. Documented default,
/// never chosen per call.
pub const DEFAULT_ANCHOR_YEAR: i64 = 2025;

/// A loaded artifact plus its normalized anchor year.
#[derive(Debug)]
pub struct LoadedBundle {
    pub artifact: PredictiveArtifact,
    pub anchor_year: i64,
    /// Path the artifact was actually read from.
    pub path: PathBuf,
}

/// Loader for one flow's artifact, with load-once cache semantics: the
/// first successful `get` reads the filesystem; every later call returns
/// the same immutable handle.
pub struct ArtifactLoader {
    candidates: Vec<PathBuf>,
    cell: OnceLock<Arc<LoadedBundle>>,
}

impl ArtifactLoader {
    pub fn new<P: Into<PathBuf>>(candidates: impl IntoIterator<Item = P>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            cell: OnceLock::new(),
        }
    }

    /// Candidate paths, in probe order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Return the cached bundle, loading it on first use.
    pub fn get(&self) -> Result<Arc<LoadedBundle>> {
        if let Some(bundle) = self.cell.get() {
            return Ok(bundle.clone());
        }

        let loaded = Arc::new(self.load()?);
        // On a first-use race the winner's value is kept; both callers see
        // the same handle.
        Ok(self.cell.get_or_init(|| loaded).clone())
    }

    fn load(&self) -> Result<LoadedBundle> {
        let path = self.resolve_candidate()?;

        info!(path = %path.display(), "Loading model artifact");

        let contents = fs::read_to_string(path)?;
        let file: ArtifactFile = serde_json::from_str(&contents)?;
        let (pipeline, anchor_year) = file.into_parts();

        let artifact = PredictiveArtifact::from_spec(pipeline)?;
        let anchor_year = anchor_year.unwrap_or(DEFAULT_ANCHOR_YEAR);

        info!(
            path = %path.display(),
            anchor_year = anchor_year,
            columns = artifact.schema().len(),
            encoded_width = artifact.feature_width(),
            target = ?artifact.target(),
            "Model artifact loaded"
        );

        Ok(LoadedBundle {
            artifact,
            anchor_year,
            path: path.to_path_buf(),
        })
    }

    /// First existing candidate path, or the missing-artifact condition
    /// listing everything that was searched.
    fn resolve_candidate(&self) -> Result<&Path> {
        self.candidates
            .iter()
            .find(|p| p.exists())
            .map(PathBuf::as_path)
            .ok_or_else(|| EstimatorError::ArtifactNotFound {
                searched: self.candidates.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_artifact(dir: &Path, name: &str, json: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(json.as_bytes()).unwrap();
        path
    }

    fn bundle_json(anchor_year: Option<i64>) -> String {
        let pipeline = r#"{
            "schema": {"columns": [{"name": "age", "dtype": "int"}]},
            "preprocessing": [{"kind": "passthrough", "column": "age"}],
            "estimator": {"kind": "linear", "intercept": 100.0, "coefficients": [-2.0]}
        }"#;
        match anchor_year {
            Some(year) => format!(r#"{{"pipeline": {pipeline}, "anchor_year": {year}}}"#),
            None => pipeline.to_string(),
        }
    }

    #[test]
    fn test_missing_artifact_lists_all_candidates() {
        let loader = ArtifactLoader::new(["/nonexistent/a.json", "/nonexistent/b.json"]);
        let err = loader.get().unwrap_err();
        match err {
            EstimatorError::ArtifactNotFound { ref searched } => {
                assert_eq!(searched.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let second = write_artifact(dir.path(), "fallback.json", &bundle_json(Some(2024)));

        let loader = ArtifactLoader::new([
            dir.path().join("preferred.json"),
            second.clone(),
        ]);
        let bundle = loader.get().unwrap();
        assert_eq!(bundle.path, second);
        assert_eq!(bundle.anchor_year, 2024);
    }

    #[test]
    fn test_bare_artifact_gets_default_anchor_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "bare.json", &bundle_json(None));

        let loader = ArtifactLoader::new([path]);
        let bundle = loader.get().unwrap();
        assert_eq!(bundle.anchor_year, DEFAULT_ANCHOR_YEAR);
    }

    #[test]
    fn test_cache_returns_same_handle_after_file_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "model.json", &bundle_json(Some(2025)));

        let loader = ArtifactLoader::new([path.clone()]);
        let first = loader.get().unwrap();

        // Repeated access must not re-read the filesystem.
        fs::remove_file(&path).unwrap();
        let second = loader.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_malformed_artifact_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "broken.json", "{not json");

        let loader = ArtifactLoader::new([path]);
        let err = loader.get().unwrap_err();
        assert!(matches!(err, EstimatorError::Serialization(_)));
        assert!(!err.is_recoverable());
    }
}
