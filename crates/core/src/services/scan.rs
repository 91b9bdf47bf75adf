use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::extract::FunctionExtractor;
use crate::model::{FunctionEntry, FunctionRecord, FunctionReport};
use crate::services::classify::Classifier;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Workspace directory not found at {0}")]
    MissingWorkspace(PathBuf),
    #[error("Failed to read manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to convert dependencies of {path}: {source}")]
    Dependencies {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// What to scan: an existing checkout plus the identifiers attached to every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub repo_root: PathBuf,
    /// Workspace directory relative to `repo_root`.
    pub workspace_root: PathBuf,
    pub repo_url: String,
    pub program_id: String,
}

impl ScanRequest {
    pub fn workspace_dir(&self) -> PathBuf {
        self.repo_root.join(&self.workspace_root)
    }
}

/// A source file left out of the scan, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub reports: Vec<FunctionReport>,
    pub files_scanned: usize,
    pub functions_extracted: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Result of walking a source directory.
#[derive(Debug, Default)]
pub struct SourceDiscovery {
    /// Every `*.rs` file found, sorted.
    pub files: Vec<PathBuf>,
    /// Entries below the root that could not be read, with the reason.
    pub unreadable: Vec<(PathBuf, String)>,
}

/// Every `*.rs` file under `dir`, following symlinks. A missing directory
/// yields nothing; only an unreadable `dir` itself is an error.
pub fn discover_sources(dir: &Path) -> Result<SourceDiscovery, ScanError> {
    let mut found = SourceDiscovery::default();
    if !dir.is_dir() {
        return Ok(found);
    }
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(ScanError::Walk { path: dir.to_path_buf(), source });
            }
            Err(err) => {
                let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                found.unreadable.push((path, err.to_string()));
                continue;
            }
        };
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("rs")
        {
            found.files.push(entry.into_path());
        }
    }
    found.files.sort();
    Ok(found)
}

/// The `[dependencies]` table of a Cargo manifest as JSON; `{}` when absent.
pub fn load_dependencies(manifest: &Path) -> Result<serde_json::Value, ScanError> {
    let body = fs::read_to_string(manifest)
        .map_err(|source| ScanError::Manifest { path: manifest.to_path_buf(), source })?;
    let table: toml::Table = toml::from_str(&body)
        .map_err(|source| ScanError::ManifestParse { path: manifest.to_path_buf(), source })?;
    match table.get("dependencies") {
        Some(deps) => serde_json::to_value(deps)
            .map_err(|source| ScanError::Dependencies { path: manifest.to_path_buf(), source }),
        None => Ok(serde_json::Value::Object(serde_json::Map::new())),
    }
}

/// Path of `path` relative to `root`, with `/` separators.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

/// Coordinator tying the extractor and a classifier to a checkout on disk.
pub struct Scanner<'a> {
    pub extractor: &'a FunctionExtractor,
    pub classifier: &'a dyn Classifier,
}

impl<'a> Scanner<'a> {
    pub fn scan(&self, request: &ScanRequest) -> Result<ScanOutcome, ScanError> {
        let workspace = request.workspace_dir();
        if !workspace.is_dir() {
            return Err(ScanError::MissingWorkspace(workspace));
        }

        let dependencies = load_dependencies(&workspace.join("Cargo.toml"))?;
        let discovered = discover_sources(&workspace.join("src"))?;
        debug!(
            count = discovered.files.len(),
            workspace = %workspace.display(),
            "discovered sources"
        );

        let mut outcome = ScanOutcome {
            reports: Vec::new(),
            files_scanned: 0,
            functions_extracted: 0,
            skipped: Vec::new(),
        };
        for (path, reason) in discovered.unreadable {
            let file = relative_display(&request.repo_root, &path);
            warn!(file = %file, %reason, "skipping unreadable entry");
            outcome.skipped.push(SkippedFile { path: file, reason });
        }

        let per_file: Vec<(String, Result<Vec<FunctionRecord>, String>)> = discovered
            .files
            .par_iter()
            .map(|path| (relative_display(&request.repo_root, path), self.extract_file(path)))
            .collect();

        for (file, extracted) in per_file {
            let functions = match extracted {
                Ok(functions) => functions,
                Err(reason) => {
                    warn!(file = %file, %reason, "skipping source file");
                    outcome.skipped.push(SkippedFile { path: file, reason });
                    continue;
                }
            };
            outcome.files_scanned += 1;
            outcome.functions_extracted += functions.len();

            let analyses: Vec<_> =
                functions.par_iter().map(|f| self.classifier.classify(f)).collect();
            for (record, analysis) in functions.into_iter().zip(analyses) {
                if !analysis.is_reportable() {
                    continue;
                }
                outcome.reports.push(FunctionReport {
                    file: file.clone(),
                    function: FunctionEntry {
                        record,
                        repo_url: request.repo_url.clone(),
                        program_id: request.program_id.clone(),
                        dependencies: dependencies.clone(),
                    },
                    analysis,
                });
            }
        }

        info!(
            program_id = %request.program_id,
            classifier = self.classifier.name(),
            files = outcome.files_scanned,
            skipped = outcome.skipped.len(),
            functions = outcome.functions_extracted,
            reports = outcome.reports.len(),
            "scan complete"
        );
        Ok(outcome)
    }

    fn extract_file(&self, path: &Path) -> Result<Vec<FunctionRecord>, String> {
        let source = fs::read_to_string(path).map_err(|e| format!("read failed: {e}"))?;
        let functions = self.extractor.extract(&source).map_err(|e| e.to_string())?;
        debug!(file = %path.display(), functions = functions.len(), "extracted");
        Ok(functions)
    }
}
