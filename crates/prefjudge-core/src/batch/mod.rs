//! Concurrent per-file processing with file-level isolation.
//!
//! Each discovered file is handed to one worker task; at most
//! `BatchConfig::concurrency` workers run at once. Results are collected in
//! completion order. A worker that returns an error or panics is recorded as
//! a failure for its file only; every other file still completes.

pub mod progress;

use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::BatchConfig;
use crate::error::{PipelineError, PipelineResult};
use progress::{ProgressEvent, ProgressSink};

/// A file whose worker did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Merged outcome of a batch.
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Successful files only.
    pub results: BTreeMap<PathBuf, T>,
    pub failures: Vec<FileFailure>,
    /// Successful files in the order they finished.
    pub completion_order: Vec<PathBuf>,
}

impl<T> BatchReport<T> {
    pub fn total_files(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct BatchRunner {
    config: BatchConfig,
    progress: Option<ProgressSink>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Input files directly inside `directory`, sorted by path.
    pub fn discover(&self, directory: &Path) -> PipelineResult<Vec<PathBuf>> {
        let extension = self.config.extension.trim_start_matches('.');
        let entries = std::fs::read_dir(directory).map_err(|e| PipelineError::io(directory, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| PipelineError::io(directory, e))?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self
                .config
                .exclude_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
            {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// Discover files in `directory` and run `per_file` over each of them.
    pub async fn run<T, F, Fut>(
        &self,
        directory: &Path,
        per_file: F,
    ) -> PipelineResult<BatchReport<T>>
    where
        T: Send + 'static,
        F: Fn(PathBuf) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PipelineResult<T>> + Send + 'static,
    {
        let files = self.discover(directory)?;
        info!(directory = %directory.display(), files = files.len(), "discovered input files");
        Ok(self.run_files(files, per_file).await)
    }

    /// Run `per_file` over `files`. Never fails as a whole.
    pub async fn run_files<T, F, Fut>(&self, files: Vec<PathBuf>, per_file: F) -> BatchReport<T>
    where
        T: Send + 'static,
        F: Fn(PathBuf) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PipelineResult<T>> + Send + 'static,
    {
        let per_file = Arc::new(per_file);
        let sem = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for path in files.iter().cloned() {
            let sem = sem.clone();
            let per_file = per_file.clone();
            join_set.spawn(async move {
                let _permit = match sem.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return (path, Err(format!("worker pool closed: {}", e))),
                };
                let worker_path = path.clone();
                let work = AssertUnwindSafe(async move { per_file(worker_path).await });
                let result = match work.catch_unwind().await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(panic) => Err(format!("worker panicked: {}", panic_message(&*panic))),
                };
                (path, result)
            });
        }

        let total = files.len();
        let mut report = BatchReport {
            results: BTreeMap::new(),
            failures: Vec::new(),
            completion_order: Vec::new(),
        };

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((path, Ok(value))) => {
                    info!(file = %path.display(), "file done");
                    report.completion_order.push(path.clone());
                    report.results.insert(path.clone(), value);
                    self.emit(report.total_files(), total, path, true);
                }
                Ok((path, Err(message))) => {
                    error!(file = %path.display(), error = %message, "file failed");
                    report.failures.push(FileFailure {
                        path: path.clone(),
                        error: message,
                    });
                    self.emit(report.total_files(), total, path, false);
                }
                // Without a path; swept up below.
                Err(e) => error!(error = %e, "worker task aborted"),
            }
        }

        for path in files {
            let seen = report.results.contains_key(&path)
                || report.failures.iter().any(|f| f.path == path);
            if !seen {
                error!(file = %path.display(), "worker exited without a result");
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error: "worker aborted".to_string(),
                });
                self.emit(report.total_files(), total, path, false);
            }
        }

        report
    }

    fn emit(&self, done: usize, total: usize, path: PathBuf, ok: bool) {
        if let Some(sink) = &self.progress {
            sink(ProgressEvent {
                done,
                total,
                path,
                ok,
            });
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
