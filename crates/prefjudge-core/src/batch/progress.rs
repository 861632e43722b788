//! Progress reporting for batch runs. The runner emits one event per finished
//! file, in completion order; the console layer consumes them via a sink.

use std::path::PathBuf;
use std::sync::Arc;

/// One progress update: how many files are done and the total count.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub done: usize,
    pub total: usize,
    pub path: PathBuf,
    pub ok: bool,
}

/// Sink for progress events. Runner calls this each time a file completes.
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;
