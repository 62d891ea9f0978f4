/*!
 * Interface to the external document-translation pipeline.
 *
 * The pipeline walks a document, segments its text, and calls back into a
 * translator for every segment; all of that is out of scope here. This core
 * only hands it a request, a cancellation token, a progress callback, and the
 * opaque layout-model handle, and receives one (mono, dual) artifact pair per
 * input file.
 */

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::PipelineError;
use crate::job::CancellationToken;

/// Progress callback handed to the pipeline: (completed units, total units,
/// description)
pub type ProgressFn = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Opaque handle to the layout-analysis model.
///
/// Owned by the embedding application and passed through unmodified; the
/// pipeline downcasts it to whatever concrete model it loaded.
#[derive(Clone)]
pub struct LayoutModel(Arc<dyn Any + Send + Sync>);

impl LayoutModel {
    /// Wrap a concrete model handle
    pub fn new(model: impl Any + Send + Sync) -> Self {
        Self(Arc::new(model))
    }

    /// Access the wrapped handle for downcasting
    pub fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self.0.as_ref()
    }
}

impl fmt::Debug for LayoutModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LayoutModel(..)")
    }
}

/// Everything the pipeline needs for one run
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Input documents; this core always passes exactly one
    pub files: Vec<PathBuf>,

    /// Source language code
    pub lang_in: String,

    /// Target language code
    pub lang_out: String,

    /// Registry name of the selected translation service
    pub service: String,

    /// Zero-based page subset, or `None` for the whole document
    pub pages: Option<Vec<usize>>,

    /// Concurrency hint for the pipeline's segment workers
    pub thread_count: usize,

    /// Resolved credentials for the selected service
    pub envs: HashMap<String, String>,

    /// Where artifacts are written
    pub output_dir: PathBuf,
}

/// The external document-translation pipeline.
///
/// `run` returns one (mono, dual) artifact pair per input file, fails with
/// [`PipelineError::Cancelled`] when it observes the token, and with
/// [`PipelineError::Failed`] otherwise. Polling cadence of the token is the
/// pipeline's own business.
#[async_trait]
pub trait DocumentPipeline: Send + Sync {
    /// Translate the requested documents
    async fn run(
        &self,
        request: &PipelineRequest,
        cancellation: Arc<CancellationToken>,
        progress: ProgressFn,
        layout_model: Option<LayoutModel>,
    ) -> Result<Vec<(PathBuf, PathBuf)>, PipelineError>;
}
