/*!
 * Cancellable translation job.
 *
 * One job wraps one invocation of the external document pipeline on its own
 * tokio task. The job owns a freshly allocated cancellation token, relays
 * progress while it runs, and delivers exactly one terminal outcome. A
 * [`JobRunner`] enforces the one-running-job-per-worker rule.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::cancellation::CancellationToken;
use super::progress::{ProgressRelay, ProgressSink, ResultSink};
use crate::errors::PipelineError;
use crate::pipeline::{DocumentPipeline, LayoutModel, PipelineRequest, ProgressFn};

/// Job lifecycle; the three right-hand states are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Constructed, not yet started
    Idle,
    /// The pipeline invocation is in flight
    Running,
    /// Pipeline produced one artifact pair; mono path was reported
    Completed,
    /// Pipeline failed, or returned an unexpected result shape
    Failed,
    /// Pipeline observed the cancellation token and stopped
    Cancelled,
}

impl JobState {
    /// Whether the state is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Parameters for one document-translation job
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// The document to translate
    pub file: PathBuf,

    /// Registry name of the selected service
    pub service: String,

    /// Source language code
    pub lang_in: String,

    /// Target language code
    pub lang_out: String,

    /// Zero-based page subset, or `None` for the whole document
    pub pages: Option<Vec<usize>>,

    /// Concurrency hint forwarded to the pipeline
    pub thread_count: usize,

    /// Credentials resolved at job setup; not re-read mid-job
    pub envs: HashMap<String, String>,

    /// Where artifacts are written
    pub output_dir: PathBuf,
}

impl JobRequest {
    fn to_pipeline_request(&self) -> PipelineRequest {
        PipelineRequest {
            files: vec![self.file.clone()],
            lang_in: self.lang_in.clone(),
            lang_out: self.lang_out.clone(),
            service: self.service.clone(),
            pages: self.pages.clone(),
            thread_count: self.thread_count,
            envs: self.envs.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

/// State shared between the job handle and its task
struct JobShared {
    state: Mutex<JobState>,
    token: Arc<CancellationToken>,
}

/// Everything the spawned task consumes
struct JobContext {
    request: JobRequest,
    pipeline: Arc<dyn DocumentPipeline>,
    layout_model: Option<LayoutModel>,
    progress: Arc<dyn ProgressSink>,
    result: Arc<dyn ResultSink>,
}

/// One cancellable document-translation job
pub struct TranslationJob {
    shared: Arc<JobShared>,
    context: Option<JobContext>,
    handle: Option<JoinHandle<()>>,
}

impl TranslationJob {
    /// Create an idle job with a freshly allocated cancellation token.
    ///
    /// Tokens are never shared between jobs; every submission allocates its
    /// own.
    pub fn new(
        request: JobRequest,
        pipeline: Arc<dyn DocumentPipeline>,
        layout_model: Option<LayoutModel>,
        progress: Arc<dyn ProgressSink>,
        result: Arc<dyn ResultSink>,
    ) -> Self {
        if layout_model.is_none() {
            warn!("Layout model not loaded; figure/table detection may be degraded");
        }
        Self {
            shared: Arc::new(JobShared {
                state: Mutex::new(JobState::Idle),
                token: Arc::new(CancellationToken::new()),
            }),
            context: Some(JobContext {
                request,
                pipeline,
                layout_model,
                progress,
                result,
            }),
            handle: None,
        }
    }

    /// Current job state
    pub fn state(&self) -> JobState {
        *self.shared.state.lock()
    }

    /// The job's cancellation token, for pipelines wired up manually
    pub fn cancellation_token(&self) -> Arc<CancellationToken> {
        self.shared.token.clone()
    }

    /// Enter Running and invoke the pipeline exactly once on its own task.
    ///
    /// Starting a job that is not idle is a no-op.
    pub fn start(&mut self) {
        {
            let mut state = self.shared.state.lock();
            if *state != JobState::Idle {
                warn!("Ignoring start of a job in state {:?}", *state);
                return;
            }
            *state = JobState::Running;
        }

        // context is always present while the job is idle
        let Some(context) = self.context.take() else {
            return;
        };
        let shared = self.shared.clone();

        let handle = tokio::spawn(async move {
            run_job(shared, context).await;
        });
        self.handle = Some(handle);
    }

    /// Arm the cancellation token and return immediately.
    ///
    /// Idempotent: only the first call during Running has any effect, and the
    /// call never blocks until the job terminates. Before start and after a
    /// terminal state this is a no-op.
    pub fn stop(&self) {
        let state = *self.shared.state.lock();
        if state != JobState::Running {
            debug!("stop() ignored in state {:?}", state);
            return;
        }
        if self.shared.token.request() {
            info!("Cancellation requested");
        }
    }

    /// Wait for the job's task to finish and return the terminal state
    pub async fn wait(&mut self) -> JobState {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        self.state()
    }

    /// Whether the job has reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }
}

/// Body of the spawned task: one pipeline call, one terminal outcome
async fn run_job(shared: Arc<JobShared>, context: JobContext) {
    let relay = ProgressRelay::new(context.progress.clone());
    let progress_fn: ProgressFn = {
        let relay = relay.clone();
        Arc::new(move |completed: usize, total: usize, description: &str| {
            relay.report(completed, total, description);
        })
    };

    let request = context.request.to_pipeline_request();
    debug!(
        "Starting translation of {} via {}",
        context.request.file.display(),
        context.request.service
    );

    let outcome = context
        .pipeline
        .run(
            &request,
            shared.token.clone(),
            progress_fn,
            context.layout_model.clone(),
        )
        .await;

    // Terminal transition first: progress arriving after this point is
    // dropped, and the single result notification follows.
    let terminal = match &outcome {
        Ok(pairs) if pairs.len() == 1 => JobState::Completed,
        Ok(_) => JobState::Failed,
        Err(PipelineError::Cancelled) => JobState::Cancelled,
        Err(PipelineError::Failed(_)) => JobState::Failed,
    };
    relay.disarm();
    *shared.state.lock() = terminal;

    match outcome {
        Ok(mut pairs) if pairs.len() == 1 => {
            let (mono_path, dual_path) = pairs.remove(0);
            info!("Translation completed: {}", mono_path.display());
            context.result.on_completed(&mono_path);
            remove_artifact(&dual_path);
        }
        Ok(pairs) => {
            let message = format!(
                "translation pipeline returned {} results for one document",
                pairs.len()
            );
            warn!("{}", message);
            context.result.on_failed(&message);
        }
        Err(PipelineError::Cancelled) => {
            info!("Translation cancelled");
            context.result.on_cancelled();
        }
        Err(PipelineError::Failed(message)) => {
            warn!("Translation failed: {}", message);
            context.result.on_failed(&message);
        }
    }
}

/// Best-effort removal of the unused bilingual artifact.
///
/// Failure is logged and never escalated to a job failure.
fn remove_artifact(path: &Path) {
    if !path.as_os_str().is_empty() && path.exists() {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Removed unused artifact {}", path.display()),
            Err(e) => warn!("Could not remove artifact {}: {}", path.display(), e),
        }
    }
}

/// Enforces the single-running-job rule for one worker.
///
/// Starting a new job while another is active first arms the active job's
/// token; the two jobs never share a token.
#[derive(Default)]
pub struct JobRunner {
    active: Option<TranslationJob>,
}

impl JobRunner {
    /// Create a runner with no active job
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a job, cooperatively stopping any still-running predecessor
    pub fn start(&mut self, mut job: TranslationJob) {
        if let Some(active) = &self.active {
            if active.state() == JobState::Running {
                warn!("Previous job still running, stopping it first");
                active.stop();
            }
        }
        job.start();
        self.active = Some(job);
    }

    /// Arm the active job's cancellation token, if any
    pub fn stop_active(&self) {
        if let Some(job) = &self.active {
            job.stop();
        }
    }

    /// The currently tracked job
    pub fn active(&self) -> Option<&TranslationJob> {
        self.active.as_ref()
    }

    /// Mutable access, for awaiting termination
    pub fn active_mut(&mut self) -> Option<&mut TranslationJob> {
        self.active.as_mut()
    }
}
