/*!
 * End-to-end job workflow tests
 *
 * Wires a real Translator (over the mock backend) into a small in-process
 * pipeline that writes artifacts to disk, then drives a job through setup,
 * progress, completion, and artifact cleanup.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use papertrans::errors::PipelineError;
use papertrans::job::{CancellationToken, JobRequest, JobState, TranslationJob};
use papertrans::pipeline::{DocumentPipeline, LayoutModel, PipelineRequest, ProgressFn};
use papertrans::translators::Translator;
use papertrans::MemoryCredentialStore;

use crate::common::mock_backends::MockBackend;
use crate::common::sinks::{RecordingProgress, RecordingResult};

/// Pipeline that "translates" a handful of segments through a Translator and
/// writes mono/dual artifacts into the request's output directory.
struct InProcessPipeline;

#[async_trait]
impl DocumentPipeline for InProcessPipeline {
    async fn run(
        &self,
        request: &PipelineRequest,
        cancellation: Arc<CancellationToken>,
        progress: ProgressFn,
        _layout_model: Option<LayoutModel>,
    ) -> Result<Vec<(PathBuf, PathBuf)>, PipelineError> {
        let translator = Translator::new(
            Box::new(MockBackend::new()),
            request.lang_in.clone(),
            request.lang_out.clone(),
            None,
            false,
        );

        let segments = ["Introduction", "Method", "Results"];
        let mut translated = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            if cancellation.is_requested() {
                cancellation.observe();
                return Err(PipelineError::Cancelled);
            }
            translated.push(translator.translate(segment).await?);
            progress(index + 1, segments.len(), segment);
        }

        let mono = request.output_dir.join("paper-mono.pdf");
        let dual = request.output_dir.join("paper-dual.pdf");
        std::fs::write(&mono, translated.join("\n"))
            .map_err(|e| PipelineError::Failed(e.to_string()))?;
        std::fs::write(&dual, "dual artifact").map_err(|e| PipelineError::Failed(e.to_string()))?;

        Ok(vec![(mono, dual)])
    }
}

fn request_into(output_dir: &Path) -> JobRequest {
    JobRequest {
        file: PathBuf::from("paper.pdf"),
        service: "Google".to_string(),
        lang_in: "en".to_string(),
        lang_out: "zh".to_string(),
        pages: None,
        thread_count: 4,
        envs: HashMap::new(),
        output_dir: output_dir.to_path_buf(),
    }
}

#[tokio::test]
async fn test_workflow_should_complete_and_remove_dual_artifact() {
    let output = tempfile::tempdir().unwrap();
    let progress = Arc::new(RecordingProgress::new());
    let result = Arc::new(RecordingResult::new());

    let mut job = TranslationJob::new(
        request_into(output.path()),
        Arc::new(InProcessPipeline),
        None,
        progress.clone(),
        result.clone(),
    );

    job.start();
    assert_eq!(job.wait().await, JobState::Completed);

    // Exactly one mono path was reported and the file is on disk.
    let completed = result.completed_paths();
    assert_eq!(completed.len(), 1);
    assert!(completed[0].exists());
    assert!(completed[0].ends_with("paper-mono.pdf"));

    // The dual artifact existed during the run and was cleaned up after.
    assert!(!output.path().join("paper-dual.pdf").exists());

    // Progress arrived as monotonically increasing percentages ending at 100.
    let updates: Vec<u8> = progress
        .updates
        .lock()
        .unwrap()
        .iter()
        .map(|(percent, _)| *percent)
        .collect();
    assert_eq!(updates, vec![33, 66, 100]);
}

#[tokio::test]
async fn test_workflow_setup_should_reject_unknown_service_before_running() {
    // Registry validation happens at job setup, not inside the running job.
    let store = MemoryCredentialStore::new();
    let err = papertrans::resolve_service("Not A Service", &store).unwrap_err();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_workflow_cancel_before_first_segment_should_cancel() {
    let output = tempfile::tempdir().unwrap();
    let progress = Arc::new(RecordingProgress::new());
    let result = Arc::new(RecordingResult::new());

    let mut job = TranslationJob::new(
        request_into(output.path()),
        Arc::new(InProcessPipeline),
        None,
        progress.clone(),
        result.clone(),
    );

    // Arm the token through the job as soon as it is running; the pipeline
    // checks before each segment.
    job.start();
    job.stop();

    let state = job.wait().await;
    if state == JobState::Cancelled {
        assert_eq!(result.cancelled_count(), 1);
        assert!(result.completed_paths().is_empty());
    } else {
        // The pipeline may have already passed its last checkpoint; a
        // completed run must then have reported exactly one mono path.
        assert_eq!(state, JobState::Completed);
        assert_eq!(result.completed_paths().len(), 1);
    }
}
