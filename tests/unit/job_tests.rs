/*!
 * Tests for the cancellable job state machine
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use papertrans::job::{CancelState, JobRequest, JobRunner, JobState, TranslationJob};

use crate::common::mock_pipeline::MockPipeline;
use crate::common::sinks::{RecordingProgress, RecordingResult};

fn request() -> JobRequest {
    JobRequest {
        file: PathBuf::from("paper.pdf"),
        service: "Google".to_string(),
        lang_in: "en".to_string(),
        lang_out: "zh".to_string(),
        pages: None,
        thread_count: 4,
        envs: HashMap::new(),
        output_dir: PathBuf::from("."),
    }
}

fn job_with(
    pipeline: Arc<MockPipeline>,
) -> (TranslationJob, Arc<RecordingProgress>, Arc<RecordingResult>) {
    let progress = Arc::new(RecordingProgress::new());
    let result = Arc::new(RecordingResult::new());
    let job = TranslationJob::new(
        request(),
        pipeline,
        None,
        progress.clone(),
        result.clone(),
    );
    (job, progress, result)
}

#[tokio::test]
async fn test_job_success_should_report_single_mono_path() {
    let pipeline = Arc::new(MockPipeline::succeed_with(vec![(
        PathBuf::from("out/mono.pdf"),
        PathBuf::from("out/dual.pdf"),
    )]));
    let (mut job, _progress, result) = job_with(pipeline.clone());

    job.start();
    assert_eq!(job.wait().await, JobState::Completed);

    assert_eq!(result.completed_paths(), vec![PathBuf::from("out/mono.pdf")]);
    assert!(result.failed_messages().is_empty());
    assert_eq!(result.cancelled_count(), 0);

    // The pipeline is always invoked with exactly one file.
    let seen = pipeline.last_request.lock().unwrap();
    assert_eq!(seen.as_ref().unwrap().files, vec![PathBuf::from("paper.pdf")]);
}

#[tokio::test]
async fn test_job_empty_result_should_fail_never_complete() {
    let pipeline = Arc::new(MockPipeline::succeed_with(vec![]));
    let (mut job, _progress, result) = job_with(pipeline);

    job.start();
    assert_eq!(job.wait().await, JobState::Failed);

    assert!(result.completed_paths().is_empty());
    assert_eq!(result.failed_messages().len(), 1);
}

#[tokio::test]
async fn test_job_two_results_should_fail_never_complete() {
    let pairs = vec![
        (PathBuf::from("a-mono.pdf"), PathBuf::from("a-dual.pdf")),
        (PathBuf::from("b-mono.pdf"), PathBuf::from("b-dual.pdf")),
    ];
    let pipeline = Arc::new(MockPipeline::succeed_with(pairs));
    let (mut job, _progress, result) = job_with(pipeline);

    job.start();
    assert_eq!(job.wait().await, JobState::Failed);

    assert!(result.completed_paths().is_empty());
    assert!(result.failed_messages()[0].contains("2 results"));
}

#[tokio::test]
async fn test_job_pipeline_failure_should_forward_message() {
    let pipeline = Arc::new(MockPipeline::fail_with("disk full"));
    let (mut job, _progress, result) = job_with(pipeline);

    job.start();
    assert_eq!(job.wait().await, JobState::Failed);
    assert_eq!(result.failed_messages(), vec!["disk full".to_string()]);
}

#[tokio::test]
async fn test_stop_before_start_should_be_noop() {
    let pipeline = Arc::new(MockPipeline::succeed_with(vec![(
        PathBuf::from("mono.pdf"),
        PathBuf::from("dual.pdf"),
    )]));
    let (mut job, _progress, result) = job_with(pipeline);

    // Not running yet: the token must stay unarmed.
    job.stop();
    assert_eq!(job.cancellation_token().state(), CancelState::NotRequested);
    assert_eq!(job.state(), JobState::Idle);

    job.start();
    assert_eq!(job.wait().await, JobState::Completed);
    assert_eq!(result.cancelled_count(), 0);
}

#[tokio::test]
async fn test_stop_while_running_should_cancel_never_complete() {
    let pipeline = Arc::new(MockPipeline::wait_for_cancel());
    let (mut job, _progress, result) = job_with(pipeline);

    job.start();
    tokio::time::sleep(Duration::from_millis(20)).await;
    job.stop();

    assert_eq!(job.wait().await, JobState::Cancelled);
    assert_eq!(result.cancelled_count(), 1);
    assert!(result.completed_paths().is_empty());
    assert!(result.failed_messages().is_empty());
    assert_eq!(job.cancellation_token().state(), CancelState::Observed);
}

#[tokio::test]
async fn test_stop_should_be_idempotent_while_running() {
    let pipeline = Arc::new(MockPipeline::wait_for_cancel());
    let (mut job, _progress, result) = job_with(pipeline);

    job.start();
    tokio::time::sleep(Duration::from_millis(10)).await;
    job.stop();
    job.stop();
    job.stop();

    assert_eq!(job.wait().await, JobState::Cancelled);
    assert_eq!(result.cancelled_count(), 1);
}

#[tokio::test]
async fn test_stop_after_terminal_should_be_noop() {
    let pipeline = Arc::new(MockPipeline::succeed_with(vec![(
        PathBuf::from("mono.pdf"),
        PathBuf::from("dual.pdf"),
    )]));
    let (mut job, _progress, _result) = job_with(pipeline);

    job.start();
    assert_eq!(job.wait().await, JobState::Completed);

    job.stop();
    assert_eq!(job.state(), JobState::Completed);
    assert_eq!(job.cancellation_token().state(), CancelState::NotRequested);
}

#[tokio::test]
async fn test_progress_during_run_should_be_forwarded_as_percent() {
    let pipeline = Arc::new(MockPipeline::succeed_with(vec![(
        PathBuf::from("mono.pdf"),
        PathBuf::from("dual.pdf"),
    )]));
    let (mut job, progress, _result) = job_with(pipeline);

    job.start();
    job.wait().await;

    let updates = progress.updates.lock().unwrap().clone();
    assert_eq!(updates, vec![(50, "translating".to_string())]);
}

#[tokio::test]
async fn test_progress_after_terminal_should_be_dropped() {
    let pipeline = Arc::new(MockPipeline::succeed_with(vec![(
        PathBuf::from("mono.pdf"),
        PathBuf::from("dual.pdf"),
    )]));
    let (mut job, progress, _result) = job_with(pipeline.clone());

    job.start();
    assert_eq!(job.wait().await, JobState::Completed);
    let count_at_terminal = progress.count();

    // Fire the pipeline's captured callback after termination.
    let late = pipeline.captured_progress.lock().unwrap().clone().unwrap();
    late(9, 10, "late update");

    assert_eq!(progress.count(), count_at_terminal);
}

#[tokio::test]
async fn test_start_twice_should_run_pipeline_once() {
    let pipeline = Arc::new(MockPipeline::succeed_with(vec![(
        PathBuf::from("mono.pdf"),
        PathBuf::from("dual.pdf"),
    )]));
    let (mut job, _progress, result) = job_with(pipeline);

    job.start();
    job.start();
    job.wait().await;

    assert_eq!(result.completed_paths().len(), 1);
}

#[tokio::test]
async fn test_runner_should_stop_previous_job_before_starting_new_one() {
    let (first_job, _first_progress, first_result) =
        job_with(Arc::new(MockPipeline::wait_for_cancel()));
    let first_token = first_job.cancellation_token();

    let mut runner = JobRunner::new();
    runner.start(first_job);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(runner.active().unwrap().state(), JobState::Running);

    let (second_job, _second_progress, second_result) =
        job_with(Arc::new(MockPipeline::succeed_with(vec![(
            PathBuf::from("mono.pdf"),
            PathBuf::from("dual.pdf"),
        )])));

    runner.start(second_job);

    // The previous job got its own token armed; the new job has a fresh one.
    assert!(first_token.is_requested());
    assert_eq!(
        runner.active().unwrap().cancellation_token().state(),
        CancelState::NotRequested
    );

    runner.active_mut().unwrap().wait().await;
    assert_eq!(second_result.completed_paths().len(), 1);

    // Give the replaced job time to unwind through its cancellation.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(first_result.cancelled_count(), 1);
}
