//! Conversion Worker Module
//!
//! Each submitted request runs on its own Tokio task. The task reports
//! `Started` and `Finished` over an unbounded channel owned by the worker, so
//! the foreground applies every update on its own thread in send order.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{new_job_id, ConversionEvent, JobId};
use crate::conversion::{ConversionRequest, ConversionResult, ConversionRunner};

// =============================================================================
// Conversion Handle
// =============================================================================

/// Handle to a submitted conversion
#[derive(Debug)]
pub struct ConversionHandle {
    /// Job ID, matches the `job_id` of this job's events
    pub id: JobId,
    task: JoinHandle<ConversionResult>,
}

impl ConversionHandle {
    /// Whether the background task has finished
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the conversion and returns its outcome.
    ///
    /// A task that panicked is reported as `UnexpectedFailure`.
    pub async fn wait(self) -> ConversionResult {
        match self.task.await {
            Ok(result) => result,
            Err(e) => ConversionResult::UnexpectedFailure {
                diagnostic_text: format!("Conversion task failed: {}", e),
            },
        }
    }
}

// =============================================================================
// Conversion Worker
// =============================================================================

/// Spawns conversions in the background and owns their event channel
pub struct ConversionWorker {
    runner: ConversionRunner,
    event_tx: mpsc::UnboundedSender<ConversionEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<ConversionEvent>>,
}

impl ConversionWorker {
    /// Creates a worker that converts with `runner`
    pub fn new(runner: ConversionRunner) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            runner,
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    pub fn runner(&self) -> &ConversionRunner {
        &self.runner
    }

    /// Takes the event receiver. Returns `None` after the first call.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<ConversionEvent>> {
        self.event_rx.take()
    }

    /// Submits a request and returns immediately.
    ///
    /// Must be called from within a Tokio runtime. Jobs are independent; two
    /// jobs writing the same output path race on the filesystem.
    pub fn submit(&self, request: ConversionRequest) -> ConversionHandle {
        let job_id = new_job_id();
        let runner = self.runner.clone();
        let event_tx = self.event_tx.clone();
        let task_job_id = job_id.clone();

        info!(job_id = %job_id, "Submitting conversion");

        let task = tokio::spawn(async move {
            emit(
                &event_tx,
                ConversionEvent::Started {
                    job_id: task_job_id.clone(),
                    request: request.clone(),
                },
            );

            let result = runner.run(&request).await;

            emit(
                &event_tx,
                ConversionEvent::Finished {
                    job_id: task_job_id,
                    result: result.clone(),
                },
            );

            result
        });

        ConversionHandle { id: job_id, task }
    }
}

fn emit(tx: &mpsc::UnboundedSender<ConversionEvent>, event: ConversionEvent) {
    if tx.send(event).is_err() {
        debug!("Event receiver dropped; conversion continues without a listener");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ContainerFormat;

    #[tokio::test]
    async fn test_receiver_can_only_be_taken_once() {
        let mut worker = ConversionWorker::new(ConversionRunner::system());
        assert!(worker.take_event_receiver().is_some());
        assert!(worker.take_event_receiver().is_none());
    }

    #[tokio::test]
    async fn test_missing_tool_is_delivered_as_event() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut worker = ConversionWorker::new(ConversionRunner::new(dir.path().join("nope")));
        let mut events = worker.take_event_receiver().unwrap();

        let request = ConversionRequest::new("/videos/clip.mkv", ContainerFormat::Mp4).unwrap();
        let handle = worker.submit(request.clone());
        let job_id = handle.id.clone();

        let first = events.recv().await.unwrap();
        assert_eq!(
            first,
            ConversionEvent::Started {
                job_id: job_id.clone(),
                request
            }
        );

        let second = events.recv().await.unwrap();
        assert_eq!(
            second,
            ConversionEvent::Finished {
                job_id,
                result: ConversionResult::ToolNotFound
            }
        );

        assert_eq!(handle.wait().await, ConversionResult::ToolNotFound);
    }

    #[tokio::test]
    async fn test_submit_without_listener_still_completes() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut worker = ConversionWorker::new(ConversionRunner::new(dir.path().join("nope")));
        drop(worker.take_event_receiver());

        let request = ConversionRequest::new("/videos/clip.mkv", ContainerFormat::Avi).unwrap();
        let handle = worker.submit(request);
        assert_eq!(handle.wait().await, ConversionResult::ToolNotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_concurrent_jobs_keep_per_job_order() {
        use std::collections::HashMap;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let tool = dir.path().join("ffmpeg");
        std::fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut worker = ConversionWorker::new(ConversionRunner::new(&tool));
        let mut events = worker.take_event_receiver().unwrap();

        let input = dir.path().join("clip.mkv");
        let handles: Vec<_> = ContainerFormat::ALL
            .into_iter()
            .map(|format| worker.submit(ConversionRequest::new(&input, format).unwrap()))
            .collect();

        let mut seen: HashMap<JobId, Vec<ConversionEvent>> = HashMap::new();
        for _ in 0..handles.len() * 2 {
            let event = events.recv().await.unwrap();
            seen.entry(event.job_id().to_string()).or_default().push(event);
        }

        for handle in handles {
            let job_events = &seen[&handle.id];
            assert_eq!(job_events.len(), 2);
            assert!(matches!(job_events[0], ConversionEvent::Started { .. }));
            assert!(job_events[1].is_terminal());

            let result = handle.wait().await;
            assert!(result.is_success());
            assert!(
                matches!(&job_events[1], ConversionEvent::Finished { result: r, .. } if *r == result)
            );
        }
    }
}
