//! Conversion job queue: bounded channel, semaphore-capped worker pool.
//!
//! One job covers one posted event. Submission never blocks the event
//! call site; a full queue is surfaced to the caller instead of silently
//! dropping work. Shutdown: [`ConversionQueue::shutdown`] signals the
//! pool to stop claiming jobs; the pool then waits for in-flight jobs to
//! finish before exiting.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use crate::pipeline::ConversionPipeline;
use viewbridge_core::{AppError, PostedAttachments};

pub struct ConversionQueue {
    tx: mpsc::Sender<PostedAttachments>,
    shutdown_tx: mpsc::Sender<()>,
}

impl ConversionQueue {
    /// Create a queue and spawn its worker pool.
    ///
    /// `queue_size` bounds how many events may wait; `max_concurrent`
    /// caps how many are processed at once.
    pub fn new(pipeline: ConversionPipeline, queue_size: usize, max_concurrent: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let pipeline = Arc::new(pipeline);
        let max_concurrent = max_concurrent.max(1);
        tokio::spawn(async move {
            Self::worker_pool(rx, shutdown_rx, pipeline, max_concurrent).await;
        });

        tracing::info!(
            queue_size = queue_size,
            max_concurrent = max_concurrent,
            "Conversion queue started"
        );

        Self { tx, shutdown_tx }
    }

    /// Creates a queue without a worker; submitted jobs sit in the
    /// channel until the queue is dropped. Useful for asserting
    /// submission behavior without running conversions.
    pub fn new_no_worker(queue_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        let (shutdown_tx, _shutdown_rx) = mpsc::channel(1);
        std::mem::forget(rx);
        Self { tx, shutdown_tx }
    }

    /// Enqueue a posted event for conversion. Non-blocking: a full queue
    /// is an error for the caller to report, not a wait.
    #[tracing::instrument(skip(self, event), fields(post_id = %event.post_id, attachments = event.attachments.len()))]
    pub fn submit(&self, event: PostedAttachments) -> Result<(), AppError> {
        tracing::info!("Enqueuing conversion job");
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                tracing::warn!("Conversion queue is full, rejecting job");
                AppError::QueueFull("conversion queue is full, try again later".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => {
                AppError::Internal("conversion queue is shut down".to_string())
            }
        })
    }

    async fn worker_pool(
        mut rx: mpsc::Receiver<PostedAttachments>,
        mut shutdown_rx: mpsc::Receiver<()>,
        pipeline: Arc<ConversionPipeline>,
        max_concurrent: usize,
    ) {
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Conversion queue shutting down");
                    break;
                }
                maybe_job = rx.recv() => {
                    let Some(job) = maybe_job else { break };
                    let permit = semaphore.clone().acquire_owned().await;
                    let pipeline = pipeline.clone();
                    tokio::spawn(async move {
                        let _permit = permit;
                        pipeline.process_event(&job).await;
                    });
                }
            }
        }

        // Wait for in-flight jobs before exiting.
        let _ = semaphore.acquire_many(max_concurrent as u32).await;
        tracing::info!("Conversion queue drained and stopped");
    }

    /// Signal the worker pool to stop claiming jobs. Returns immediately;
    /// in-flight jobs finish on their own before the pool exits.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

impl Clone for ConversionQueue {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use viewbridge_core::{AttachmentRef, ConversionRoots, ConversionSettings};

    fn event(post_id: &str, file_name: &str, storage_path: &str) -> PostedAttachments {
        PostedAttachments {
            post_id: post_id.to_string(),
            attachments: vec![AttachmentRef {
                file_id: "f1".to_string(),
                file_name: file_name.to_string(),
                storage_path: storage_path.to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn full_queue_rejects_submission() {
        let queue = ConversionQueue::new_no_worker(1);
        queue.submit(event("p1", "a.docx", "a.docx")).unwrap();
        let err = queue.submit(event("p2", "b.docx", "b.docx")).unwrap_err();
        assert!(matches!(err, AppError::QueueFull(_)));
    }

    #[tokio::test]
    async fn submitted_event_is_processed() {
        let dir = TempDir::new().unwrap();
        let data_root = dir.path().join("data");
        let output_root = dir.path().join("out");
        let viewer_root = dir.path().join("viewer");
        for root in [&data_root, &output_root, &viewer_root] {
            tokio::fs::create_dir_all(root).await.unwrap();
        }

        let script = dir.path().join("convert.sh");
        tokio::fs::write(
            &script,
            format!(
                concat!(
                    "out=\"{}/$3\"\n",
                    "mkdir -p \"$out\"\n",
                    "base=$(basename \"$1\")\n",
                    "cp \"$1\" \"$out/${{base%.*}}.esob\"\n",
                ),
                output_root.display()
            ),
        )
        .await
        .unwrap();

        let source = data_root.join("report.docx");
        tokio::fs::write(&source, b"bytes").await.unwrap();

        let settings = ConversionSettings {
            roots: ConversionRoots {
                data_root,
                output_root,
                viewer_public_root: viewer_root.clone(),
            },
            converter_runtime: "sh".to_string(),
            converter_script: script,
            converter_timeout_secs: 10,
        };
        let queue = ConversionQueue::new(ConversionPipeline::new(settings), 8, 2);
        queue.submit(event("p1", "report.docx", "report.docx")).unwrap();

        let final_path = viewer_root
            .join("public")
            .join("OUT")
            .join("p1")
            .join("report.esob");
        for _ in 0..100 {
            if tokio::fs::try_exists(&final_path).await.unwrap() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        panic!("converted artifact never appeared at {}", final_path.display());
    }
}
