//! Sequential multi-file upload pipeline.
//!
//! ```text
//!  stage() ──▶ StagedBatch ──▶ submit() ──▶ file 1 ──▶ file 2 ──▶ ... ──▶ finalize ──▶ summary
//!                 ▲                           │           │
//!  unstage() ─────┘                           └─ Progress events (monotonic, 0..95, then 100)
//! ```
//!
//! The pipeline is an explicit object owned by one page. It uses interior
//! mutability so event handlers can share it behind an `Rc`; no borrow is
//! ever held across an `.await`.

use std::cell::{Cell, RefCell};
use std::pin::pin;

use chrono::{DateTime, Utc};
use futures::future::{select, Either};

use crate::api::{interpret_upload, Backend, Ticker};
use crate::config::PipelineConfig;
use crate::error::UploadFailed;
use crate::progress::{ProgressTracker, TransferProgress};
use crate::staging::{FileKey, FileMeta, StageReport, StagedBatch, StagedFile};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of one attempted file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub index: usize,
    pub file: FileMeta,
    /// Server message on success.
    pub result: Result<Option<String>, UploadFailed>,
}

impl UploadOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate classification of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    AllSucceeded,
    Partial,
    AllFailed,
}

/// Summary emitted once a batch has been fully attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub outcomes: Vec<UploadOutcome>,
}

impl BatchSummary {
    fn from_outcomes(outcomes: Vec<UploadOutcome>) -> Self {
        Self {
            total: outcomes.len(),
            succeeded: outcomes.iter().filter(|o| o.succeeded()).count(),
            outcomes,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn kind(&self) -> BatchKind {
        if self.succeeded == self.total {
            BatchKind::AllSucceeded
        } else if self.succeeded > 0 {
            BatchKind::Partial
        } else {
            BatchKind::AllFailed
        }
    }

    pub fn status_line(&self) -> String {
        match self.kind() {
            BatchKind::AllSucceeded => format!("All {} files uploaded successfully!", self.total),
            BatchKind::Partial => format!(
                "{} of {} files uploaded. Some had issues.",
                self.succeeded, self.total
            ),
            BatchKind::AllFailed => "All file uploads failed.".to_string(),
        }
    }
}

/// A file the server accepted during this session.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub uploaded_at: DateTime<Utc>,
}

// =============================================================================
// Events
// =============================================================================

/// Notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    BatchStarted { total: usize },
    FileStarted { index: usize, total: usize, name: String },
    /// Cumulative batch progress in percent; never decreases within a run.
    Progress { percent: f64 },
    FileSucceeded { index: usize, name: String, message: Option<String> },
    FileFailed { index: usize, failure: UploadFailed },
    Finalizing,
    BatchFinished(BatchSummary),
}

/// Receiver of [`UploadEvent`]s.
pub trait UploadObserver {
    fn on_event(&self, event: &UploadEvent);
}

impl<F> UploadObserver for F
where
    F: Fn(&UploadEvent),
{
    fn on_event(&self, event: &UploadEvent) {
        self(event)
    }
}

/// Clears the in-flight flag even if the submit future is dropped.
struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Owns the staged batch, the in-flight flag and the upload history.
pub struct UploadPipeline<H> {
    config: PipelineConfig,
    batch: RefCell<StagedBatch<H>>,
    in_flight: Cell<bool>,
    history: RefCell<Vec<UploadRecord>>,
}

impl<H> Default for UploadPipeline<H> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<H> UploadPipeline<H> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            batch: RefCell::new(StagedBatch::new()),
            in_flight: Cell::new(false),
            history: RefCell::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validates candidates and appends the acceptable ones.
    pub fn stage<I>(&self, candidates: I) -> StageReport
    where
        I: IntoIterator<Item = StagedFile<H>>,
    {
        let report = self.batch.borrow_mut().stage(candidates, &self.config);
        if !report.rejected.is_empty() {
            log::warn!(
                "{} file(s) not staged, {} in batch",
                report.rejected.len(),
                report.staged_count
            );
        }
        report
    }

    /// Removes one pending file; out-of-range indices are ignored.
    pub fn unstage(&self, index: usize) -> Option<FileMeta> {
        self.batch.borrow_mut().unstage(index).map(|f| f.meta)
    }

    /// Metadata of the staged files, in upload order.
    pub fn staged(&self) -> Vec<FileMeta> {
        self.batch.borrow().files().iter().map(|f| f.meta.clone()).collect()
    }

    pub fn staged_count(&self) -> usize {
        self.batch.borrow().len()
    }

    pub fn staged_size(&self) -> u64 {
        self.batch.borrow().total_size()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.get()
    }

    /// Successfully uploaded files, most recent first.
    pub fn history(&self) -> Vec<UploadRecord> {
        let mut records = self.history.borrow().clone();
        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        records
    }

    fn record_success(&self, meta: &FileMeta) {
        self.history.borrow_mut().push(UploadRecord {
            name: meta.name.clone(),
            size: meta.size,
            mime: meta.mime.clone(),
            uploaded_at: Utc::now(),
        });
    }
}

impl<H: Clone> UploadPipeline<H> {
    /// Uploads every staged file, one after the other.
    ///
    /// Returns `None` without side effects when the batch is empty or a
    /// submission is already running. A failing file never stops the loop.
    pub async fn submit<B, T, O>(
        &self,
        backend: &B,
        ticker: &T,
        observer: &O,
    ) -> Option<BatchSummary>
    where
        B: Backend<File = H>,
        T: Ticker,
        O: UploadObserver + ?Sized,
    {
        if self.in_flight.get() {
            log::debug!("submit ignored: batch already in flight");
            return None;
        }
        let files = {
            let batch = self.batch.borrow();
            if batch.is_empty() {
                return None;
            }
            batch.snapshot()
        };

        self.in_flight.set(true);
        let guard = InFlightGuard(&self.in_flight);

        let total = files.len();
        log::info!("uploading batch of {} file(s)", total);
        observer.on_event(&UploadEvent::BatchStarted { total });

        let tracker = RefCell::new(ProgressTracker::new(total, &self.config));
        let publish = |moved: bool| {
            if moved {
                let percent = tracker.borrow().percent();
                observer.on_event(&UploadEvent::Progress { percent });
            }
        };

        let mut outcomes = Vec::with_capacity(total);

        for (index, file) in files.iter().enumerate() {
            observer.on_event(&UploadEvent::FileStarted {
                index,
                total,
                name: file.meta.name.clone(),
            });
            let moved = tracker.borrow_mut().begin_file(index);
            publish(moved);

            let on_progress = |transfer: TransferProgress| {
                let moved = tracker.borrow_mut().record_transfer(transfer);
                publish(moved);
            };
            let transfer = pin!(backend.upload(file, &on_progress));
            let animation = pin!(async {
                loop {
                    ticker.tick().await;
                    let moved = tracker.borrow_mut().interpolate();
                    publish(moved);
                }
            });

            let reply = match select(transfer, animation).await {
                Either::Left((reply, _)) => reply,
                Either::Right(((), transfer)) => transfer.await,
            };

            let result = interpret_upload(reply, &file.meta.name).map_err(|reason| UploadFailed {
                file_name: file.meta.name.clone(),
                reason,
            });

            let moved = tracker.borrow_mut().complete_file();
            publish(moved);

            match &result {
                Ok(message) => {
                    log::info!("uploaded {} ({}/{})", file.meta.name, index + 1, total);
                    self.record_success(&file.meta);
                    observer.on_event(&UploadEvent::FileSucceeded {
                        index,
                        name: file.meta.name.clone(),
                        message: message.clone(),
                    });
                }
                Err(failure) => {
                    log::warn!("{}", failure);
                    observer.on_event(&UploadEvent::FileFailed {
                        index,
                        failure: failure.clone(),
                    });
                }
            }

            outcomes.push(UploadOutcome {
                index,
                file: file.meta.clone(),
                result,
            });
        }

        observer.on_event(&UploadEvent::Finalizing);
        let steps = self.config.finalize_steps.max(1);
        for step in 1..=steps {
            ticker.tick().await;
            let moved = tracker.borrow_mut().finalize_step(step, steps);
            publish(moved);
        }

        let submitted: Vec<FileKey> = files.iter().map(|f| f.meta.key()).collect();
        self.batch.borrow_mut().remove_keys(&submitted);

        let summary = BatchSummary::from_outcomes(outcomes);
        log::info!(
            "batch finished: {}/{} uploaded",
            summary.succeeded,
            summary.total
        );

        drop(guard);
        observer.on_event(&UploadEvent::BatchFinished(summary.clone()));
        Some(summary)
    }
}
