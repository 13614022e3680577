//! Interactive preview session
//!
//! A [`PreviewSession`] owns a decoded source raster and a worker thread.
//! Parameter sets are submitted from the interactive side; the worker
//! debounces bursts, runs only the newest set, abandons runs that get
//! superseded, and reports finished rasters on a channel.
//!
//! ```no_run
//! use cutmatte::{PipelineParams, PreviewSession, Raster};
//! use std::time::Duration;
//!
//! let source = Raster::new_filled(64, 64, [255, 255, 255, 255]).unwrap();
//! let session = PreviewSession::new(source).unwrap();
//! session.submit(PipelineParams::default());
//! let preview = session.wait_latest(Duration::from_secs(5));
//! assert!(preview.is_some());
//! ```

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{CancelToken, StageCache, run_pipeline_cancellable};
use cutmatte_core::{PipelineParams, Raster};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Quiet period a burst of submissions must settle for before a run starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Preview session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Debounce window for parameter bursts
    pub debounce: Duration,
    /// Keep intermediate stage results between runs
    pub cache: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            cache: true,
        }
    }
}

/// A finished preview
#[derive(Debug, Clone)]
pub struct PreviewResult {
    /// Generation of the parameter set that produced it
    pub generation: u64,
    /// Pipeline output
    pub raster: Raster,
    /// Time spent in the pipeline
    pub elapsed: Duration,
}

struct Request {
    generation: u64,
    params: PipelineParams,
}

/// Background pipeline runner for interactive parameter tuning.
///
/// Dropping the session stops the worker and waits for it to exit.
pub struct PreviewSession {
    latest: Arc<AtomicU64>,
    requests: Option<Sender<Request>>,
    results: Receiver<PreviewResult>,
    worker: Option<JoinHandle<()>>,
}

impl PreviewSession {
    /// Start a session with the default configuration.
    pub fn new(source: Raster) -> PipelineResult<Self> {
        Self::with_config(source, SessionConfig::default())
    }

    /// Start a session.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Worker`] if the worker thread cannot be
    /// spawned.
    pub fn with_config(source: Raster, config: SessionConfig) -> PipelineResult<Self> {
        let latest = Arc::new(AtomicU64::new(0));
        let (request_tx, request_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();

        tracing::info!(
            width = source.width(),
            height = source.height(),
            debounce_ms = config.debounce.as_millis() as u64,
            cache = config.cache,
            "preview session started"
        );

        let worker_latest = Arc::clone(&latest);
        let worker = thread::Builder::new()
            .name("cutmatte-preview".to_string())
            .spawn(move || worker_loop(source, config, worker_latest, request_rx, result_tx))
            .map_err(PipelineError::Worker)?;

        Ok(Self {
            latest,
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
        })
    }

    /// Submit a parameter set, superseding every earlier one.
    ///
    /// Returns the generation number assigned to it.
    pub fn submit(&self, params: PipelineParams) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(requests) = &self.requests {
            if requests.send(Request { generation, params }).is_err() {
                tracing::warn!(generation, "preview worker is gone, request dropped");
            }
        }
        generation
    }

    /// Generation of the most recent submission (0 before the first).
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Channel of finished previews, oldest first.
    pub fn results(&self) -> &Receiver<PreviewResult> {
        &self.results
    }

    /// Wait for the result of the latest submission.
    ///
    /// Results of older generations are discarded. Returns `None` on
    /// timeout or if the worker has stopped.
    pub fn wait_latest(&self, timeout: Duration) -> Option<PreviewResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let result = self.results.recv_timeout(remaining).ok()?;
            if result.generation == self.latest_generation() {
                return Some(result);
            }
        }
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("preview worker panicked");
            }
        }
        tracing::info!("preview session stopped");
    }
}

fn worker_loop(
    source: Raster,
    config: SessionConfig,
    latest: Arc<AtomicU64>,
    requests: Receiver<Request>,
    results: Sender<PreviewResult>,
) {
    let mut cache = config.cache.then(StageCache::new);

    while let Ok(mut request) = requests.recv() {
        loop {
            match requests.recv_timeout(config.debounce) {
                Ok(newer) => request = newer,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
        if request.generation != latest.load(Ordering::Acquire) {
            continue;
        }

        let token = CancelToken::for_generation(Arc::clone(&latest), request.generation);
        let start = Instant::now();
        match run_pipeline_cancellable(&source, &request.params, &token, cache.as_mut()) {
            Ok(raster) => {
                let elapsed = start.elapsed();
                tracing::debug!(
                    generation = request.generation,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "preview ready"
                );
                let result = PreviewResult {
                    generation: request.generation,
                    raster,
                    elapsed,
                };
                if results.send(result).is_err() {
                    return;
                }
            }
            Err(cancelled) => {
                tracing::debug!(generation = request.generation, %cancelled, "preview superseded");
            }
        }
    }
}
