use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use distboard_compute::{Assembler, GenerationResult, Histogram};
use distboard_core::Config;

/// One dashboard plot: the generation result plus what the page renders.
#[derive(Debug, Clone, Serialize)]
pub struct PlotRecord {
    pub id: Uuid,
    /// Arrival order of the request that produced this plot.
    pub sequence: u64,
    pub generated_at: DateTime<Utc>,
    pub distribution: String,
    /// Sample mean of the flattened variates, rounded for display.
    pub actual_mean: f64,
    /// Variates flattened in row-major order; matrix draws included.
    pub values: Vec<f64>,
    pub histogram: Histogram,
    pub graph_height: u32,
    pub result: GenerationResult,
}

pub struct AppState {
    pub config: Config,
    pub assembler: Arc<Assembler>,
    /// Plot from the most recently arrived request that has completed.
    pub latest: RwLock<Option<PlotRecord>>,
    plot_sequence: AtomicU64,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let assembler = Arc::new(Assembler::from_config(&config));
        Self {
            config,
            assembler,
            latest: RwLock::new(None),
            plot_sequence: AtomicU64::new(0),
        }
    }

    /// Stamp an incoming plot request. Later arrivals get larger numbers.
    pub fn next_plot_sequence(&self) -> u64 {
        self.plot_sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Store `record` as the latest plot unless a later request already
    /// published one. Returns whether it was stored.
    pub async fn publish(&self, record: PlotRecord) -> bool {
        let mut latest = self.latest.write().await;
        if latest.as_ref().is_some_and(|current| current.sequence > record.sequence) {
            return false;
        }
        *latest = Some(record);
        true
    }
}
