use tokio::sync::oneshot::{self, error::TryRecvError};

use contest_dashboard::config::Config;
use contest_dashboard::fetcher::{fetch_records, FetchStats};
use contest_dashboard::report::Report;
use contest_dashboard::types::{Record, WindowMode};

type FetchResult = (Vec<Record>, FetchStats);

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// A fetch is in flight. Previous records, if any, stay on screen.
    Loading,
    /// Fetch completed but produced no records (failure or empty feed).
    Empty,
    Ready,
}

/// Everything the dashboard owns between renders. The aggregator is fed from
/// here on every frame and keeps nothing itself.
#[derive(Debug)]
pub struct AppState {
    pub status: FeedStatus,
    pub records: Vec<Record>,
    pub stats: FetchStats,
    pub mode: WindowMode,
    pub recent_limit: usize,
    pub last_refresh: Option<std::time::Instant>,
    pending: Option<oneshot::Receiver<FetchResult>>,
    cfg: Config,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        Self {
            status: FeedStatus::Loading,
            records: Vec::new(),
            stats: FetchStats::default(),
            mode: cfg.window_mode,
            recent_limit: cfg.recent_limit,
            last_refresh: None,
            pending: None,
            cfg,
        }
    }

    /// Spawn a fetch in the background. The event loop keeps drawing and
    /// handling keys; `poll_refresh` picks up the result.
    /// A second call while one is in flight is ignored.
    pub fn start_refresh(&mut self, client: &reqwest::Client) {
        if self.pending.is_some() {
            return;
        }
        let (tx, rx) = oneshot::channel();
        let client = client.clone();
        let cfg = self.cfg.clone();
        tokio::spawn(async move {
            let result = fetch_records(&client, &cfg).await;
            // Receiver is gone when the dashboard quit mid-fetch.
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
        self.status = FeedStatus::Loading;
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a finished fetch, if any. Returns true when state changed.
    pub fn poll_refresh(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };
        match rx.try_recv() {
            Ok((records, stats)) => {
                self.pending = None;
                self.set_records(records, stats);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                // Fetch task died without answering; same degraded state as a failed GET.
                self.pending = None;
                self.set_records(Vec::new(), FetchStats::default());
                true
            }
        }
    }

    pub fn set_records(&mut self, records: Vec<Record>, stats: FetchStats) {
        self.status = if records.is_empty() {
            FeedStatus::Empty
        } else {
            FeedStatus::Ready
        };
        self.records = records;
        self.stats = stats;
        self.last_refresh = Some(std::time::Instant::now());
    }

    pub fn set_mode(&mut self, mode: WindowMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    pub fn report(&self, now: i64) -> Report {
        Report::build(&self.records, now, self.mode, self.recent_limit)
    }
}
