//! Scan Scheduler
//!
//! Owns the repeating countdown and the capture+solve cycle. All phase
//! transitions go through one mutex-guarded state struct, which is where the
//! single-flight and stale-discard guarantees are enforced.
//!
//! Phases: `Idle` (no API key) -> `Armed` (countdown running) -> `Scanning`
//! (solve in flight) -> back to `Armed`. The countdown does not tick while a
//! solve is in flight, so a slow request never double-counts against the
//! next interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::sleep;

use crate::constants;
use crate::logic::capture::{CaptureFacing, FrameSource};
use crate::logic::settings::SettingsStore;
use crate::logic::solver::{SolveResult, Solver, SolverFactory};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Seconds between automatic scans
    pub interval_secs: u64,
    /// Camera facing hint passed through to the frame source
    pub facing: CaptureFacing,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_secs: constants::get_scan_interval(),
            facing: CaptureFacing::default(),
        }
    }
}

/// Scheduler snapshot for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScanState {
    pub is_scanning: bool,
    /// True while no API key is configured ("setup required")
    pub needs_setup: bool,
    /// Seconds until the next automatic scan, in `[0, interval]`
    pub time_left: u64,
    /// Latest positive result; negatives and failures never clear it
    pub last_result: Option<SolveResult>,
    /// Message from the most recent failed attempt, cleared by any
    /// subsequent clean attempt
    pub last_error: Option<String>,
    pub scan_count: u64,
    pub last_scan_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Armed,
    Scanning,
}

struct SchedulerState {
    phase: Phase,
    time_left: u64,
    credential: Option<String>,
    solver: Option<Arc<dyn Solver>>,
    /// Bumped on every credential change; the stale-response guard compares
    /// a ticket's generation against this before publishing
    generation: u64,
    last_result: Option<SolveResult>,
    last_error: Option<String>,
    scan_count: u64,
    last_scan_at: Option<DateTime<Utc>>,
}

/// Handed out by `begin_scan`; pins the solver and generation one attempt
/// runs against.
struct ScanTicket {
    generation: u64,
    solver: Arc<dyn Solver>,
}

struct Inner {
    frames: Arc<dyn FrameSource>,
    settings: Arc<dyn SettingsStore>,
    factory: Arc<dyn SolverFactory>,
    config: ScanConfig,
    state: Mutex<SchedulerState>,
}

/// The capture-and-solve scheduler. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ScanScheduler {
    inner: Arc<Inner>,
}

impl ScanScheduler {
    /// Build a scheduler around the injected collaborators. Reads the API
    /// key from the settings store and arms immediately if one is present.
    pub fn new(
        frames: Arc<dyn FrameSource>,
        settings: Arc<dyn SettingsStore>,
        factory: Arc<dyn SolverFactory>,
        config: ScanConfig,
    ) -> Self {
        let credential = settings
            .get(constants::API_KEY_SETTING)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let solver = credential.as_deref().map(|k| factory.build(k));

        let phase = if solver.is_some() {
            log::info!("Scan scheduler armed (interval: {}s)", config.interval_secs);
            Phase::Armed
        } else {
            log::info!("No API key configured, scan scheduler idle");
            Phase::Idle
        };

        let state = SchedulerState {
            phase,
            time_left: config.interval_secs,
            credential,
            solver,
            generation: 0,
            last_result: None,
            last_error: None,
            scan_count: 0,
            last_scan_at: None,
        };

        Self {
            inner: Arc::new(Inner {
                frames,
                settings,
                factory,
                config,
                state: Mutex::new(state),
            }),
        }
    }

    /// Drive the countdown. Runs forever; spawn it on the runtime.
    pub async fn run(&self) {
        log::info!("Scan loop started");
        loop {
            sleep(Duration::from_secs(1)).await;
            if self.tick() {
                self.scan_once().await;
            }
        }
    }

    /// Advance the countdown by one second. Returns true when it expires.
    /// No-op outside `Armed`, which is what pauses the clock during a solve.
    pub(crate) fn tick(&self) -> bool {
        let mut state = self.inner.state.lock();
        if state.phase != Phase::Armed {
            return false;
        }
        if state.time_left > 0 {
            state.time_left -= 1;
        }
        state.time_left == 0
    }

    /// Manual trigger from the presentation layer. While `Armed` this
    /// short-circuits the countdown; while `Scanning` or `Idle` it is a
    /// no-op. Returns true if an attempt actually ran.
    pub async fn trigger_scan(&self) -> bool {
        self.scan_once().await
    }

    /// Replace (or clear) the API key: persist it, rebuild the solver
    /// client, and invalidate any in-flight attempt. Setting the value that
    /// is already active changes nothing.
    pub fn set_credential(&self, key: &str) {
        let key = key.trim();
        let mut state = self.inner.state.lock();

        let unchanged = match (&state.credential, key.is_empty()) {
            (None, true) => true,
            (Some(current), false) => current == key,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.inner.settings.set(constants::API_KEY_SETTING, key);
        state.generation += 1;

        if key.is_empty() {
            state.credential = None;
            state.solver = None;
            // An in-flight solve finishes on its own; its result is dropped
            // by the generation check and the phase lands on Idle
            if state.phase != Phase::Scanning {
                state.phase = Phase::Idle;
            }
            log::info!("API key cleared, scan scheduler idle");
        } else {
            state.credential = Some(key.to_string());
            state.solver = Some(self.inner.factory.build(key));
            if state.phase == Phase::Idle {
                state.phase = Phase::Armed;
            }
            log::info!("API key updated, solver client rebuilt");
        }

        state.time_left = self.inner.config.interval_secs;
    }

    /// Current snapshot for the presentation layer.
    pub fn state(&self) -> ScanState {
        let state = self.inner.state.lock();
        ScanState {
            is_scanning: state.phase == Phase::Scanning,
            needs_setup: state.solver.is_none(),
            time_left: state.time_left,
            last_result: state.last_result.clone(),
            last_error: state.last_error.clone(),
            scan_count: state.scan_count,
            last_scan_at: state.last_scan_at,
        }
    }

    /// One capture+solve+reset cycle. Returns false if the attempt was
    /// dropped at the gate (already scanning, or no credential).
    async fn scan_once(&self) -> bool {
        let Some(ticket) = self.begin_scan() else {
            return false;
        };

        let outcome = match self.inner.frames.capture(self.inner.config.facing) {
            Some(frame) => Some(ticket.solver.solve(&frame).await),
            None => {
                // Camera not ready yet; expected during startup, retry next cycle
                log::debug!("Frame source returned no data, attempt skipped");
                None
            }
        };

        self.finish_scan(ticket, outcome);
        true
    }

    /// Single-flight gate: atomically moves `Armed` -> `Scanning` and pins
    /// the solver for this attempt. Any trigger that does not win the
    /// transition is dropped, not queued.
    fn begin_scan(&self) -> Option<ScanTicket> {
        let mut state = self.inner.state.lock();
        match state.phase {
            Phase::Armed => {
                let solver = state.solver.clone()?;
                state.phase = Phase::Scanning;
                Some(ScanTicket {
                    generation: state.generation,
                    solver,
                })
            }
            Phase::Idle => None,
            Phase::Scanning => {
                log::debug!("Scan already in flight, trigger dropped");
                None
            }
        }
    }

    /// Re-arm and publish. The countdown resets to the full interval no
    /// matter how the attempt ended; only the published fields differ.
    fn finish_scan(&self, ticket: ScanTicket, outcome: Option<SolveResult>) {
        let mut state = self.inner.state.lock();

        state.phase = if state.solver.is_some() {
            Phase::Armed
        } else {
            Phase::Idle
        };
        state.time_left = self.inner.config.interval_secs;

        // None means the frame capture came up empty: silent, nothing to publish
        let Some(result) = outcome else {
            return;
        };

        if ticket.generation != state.generation {
            log::debug!("Discarding stale solve result (credential rotated mid-flight)");
            return;
        }

        state.scan_count += 1;
        state.last_scan_at = Some(Utc::now());

        if result.found {
            let answer = result.answer.map(|a| a.as_str()).unwrap_or("?");
            log::info!("Question solved: {}", answer);
            state.last_error = None;
            state.last_result = Some(result);
        } else if let Some(err) = result.error {
            log::warn!("Scan attempt failed: {}", err);
            state.last_error = Some(err);
        } else {
            log::debug!("No question detected, keeping previous result");
            state.last_error = None;
        }
    }
}
