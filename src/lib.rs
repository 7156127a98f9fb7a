//! ExamMega Core - Capture & Solve Engine
//!
//! Library core for the ExamMega camera assistant: a repeating countdown
//! captures a frame from an injected [`FrameSource`], sends it to the Gemini
//! multimodal API, and publishes the latest answer as [`ScanState`].
//!
//! The camera, the settings backend, and the UI are external collaborators.
//! Embedders implement [`FrameSource`] and [`SettingsStore`], construct a
//! [`ScanScheduler`], drive its `run()` loop on a tokio runtime, and read
//! `state()` whenever they repaint.

pub mod constants;
pub mod logic;

pub use logic::capture::{CaptureFacing, Frame, FrameSource};
pub use logic::scheduler::{ScanConfig, ScanScheduler, ScanState};
pub use logic::settings::{MemorySettings, SettingsStore};
pub use logic::solver::{
    AnswerChoice, GeminiSolver, GeminiSolverFactory, SolveResult, Solver, SolverConfig,
    SolverFactory,
};
