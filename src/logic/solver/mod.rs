//! Solver Module - Gemini Inference Client
//!
//! Wraps the external multimodal reasoning service. The scheduler talks to
//! the [`Solver`] trait; [`GeminiSolver`] is the production implementation.

pub mod gemini;
pub mod types;

pub use gemini::{GeminiSolver, GeminiSolverFactory, Solver, SolverConfig, SolverFactory};
pub use types::{AnswerChoice, SolveResult, SolverError};
