//! Logic Module - Scan & Solve Engines
//!
//! - `capture` - frame source seam (the camera is external)
//! - `settings` - credential persistence seam
//! - `solver` - Gemini inference client
//! - `scheduler` - countdown state machine driving capture+solve

pub mod capture;
pub mod scheduler;
pub mod settings;
pub mod solver;
