//! Scheduler Module - Countdown & Scan Cycle
//!
//! The state machine driving periodic and manual scans. See
//! [`scan_loop::ScanScheduler`] for the phase/transition rules.

pub mod scan_loop;


pub use scan_loop::{ScanConfig, ScanScheduler, ScanState};
