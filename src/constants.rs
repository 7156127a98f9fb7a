//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default scan cadence or Gemini endpoint, only edit this file.

/// Default automatic scan interval (seconds)
pub const DEFAULT_SCAN_INTERVAL: u64 = 30;

/// Default per-request deadline for a solve call (seconds)
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 15;

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model used for solving
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Settings-store key under which the Gemini API key is persisted
pub const API_KEY_SETTING: &str = "gemini_api_key";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "ExamMega";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get scan interval from environment or use default
pub fn get_scan_interval() -> u64 {
    std::env::var("EXAMMEGA_SCAN_INTERVAL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SCAN_INTERVAL)
}

/// Get request timeout from environment or use default
pub fn get_request_timeout() -> u64 {
    std::env::var("EXAMMEGA_REQUEST_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
}

/// Get Gemini API base URL from environment or use default
pub fn get_gemini_api_base() -> String {
    std::env::var("EXAMMEGA_GEMINI_API_BASE")
        .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string())
}

/// Get Gemini model name from environment or use default
pub fn get_gemini_model() -> String {
    std::env::var("EXAMMEGA_GEMINI_MODEL")
        .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string())
}
