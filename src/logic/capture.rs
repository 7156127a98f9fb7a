//! Frame Capture Interface
//!
//! The camera is an external collaborator. The scheduler only needs a
//! synchronous "current frame as an encoded image" query; everything else
//! (device selection, permissions, preview) stays on the presentation side.

use serde::{Deserialize, Serialize};

/// Which camera the frame source should prefer. Informational hint only;
/// the core never changes behavior based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureFacing {
    /// Rear camera (the default for pointing at a question)
    #[default]
    Environment,
    /// Front camera
    User,
}

/// A single still frame, base64-encoded. Ephemeral: owned by the scan
/// attempt that captured it and dropped afterwards.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Base64 payload, optionally with a `data:<mime>;base64,` prefix
    pub data: String,
    /// MIME type of the encoded image
    pub mime_type: String,
}

impl Frame {
    /// JPEG frame from a base64 string (what webcam screenshots produce)
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// Source of still frames, queried once per scan attempt.
///
/// Returning `None` means the device is not ready yet (still initializing,
/// permission pending). The scheduler treats that as transient and retries
/// on the next cycle without surfacing an error.
pub trait FrameSource: Send + Sync {
    fn capture(&self, facing: CaptureFacing) -> Option<Frame>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_frame_carries_mime_type() {
        let frame = Frame::jpeg("aGVsbG8=");
        assert_eq!(frame.mime_type, "image/jpeg");
        assert_eq!(frame.data, "aGVsbG8=");
    }

    #[test]
    fn default_facing_is_environment() {
        assert_eq!(CaptureFacing::default(), CaptureFacing::Environment);
    }
}
