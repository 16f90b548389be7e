//! Audio layer — capture device, capture session, and payload adaptation.
//!
//! ```text
//! Microphone → CpalDevice (audio-capture thread) → AudioChunk (mpsc)
//!           → CaptureSession::end() → WAV AudioPayload
//!
//! File picker → payload_from_file() ────────────▶ AudioPayload
//! ```

pub mod device;
pub mod payload;
pub mod session;

pub use device::{AudioChunk, CaptureDevice, CaptureError, CpalDevice, DeviceHandle};
pub use payload::{extension_for, media_type_for, payload_from_file, AudioPayload, PayloadError};
pub use session::CaptureSession;

// test-only re-export so the controller test module can import the mock
// device without spelling out the device module path.
#[cfg(test)]
pub use device::MockCaptureDevice;
