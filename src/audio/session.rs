//! [`CaptureSession`] — one microphone capture session, begin to payload.
//!
//! `begin()` opens the device and starts accumulating chunks in arrival
//! order; `end()` closes the device and encodes everything captured into a
//! single WAV [`AudioPayload`].  Release of the device is unconditional:
//! `end()` closes the handle before any fallible work, and the RAII guard on
//! the active capture closes it again on abandonment or forced teardown
//! (closing is idempotent, so the double close is a single logical release).

use std::io::Cursor;
use std::sync::{mpsc, Arc};

use super::device::{AudioChunk, CaptureDevice, CaptureError, DeviceHandle};
use super::payload::AudioPayload;

// ---------------------------------------------------------------------------
// CaptureSession
// ---------------------------------------------------------------------------

/// Manages one capture-device session and yields an [`AudioPayload`] on stop.
///
/// The session is exclusively owned by the interaction controller; the
/// single-interaction invariant there means at most one capture is ever
/// active.
pub struct CaptureSession {
    device: Arc<dyn CaptureDevice>,
    active: Option<ActiveCapture>,
}

/// RAII guard for an in-progress capture.  Dropping it closes the device
/// handle, so the device is released even when no clean `end()` happens.
struct ActiveCapture {
    handle: Box<dyn DeviceHandle>,
    chunks: mpsc::Receiver<AudioChunk>,
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        self.handle.close();
    }
}

impl CaptureSession {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            active: None,
        }
    }

    /// Request device access and start accumulating audio chunks.
    ///
    /// # Errors
    ///
    /// [`CaptureError::DeviceUnavailable`] when access is denied or no device
    /// exists, [`CaptureError::AlreadyActive`] when a capture is already in
    /// progress.
    pub fn begin(&mut self) -> Result<(), CaptureError> {
        if self.active.is_some() {
            return Err(CaptureError::AlreadyActive);
        }

        let (tx, rx) = mpsc::channel();
        let handle = self.device.open(tx)?;
        self.active = Some(ActiveCapture { handle, chunks: rx });

        log::debug!("capture session active");
        Ok(())
    }

    /// Stop the device, release it, and encode the accumulated chunks into a
    /// single WAV payload.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NotRecording`] when no capture is active (the session
    /// is left unchanged), or [`CaptureError::Encode`] when WAV encoding
    /// fails (the device has already been released by then).
    pub fn end(&mut self) -> Result<AudioPayload, CaptureError> {
        let mut active = self.active.take().ok_or(CaptureError::NotRecording)?;

        // Release the device first so nothing below can leak it.
        active.handle.close();

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_rate = 16_000;
        let mut channels = 1;
        let mut first = true;

        while let Ok(chunk) = active.chunks.try_recv() {
            if first {
                sample_rate = chunk.sample_rate;
                channels = chunk.channels;
                first = false;
            }
            samples.extend_from_slice(&chunk.samples);
        }

        log::debug!(
            "capture session ended: {} samples @ {sample_rate} Hz, {channels} ch",
            samples.len()
        );

        encode_wav(&samples, sample_rate, channels)
    }

    /// `true` while a capture is in progress.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Abandon an in-progress capture, discarding accumulated audio.
    ///
    /// A no-op when nothing is active.  Used on forced teardown so release of
    /// the device never depends on a clean state transition.
    pub fn abort(&mut self) {
        if self.active.take().is_some() {
            log::debug!("capture session aborted");
        }
    }
}

// ---------------------------------------------------------------------------
// WAV encoding
// ---------------------------------------------------------------------------

/// Encode interleaved f32 samples into an in-memory WAV blob.
fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Result<AudioPayload, CaptureError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(AudioPayload::new(cursor.into_inner(), "audio/wav"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::device::MockCaptureDevice;

    fn chunk(samples: usize) -> AudioChunk {
        AudioChunk {
            samples: vec![0.1_f32; samples],
            sample_rate: 48_000,
            channels: 2,
        }
    }

    #[test]
    fn begin_end_produces_wav_payload() {
        let device = Arc::new(MockCaptureDevice::with_chunks(vec![chunk(256), chunk(128)]));
        let mut session = CaptureSession::new(Arc::clone(&device) as Arc<dyn CaptureDevice>);

        session.begin().unwrap();
        assert!(session.is_active());

        let payload = session.end().unwrap();
        assert!(!session.is_active());
        assert_eq!(payload.media_type(), "audio/wav");

        // 384 f32 samples plus the RIFF/fmt headers.
        let bytes = payload.into_bytes();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert!(bytes.len() > 384 * 4);
    }

    #[test]
    fn end_without_begin_reports_not_recording() {
        let device = Arc::new(MockCaptureDevice::with_chunks(vec![]));
        let mut session = CaptureSession::new(device);

        assert!(matches!(session.end(), Err(CaptureError::NotRecording)));
    }

    #[test]
    fn begin_while_active_is_rejected() {
        let device = Arc::new(MockCaptureDevice::with_chunks(vec![]));
        let mut session = CaptureSession::new(Arc::clone(&device) as Arc<dyn CaptureDevice>);

        session.begin().unwrap();
        assert!(matches!(session.begin(), Err(CaptureError::AlreadyActive)));
        // The original capture is untouched.
        assert!(session.is_active());
    }

    #[test]
    fn begin_surfaces_device_unavailable() {
        let device = Arc::new(MockCaptureDevice::unavailable());
        let mut session = CaptureSession::new(device);

        assert!(matches!(
            session.begin(),
            Err(CaptureError::DeviceUnavailable(_))
        ));
        assert!(!session.is_active());
    }

    /// `end()` closes the handle explicitly and the RAII guard closes it
    /// again on drop — exactly one logical release must be observed.
    #[test]
    fn end_releases_device_exactly_once() {
        let device = Arc::new(MockCaptureDevice::with_chunks(vec![chunk(16)]));
        let mut session = CaptureSession::new(Arc::clone(&device) as Arc<dyn CaptureDevice>);

        session.begin().unwrap();
        session.end().unwrap();
        assert_eq!(device.close_count(), 1);
    }

    /// Dropping an active session (abandoned interaction) must still release
    /// the device.
    #[test]
    fn dropping_active_session_releases_device() {
        let device = Arc::new(MockCaptureDevice::with_chunks(vec![]));
        {
            let mut session = CaptureSession::new(Arc::clone(&device) as Arc<dyn CaptureDevice>);
            session.begin().unwrap();
            // No end() — simulate navigating away.
        }
        assert_eq!(device.close_count(), 1);
    }

    #[test]
    fn abort_discards_audio_and_releases_device() {
        let device = Arc::new(MockCaptureDevice::with_chunks(vec![chunk(64)]));
        let mut session = CaptureSession::new(Arc::clone(&device) as Arc<dyn CaptureDevice>);

        session.begin().unwrap();
        session.abort();
        assert!(!session.is_active());
        assert_eq!(device.close_count(), 1);

        // Abort when idle is a no-op.
        session.abort();
        assert_eq!(device.close_count(), 1);
    }

    #[test]
    fn empty_capture_still_encodes_a_valid_wav() {
        let device = Arc::new(MockCaptureDevice::with_chunks(vec![]));
        let mut session = CaptureSession::new(device);

        session.begin().unwrap();
        let payload = session.end().unwrap();

        let bytes = payload.into_bytes();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert!(bytes.len() < 128); // headers only, no sample data
    }
}
