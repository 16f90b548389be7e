//! Capture device interface and the `cpal`-backed production implementation.
//!
//! The device is a *consumed* resource: [`CaptureDevice::open`] yields a
//! [`DeviceHandle`] plus a stream of [`AudioChunk`]s over an mpsc channel,
//! and [`DeviceHandle::close`] is idempotent and always safe to call.  The
//! capture session ([`crate::audio::CaptureSession`]) owns the handle and
//! guarantees it is closed on every exit path.

use std::sync::mpsc;

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// A single buffer of raw audio as delivered by the device callback.
///
/// Samples are interleaved `f32` in the range `[-1.0, 1.0]`.  Chunks from one
/// open handle all share the same sample rate and channel count.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate of this chunk in Hz (e.g. 44100, 48000).
    pub sample_rate: u32,
    /// Number of interleaved channels (1 = mono, 2 = stereo, …).
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors from the capture subsystem.
///
/// All variants are local precondition failures: they are reported
/// synchronously at the call site and never cross into the state machine.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Device access was denied or no capture device exists.
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// `end()` was called while no capture was active.
    #[error("no recording in progress")]
    NotRecording,

    /// `begin()` was called while a capture was already active.
    #[error("a capture session is already active")]
    AlreadyActive,

    /// Accumulated samples could not be encoded into a WAV payload.
    #[error("failed to encode WAV payload: {0}")]
    Encode(#[from] hound::Error),
}

// ---------------------------------------------------------------------------
// CaptureDevice / DeviceHandle traits
// ---------------------------------------------------------------------------

/// Object-safe interface to an audio capture device.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn CaptureDevice>` by the capture session.
pub trait CaptureDevice: Send + Sync {
    /// Open the device and start streaming [`AudioChunk`]s to `tx`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::DeviceUnavailable`] when access is denied or
    /// no capture device exists.
    fn open(&self, tx: mpsc::Sender<AudioChunk>) -> Result<Box<dyn DeviceHandle>, CaptureError>;
}

/// Live handle to an open capture device.
///
/// `close()` stops the device and releases it.  It is idempotent: a second
/// call (including the one from `Drop`) performs no further release beyond
/// the single logical close.
pub trait DeviceHandle: Send {
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// CpalDevice
// ---------------------------------------------------------------------------

/// Production capture device built on `cpal`.
///
/// `cpal::Stream` is not `Send` on every platform, so the stream lives on a
/// dedicated `audio-capture` thread.  `open()` performs a synchronous
/// handshake with that thread so device failures are reported to the caller;
/// `close()` signals the thread to drop the stream and joins it.
pub struct CpalDevice;

impl CpalDevice {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpalDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevice for CpalDevice {
    fn open(&self, tx: mpsc::Sender<AudioChunk>) -> Result<Box<dyn DeviceHandle>, CaptureError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), CaptureError>>();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || {
                let stream = match build_input_stream(tx) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // Keep the stream alive until close() signals (or the stop
                // sender is dropped).  Dropping the stream stops capture.
                let _ = stop_rx.recv();
                drop(stream);
            })
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| {
                CaptureError::DeviceUnavailable("capture thread exited during setup".into())
            })??;

        Ok(Box::new(CpalHandle {
            stop: Some(stop_tx),
            thread: Some(thread),
        }))
    }
}

/// Build, configure and start a cpal input stream that forwards chunks to `tx`.
fn build_input_stream(tx: mpsc::Sender<AudioChunk>) -> Result<cpal::Stream, CaptureError> {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| CaptureError::DeviceUnavailable("no default input device".into()))?;

    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

    let channels = supported.channels();
    let sample_rate = supported.sample_rate().0;
    let config: cpal::StreamConfig = supported.into();

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let chunk = AudioChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                };
                // Ignore send errors; the receiver may have been dropped.
                let _ = tx.send(chunk);
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None, // no timeout
        )
        .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

    stream
        .play()
        .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

    log::info!("audio capture started ({sample_rate} Hz, {channels} ch)");
    Ok(stream)
}

struct CpalHandle {
    stop: Option<mpsc::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl DeviceHandle for CpalHandle {
    fn close(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for CpalHandle {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// MockCaptureDevice (test double)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockCaptureDevice;


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
