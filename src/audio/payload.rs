//! [`AudioPayload`] and the file-selection adapter.
//!
//! A payload is an opaque binary blob plus a declared media type.  It comes
//! from one of two sources: the capture session (WAV-encoded microphone
//! audio) or a user-chosen file via [`payload_from_file`].  The adapter does
//! no audio validation — a bad file is rejected by the transcription service,
//! which owns format knowledge.

use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioPayload
// ---------------------------------------------------------------------------

/// One submission-ready blob of audio.  Immutable once produced; consumed
/// exactly once by the transcription client (taken by value).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPayload {
    bytes: Vec<u8>,
    media_type: String,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the payload, yielding the raw bytes for submission.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// ---------------------------------------------------------------------------
// PayloadError
// ---------------------------------------------------------------------------

/// Failures while adapting a file selection into a payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The adapter was invoked with no file selected.
    #[error("no file selected")]
    NoFileSelected,

    /// The selected file could not be read.
    #[error("failed to read audio file: {0}")]
    Read(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// File adapter
// ---------------------------------------------------------------------------

/// Adapt a user file selection (zero or one file) into an [`AudioPayload`].
///
/// # Errors
///
/// [`PayloadError::NoFileSelected`] when `selection` is `None`, or
/// [`PayloadError::Read`] when the file cannot be read.
pub fn payload_from_file(selection: Option<&Path>) -> Result<AudioPayload, PayloadError> {
    let path = selection.ok_or(PayloadError::NoFileSelected)?;
    let bytes = std::fs::read(path)?;
    Ok(AudioPayload::new(bytes, media_type_for(path)))
}

/// Declared media type for a file, by extension.
///
/// Unknown extensions fall back to `application/octet-stream`; the
/// transcription service makes the final call on whether it can decode the
/// content.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

/// File extension matching a declared media type — used to name the uploaded
/// part, since the transcription service routes on the filename extension.
pub fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "audio/wav" => "wav",
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        "audio/webm" => "webm",
        _ => "wav",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_selection_is_rejected() {
        assert!(matches!(
            payload_from_file(None),
            Err(PayloadError::NoFileSelected)
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = payload_from_file(Some(Path::new("/nonexistent/clip.wav")));
        assert!(matches!(result, Err(PayloadError::Read(_))));
    }

    #[test]
    fn file_bytes_and_media_type_survive_adaptation() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(b"not really mp3 data").unwrap();

        let payload = payload_from_file(Some(file.path())).unwrap();
        assert_eq!(payload.media_type(), "audio/mpeg");
        assert_eq!(payload.len(), 19);
        assert_eq!(payload.into_bytes(), b"not really mp3 data");
    }

    #[test]
    fn media_type_mapping_covers_common_extensions() {
        assert_eq!(media_type_for(Path::new("a.wav")), "audio/wav");
        assert_eq!(media_type_for(Path::new("a.WAV")), "audio/wav");
        assert_eq!(media_type_for(Path::new("a.m4a")), "audio/mp4");
        assert_eq!(media_type_for(Path::new("a.ogg")), "audio/ogg");
        assert_eq!(media_type_for(Path::new("a.xyz")), "application/octet-stream");
        assert_eq!(media_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn extension_round_trips_media_type() {
        assert_eq!(extension_for("audio/wav"), "wav");
        assert_eq!(extension_for("audio/mpeg"), "mp3");
        // Unknown types upload as .wav and let the service decide.
        assert_eq!(extension_for("application/octet-stream"), "wav");
    }

    #[test]
    fn empty_payload_is_permitted() {
        // Zero-length captures are submitted as-is; the remote service is the
        // authority on whether there is any speech in them.
        let payload = AudioPayload::new(Vec::new(), "audio/wav");
        assert!(payload.is_empty());
    }
}
