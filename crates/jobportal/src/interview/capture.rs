//! Camera/microphone collaborator contract.
//!
//! The live stream is owned exclusively by the interview session for its
//! lifetime; no other component touches it. A scripted implementation stands
//! in for the real device so permission denial and track toggling stay
//! deterministic.

/// Grants capture streams after the user's permission prompt resolves.
pub trait MediaCapture: Send {
    type Stream: CaptureStream;

    fn request_stream(&mut self) -> Result<Self::Stream, CaptureError>;
}

/// A granted camera+microphone stream with independently toggleable tracks.
pub trait CaptureStream: Send {
    fn set_video_enabled(&mut self, enabled: bool);
    fn set_audio_enabled(&mut self, enabled: bool);
    fn video_enabled(&self) -> bool;
    fn audio_enabled(&self) -> bool;
    /// Stops every track; the stream is unusable afterwards.
    fn stop_all(&mut self);
    fn stopped(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("camera and microphone access is required for the interview")]
    PermissionDenied,
}

/// Deterministic capture device: denies the first `denials` requests, then
/// grants a stream with both tracks enabled.
#[derive(Debug)]
pub struct ScriptedMediaCapture {
    denials: u32,
}

impl ScriptedMediaCapture {
    pub fn granting() -> Self {
        Self { denials: 0 }
    }

    pub fn denying(denials: u32) -> Self {
        Self { denials }
    }
}

impl MediaCapture for ScriptedMediaCapture {
    type Stream = ScriptedStream;

    fn request_stream(&mut self) -> Result<ScriptedStream, CaptureError> {
        if self.denials > 0 {
            self.denials -= 1;
            return Err(CaptureError::PermissionDenied);
        }
        Ok(ScriptedStream {
            video: true,
            audio: true,
            stopped: false,
        })
    }
}

#[derive(Debug)]
pub struct ScriptedStream {
    video: bool,
    audio: bool,
    stopped: bool,
}

impl CaptureStream for ScriptedStream {
    fn set_video_enabled(&mut self, enabled: bool) {
        if !self.stopped {
            self.video = enabled;
        }
    }

    fn set_audio_enabled(&mut self, enabled: bool) {
        if !self.stopped {
            self.audio = enabled;
        }
    }

    fn video_enabled(&self) -> bool {
        self.video && !self.stopped
    }

    fn audio_enabled(&self) -> bool {
        self.audio && !self.stopped
    }

    fn stop_all(&mut self) {
        self.video = false;
        self.audio = false;
        self.stopped = true;
    }

    fn stopped(&self) -> bool {
        self.stopped
    }
}
