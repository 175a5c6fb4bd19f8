use std::fmt;

use super::frame::Frame;

/// An owned drawing surface. Drawing goes to the pending frame, `show` hands it to the backend.
pub trait Canvas {
    fn frame(&self) -> &Frame;

    fn frame_mut(&mut self) -> &mut Frame;

    // Render a finished frame on the backend
    fn present(&mut self, frame: &Frame) -> Result<(), CanvasError>;

    // Render the pending frame and start a fresh one. On failure the pending frame is kept
    fn show(&mut self) -> Result<(), CanvasError> {
        let frame = std::mem::take(self.frame_mut());

        if let Err(err) = self.present(&frame) {
            *self.frame_mut() = frame;
            return Err(err);
        }

        Ok(())
    }
}

/// Keeps every shown frame in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCanvas {
    current: Frame,
    shown: Vec<Frame>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown_frames(&self) -> &[Frame] {
        &self.shown
    }

    pub fn last_shown(&self) -> Option<&Frame> {
        self.shown.last()
    }
}

impl Canvas for MemoryCanvas {
    fn frame(&self) -> &Frame {
        &self.current
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.current
    }

    fn present(&mut self, frame: &Frame) -> Result<(), CanvasError> {
        self.shown.push(frame.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasError {
    OutputDirectory { reason: String },
    Drawing { reason: String },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CanvasError::OutputDirectory { reason } => write!(f, "cannot prepare output directory: {}", reason),
            CanvasError::Drawing { reason } => write!(f, "drawing failed: {}", reason),
        }
    }
}

impl std::error::Error for CanvasError {}
