//! Frame sources that need no capture hardware

use crate::error::EngineError;

use super::FrameSource;

/// Minimal JPEG envelope used when no real frame data is configured.
/// The bytes are opaque to the whole pipeline; only a presentation
/// layer would ever try to decode them.
const PLACEHOLDER_FRAME: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

/// Replays one fixed encoded frame forever
///
/// Stand-in for a camera integration: useful for exercising the
/// delivery path end to end and for running the demo server without
/// hardware.
pub struct StillFrameSource {
    frame: Vec<u8>,
    opened: bool,
}

impl StillFrameSource {
    /// Source that replays the given encoded frame
    pub fn new(frame: Vec<u8>) -> Self {
        Self {
            frame,
            opened: false,
        }
    }

    /// Source that replays a built-in placeholder frame
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_FRAME.to_vec())
    }
}

impl FrameSource for StillFrameSource {
    fn open(&mut self) -> Result<(), EngineError> {
        self.opened = true;
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>, EngineError> {
        if !self.opened {
            return Err(EngineError::SourceUnavailable(
                "source has not been opened".to_string(),
            ));
        }
        Ok(self.frame.clone())
    }

    fn close(&mut self) {
        self.opened = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_requires_open() {
        let mut source = StillFrameSource::new(vec![1, 2, 3]);
        assert!(source.read().is_err());

        source.open().unwrap();
        assert_eq!(source.read().unwrap(), vec![1, 2, 3]);

        source.close();
        assert!(source.read().is_err());
    }
}
