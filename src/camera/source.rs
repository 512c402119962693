//! Frame sources consumed by the capture workflow.

use super::capture::CameraCapture;
use super::types::Frame;

/// Anything that can hand out the current frame of a live feed.
pub trait FrameSource: Send {
    /// The most recent frame, or `None` if nothing has been produced yet.
    fn latest_frame(&self) -> Option<Frame>;
}

impl FrameSource for CameraCapture {
    fn latest_frame(&self) -> Option<Frame> {
        self.get_frame()
    }
}

/// Feed used when the camera could not be acquired. Never produces a frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankFeed;

impl FrameSource for BlankFeed {
    fn latest_frame(&self) -> Option<Frame> {
        None
    }
}

/// Acquire the default camera and start streaming.
///
/// Runs once; on failure the error is logged and `None` is returned so the
/// caller can fall back to a [`BlankFeed`]. There is no retry.
pub fn acquire() -> Option<CameraCapture> {
    let mut camera = match CameraCapture::open() {
        Ok(camera) => camera,
        Err(e) => {
            log::error!("Error accessing the camera: {}", e);
            return None;
        }
    };

    if let Err(e) = camera.start() {
        log::error!("Error starting the camera stream: {}", e);
        return None;
    }

    match (camera.actual_resolution(), camera.actual_fps()) {
        (Some(res), Some(fps)) => log::info!("Camera stream bound at {} @ {} fps", res, fps),
        _ => log::info!("Camera stream bound"),
    }
    Some(camera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_feed_has_no_frame() {
        assert!(BlankFeed.latest_frame().is_none());
    }
}
