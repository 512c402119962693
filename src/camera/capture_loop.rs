//! Background capture thread implementation.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::frame_utils::convert_to_rgb;
use super::types::{CameraError, Frame, Resolution};

/// Index of the device the stream is acquired from.
pub const DEFAULT_DEVICE_INDEX: u32 = 0;

/// Commands sent to the capture thread.
pub enum CaptureCommand {
    Stop,
}

/// Run the capture loop in a background thread.
///
/// Opens the camera, reports the negotiated resolution and frame rate (or the
/// failure) through `info_tx`, then keeps `buffer` holding the latest frame
/// until stopped. The stream is stopped before the thread exits.
pub fn run_capture_loop(
    buffer: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    rx: Receiver<CaptureCommand>,
    info_tx: Sender<Result<(Resolution, u32), CameraError>>,
) {
    let mut camera = match open_camera() {
        Ok(cam) => cam,
        Err(e) => {
            let _ = info_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = info_tx.send(Err(classify_open_error(&e.to_string(), true)));
        return;
    }

    let res = camera.resolution();
    let actual_res = Resolution {
        width: res.width(),
        height: res.height(),
    };
    let _ = info_tx.send(Ok((actual_res, camera.frame_rate())));

    while !stop.load(Ordering::Relaxed) {
        if let Ok(CaptureCommand::Stop) = rx.try_recv() {
            break;
        }

        if let Ok(raw_frame) = camera.frame() {
            // Frames that fail to decode are skipped
            if let Some(frame) = convert_to_rgb(&raw_frame) {
                if let Ok(mut buf) = buffer.lock() {
                    *buf = Some(frame);
                }
            }
        }

        thread::sleep(Duration::from_millis(1));
    }

    if let Err(e) = camera.stop_stream() {
        log::warn!("Failed to stop camera stream cleanly: {}", e);
    }
    log::info!("Camera stream released");
}

/// Open the default device with whatever format it offers first.
fn open_camera() -> Result<Camera, CameraError> {
    let index = CameraIndex::Index(DEFAULT_DEVICE_INDEX);
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::None);

    Camera::new(index, requested).map_err(|e| classify_open_error(&e.to_string(), false))
}

/// Map a backend error message onto a [`CameraError`].
fn classify_open_error(message: &str, streaming: bool) -> CameraError {
    let msg = message.to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        CameraError::PermissionDenied
    } else if streaming {
        CameraError::StreamFailed(message.to_string())
    } else {
        CameraError::OpenFailed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_permission_errors() {
        assert!(matches!(
            classify_open_error("Access denied by user", false),
            CameraError::PermissionDenied
        ));
        assert!(matches!(
            classify_open_error("Not authorized: Authorization status", true),
            CameraError::PermissionDenied
        ));
    }

    #[test]
    fn test_classify_other_errors() {
        match classify_open_error("device busy", false) {
            CameraError::OpenFailed(msg) => assert_eq!(msg, "device busy"),
            other => panic!("Expected OpenFailed, got {:?}", other),
        }
        match classify_open_error("ioctl failed", true) {
            CameraError::StreamFailed(msg) => assert_eq!(msg, "ioctl failed"),
            other => panic!("Expected StreamFailed, got {:?}", other),
        }
    }
}
