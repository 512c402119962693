//! Camera access: acquiring the live feed and reading its latest frame.
//!
//! - Device enumeration via [`list_devices`]
//! - One-shot acquisition via [`acquire`], returning a [`CameraCapture`]
//! - The [`FrameSource`] seam used by the capture workflow

mod capture;
mod capture_loop;
mod device;
mod frame_utils;
mod source;
mod types;

pub use capture::CameraCapture;
pub use device::list_devices;
pub use source::{acquire, BlankFeed, FrameSource};
pub use types::{CameraError, CameraInfo, Frame, Resolution, BYTES_PER_PIXEL};
