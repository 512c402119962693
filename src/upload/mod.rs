//! Uploading captured stills with their caption.
//!
//! [`UploadClient`] performs a single multipart POST per request;
//! [`dispatch`] runs it in the background and reports the outcome through a
//! callback.

mod client;
mod dispatch;

pub use client::{
    parse_endpoint, UploadClient, UploadError, UploadReceipt, UploadRequest, CAPTION_FIELD,
    DEFAULT_UPLOAD_URL, IMAGE_FIELD, IMAGE_FILE_NAME, UPLOAD_URL_ENV,
};
pub use dispatch::dispatch;
