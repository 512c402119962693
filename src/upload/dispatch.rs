//! Fire-and-forget dispatch of uploads.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::client::{UploadClient, UploadError, UploadReceipt, UploadRequest};

/// Send `request` on a background task and return immediately.
///
/// The outcome is logged and then handed to `on_finish`, which is how the
/// caller observes it. Nothing waits on the task; it cannot be cancelled.
pub fn dispatch<F>(client: Arc<UploadClient>, request: UploadRequest, on_finish: F) -> JoinHandle<()>
where
    F: FnOnce(Result<UploadReceipt, UploadError>) + Send + 'static,
{
    log::info!(
        "Posting photo ({} bytes, caption {:?}) to {}",
        request.payload.len(),
        request.caption,
        client.endpoint()
    );

    tokio::spawn(async move {
        let outcome = client.submit(request).await;
        match &outcome {
            Ok(receipt) => log::info!("Upload accepted with status {}", receipt.status),
            Err(e) => log::error!("Error uploading image: {}", e),
        }
        on_finish(outcome);
    })
}
