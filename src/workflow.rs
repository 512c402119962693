//! Capture-and-submit state machine.
//!
//! The confirmation view opens only once a capture's payload is available
//! and closes on cancel or on submit. Submitting never waits for the
//! network: the view is closed as soon as the request has been built.

use thiserror::Error;

use crate::snapshot::{Payload, PreviewImage};
use crate::upload::UploadRequest;

/// Identifies one capture so late payloads of superseded captures are dropped.
pub type CaptureId = u64;

/// Whether the confirmation view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Feed live, confirmation view closed, ready for a capture trigger.
    #[default]
    Idle,
    /// Confirmation view open with a capture and an editable caption.
    Previewing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("no image to upload")]
    MissingPayload,

    #[error("confirmation view is not open")]
    NotPreviewing,

    #[error("confirmation view is already open")]
    AlreadyPreviewing,
}

/// The single in-memory UI state of a capture session.
#[derive(Debug, Default)]
pub struct Workflow {
    state: ViewState,
    preview: Option<PreviewImage>,
    payload: Option<Payload>,
    caption: String,
    latest_capture: Option<CaptureId>,
    next_capture: CaptureId,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn is_previewing(&self) -> bool {
        self.state == ViewState::Previewing
    }

    pub fn preview(&self) -> Option<&PreviewImage> {
        self.preview.as_ref()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Record a new capture's preview.
    ///
    /// Replaces any previous capture, including its payload. The view stays
    /// closed until [`complete_capture`](Self::complete_capture) is called
    /// with the returned id. Refused while the view is open.
    pub fn begin_capture(&mut self, preview: PreviewImage) -> Result<CaptureId, WorkflowError> {
        if self.is_previewing() {
            return Err(WorkflowError::AlreadyPreviewing);
        }

        let id = self.next_capture;
        self.next_capture += 1;

        self.preview = Some(preview);
        self.payload = None;
        self.latest_capture = Some(id);
        Ok(id)
    }

    /// Attach the payload of capture `id` and open the confirmation view.
    ///
    /// Returns `false`, changing nothing, if `id` is not the latest capture.
    pub fn complete_capture(&mut self, id: CaptureId, payload: Payload) -> bool {
        if self.latest_capture != Some(id) {
            return false;
        }

        self.payload = Some(payload);
        self.caption.clear();
        self.state = ViewState::Previewing;
        true
    }

    /// Forget capture `id` if its payload could not be produced.
    ///
    /// A capture that already opened the view is left alone.
    pub fn abandon_capture(&mut self, id: CaptureId) {
        if self.latest_capture == Some(id) && self.payload.is_none() {
            self.preview = None;
            self.payload = None;
            self.latest_capture = None;
        }
    }

    /// Replace the caption. Only allowed while the view is open.
    pub fn set_caption(&mut self, caption: impl Into<String>) -> Result<(), WorkflowError> {
        if !self.is_previewing() {
            return Err(WorkflowError::NotPreviewing);
        }
        self.caption = caption.into();
        Ok(())
    }

    /// Close the confirmation view without submitting.
    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        if !self.is_previewing() {
            return Err(WorkflowError::NotPreviewing);
        }
        self.state = ViewState::Idle;
        Ok(())
    }

    /// Build the upload for the current capture and close the view.
    ///
    /// The payload check comes first: with no payload nothing changes and no
    /// request is produced.
    pub fn submit(&mut self) -> Result<UploadRequest, WorkflowError> {
        let payload = match &self.payload {
            Some(payload) if !payload.is_empty() => payload.clone(),
            _ => return Err(WorkflowError::MissingPayload),
        };
        if !self.is_previewing() {
            return Err(WorkflowError::NotPreviewing);
        }

        let request = UploadRequest::new(payload, self.caption.clone());
        self.state = ViewState::Idle;
        Ok(request)
    }
}
