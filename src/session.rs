//! Event loop driving one capture session.
//!
//! All workflow state is owned by [`Session`] and only touched from
//! [`Session::handle`]. Slow work (payload encoding, uploads) runs on other
//! tasks and reports back through the session's event channel.

use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::camera::FrameSource;
use crate::preview::{render_ascii, RenderOptions};
use crate::prompt::{PromptInput, SessionCommand, HELP_TEXT};
use crate::snapshot::{CaptureError, Payload, Snapshot, DEFAULT_JPEG_QUALITY};
use crate::upload::{dispatch, UploadClient, UploadError, UploadReceipt};
use crate::workflow::{CaptureId, ViewState, Workflow, WorkflowError};

/// Everything the session loop reacts to.
pub enum Event {
    /// A command typed by the user.
    Command(SessionCommand),
    /// The upload payload of capture `id` finished encoding.
    PayloadReady {
        id: CaptureId,
        result: Result<Payload, CaptureError>,
    },
    /// A dispatched upload resolved.
    UploadFinished(Result<UploadReceipt, UploadError>),
    /// The camera stream is live; captures read from this source from now on.
    StreamBound(Box<dyn FrameSource>),
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Event::PayloadReady { id, result } => f
                .debug_struct("PayloadReady")
                .field("id", id)
                .field("result", result)
                .finish(),
            Event::UploadFinished(outcome) => {
                f.debug_tuple("UploadFinished").field(outcome).finish()
            }
            Event::StreamBound(_) => f.write_str("StreamBound"),
        }
    }
}

/// Whether the loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// JPEG quality for preview and payload (1-100).
    pub jpeg_quality: u8,
    pub render: RenderOptions,
    /// Print the ASCII preview when a capture is taken.
    pub show_preview: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            render: RenderOptions::default(),
            show_preview: true,
        }
    }
}

pub struct Session {
    source: Box<dyn FrameSource>,
    workflow: Workflow,
    uploader: Arc<UploadClient>,
    options: SessionOptions,
    events: UnboundedSender<Event>,
    uploads: Vec<JoinHandle<()>>,
    last_upload: Option<Result<UploadReceipt, UploadError>>,
    last_notice: Option<String>,
}

impl Session {
    /// Create a session and the receiver its events arrive on.
    pub fn new(
        source: Box<dyn FrameSource>,
        uploader: Arc<UploadClient>,
        options: SessionOptions,
    ) -> (Self, UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            source,
            workflow: Workflow::new(),
            uploader,
            options,
            events,
            uploads: Vec::new(),
            last_upload: None,
            last_notice: None,
        };
        (session, rx)
    }

    /// A sender for feeding events from outside (stdin, signals).
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.events.clone()
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn state(&self) -> ViewState {
        self.workflow.state()
    }

    /// Outcome of the most recently resolved upload.
    pub fn last_upload(&self) -> Option<&Result<UploadReceipt, UploadError>> {
        self.last_upload.as_ref()
    }

    /// The last line shown to the user.
    pub fn last_notice(&self) -> Option<&str> {
        self.last_notice.as_deref()
    }

    /// Process events until the user quits, then wait for pending uploads.
    pub async fn run(mut self, mut rx: UnboundedReceiver<Event>) {
        while let Some(event) = rx.recv().await {
            if self.handle(event) == Flow::Quit {
                break;
            }
        }
        self.finish().await;
    }

    /// Acquire the camera off the event loop.
    ///
    /// `acquire` runs on its own thread, so a slow device or a hung
    /// permission prompt only leaves capture unavailable. On success the
    /// source arrives as [`Event::StreamBound`]; on failure nothing is sent
    /// and the session keeps its current feed.
    pub fn spawn_acquire<F>(&self, acquire: F) -> Option<thread::JoinHandle<()>>
    where
        F: FnOnce() -> Option<Box<dyn FrameSource>> + Send + 'static,
    {
        let events = self.events.clone();
        let spawned = thread::Builder::new()
            .name("camera-acquire".to_string())
            .spawn(move || {
                if let Some(source) = acquire() {
                    let _ = events.send(Event::StreamBound(source));
                }
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Error spawning camera thread: {}", e);
                None
            }
        }
    }

    /// Wait for uploads that are still in flight.
    pub async fn finish(&mut self) {
        let pending: Vec<_> = self
            .uploads
            .drain(..)
            .filter(|handle| !handle.is_finished())
            .collect();
        if !pending.is_empty() {
            log::info!("Waiting for {} upload(s) to finish", pending.len());
        }
        for handle in pending {
            if let Err(e) = handle.await {
                log::error!("Upload task failed: {}", e);
            }
        }
    }

    /// Handle one event. Must be called from within a tokio runtime.
    pub fn handle(&mut self, event: Event) -> Flow {
        match event {
            Event::Command(command) => return self.handle_command(command),
            Event::PayloadReady { id, result } => self.on_payload(id, result),
            Event::UploadFinished(outcome) => self.last_upload = Some(outcome),
            Event::StreamBound(source) => {
                self.source = source;
                self.notify("Camera ready. Use /snap to capture.");
            }
        }
        Flow::Continue
    }

    fn handle_command(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Capture => self.capture(),
            SessionCommand::Caption(text) => match self.workflow.set_caption(text) {
                Ok(()) => self.notify("Caption set. /post to upload, /close to discard."),
                Err(_) => self.notify("Nothing to caption yet. Use /snap first."),
            },
            SessionCommand::Post => self.post(),
            SessionCommand::Close => {
                if self.workflow.cancel().is_ok() {
                    self.notify("Discarded. Ready for the next capture.");
                }
            }
            SessionCommand::Help => PromptInput::print_status(HELP_TEXT),
            SessionCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn capture(&mut self) {
        if self.workflow.is_previewing() {
            self.notify("A capture is already open. /post or /close it first.");
            return;
        }

        let frame = self.source.latest_frame();
        if let Some(frame) = &frame {
            log::debug!("Capturing frame read {:?} ago", frame.age());
        }

        let snapshot = match Snapshot::take(frame) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Capture rejected: {}", e);
                self.notify(&format!("Cannot capture: {}.", e));
                return;
            }
        };

        let quality = self.options.jpeg_quality;
        let preview = match snapshot.encode_preview(quality) {
            Ok(preview) => preview,
            Err(e) => {
                log::error!("Error encoding preview: {}", e);
                return;
            }
        };

        if self.options.show_preview {
            match render_ascii(&preview, &self.options.render) {
                Ok(lines) => PromptInput::print_status(&lines.join("\n")),
                Err(e) => log::warn!("Could not render preview: {}", e),
            }
        }

        let id = match self.workflow.begin_capture(preview) {
            Ok(id) => id,
            Err(e) => {
                self.notify(&format!("Cannot capture: {}.", e));
                return;
            }
        };
        log::debug!(
            "Captured {}x{} frame as capture {}",
            snapshot.width(),
            snapshot.height(),
            id
        );

        let events = self.events.clone();
        tokio::task::spawn_blocking(move || {
            let result = snapshot.encode_payload(quality);
            let _ = events.send(Event::PayloadReady { id, result });
        });
    }

    fn on_payload(&mut self, id: CaptureId, result: Result<Payload, CaptureError>) {
        match result {
            Ok(payload) => {
                if self.workflow.complete_capture(id, payload) {
                    self.notify("Captured. Type a caption, /post to upload, /close to discard.");
                } else {
                    log::debug!("Dropping payload of superseded capture {}", id);
                }
            }
            Err(e) => {
                log::error!("Error encoding capture {}: {}", id, e);
                self.workflow.abandon_capture(id);
            }
        }
    }

    fn post(&mut self) {
        log::info!("Posting photo");
        match self.workflow.submit() {
            Ok(request) => {
                let events = self.events.clone();
                let handle = dispatch(Arc::clone(&self.uploader), request, move |outcome| {
                    let _ = events.send(Event::UploadFinished(outcome));
                });
                self.uploads.retain(|h| !h.is_finished());
                self.uploads.push(handle);
                self.notify("Posting. Ready for the next capture.");
            }
            Err(WorkflowError::MissingPayload) => {
                log::error!("No image to upload");
                self.notify("No image to upload. Use /snap first.");
            }
            Err(WorkflowError::NotPreviewing | WorkflowError::AlreadyPreviewing) => {
                self.notify("Nothing to post. Use /snap first.");
            }
        }
    }

    fn notify(&mut self, message: &str) {
        PromptInput::print_status(message);
        self.last_notice = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::BlankFeed;
    use crate::upload::DEFAULT_UPLOAD_URL;

    fn blank_session() -> (Session, UnboundedReceiver<Event>) {
        let client = Arc::new(UploadClient::new(DEFAULT_UPLOAD_URL).unwrap());
        Session::new(Box::new(BlankFeed), client, SessionOptions::default())
    }

    #[tokio::test]
    async fn test_quit_stops_loop() {
        let (mut session, _rx) = blank_session();
        assert_eq!(
            session.handle(Event::Command(SessionCommand::Quit)),
            Flow::Quit
        );
    }

    #[tokio::test]
    async fn test_capture_on_blank_feed_is_rejected() {
        let (mut session, mut rx) = blank_session();
        session.handle(Event::Command(SessionCommand::Capture));

        assert_eq!(session.state(), ViewState::Idle);
        assert!(session.workflow().preview().is_none());
        assert!(session.last_notice().unwrap().contains("Cannot capture"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_post_without_capture_is_noop() {
        let (mut session, mut rx) = blank_session();
        session.handle(Event::Command(SessionCommand::Post));

        assert_eq!(session.state(), ViewState::Idle);
        assert!(session.last_notice().unwrap().contains("No image to upload"));
        assert!(session.uploads.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_caption_before_capture_is_refused() {
        let (mut session, _rx) = blank_session();
        session.handle(Event::Command(SessionCommand::Caption("hi".to_string())));
        assert_eq!(session.workflow().caption(), "");
    }
}
