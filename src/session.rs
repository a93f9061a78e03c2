//! Platform-agnostic conversation flow: collect a photo, ask for a format, composite, reply.
//!
//! [`Session`] is a finite-state machine driven by externally delivered [`SessionEvent`]s. It never
//! performs I/O; every side effect is returned as a [`SessionAction`] for the caller to carry out
//! (send a message, run the compositor, upload the result).

use std::sync::Arc;

use crate::{
    assets::store::MaskStore,
    foundation::{
        core::{FormatKind, TargetFormat},
        error::{PhotomaskError, PhotomaskResult},
    },
    pipeline::Compositor,
};

/// Where a conversation currently stands.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// No conversation running; waiting for `Start`.
    Idle,
    /// Waiting for the user's photo.
    AwaitingImage,
    /// Photo received, waiting for a format choice.
    AwaitingFormat {
        /// Encoded photo bytes.
        image: Arc<Vec<u8>>,
    },
    /// Compositor job handed to the caller; waiting for its outcome.
    Processing {
        /// Encoded photo bytes.
        image: Arc<Vec<u8>>,
        /// Chosen canvas.
        format: TargetFormat,
    },
    /// Conversation finished (successfully or not); `Start` begins a new one.
    Done,
}

/// Input delivered by the messaging layer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// `/start` command.
    Start,
    /// `/help` command.
    Help,
    /// A photo upload (already downloaded).
    Photo(Vec<u8>),
    /// Any non-photo message.
    Text(String),
    /// Button press carrying callback data such as `format_stories`.
    FormatChosen(String),
    /// Compositor finished; carries the encoded result.
    Completed(Vec<u8>),
    /// Compositor failed; carries a diagnostic for logs.
    Failed(String),
}

/// Canned user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Ask for a photo.
    SendPhoto,
    /// The message was not a photo; the conversation ends.
    NotAnImage,
    /// Photos are only accepted inside a conversation.
    StartFirst,
    /// Usage instructions.
    Help,
    /// Compositing has started.
    Working,
    /// Caption for the finished image.
    Finished,
    /// Compositing failed.
    ProcessingFailed,
}

impl Prompt {
    /// Default English text.
    pub fn text(self) -> &'static str {
        match self {
            Self::SendPhoto => "Send me a photo and I'll turn it into a post or story picture.",
            Self::NotAnImage => "That's not an image. Please send an image.",
            Self::StartFirst => "Send /start first to begin.",
            Self::Help => {
                "How to use this bot:\n\
                 1. Press /start and send a photo\n\
                 2. Pick one of the offered sizes\n\
                 3. Get a picture ready for a post or story\n\n\
                 Supported formats: JPG, PNG, WEBP and others"
            }
            Self::Working => "Creating your image, just a couple of seconds...",
            Self::Finished => "Done! Press /start to send another photo or change the format.",
            Self::ProcessingFailed => {
                "Sorry, something went wrong while processing your image. Please try again."
            }
        }
    }
}

/// Side effect requested by the session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// Send a text message.
    Reply(Prompt),
    /// Offer format buttons.
    AskFormat(Vec<FormatKind>),
    /// Acknowledge the button press.
    AcknowledgeFormat(FormatKind),
    /// Run the compositor; report back with `Completed` or `Failed`.
    Process {
        /// Encoded photo bytes.
        image: Arc<Vec<u8>>,
        /// Chosen canvas.
        format: TargetFormat,
        /// Mask id to resolve (falls back to the first registered mask).
        mask_id: String,
    },
    /// Send the finished image.
    SendResult(Vec<u8>),
}

/// One user's conversation.
#[derive(Clone, Debug)]
pub struct Session {
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session in [`SessionState::Idle`].
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Advance the machine by one event.
    ///
    /// Events a state does not care about are ignored (no actions). Compositor outcomes delivered
    /// outside [`SessionState::Processing`] are a [`PhotomaskError::Session`].
    pub fn handle(&mut self, event: SessionEvent) -> PhotomaskResult<Vec<SessionAction>> {
        let state = std::mem::replace(&mut self.state, SessionState::Done);
        let (next, actions) = match (state, event) {
            (_, SessionEvent::Start) => (
                SessionState::AwaitingImage,
                vec![SessionAction::Reply(Prompt::SendPhoto)],
            ),
            (state, SessionEvent::Help) => (state, vec![SessionAction::Reply(Prompt::Help)]),

            (SessionState::Processing { .. }, SessionEvent::Completed(bytes)) => (
                SessionState::Done,
                vec![
                    SessionAction::SendResult(bytes),
                    SessionAction::Reply(Prompt::Finished),
                ],
            ),
            (SessionState::Processing { .. }, SessionEvent::Failed(reason)) => {
                tracing::warn!(%reason, "image processing failed");
                (
                    SessionState::Done,
                    vec![SessionAction::Reply(Prompt::ProcessingFailed)],
                )
            }

            (state, SessionEvent::Completed(_) | SessionEvent::Failed(_)) => {
                self.state = state;
                return Err(PhotomaskError::session(
                    "compositor outcome delivered while no image is being processed",
                ));
            }

            (SessionState::AwaitingImage, SessionEvent::Photo(bytes)) if !bytes.is_empty() => (
                SessionState::AwaitingFormat {
                    image: Arc::new(bytes),
                },
                vec![SessionAction::AskFormat(vec![
                    FormatKind::Stories,
                    FormatKind::Square,
                ])],
            ),
            (SessionState::AwaitingImage, _) => {
                (SessionState::Done, vec![SessionAction::Reply(Prompt::NotAnImage)])
            }

            (SessionState::AwaitingFormat { image }, SessionEvent::FormatChosen(data)) => {
                match FormatKind::from_callback_data(&data).and_then(TargetFormat::preset) {
                    Ok(format) => {
                        let mask_id = format.kind.as_str().to_string();
                        (
                            SessionState::Processing {
                                image: Arc::clone(&image),
                                format,
                            },
                            vec![
                                SessionAction::AcknowledgeFormat(format.kind),
                                SessionAction::Reply(Prompt::Working),
                                SessionAction::Process {
                                    image,
                                    format,
                                    mask_id,
                                },
                            ],
                        )
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, data = %data, "ignoring unknown format choice");
                        (SessionState::AwaitingFormat { image }, Vec::new())
                    }
                }
            }
            (state @ (SessionState::Idle | SessionState::Done), SessionEvent::Photo(_)) => {
                (state, vec![SessionAction::Reply(Prompt::StartFirst)])
            }
            (state, _) => (state, Vec::new()),
        };
        self.state = next;
        Ok(actions)
    }
}

/// Carry out a [`SessionAction::Process`] and turn the outcome into the follow-up event.
///
/// Returns `None` for every other action.
pub fn run_process_action(
    action: &SessionAction,
    compositor: &Compositor,
    masks: &MaskStore,
) -> Option<SessionEvent> {
    let SessionAction::Process {
        image,
        format,
        mask_id,
    } = action
    else {
        return None;
    };

    let outcome = masks
        .load_entry(masks.resolve(mask_id))
        .and_then(|overlay| compositor.process_image(image, &overlay, format));
    Some(match outcome {
        Ok(out) => SessionEvent::Completed(out.bytes),
        Err(e) => SessionEvent::Failed(e.to_string()),
    })
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
