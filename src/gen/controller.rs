use crate::canvas::export::decode_png;
use crate::canvas::RgbaBuffer;
use crate::gen::client::{GeminiClient, GenerationReply};
use crate::gen::prompt::{build_contents, PromptTemplate};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, OnceLock};

pub const PROMPT_MAX_CHARS: usize = 500;

const NO_IMAGE_MESSAGE: &str = "The API did not return an image.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Submitting,
}

/// Terminal result of one submission, delivered through `poll`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Completed {
        message: String,
        image: RgbaBuffer,
    },
    Failed {
        error: String,
    },
}

/// Owns the lifecycle of at most one in-flight generation request.
///
/// `submit` moves the blocking API call onto a worker thread; the UI calls
/// `poll` every frame and the worker's single message flips the state back to
/// idle. Single-flight is enforced here, not by a queue: submitting while a
/// request is in flight is a no-op.
pub struct GenerationController {
    client: Arc<GeminiClient>,
    template: PromptTemplate,
    state: RequestState,
    pending: Option<Receiver<Result<GenerationReply, String>>>,
}

impl GenerationController {
    pub fn new(client: Arc<GeminiClient>, template: PromptTemplate) -> Self {
        Self {
            client,
            template,
            state: RequestState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == RequestState::Submitting
    }

    /// Kick off a generation request. No-ops (and reports `false`) when a
    /// request is already in flight or the prompt is empty after trimming;
    /// the UI disables the submit control in both cases, but the controller
    /// does not rely on that.
    pub fn submit(&mut self, prompt: &str, snapshot_base64: Option<String>) -> bool {
        if self.state != RequestState::Idle || prompt.trim().is_empty() {
            return false;
        }

        let contents = build_contents(prompt, snapshot_base64, &self.template);
        let client = Arc::clone(&self.client);
        let (tx, rx) = std::sync::mpsc::channel();

        tracing::info!(model = client.model(), "submitting generation request");
        std::thread::spawn(move || {
            let result = client.generate(&contents).map_err(|err| err.to_string());
            // The receiver is dropped only if the app shut down mid-request.
            let _ = tx.send(result);
        });

        self.pending = Some(rx);
        self.state = RequestState::Submitting;
        true
    }

    /// Drain the worker channel. Returns the terminal event for the current
    /// request once it completes, after which the controller is idle again.
    pub fn poll(&mut self) -> Option<GenerationEvent> {
        let rx = self.pending.as_ref()?;
        let event = match rx.try_recv() {
            Ok(Ok(reply)) => Some(reply_to_event(reply)),
            Ok(Err(raw)) => Some(GenerationEvent::Failed {
                error: extract_error_message(&raw),
            }),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(GenerationEvent::Failed {
                error: "The generation worker stopped unexpectedly.".to_string(),
            }),
        };

        if event.is_some() {
            self.pending = None;
            self.state = RequestState::Idle;
            match &event {
                Some(GenerationEvent::Completed { .. }) => {
                    tracing::info!("generation request completed")
                }
                Some(GenerationEvent::Failed { error }) => {
                    tracing::warn!(error = %error, "generation request failed")
                }
                None => {}
            }
        }
        event
    }
}

fn reply_to_event(reply: GenerationReply) -> GenerationEvent {
    let Some(image_base64) = reply.image_base64 else {
        return GenerationEvent::Failed {
            error: NO_IMAGE_MESSAGE.to_string(),
        };
    };

    let decoded = BASE64
        .decode(image_base64.as_bytes())
        .map_err(|err| err.to_string())
        .and_then(|png| decode_png(&png).map_err(|err| err.to_string()));

    match decoded {
        Ok(image) => GenerationEvent::Completed {
            message: reply.message,
            image,
        },
        Err(raw) => GenerationEvent::Failed {
            error: extract_error_message(&raw),
        },
    }
}

/// Best-effort extraction of a human-readable message from a raw failure
/// string. API failures often embed a JSON payload of the form
/// `{"error": {..., "message": "..."}}`; when that pattern parses, its
/// `message` field is returned, otherwise the raw text verbatim.
pub fn extract_error_message(raw: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r#"\{"error":(.*)\}"#).expect("error pattern compiles"));

    let Some(captured) = pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return raw.to_string();
    };

    match serde_json::from_str::<serde_json::Value>(captured) {
        Ok(value) => value
            .get("message")
            .and_then(|message| message.as_str())
            .map(|message| message.to_string())
            .unwrap_or_else(|| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
