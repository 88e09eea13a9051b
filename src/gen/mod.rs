pub mod client;
pub mod controller;
pub mod prompt;

pub use client::{GeminiClient, GenerationReply};
pub use controller::{GenerationController, GenerationEvent, RequestState, PROMPT_MAX_CHARS};
pub use prompt::PromptTemplate;
