//! Client and response handling for the Messages-style language-model proxy.
//!
//! [`MessagesClient`] issues the two requests the generation pipeline needs:
//! a web-search backed research call and a plain completion for the email
//! drafts. [`prompt`] builds the instructions and [`extract`] turns the draft
//! reply into an [`pitchdesk_core::EmailDraftSet`], falling back to a
//! placeholder set when the reply is not the JSON we asked for.

pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod types;

pub use client::MessagesClient;
pub use error::LlmError;
pub use extract::{extract_draft_set, Extraction, FallbackReason};
pub use types::{ContentBlock, Message, MessagesRequest, MessagesResponse, Tool};
