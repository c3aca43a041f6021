//! Chat runtime - conversational garden advice over the plant catalog
//!
//! This crate is the conversational layer of the trellis system:
//! - Keeps per-user conversation sessions (bounded window, idle expiry)
//! - Talks to a pluggable text-generation collaborator (`LlmClient`)
//! - Classifies recommendation requests and surfaces structured plant and
//!   store-item data next to the free-text reply
//!
//! # Architecture
//!
//! A chat turn runs a fixed pipeline:
//! 1. **Session lookup** (`session`) - prior turns for prompt context
//! 2. **Completion** (`llm`) - collaborator call with canned-reply fallback
//! 3. **Extraction** (via `trellis-core`) - catalog records mentioned in the
//!    reply, only for classified recommendation requests
//! 4. **Envelope assembly** (`runtime`) - message, plants, store items,
//!    quick-reply buttons, step tag
//!
//! # Availability principle
//!
//! Collaborator failures never surface as hard errors. The runtime degrades
//! to canned replies and hardcoded store stubs, and reports which path was
//! taken through an explicit outcome value instead of swallowing it.

pub mod llm;
pub mod runtime;
pub mod session;

pub use llm::{CannedLlmClient, HttpLlmClient, LlmClient};
pub use runtime::{ChatReply, ChatRuntime, CollaboratorOutcome, StoreItemSource};
pub use session::{ChatTurn, ConversationSession, SessionStore, TurnRole};
