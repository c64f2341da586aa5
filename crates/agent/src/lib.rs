//! AI request adapter for the booking site.
//!
//! This crate turns booking and playlist inputs into requests against a
//! generative text endpoint and validates what comes back:
//! - Drafts free-text service agreements from a booking and its quote (`contract`)
//! - Generates schema-constrained playlists with a hard parse (`playlist`)
//! - Drives one client's booking wizard and playlist state (`session`)
//!
//! # Architecture
//!
//! 1. **Prompt rendering** (`prompts`) - booking/quote/terms → instruction text
//! 2. **Generation** (`llm`, `gemini`) - one blocking request per user action
//! 3. **Validation** (`playlist`, `schema`) - reject-and-error on shape mismatch
//! 4. **Transition** (`session`) - advance the wizard only on success
//!
//! # Key Types
//!
//! - `LlmClient` - Injectable generation seam; `GeminiClient` is the HTTP implementation
//! - `ContractDrafter` / `PlaylistGenerator` - The two request shapes
//! - `BookingSession` / `PlaylistSession` - Per-client state owners
//!
//! # Safety Principle
//!
//! The model never prices anything. Every figure in a drafted agreement comes
//! from the deterministic quote engine in `royal-core`.

pub mod contract;
pub mod gemini;
pub mod llm;
pub mod playlist;
pub mod prompts;
pub mod schema;
pub mod session;

pub use contract::{ContractDrafter, ContractError};
pub use gemini::GeminiClient;
pub use llm::{LlmClient, LlmError};
pub use playlist::{PlaylistError, PlaylistGenerator};
pub use session::{BookingError, BookingSession, PlaylistSession};
