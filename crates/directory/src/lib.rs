//! Session Directory: the single source of truth for conversation, trigger,
//! and canned-response records.
//!
//! The core never holds an authoritative in-memory copy of any record: every
//! operation re-reads before acting, so the directory is the only
//! synchronization point across concurrent handlers. The one operation with
//! atomicity requirements is [`Directory::insert_conversation`], a
//! conditional insert keyed on the (sender, receiver) address pair.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;
pub mod types;

pub use {
    error::{Error, Result},
    memory::MemoryDirectory,
    sqlite::SqliteDirectory,
    store::{Directory, InsertOutcome},
    types::{CannedResponse, Conversation, NewConversation, Trigger},
};
