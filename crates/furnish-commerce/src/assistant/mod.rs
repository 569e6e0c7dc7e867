//! Assistant conversation types.

mod conversation;

pub use conversation::{Author, Conversation, ConversationEntry, SearchResult, Snapshot};
