//! Durable state: the append-only record store and per-conversation sessions.

pub mod records;
pub mod session;

pub use records::{RecordStore, Scan};
pub use session::{JsonSessionStore, MemorySessionStore, SessionStore};
