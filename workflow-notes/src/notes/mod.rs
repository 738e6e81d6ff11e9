//! Note text engine and storage.
//!
//! Pure text handling (calendar, templates, section parsing, carry-over,
//! structural edits) plus the document store the workflows write through.

pub mod calendar;
pub mod continuity;
pub mod editor;
pub mod file_ops;
pub mod frontmatter;
pub mod sections;
pub mod store;
pub mod template;

pub use store::{DocumentStore, Entry, MemoryStore, Note, VaultStore};
