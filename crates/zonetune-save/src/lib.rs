//! Save-file loading, editing, and persistence.
//!
//! The game's save file is an XML document with a non-standard `<?xml?>`
//! declaration. This crate reads it into an event stream, mutates only the
//! `customSong<N>` attributes of the `game` element, and writes everything
//! else back byte-for-byte.

pub mod document;
pub mod editor;
pub mod error;

pub use document::SaveDocument;
pub use editor::SaveFileEditor;
pub use error::{Result, SaveError};
