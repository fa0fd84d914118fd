//! On-device persistence for the favorites list

mod local;

pub use local::{FileMirror, LocalMirror, MemoryMirror, FAVORITES_STORAGE_KEY};
