//! # Specchio
//!
//! One-way, periodic directory mirroring in 100% safe Rust.
//!
//! Specchio keeps a replica directory tree identical to a source tree:
//! each synchronization pass creates missing replica directories, copies
//! changed files whole, and removes replica entries the source no longer
//! has. Whether a file needs copying is decided cheapest-check-first —
//! size, then modification time, then a streaming BLAKE3 digest — so an
//! unchanged tree costs little more than a metadata scan.
//!
//! ## Features
//!
//! - **Stateless passes**: the replica tree itself is the only sync
//!   state, so every pass is idempotent and an interrupted pass is
//!   corrected by the next one
//! - **Cheap-first comparison**: size and mtime short-circuit before any
//!   file content is read; the digest settles the rest
//! - **Per-entry error isolation**: one unreadable or uncopyable entry
//!   becomes one error event, never an aborted pass
//! - **Event stream**: the engine emits events to an injected sink; it
//!   never touches a global logger
//!
//! ## Example
//!
//! ```rust
//! use specchio::{Mirror, SyncAction};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let source = dir.path().join("source");
//! let replica = dir.path().join("replica");
//! std::fs::create_dir(&source).unwrap();
//! std::fs::write(source.join("hello.txt"), "hello").unwrap();
//!
//! let mirror = Mirror::new();
//! let events = mirror.sync_collect(&source, &replica);
//! assert!(events.iter().any(|e| e.action == SyncAction::FileCopied));
//!
//! // Nothing changed, so the second pass is a no-op.
//! assert!(mirror.sync_collect(&source, &replica).is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

mod compare;
mod digest;
mod error;
mod event;
mod mirror;
mod walk;

pub use compare::{compare, needs_update, Verdict};
pub use digest::ContentDigest;
pub use error::{Result, SpecchioError};
pub use event::{CountingSink, EventSink, SyncAction, SyncEvent, TracingSink};
pub use mirror::{Mirror, MirrorBuilder, MirrorConfig, PassStats};
pub use walk::{DirListing, TreeWalk};
