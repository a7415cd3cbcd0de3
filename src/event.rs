//! Sync events and the sinks that consume them.
//!
//! The engine never talks to a logger directly. It emits one immutable
//! [`SyncEvent`] per action (or per isolated failure) to an injected
//! [`EventSink`]; persisting or printing them is the sink's problem. Sinks
//! cannot fail back into the engine.

use std::path::{Path, PathBuf};

use crate::error::SpecchioError;

/// What a single sync event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncAction {
    /// A replica directory was created.
    DirCreated,
    /// A file was copied from source onto the replica.
    FileCopied,
    /// A replica-only file was removed.
    FileRemoved,
    /// A replica-only directory was removed.
    DirRemoved,
    /// A per-entry operation failed and was skipped.
    Error,
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DirCreated => "dir-created",
            Self::FileCopied => "file-copied",
            Self::FileRemoved => "file-removed",
            Self::DirRemoved => "dir-removed",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// One action taken (or failure isolated) during a synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    /// The action that occurred.
    pub action: SyncAction,
    /// The filesystem entry the action applied to. For copies and
    /// removals this is the replica-side path.
    pub path: PathBuf,
    /// Human-readable cause, present only for [`SyncAction::Error`].
    pub detail: Option<String>,
}

impl SyncEvent {
    /// A successful action on `path`.
    #[must_use]
    pub fn new(action: SyncAction, path: impl Into<PathBuf>) -> Self {
        Self {
            action,
            path: path.into(),
            detail: None,
        }
    }

    /// An error event carrying the failure's rendered cause.
    #[must_use]
    pub fn failure(err: &SpecchioError) -> Self {
        Self {
            action: SyncAction::Error,
            path: err.path().clone(),
            detail: Some(err.to_string()),
        }
    }

    /// Whether this event references `path`.
    #[must_use]
    pub fn is_for(&self, path: &Path) -> bool {
        self.path == path
    }
}

/// Consumer of sync events, in emission order.
///
/// Implementations must be cheap (the engine assumes writes are fast or
/// buffered) and must not panic: the engine has no way to recover from a
/// sink failure mid-pass.
pub trait EventSink {
    /// Record one event.
    fn record(&mut self, event: SyncEvent);
}

/// Collecting sink: the returned-sequence form of the invocation contract.
impl EventSink for Vec<SyncEvent> {
    fn record(&mut self, event: SyncEvent) {
        self.push(event);
    }
}

/// Sink that forwards events to the `tracing` subscriber installed by the
/// surrounding process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing-backed sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn record(&mut self, event: SyncEvent) {
        let path = event.path.display();
        match event.action {
            SyncAction::Error => {
                let detail = event.detail.as_deref().unwrap_or("unknown error");
                tracing::error!(path = %path, "{detail}");
            }
            action => tracing::info!(path = %path, "{action}"),
        }
    }
}

/// Sink adapter that counts events without retaining them.
///
/// Useful for callers that only care whether a pass was a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingSink {
    /// Number of non-error events recorded.
    pub actions: u64,
    /// Number of error events recorded.
    pub errors: u64,
}

impl EventSink for CountingSink {
    fn record(&mut self, event: SyncEvent) {
        if event.action == SyncAction::Error {
            self.errors += 1;
        } else {
            self.actions += 1;
        }
    }
}
