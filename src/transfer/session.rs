//! Transfer sessions.
//!
//! A [`TransferSession`] owns the mutable state of one in-flight file
//! transfer: the backing storage handle for disk-persisted kinds, the
//! in-memory accumulation buffer for kinds that are decoded at completion,
//! and the running byte count used for progress display.

use crate::error::Result;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Kind of content carried by a transfer.
///
/// The kind decides where incoming bytes go and what happens at completion:
///
/// | Kind            | Disk | Buffer | At completion                    |
/// |-----------------|------|--------|----------------------------------|
/// | `Normal`        | yes  | no     | nothing (already persisted)      |
/// | `Map`           | no   | yes    | decoded and registered           |
/// | `Script`        | yes  | yes    | staged for batch activation      |
/// | `EndOfTransfer` | no   | yes    | staging flushed, batch activated |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    /// Opaque file, persisted to disk only
    Normal,
    /// Binary map payload, buffered and deserialized at completion
    Map,
    /// Script text, persisted and buffered
    Script,
    /// Zero-length sentinel closing a batch of transfers
    EndOfTransfer,
}

impl FileKind {
    /// Whether this kind is written through to local storage.
    pub fn persisted(self) -> bool {
        matches!(self, FileKind::Normal | FileKind::Script)
    }

    /// Whether this kind accumulates bytes in memory for finalization.
    pub fn buffered(self) -> bool {
        !matches!(self, FileKind::Normal)
    }

    /// Display label used in progress notifications for non-file kinds.
    pub fn name(self) -> &'static str {
        match self {
            FileKind::Normal => "Normal",
            FileKind::Map => "Map",
            FileKind::Script => "Script",
            FileKind::EndOfTransfer => "EndOfTransfer",
        }
    }
}

/// The state of one in-flight transfer.
///
/// Invariants: the storage handle is present iff the kind is persisted, the
/// buffer is present iff the kind is buffered, and `bytes_written` increases
/// monotonically with each [`write`](Self::write). The declared length is
/// informational (progress display) and never caps the written bytes.
#[derive(Debug)]
pub struct TransferSession {
    id: i32,
    /// Target path exactly as supplied by the peer, relative to the storage root
    path: String,
    kind: FileKind,
    declared_len: i32,
    bytes_written: u64,
    resource: String,
    file: Option<File>,
    buffer: Option<BytesMut>,
}

impl TransferSession {
    /// Allocate a session, creating local storage as needed.
    ///
    /// For persisted kinds the parent directories of `target` are created
    /// recursively and the file itself is created or truncated. Buffered
    /// kinds get an empty accumulation buffer.
    pub fn create(
        id: i32,
        path: &str,
        target: &Path,
        kind: FileKind,
        declared_len: i32,
        resource: &str,
    ) -> Result<Self> {
        let file = if kind.persisted() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            Some(
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(target)?,
            )
        } else {
            None
        };

        let buffer = kind.buffered().then(BytesMut::new);

        debug!(id, path, kind = kind.name(), declared_len, resource, "transfer session allocated");

        Ok(Self {
            id,
            path: path.to_string(),
            kind,
            declared_len,
            bytes_written: 0,
            resource: resource.to_string(),
            file,
            buffer,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Target path as supplied by the peer.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Bytes accumulated in memory; empty for `Normal` transfers.
    pub fn buffered_bytes(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or(&[])
    }

    /// Append a chunk to whichever of disk and buffer this kind carries.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(bytes)?;
        }

        if let Some(buffer) = self.buffer.as_mut() {
            buffer.extend_from_slice(bytes);
        }

        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Fraction of the declared length received so far, for progress display.
    pub fn progress(&self) -> f32 {
        if self.declared_len > 0 {
            self.bytes_written as f32 / self.declared_len as f32
        } else {
            0.0
        }
    }

    /// Label shown alongside progress: the target path for on-disk kinds,
    /// the kind name otherwise.
    pub fn progress_label(&self) -> &str {
        if self.kind.persisted() {
            &self.path
        } else {
            self.kind.name()
        }
    }

    /// Logical script name derived from the target path: the file stem with
    /// `.` replaced by `_`, so dotted filenames stay valid identifiers for
    /// the scripting engine host.
    pub fn script_name(&self) -> String {
        script_name_from_path(&self.path)
    }

    /// Flush and release the storage handle. Safe to call when none exists.
    pub fn dispose(&mut self) {
        if let Some(file) = self.file.take() {
            // sync_all failure is not actionable at this point; the bytes
            // were already acknowledged chunk by chunk
            let _ = file.sync_all();
        }
        self.buffer = None;
    }
}

/// File stem of `path` with `.` replaced by `_`.
pub(crate) fn script_name_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
        .replace('.', "_")
}
