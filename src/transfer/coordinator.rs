//! Transfer coordination.
//!
//! The [`TransferCoordinator`] owns the single transfer slot: it accepts or
//! rejects new transfers, routes incoming chunks to the active session,
//! deduplicates against local content by checksum, and finalizes completed
//! transfers per content kind. Everything the coordinator needs from the
//! surrounding client (progress display, world registry, scripting engine
//! host) is supplied through the [`TransferDelegate`] trait at construction.
//!
//! ## State Machine
//! ```text
//!           start_download (no dedup hit)
//!   Idle ---------------------------------> Active(session)
//!   Idle <--------------------------------- Active(session)
//!           end (matching id) / cancel
//! ```
//! `start_download` while `Active` rejects without a transition. `end` with a
//! mismatched id notifies and leaves the slot untouched (see the method docs).

use crate::config::StorageConfig;
use crate::content::map::ServerMap;
use crate::error::{CoreError, Result};
use crate::transfer::session::{script_name_from_path, FileKind, TransferSession};
use crate::transfer::staging::{ScriptStaging, StagedScript};
use crate::utils::checksum;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, warn};

/// Everything the coordinator asks of the surrounding client.
///
/// Implementations are expected to be cheap; every method is called
/// synchronously from the transport event sequence driving the coordinator.
pub trait TransferDelegate: Send {
    /// One progress notification per received chunk. `label` is the target
    /// path for on-disk kinds and the kind name otherwise; `fraction` is
    /// bytes received over the declared length.
    fn download_progress(&self, label: &str, fraction: f32);

    /// A user-visible notification (mismatched end ids, undecodable maps).
    fn notify(&self, message: &str);

    /// Register a decoded map with the world/content registry.
    fn register_map(&self, map: ServerMap);

    /// Hand a batch of staged scripts to the scripting engine host for
    /// activation, in staging order.
    fn activate_scripts(&self, scripts: Vec<StagedScript>);

    /// First batch after joining a server finished activating; the client
    /// should leave its loading/camera state.
    fn joined_world(&self);

    /// A full batch of downloads (terminated by the sentinel) completed.
    fn downloads_finished(&self);
}

/// Single-slot manager for inbound content transfers.
///
/// There is no internal locking: `&mut self` methods must be driven from one
/// logical sequence, typically the network event thread. The single optional
/// session is the entire concurrency contract for transfers.
pub struct TransferCoordinator {
    download_dir: PathBuf,
    delegate: Box<dyn TransferDelegate>,
    active: Option<TransferSession>,
    staging: ScriptStaging,
    just_joined: bool,
}

impl TransferCoordinator {
    /// Create a coordinator storing content beneath `download_dir`.
    pub fn new(download_dir: impl Into<PathBuf>, delegate: Box<dyn TransferDelegate>) -> Self {
        Self {
            download_dir: download_dir.into(),
            delegate,
            active: None,
            staging: ScriptStaging::new(),
            just_joined: false,
        }
    }

    /// Create a coordinator from the storage section of the configuration.
    pub fn from_config(storage: &StorageConfig, delegate: Box<dyn TransferDelegate>) -> Self {
        Self::new(storage.download_dir.clone(), delegate)
    }

    /// Arm the one-shot join transition: the next completed batch also fires
    /// [`TransferDelegate::joined_world`]. Called by the connection layer
    /// right after a server accepts the peer.
    pub fn mark_just_joined(&mut self) {
        self.just_joined = true;
    }

    /// Whether a transfer currently occupies the slot.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Number of scripts currently staged for the next activation batch.
    pub fn staged_script_count(&self) -> usize {
        self.staging.len()
    }

    /// Offer a new transfer.
    ///
    /// Returns `Ok(false)` when the slot is busy, and also when a local file
    /// at the target path already hashes to the offered checksum — in that
    /// case no session is allocated and, for scripts, the on-disk text is
    /// staged directly. Returns `Ok(true)` once a session occupies the slot.
    pub fn start_download(
        &mut self,
        id: i32,
        path: &str,
        kind: FileKind,
        length: i32,
        checksum_hex: &str,
        resource: &str,
    ) -> Result<bool> {
        if self.active.is_some() {
            debug!(id, path, "transfer rejected: slot busy");
            return Ok(false);
        }

        let target = self.resolve_target(path)?;

        if kind.persisted() && target.is_file() {
            let local = checksum::file_md5_hex(&target)?;
            if checksum::checksum_matches(&local, checksum_hex) {
                debug!(id, path, "transfer skipped: local content matches offered checksum");
                if kind == FileKind::Script {
                    let source = fs::read_to_string(&target)?;
                    self.staging
                        .push(StagedScript::new(script_name_from_path(path), resource, source));
                }
                return Ok(false);
            }
        }

        let session = TransferSession::create(id, path, &target, kind, length, resource)?;
        self.active = Some(session);
        Ok(true)
    }

    /// Append a chunk to the active session and emit a progress notification.
    ///
    /// A chunk for a missing or mismatched id is dropped without diagnostics:
    /// the peer may still be flushing parts of a transfer that was already
    /// ended or cancelled, and that tail is expected noise.
    pub fn download_part(&mut self, id: i32, bytes: &[u8]) -> Result<()> {
        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };
        if session.id() != id {
            return Ok(());
        }

        session.write(bytes)?;

        let fraction = session.progress();
        let label = session.progress_label().to_string();
        self.delegate.download_progress(&label, fraction);
        Ok(())
    }

    /// Finalize the active session.
    ///
    /// On an id mismatch this emits a user-visible diagnostic (unlike the
    /// silent drop in [`download_part`](Self::download_part)) and returns
    /// with the slot untouched: the session that owns the slot keeps it, and
    /// only its own matching `end` releases it.
    pub fn end(&mut self, id: i32) -> Result<()> {
        let have = self.active.as_ref().map(TransferSession::id);
        if have != Some(id) {
            warn!(?have, supplied = id, "transfer end id mismatch");
            let have_label = have.map_or_else(|| "none".to_string(), |v| v.to_string());
            self.delegate.notify(&format!(
                "END channel mismatch! We have {have_label} and supplied was {id}"
            ));
            return Ok(());
        }

        let Some(mut session) = self.active.take() else {
            return Ok(());
        };

        match session.kind() {
            FileKind::Map => match ServerMap::from_bytes(session.buffered_bytes()) {
                Ok(map) => {
                    debug!(name = %map.name, entities = map.entity_count(), "map decoded");
                    self.delegate.register_map(map);
                }
                Err(e) => {
                    error!(error = %e, resource = session.resource(), "map payload failed to decode");
                    self.delegate.notify(&format!("ERROR DOWNLOADING MAP: {e}"));
                }
            },
            FileKind::Script => {
                // UTF-8 with replacement: a stray byte must not abort the batch
                let source = String::from_utf8_lossy(session.buffered_bytes()).into_owned();
                self.staging.push(StagedScript::new(
                    session.script_name(),
                    session.resource(),
                    source,
                ));
            }
            FileKind::EndOfTransfer => {
                let batch = self.staging.drain();
                debug!(scripts = batch.len(), "activating staged script batch");
                self.delegate.activate_scripts(batch);

                if self.just_joined {
                    self.delegate.joined_world();
                    self.just_joined = false;
                }

                self.delegate.downloads_finished();
            }
            FileKind::Normal => {}
        }

        session.dispose();
        Ok(())
    }

    /// Abort the active transfer, if any.
    ///
    /// The slot is cleared without the flush step of a normal finalize;
    /// whatever already reached disk stays there as-is.
    pub fn cancel(&mut self) {
        if let Some(session) = self.active.take() {
            debug!(id = session.id(), path = session.path(), "transfer cancelled");
        }
    }

    /// Resolve a peer-supplied path strictly beneath the storage root.
    fn resolve_target(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(CoreError::InvalidPath(path.to_string()));
        }
        Ok(self.download_dir.join(rel))
    }
}

impl std::fmt::Debug for TransferCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferCoordinator")
            .field("download_dir", &self.download_dir)
            .field("active", &self.active)
            .field("staged", &self.staging.len())
            .field("just_joined", &self.just_joined)
            .finish_non_exhaustive()
    }
}
