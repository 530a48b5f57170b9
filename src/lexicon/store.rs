/*!
 * Process-wide lexicon store.
 *
 * The store owns the current `Lexicon` snapshot behind a read-write lock.
 * Readers clone an `Arc` to a whole snapshot; `reload` builds a new lexicon
 * off to the side and swaps it in one step, so a reader never observes a
 * partially updated table.
 */

use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;

use super::Lexicon;
use crate::errors::LexiconLoadError;

/// Where the lexicon is loaded from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexiconSource {
    /// The asset compiled into the binary
    #[default]
    Builtin,
    /// A JSON file on disk
    File(PathBuf),
    /// A lexicon built in memory; there is nothing to re-read
    Memory,
}

impl LexiconSource {
    /// Build a source from an optional path
    pub fn from_optional_path(path: Option<PathBuf>) -> Self {
        path.map(Self::File).unwrap_or_default()
    }

    /// Load and validate a lexicon from this source
    pub fn load(&self) -> Result<Lexicon, LexiconLoadError> {
        match self {
            Self::Builtin => Lexicon::builtin(),
            Self::File(path) => Lexicon::from_path(path),
            Self::Memory => Err(LexiconLoadError::NoAsset(self.to_string())),
        }
    }
}

impl std::fmt::Display for LexiconSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in lexicon"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str("in-memory lexicon"),
        }
    }
}

/// Shared, read-only lexicon with atomic reload
#[derive(Debug)]
pub struct LexiconStore {
    /// Current snapshot
    current: RwLock<Arc<Lexicon>>,
    /// Source used by `reload`
    source: LexiconSource,
}

impl LexiconStore {
    /// Load the lexicon from `source`; fails if any entry is invalid
    pub fn load(source: LexiconSource) -> Result<Self, LexiconLoadError> {
        let lexicon = source.load()?;
        info!("Loaded {} from {}", lexicon.summary(), source);
        Ok(Self {
            current: RwLock::new(Arc::new(lexicon)),
            source,
        })
    }

    /// Wrap an already-built lexicon; `reload` keeps it as it is
    pub fn from_lexicon(lexicon: Lexicon) -> Result<Self, LexiconLoadError> {
        lexicon.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(lexicon)),
            source: LexiconSource::Memory,
        })
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<Lexicon> {
        Arc::clone(&*self.current.read())
    }

    /// Where this store reloads from
    pub fn source(&self) -> &LexiconSource {
        &self.source
    }

    /// Re-read the source and swap the snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is returned.
    /// An in-memory store has no asset to re-read: its current snapshot is
    /// validated again and kept.
    pub fn reload(&self) -> Result<Arc<Lexicon>, LexiconLoadError> {
        if self.source == LexiconSource::Memory {
            let current = self.snapshot();
            current.validate()?;
            info!("Kept {} from {}", current.summary(), self.source);
            return Ok(current);
        }

        match self.source.load() {
            Ok(lexicon) => {
                info!("Reloaded {} from {}", lexicon.summary(), self.source);
                self.replace(lexicon)
            }
            Err(e) => {
                warn!("Lexicon reload from {} failed, keeping previous snapshot: {}", self.source, e);
                Err(e)
            }
        }
    }

    /// Validate and swap in a new lexicon
    pub fn replace(&self, lexicon: Lexicon) -> Result<Arc<Lexicon>, LexiconLoadError> {
        lexicon.validate()?;
        let next = Arc::new(lexicon);
        *self.current.write() = Arc::clone(&next);
        Ok(next)
    }
}
