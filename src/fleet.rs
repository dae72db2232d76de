use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::limits::*;
use crate::model::*;

/// A validated, immutable fleet snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    karts: Vec<Kart>,
}

impl Fleet {
    pub fn new(karts: Vec<Kart>) -> Result<Self, FleetError> {
        validate(&karts)?;
        Ok(Self { karts })
    }

    /// Parse a JSON array of karts.
    pub fn from_json(bytes: &[u8]) -> Result<Self, FleetError> {
        let karts: Vec<Kart> =
            serde_json::from_slice(bytes).map_err(|e| FleetError::Parse(e.to_string()))?;
        Self::new(karts)
    }

    pub fn load(path: &Path) -> Result<Self, FleetError> {
        let bytes = std::fs::read(path).map_err(FleetError::Io)?;
        Self::from_json(&bytes)
    }

    pub fn karts(&self) -> &[Kart] {
        &self.karts
    }

    pub fn len(&self) -> usize {
        self.karts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.karts.is_empty()
    }
}

fn validate(karts: &[Kart]) -> Result<(), FleetError> {
    if karts.len() > MAX_KARTS {
        return Err(FleetError::LimitExceeded("too many karts"));
    }
    for kart in karts {
        if kart.id.len() > MAX_ID_LEN {
            return Err(FleetError::LimitExceeded("kart id too long"));
        }
        if kart.interval_count() > MAX_INTERVALS_PER_KART {
            return Err(FleetError::LimitExceeded("too many intervals on one kart"));
        }
        for span in kart.occupancy() {
            if span.start < MIN_VALID_TIMESTAMP_MS || span.end > MAX_VALID_TIMESTAMP_MS {
                return Err(FleetError::LimitExceeded("timestamp out of range"));
            }
        }
    }
    Ok(())
}

/// Holds the current snapshot. Readers clone the `Arc` and compute without
/// holding the lock; a reload swaps the whole snapshot at once.
pub struct FleetStore {
    source: Option<PathBuf>,
    current: RwLock<Arc<Fleet>>,
}

impl FleetStore {
    /// In-memory store with no backing file; `reload` is unavailable.
    pub fn new(fleet: Fleet) -> Self {
        metrics::gauge!(crate::observability::FLEET_KARTS).set(fleet.len() as f64);
        Self {
            source: None,
            current: RwLock::new(Arc::new(fleet)),
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FleetError> {
        let path = path.into();
        let fleet = Fleet::load(&path)?;
        metrics::gauge!(crate::observability::FLEET_KARTS).set(fleet.len() as f64);
        Ok(Self {
            source: Some(path),
            current: RwLock::new(Arc::new(fleet)),
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub async fn snapshot(&self) -> Arc<Fleet> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, fleet: Fleet) {
        metrics::gauge!(crate::observability::FLEET_KARTS).set(fleet.len() as f64);
        *self.current.write().await = Arc::new(fleet);
    }

    /// Re-read the backing file. On failure the previous snapshot stays live.
    pub async fn reload(&self) -> Result<usize, FleetError> {
        let result = self.try_reload().await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(crate::observability::RELOADS_TOTAL, "status" => status).increment(1);
        match &result {
            Ok(n) => info!("fleet reloaded: {n} karts"),
            Err(e) => warn!("fleet reload failed, keeping previous snapshot: {e}"),
        }
        result
    }

    async fn try_reload(&self) -> Result<usize, FleetError> {
        let path = self.source.as_ref().ok_or(FleetError::NoSource)?;
        let bytes = tokio::fs::read(path).await.map_err(FleetError::Io)?;
        let fleet = Fleet::from_json(&bytes)?;
        let n = fleet.len();
        self.replace(fleet).await;
        Ok(n)
    }
}

#[derive(Debug)]
pub enum FleetError {
    Io(std::io::Error),
    Parse(String),
    LimitExceeded(&'static str),
    NoSource,
}

impl std::fmt::Display for FleetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetError::Io(e) => write!(f, "fleet snapshot I/O error: {e}"),
            FleetError::Parse(e) => write!(f, "fleet snapshot parse error: {e}"),
            FleetError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            FleetError::NoSource => write!(f, "fleet has no backing file to reload"),
        }
    }
}

impl std::error::Error for FleetError {}
