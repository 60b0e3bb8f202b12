use std::collections::{HashMap, HashSet};

use crate::errors::CoreError;

/// Opaque handle to a live chart owned by a [`ChartBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

/// Drawing backend for per-row trend charts (canvas, terminal, ...).
///
/// `surface` names the drawing surface of one row, `sparkline-{id}`.
/// A surface may only be owned by one live chart at a time, which is why
/// callers must `dispose` before creating on the same surface again.
pub trait ChartBackend {
    fn create_chart(&mut self, surface: &str, samples: &[f64]) -> Result<ChartHandle, CoreError>;

    fn dispose(&mut self, handle: ChartHandle);
}

/// Name of the drawing surface for an asset row.
#[must_use]
pub fn surface_for(id: &str) -> String {
    format!("sparkline-{id}")
}

/// Work done by one [`ChartResourceManager::sync`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub disposed: usize,
    /// Assets whose chart could not be created. They hold no handle.
    pub failed: Vec<String>,
}

/// Keeps exactly one live chart per visible asset.
///
/// Every sync is a full replace: existing charts are disposed and recreated
/// rather than updated in place, and charts of assets that left the view are
/// disposed. Disposal of a key always happens before creation on that key.
pub struct ChartResourceManager {
    backend: Box<dyn ChartBackend>,
    handles: HashMap<String, ChartHandle>,
}

impl std::fmt::Debug for ChartResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartResourceManager")
            .field("live", &self.handles.len())
            .finish()
    }
}

impl ChartResourceManager {
    pub fn new(backend: Box<dyn ChartBackend>) -> Self {
        Self {
            backend,
            handles: HashMap::new(),
        }
    }

    /// Bring live charts in line with `visible` (`(asset id, trend samples)`
    /// in display order).
    ///
    /// 1. Dispose and forget charts whose id is no longer visible.
    /// 2. For each visible id (first occurrence only): dispose the old chart
    ///    if any, then create a new one.
    ///
    /// A failed creation is isolated to its row and reported.
    pub fn sync(&mut self, visible: &[(&str, &[f64])]) -> SyncReport {
        let mut report = SyncReport::default();
        let wanted: HashSet<&str> = visible.iter().map(|(id, _)| *id).collect();

        let stale: Vec<String> = self
            .handles
            .keys()
            .filter(|id| !wanted.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(handle) = self.handles.remove(&id) {
                self.backend.dispose(handle);
                report.disposed += 1;
            }
        }

        let mut done: HashSet<&str> = HashSet::with_capacity(visible.len());
        for (id, samples) in visible {
            if !done.insert(*id) {
                continue;
            }
            if let Some(old) = self.handles.remove(*id) {
                self.backend.dispose(old);
                report.disposed += 1;
            }
            match self.backend.create_chart(&surface_for(id), samples) {
                Ok(handle) => {
                    self.handles.insert((*id).to_string(), handle);
                    report.created += 1;
                }
                Err(e) => {
                    tracing::warn!(asset = %id, error = %e, "chart creation failed");
                    report.failed.push((*id).to_string());
                }
            }
        }

        tracing::debug!(
            created = report.created,
            disposed = report.disposed,
            failed = report.failed.len(),
            "charts synced"
        );
        report
    }

    /// Dispose every live chart.
    pub fn clear(&mut self) -> usize {
        let count = self.handles.len();
        for (_, handle) in self.handles.drain() {
            self.backend.dispose(handle);
        }
        count
    }

    #[must_use]
    pub fn handle(&self, id: &str) -> Option<ChartHandle> {
        self.handles.get(id).copied()
    }

    /// Ids with a live chart, sorted.
    #[must_use]
    pub fn live_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
