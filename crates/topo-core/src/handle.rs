//! The topology handle (component C3, spec.md §4.1).
//!
//! "The only process-wide state the core introduces." Threaded by
//! reference through every editor/inserter call; carries the back end, the
//! geometry kernel, and the cancellation flag from spec.md §5.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::TopologyBackend;
use crate::config::Tolerance;
use crate::error::TopoError;
use crate::geom::GeometryKernel;

/// `LoadTopology`/`FreeTopology` realized as construction/`Drop`
/// (spec.md §4.1). Generic over the back end and geometry kernel so a
/// caller can swap in a real store/engine behind the same editors.
pub struct Topology<B: TopologyBackend, G: GeometryKernel> {
    pub(crate) backend: B,
    pub(crate) geom: G,
    name: String,
    interrupt: AtomicBool,
}

impl<B: TopologyBackend, G: GeometryKernel> Topology<B, G> {
    /// `LoadTopology(iface, name)`.
    #[tracing::instrument(skip(backend, geom))]
    pub fn load(name: impl Into<String>, backend: B, geom: G) -> Result<Self, TopoError> {
        let name = name.into();
        tracing::debug!(topology = %name, srid = backend.srid(), "loaded topology");
        Ok(Self { backend, geom, name, interrupt: AtomicBool::new(false) })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn srid(&self) -> i32 {
        self.backend.srid()
    }

    pub fn has_z(&self) -> bool {
        self.backend.has_z()
    }

    /// The topology's configured coordinate tolerance (spec.md §3's
    /// `precision`, 0 meaning "use the machine-scale floor").
    pub fn tolerance(&self) -> Tolerance {
        let p = self.backend.precision();
        if p > 0.0 {
            Tolerance::fixed(p)
        } else {
            Tolerance::floating()
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn geom(&self) -> &G {
        &self.geom
    }

    /// Request a clean abort of the current/next long-running operation
    /// (spec.md §5: "a process-wide interrupt flag... requests a clean
    /// abort").
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    pub fn clear_interrupt(&self) {
        self.interrupt.store(false, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    pub(crate) fn check_interrupted(&self) -> Result<(), TopoError> {
        if self.is_interrupted() {
            Err(TopoError::Interrupted)
        } else {
            Ok(())
        }
    }
}

// `FreeTopology` realized as `Drop`: the mock backend needs no explicit
// release, but the trait boundary models the call for backends that do.
impl<B: TopologyBackend, G: GeometryKernel> Drop for Topology<B, G> {
    fn drop(&mut self) {
        tracing::debug!(topology = %self.name, "freed topology");
    }
}
