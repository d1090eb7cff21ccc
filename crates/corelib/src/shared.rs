//! Shared, lock-protected registry handle.
//!
//! The registry itself is single-owner. Hosts that query it from several
//! threads share one `SharedRegistry`; writers serialise on the lock and
//! readers never observe a half-applied mutation.

use crate::node::{NodeRecord, Pnid};
use crate::registry::NodeRegistry;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<NodeRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: NodeRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, NodeRegistry> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, NodeRegistry> {
        self.inner.write()
    }

    /// Swap in a whole new registry, returning the old one.
    pub fn replace(&self, registry: NodeRegistry) -> NodeRegistry {
        std::mem::replace(&mut *self.inner.write(), registry)
    }

    /// Owned copy of the failover group containing `name`.
    ///
    /// Guards cannot outlive the call, so members are cloned out.
    pub fn spare_set(&self, name: &str) -> Vec<NodeRecord> {
        let registry = self.read();
        registry
            .compute_spare_set(name)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn find_pnid_by_name(&self, name: &str) -> Option<Pnid> {
        self.read().find_pnid_by_name(name)
    }
}

impl From<NodeRegistry> for SharedRegistry {
    fn from(registry: NodeRegistry) -> Self {
        Self::new(registry)
    }
}
