//! Scoped registration of page-wide pointer listeners.
//!
//! A widget that starts a drag acquires a [`CaptureGuard`] from the shared
//! [`PointerCapture`] registry. While the guard is alive the host routes
//! move/up events to that widget no matter where the pointer is. Dropping the
//! guard deregisters, so a drag that ends, a widget that resets, and a widget
//! that is torn down mid-drag all leave the registry clean.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Input device that started a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse button drag.
    Mouse,
    /// Touch drag, tracked through the first touch point.
    Touch,
}

/// Identifies the widget holding a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaptureOwner {
    /// The selection tool.
    Selection,
    /// The compare slider.
    Slider,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: BTreeMap<u64, (CaptureOwner, PointerKind)>,
}

/// Shared registry of active global pointer listeners.
///
/// Cloning yields another handle to the same registry. Single-threaded by
/// construction: every transition happens inside an event handler.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    registry: Rc<RefCell<Registry>>,
}

impl PointerCapture {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register global move/up listeners for `owner`.
    ///
    /// The listeners stay registered until the returned guard is dropped.
    #[must_use = "dropping the guard immediately deregisters the listeners"]
    pub fn acquire(&self, owner: CaptureOwner, kind: PointerKind) -> CaptureGuard {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.active.insert(id, (owner, kind));
        log::debug!("capture acquired: {owner:?} via {kind:?} (id {id})");
        CaptureGuard {
            id,
            owner,
            kind,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Whether `owner` currently holds any global listeners.
    #[must_use]
    pub fn is_captured(&self, owner: CaptureOwner) -> bool {
        self.registry
            .borrow()
            .active
            .values()
            .any(|(o, _)| *o == owner)
    }

    /// Number of live registrations across all owners.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.registry.borrow().active.len()
    }
}

/// A live global listener registration; deregisters on drop.
#[derive(Debug)]
pub struct CaptureGuard {
    id: u64,
    owner: CaptureOwner,
    kind: PointerKind,
    registry: Weak<RefCell<Registry>>,
}

impl CaptureGuard {
    /// Widget that owns this registration.
    #[must_use]
    pub fn owner(&self) -> CaptureOwner {
        self.owner
    }

    /// Device that started the drag.
    #[must_use]
    pub fn kind(&self) -> PointerKind {
        self.kind
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().active.remove(&self.id);
            log::debug!("capture released: {:?} (id {})", self.owner, self.id);
        }
    }
}
