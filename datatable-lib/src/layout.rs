//! Layout mode selection and viewport tracking.
//!
//! The table renders either as a grid or as a list of cards depending on
//! viewport width. Width changes arrive through [`ResizeEvents`]; the
//! [`ViewportTracker`] debounces them and reports breakpoint crossings.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::rc::Weak;
use std::time::Duration;
use std::time::Instant;

/// How rows are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Column grid with a header row.
    #[default]
    Table,
    /// One card per row with label/value pairs.
    Cards,
}

impl LayoutMode {
    /// Cards below the breakpoint, table at or above it.
    pub fn for_width(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint {
            LayoutMode::Cards
        } else {
            LayoutMode::Table
        }
    }
}

/// Debounced viewport width and the layout mode derived from it.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    breakpoint: u32,
    debounce: Duration,
    width: u32,
    mode: LayoutMode,
    pending: Option<(u32, Instant)>,
}

impl ViewportTracker {
    /// Evaluates the mode for the width seen at mount.
    pub fn new(initial_width: u32, breakpoint: u32, debounce: Duration) -> Self {
        Self {
            breakpoint,
            debounce,
            width: initial_width,
            mode: LayoutMode::for_width(initial_width, breakpoint),
            pending: None,
        }
    }

    /// Layout currently in effect.
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Last settled viewport width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Widths below this render as cards.
    pub fn breakpoint(&self) -> u32 {
        self.breakpoint
    }

    /// Returns `true` while a resize is waiting out the debounce window.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a resize. Only the latest width within the debounce window
    /// is kept.
    pub fn on_resize(&mut self, width: u32, at: Instant) {
        self.pending = Some((width, at));
    }

    /// Applies a pending resize once `debounce` has elapsed since it was
    /// recorded. Returns the new mode when the breakpoint was crossed.
    pub fn settle(&mut self, now: Instant) -> Option<LayoutMode> {
        let (width, at) = self.pending?;
        if now.saturating_duration_since(at) < self.debounce {
            return None;
        }
        self.pending = None;
        self.width = width;

        let mode = LayoutMode::for_width(width, self.breakpoint);
        if mode == self.mode {
            return None;
        }
        log::debug!(
            "[layout] width {} crossed breakpoint {}: {:?} -> {:?}",
            width,
            self.breakpoint,
            self.mode,
            mode
        );
        self.mode = mode;
        Some(mode)
    }
}

// =============================================================================
// Resize event source
// =============================================================================

type Listener = Rc<RefCell<dyn FnMut(u32, Instant)>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, Listener>,
}

/// Host-side source of viewport resize events.
///
/// Tables subscribe on mount and receive a [`ResizeSubscription`]; dropping
/// the subscription deregisters the listener.
#[derive(Clone, Default)]
pub struct ResizeEvents {
    inner: Rc<RefCell<Listeners>>,
}

impl ResizeEvents {
    /// An event source with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for width changes.
    pub fn subscribe(&self, listener: impl FnMut(u32, Instant) + 'static) -> ResizeSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.insert(id, Rc::new(RefCell::new(listener)));
        log::trace!("[layout] resize listener {} registered", id);

        ResizeSubscription {
            id,
            source: Rc::downgrade(&self.inner),
        }
    }

    /// Delivers a resize to every listener.
    ///
    /// A listener that emits again from inside its own callback is not
    /// re-entered; the nested resize skips it.
    pub fn emit(&self, width: u32, at: Instant) {
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self.inner.borrow().entries.values().cloned().collect();
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(width, at),
                Err(_) => log::trace!("[layout] skipping busy resize listener at width {width}"),
            }
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl std::fmt::Debug for ResizeEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Keeps a resize listener registered; deregisters it on drop.
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    source: Weak<RefCell<Listeners>>,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(source) = self.source.upgrade() {
            source.borrow_mut().entries.remove(&self.id);
            log::trace!("[layout] resize listener {} removed", self.id);
        }
    }
}
