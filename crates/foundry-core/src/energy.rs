//! Rate-limited energy storage.
//!
//! [`EnergyStore`] is the single energy primitive shared by machines and
//! cables. All flow goes through `receive`/`extract`, which clamp against
//! per-operation rate limits and current fill rather than failing. The
//! `simulate` flag answers "how much would fit?" without mutating, which
//! is what makes the two-phase distribution in [`crate::network`] safe.

use crate::fixed::{Fixed64, fraction_u32};

/// Change callback invoked after every committed store mutation.
pub type ChangeHook = Box<dyn FnMut() + Send>;

// ---------------------------------------------------------------------------
// EnergyStore
// ---------------------------------------------------------------------------

/// A bounded energy buffer with independent receive and extract rate caps.
///
/// Invariant: `stored <= capacity` at all times. Both transfer operations
/// clamp; neither can fail or overdraw.
pub struct EnergyStore {
    capacity: u32,
    stored: u32,
    max_receive: u32,
    max_extract: u32,
    on_change: Option<ChangeHook>,
}

impl std::fmt::Debug for EnergyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnergyStore")
            .field("capacity", &self.capacity)
            .field("stored", &self.stored)
            .field("max_receive", &self.max_receive)
            .field("max_extract", &self.max_extract)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl EnergyStore {
    /// Create an empty store.
    pub fn new(capacity: u32, max_receive: u32, max_extract: u32) -> Self {
        Self {
            capacity,
            stored: 0,
            max_receive,
            max_extract,
            on_change: None,
        }
    }

    /// Create a store pre-filled with `stored` energy (clamped to capacity).
    pub fn with_stored(capacity: u32, max_receive: u32, max_extract: u32, stored: u32) -> Self {
        let mut store = Self::new(capacity, max_receive, max_extract);
        store.stored = stored.min(capacity);
        store
    }

    /// Register a hook fired after each committed nonzero change.
    /// Simulated calls never fire it.
    pub fn set_on_change(&mut self, hook: ChangeHook) {
        self.on_change = Some(hook);
    }

    // -- queries ------------------------------------------------------------

    pub fn stored(&self) -> u32 {
        self.stored
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn max_receive(&self) -> u32 {
        self.max_receive
    }

    pub fn max_extract(&self) -> u32 {
        self.max_extract
    }

    pub fn is_full(&self) -> bool {
        self.stored == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.stored == 0
    }

    /// Fill level in `[0, 1]`. A zero-capacity store reports 0.
    pub fn fill_fraction(&self) -> Fixed64 {
        fraction_u32(self.stored, self.capacity)
    }

    /// How much of `amount` a receive would accept right now.
    pub fn receivable(&self, amount: u32) -> u32 {
        amount.min(self.max_receive).min(self.capacity - self.stored)
    }

    /// How much of `amount` an extract would yield right now.
    pub fn extractable(&self, amount: u32) -> u32 {
        amount.min(self.max_extract).min(self.stored)
    }

    // -- transfers ----------------------------------------------------------

    /// Accept up to `amount` energy. Returns the amount accepted, clamped by
    /// `max_receive` and remaining space. With `simulate` set, reports the
    /// same value without changing state.
    #[must_use = "returns the amount actually accepted, which may be less than requested"]
    pub fn receive(&mut self, amount: u32, simulate: bool) -> u32 {
        let accepted = self.receivable(amount);
        if !simulate && accepted > 0 {
            self.stored += accepted;
            debug_assert!(self.stored <= self.capacity);
            self.notify();
        }
        accepted
    }

    /// Withdraw up to `amount` energy. Returns the amount withdrawn, clamped
    /// by `max_extract` and current fill. With `simulate` set, reports the
    /// same value without changing state.
    #[must_use = "returns the amount actually withdrawn, which may be less than requested"]
    pub fn extract(&mut self, amount: u32, simulate: bool) -> u32 {
        let withdrawn = self.extractable(amount);
        if !simulate && withdrawn > 0 {
            self.stored -= withdrawn;
            self.notify();
        }
        withdrawn
    }

    /// Force the fill level, clamping to capacity. For host load paths,
    /// not for in-sim transfer. Does not fire the change hook.
    pub fn set_stored(&mut self, stored: u32) {
        self.stored = stored.min(self.capacity);
    }

    fn notify(&mut self) {
        if let Some(hook) = self.on_change.as_mut() {
            hook();
        }
    }
}
