//! Cooldown-gated item transport.
//!
//! A [`TransportLink`] is a pipe segment: a single buffered stack that
//! periodically tries to push a batch into whatever [`ItemSink`] sits at
//! its destination. Any accepted amount, however small, restarts the
//! cooldown.

use crate::item::{Inventory, ItemStack, SLOT_STACK_LIMIT};
use serde::{Serialize, Deserialize};

/// Ticks between transfer attempts.
pub const TRANSFER_COOLDOWN: u32 = 20;

/// Most items offered per transfer attempt.
pub const DEFAULT_MAX_BATCH: u32 = 64;

// ---------------------------------------------------------------------------
// ItemSink
// ---------------------------------------------------------------------------

/// Anything that can accept items pushed from a transport link.
///
/// Returns the count actually taken; partial acceptance is normal and
/// zero means the sink is full or incompatible.
pub trait ItemSink {
    fn insert(&mut self, stack: ItemStack) -> u32;
}

/// Bare inventories accept into slot 0, same as a machine's input side.
impl ItemSink for Inventory {
    fn insert(&mut self, stack: ItemStack) -> u32 {
        self.insert_into(0, stack)
    }
}

// ---------------------------------------------------------------------------
// TransportLink
// ---------------------------------------------------------------------------

/// Single-slot buffered pipe segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportLink {
    buffer: Option<ItemStack>,
    cooldown_remaining: u32,
    max_batch: u32,
    cooldown: u32,
}

impl Default for TransportLink {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportLink {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_BATCH, TRANSFER_COOLDOWN)
    }

    pub fn with_limits(max_batch: u32, cooldown: u32) -> Self {
        Self {
            buffer: None,
            cooldown_remaining: 0,
            max_batch,
            cooldown,
        }
    }

    pub fn buffer(&self) -> Option<&ItemStack> {
        self.buffer.as_ref()
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    /// Whether an external inserter could add anything at all.
    pub fn can_accept(&self) -> bool {
        match &self.buffer {
            None => true,
            Some(stack) => stack.count < SLOT_STACK_LIMIT,
        }
    }

    /// Load items into the buffer: merge into a matching stack or fill
    /// an empty buffer, capped at the slot limit. Returns the count taken.
    #[must_use = "returns the count actually inserted, which may be less than offered"]
    pub fn insert(&mut self, stack: ItemStack) -> u32 {
        match &mut self.buffer {
            None => {
                let taken = stack.count.min(SLOT_STACK_LIMIT);
                if taken > 0 {
                    self.buffer = Some(ItemStack::new(stack.kind, taken));
                }
                taken
            }
            Some(existing) if existing.kind == stack.kind => {
                let space = SLOT_STACK_LIMIT - existing.count;
                let taken = stack.count.min(space);
                existing.count += taken;
                taken
            }
            Some(_) => 0,
        }
    }

    /// Pull up to `amount` items back out of the buffer.
    pub fn extract(&mut self, amount: u32) -> Option<ItemStack> {
        let existing = self.buffer.as_mut()?;
        let taken = amount.min(existing.count);
        if taken == 0 {
            return None;
        }
        let kind = existing.kind;
        existing.count -= taken;
        if existing.count == 0 {
            self.buffer = None;
        }
        Some(ItemStack::new(kind, taken))
    }

    /// Advance one tick. `dest` is the sink at the link's destination,
    /// or `None` when nothing item-capable is there this tick.
    ///
    /// Cooldown counts down whether or not a destination exists. A
    /// transfer attempt offers `min(buffered, max_batch)`; any accepted
    /// amount shrinks the buffer and restarts the cooldown.
    pub fn tick(&mut self, dest: Option<&mut dyn ItemSink>) {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
            return;
        }
        let Some(stack) = self.buffer.as_mut() else {
            return;
        };
        let Some(dest) = dest else {
            return;
        };
        let offer = stack.count.min(self.max_batch);
        let accepted = dest.insert(ItemStack::new(stack.kind, offer));
        if accepted > 0 {
            stack.count -= accepted;
            if stack.count == 0 {
                self.buffer = None;
            }
            self.cooldown_remaining = self.cooldown;
        }
    }
}

/// Pipes chain into pipes.
impl ItemSink for TransportLink {
    fn insert(&mut self, stack: ItemStack) -> u32 {
        TransportLink::insert(self, stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ItemKindId;

    fn kind(n: u32) -> ItemKindId {
        ItemKindId(n)
    }

    /// Sink that accepts at most a fixed amount per insert.
    struct ThrottledSink {
        per_insert: u32,
        received: u32,
    }

    impl ItemSink for ThrottledSink {
        fn insert(&mut self, stack: ItemStack) -> u32 {
            let taken = stack.count.min(self.per_insert);
            self.received += taken;
            taken
        }
    }

    #[test]
    fn empty_link_is_a_no_op() {
        let mut link = TransportLink::new();
        let mut sink = Inventory::new(1);
        link.tick(Some(&mut sink));
        assert!(sink.is_empty());
        assert_eq!(link.cooldown_remaining(), 0);
    }

    #[test]
    fn transfers_full_batch_and_starts_cooldown() {
        let mut link = TransportLink::new();
        let _ = link.insert(ItemStack::new(kind(0), 10));
        let mut sink = Inventory::new(1);

        link.tick(Some(&mut sink));
        assert!(link.buffer().is_none());
        assert_eq!(sink.stack(0).unwrap().count, 10);
        assert_eq!(link.cooldown_remaining(), TRANSFER_COOLDOWN);
    }

    #[test]
    fn partial_acceptance_still_resets_cooldown() {
        let mut link = TransportLink::with_limits(64, 20);
        let _ = link.insert(ItemStack::new(kind(0), 64));
        let _ = link.insert(ItemStack::new(kind(0), 36));
        // Buffer caps at the slot limit.
        assert_eq!(link.buffer().unwrap().count, 64);

        let mut sink = ThrottledSink {
            per_insert: 10,
            received: 0,
        };
        link.tick(Some(&mut sink));
        assert_eq!(link.buffer().unwrap().count, 54);
        assert_eq!(sink.received, 10);
        assert_eq!(link.cooldown_remaining(), 20);
    }

    #[test]
    fn offer_capped_by_max_batch() {
        let mut link = TransportLink::with_limits(4, 20);
        let _ = link.insert(ItemStack::new(kind(0), 20));
        let mut sink = Inventory::new(1);

        link.tick(Some(&mut sink));
        assert_eq!(sink.stack(0).unwrap().count, 4);
        assert_eq!(link.buffer().unwrap().count, 16);
    }

    #[test]
    fn cooldown_gates_transfers() {
        let mut link = TransportLink::with_limits(64, 2);
        let _ = link.insert(ItemStack::new(kind(0), 10));
        let mut sink = Inventory::new(1);

        link.tick(Some(&mut sink)); // transfers, cooldown = 2
        link.tick(Some(&mut sink)); // cooldown 2 -> 1
        link.tick(Some(&mut sink)); // cooldown 1 -> 0
        assert_eq!(sink.stack(0).unwrap().count, 10);
        assert_eq!(link.cooldown_remaining(), 0);

        // Next tick can transfer again.
        let _ = link.insert(ItemStack::new(kind(0), 5));
        link.tick(Some(&mut sink));
        assert_eq!(sink.stack(0).unwrap().count, 15);
    }

    #[test]
    fn cooldown_counts_down_without_destination() {
        let mut link = TransportLink::with_limits(64, 3);
        let _ = link.insert(ItemStack::new(kind(0), 10));
        let mut sink = Inventory::new(1);

        link.tick(Some(&mut sink));
        assert_eq!(link.cooldown_remaining(), 3);
        link.tick(None);
        link.tick(None);
        link.tick(None);
        assert_eq!(link.cooldown_remaining(), 0);
    }

    #[test]
    fn rejected_transfer_leaves_cooldown_unset() {
        let mut link = TransportLink::new();
        let _ = link.insert(ItemStack::new(kind(0), 10));
        // Sink already holds a foreign kind.
        let mut sink = Inventory::new(1);
        let _ = sink.insert_into(0, ItemStack::new(kind(9), 1));

        link.tick(Some(&mut sink));
        assert_eq!(link.buffer().unwrap().count, 10);
        assert_eq!(link.cooldown_remaining(), 0);
    }

    #[test]
    fn insert_rejects_mismatched_kind() {
        let mut link = TransportLink::new();
        let _ = link.insert(ItemStack::new(kind(0), 5));
        assert_eq!(link.insert(ItemStack::new(kind(1), 5)), 0);
        assert!(link.can_accept());
    }

    #[test]
    fn extract_partial_and_clearing() {
        let mut link = TransportLink::new();
        let _ = link.insert(ItemStack::new(kind(0), 8));

        assert_eq!(link.extract(3), Some(ItemStack::new(kind(0), 3)));
        assert_eq!(link.extract(100), Some(ItemStack::new(kind(0), 5)));
        assert!(link.extract(1).is_none());
        assert!(link.buffer().is_none());
    }

    #[test]
    fn pipes_chain_into_pipes() {
        let mut upstream = TransportLink::new();
        let mut downstream = TransportLink::new();
        let _ = upstream.insert(ItemStack::new(kind(0), 30));

        upstream.tick(Some(&mut downstream));
        assert!(upstream.buffer().is_none());
        assert_eq!(downstream.buffer().unwrap().count, 30);
    }
}
