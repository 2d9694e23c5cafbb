//! Item stacks, slot inventories, and the item catalog.

use crate::id::ItemKindId;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;

/// Largest count a single inventory slot (or pipe buffer) holds.
pub const SLOT_STACK_LIMIT: u32 = 64;

// ---------------------------------------------------------------------------
// ItemStack
// ---------------------------------------------------------------------------

/// A homogeneous stack of items. A stack with count 0 should not be
/// stored; inventories use `Option<ItemStack>` and clear emptied slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKindId,
    pub count: u32,
}

impl ItemStack {
    pub fn new(kind: ItemKindId, count: u32) -> Self {
        Self { kind, count }
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// A fixed-size bank of single-stack slots.
///
/// Slot meaning (input, output, upgrade) is assigned by the owner; the
/// inventory itself only enforces the merge rule and the per-slot limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn stack(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Replace a slot's contents wholesale, clamping the count to the
    /// slot limit. Out-of-range slots are ignored.
    pub fn set_stack(&mut self, slot: usize, stack: Option<ItemStack>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = stack
                .filter(|s| s.count > 0)
                .map(|s| ItemStack::new(s.kind, s.count.min(SLOT_STACK_LIMIT)));
        }
    }

    /// Insert into one slot, merging with a matching stack or filling an
    /// empty one. Returns the count actually taken; a mismatched kind or a
    /// full slot takes 0.
    #[must_use = "returns the count actually inserted, which may be less than offered"]
    pub fn insert_into(&mut self, slot: usize, stack: ItemStack) -> u32 {
        let Some(entry) = self.slots.get_mut(slot) else {
            return 0;
        };
        match entry {
            None => {
                let taken = stack.count.min(SLOT_STACK_LIMIT);
                if taken > 0 {
                    *entry = Some(ItemStack::new(stack.kind, taken));
                }
                taken
            }
            Some(existing) if existing.kind == stack.kind => {
                // Saturating: a deserialized slot may hold more than the
                // limit already.
                let space = SLOT_STACK_LIMIT.saturating_sub(existing.count);
                let taken = stack.count.min(space);
                existing.count += taken;
                taken
            }
            Some(_) => 0,
        }
    }

    /// Take up to `amount` items out of a slot. The slot is cleared when
    /// it empties. Returns `None` if the slot holds nothing.
    pub fn extract_from(&mut self, slot: usize, amount: u32) -> Option<ItemStack> {
        let entry = self.slots.get_mut(slot)?;
        let existing = entry.as_mut()?;
        let taken = amount.min(existing.count);
        if taken == 0 {
            return None;
        }
        let kind = existing.kind;
        existing.count -= taken;
        if existing.count == 0 {
            *entry = None;
        }
        Some(ItemStack::new(kind, taken))
    }

    /// Shrink a slot's count by `amount`, clearing the slot at zero.
    pub fn shrink(&mut self, slot: usize, amount: u32) {
        if let Some(entry) = self.slots.get_mut(slot) {
            if let Some(existing) = entry.as_mut() {
                existing.count = existing.count.saturating_sub(amount);
                if existing.count == 0 {
                    *entry = None;
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }
}

// ---------------------------------------------------------------------------
// ItemCatalog
// ---------------------------------------------------------------------------

/// Registration-order table of item kinds with name lookup both ways.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    names: Vec<String>,
    by_name: HashMap<String, ItemKindId>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name, or return the existing id if already present.
    pub fn register(&mut self, name: &str) -> ItemKindId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = ItemKindId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<ItemKindId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: ItemKindId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(n: u32) -> ItemKindId {
        ItemKindId(n)
    }

    #[test]
    fn insert_into_empty_slot() {
        let mut inv = Inventory::new(2);
        let taken = inv.insert_into(0, ItemStack::new(kind(0), 10));
        assert_eq!(taken, 10);
        assert_eq!(inv.stack(0), Some(&ItemStack::new(kind(0), 10)));
        assert!(inv.stack(1).is_none());
    }

    #[test]
    fn insert_into_merges_matching_kind() {
        let mut inv = Inventory::new(1);
        let _ = inv.insert_into(0, ItemStack::new(kind(3), 20));
        let taken = inv.insert_into(0, ItemStack::new(kind(3), 30));
        assert_eq!(taken, 30);
        assert_eq!(inv.stack(0).unwrap().count, 50);
    }

    #[test]
    fn insert_into_rejects_mismatched_kind() {
        let mut inv = Inventory::new(1);
        let _ = inv.insert_into(0, ItemStack::new(kind(0), 5));
        let taken = inv.insert_into(0, ItemStack::new(kind(1), 5));
        assert_eq!(taken, 0);
        assert_eq!(inv.stack(0).unwrap().kind, kind(0));
    }

    #[test]
    fn insert_into_caps_at_slot_limit() {
        let mut inv = Inventory::new(1);
        let _ = inv.insert_into(0, ItemStack::new(kind(0), 60));
        let taken = inv.insert_into(0, ItemStack::new(kind(0), 10));
        assert_eq!(taken, 4);
        assert_eq!(inv.stack(0).unwrap().count, SLOT_STACK_LIMIT);

        // Full slot takes nothing.
        assert_eq!(inv.insert_into(0, ItemStack::new(kind(0), 1)), 0);
    }

    #[test]
    fn insert_into_oversized_offer_into_empty_slot() {
        let mut inv = Inventory::new(1);
        let taken = inv.insert_into(0, ItemStack::new(kind(0), 100));
        assert_eq!(taken, SLOT_STACK_LIMIT);
    }

    #[test]
    fn extract_from_partial_and_clearing() {
        let mut inv = Inventory::new(1);
        let _ = inv.insert_into(0, ItemStack::new(kind(2), 10));

        let out = inv.extract_from(0, 4).unwrap();
        assert_eq!(out, ItemStack::new(kind(2), 4));
        assert_eq!(inv.stack(0).unwrap().count, 6);

        let out = inv.extract_from(0, 100).unwrap();
        assert_eq!(out.count, 6);
        assert!(inv.stack(0).is_none());
        assert!(inv.extract_from(0, 1).is_none());
    }

    #[test]
    fn shrink_clears_emptied_slot() {
        let mut inv = Inventory::new(1);
        let _ = inv.insert_into(0, ItemStack::new(kind(0), 3));
        inv.shrink(0, 1);
        assert_eq!(inv.stack(0).unwrap().count, 2);
        inv.shrink(0, 5);
        assert!(inv.stack(0).is_none());
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut inv = Inventory::new(1);
        assert_eq!(inv.insert_into(9, ItemStack::new(kind(0), 1)), 0);
        assert!(inv.extract_from(9, 1).is_none());
        inv.shrink(9, 1); // no panic
    }

    #[test]
    fn set_stack_drops_zero_counts() {
        let mut inv = Inventory::new(1);
        inv.set_stack(0, Some(ItemStack::new(kind(0), 0)));
        assert!(inv.stack(0).is_none());
    }

    #[test]
    fn set_stack_clamps_to_slot_limit() {
        let mut inv = Inventory::new(1);
        inv.set_stack(0, Some(ItemStack::new(kind(0), 100)));
        assert_eq!(inv.stack(0).unwrap().count, SLOT_STACK_LIMIT);

        // The clamped slot is full; a merge takes nothing and must not
        // underflow the space computation.
        assert_eq!(inv.insert_into(0, ItemStack::new(kind(0), 5)), 0);
    }

    #[test]
    fn catalog_round_trips_names() {
        let mut catalog = ItemCatalog::new();
        let ore = catalog.register("raw_ore");
        let dust = catalog.register("ore_dust");
        assert_ne!(ore, dust);
        assert_eq!(catalog.id("raw_ore"), Some(ore));
        assert_eq!(catalog.name(dust), Some("ore_dust"));
        assert_eq!(catalog.len(), 2);

        // Re-registering returns the existing id.
        assert_eq!(catalog.register("raw_ore"), ore);
        assert_eq!(catalog.len(), 2);
    }
}
