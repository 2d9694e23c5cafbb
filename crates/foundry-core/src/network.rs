//! Greedy neighbor-push energy distribution.
//!
//! Every storage-capable node pushes to each adjacent store once per
//! tick. The per-edge transfer is two-phase: simulate both ends, take
//! the minimum, then commit exactly that amount on both. No global flow
//! is computed; repeated ticks equalize reachable stores because any
//! node with surplus keeps pushing every cycle. Neighbor visit order
//! changes how fast equalization converges, never whether it does.

use crate::energy::EnergyStore;

/// Per-tick transfer budget of a standard cable segment.
pub const CABLE_TRANSFER_RATE: u32 = 1_000;

/// Buffer capacity of a standard cable segment.
pub const CABLE_CAPACITY: u32 = 10_000;

/// A standard cable segment's store: symmetric rate caps at the
/// transfer budget.
pub fn cable_store() -> EnergyStore {
    EnergyStore::new(CABLE_CAPACITY, CABLE_TRANSFER_RATE, CABLE_TRANSFER_RATE)
}

/// Move up to `rate` energy across one directed edge.
///
/// Both ends are simulated first and the smaller answer is committed to
/// both, so the amount leaving the sender always equals the amount
/// entering the receiver. Returns the committed amount.
pub fn transfer(sender: &mut EnergyStore, receiver: &mut EnergyStore, rate: u32) -> u32 {
    let transferable = sender.extractable(rate).min(receiver.receivable(rate));
    if transferable > 0 {
        let extracted = sender.extract(transferable, false);
        let accepted = receiver.receive(transferable, false);
        debug_assert_eq!(extracted, transferable);
        debug_assert_eq!(accepted, transferable);
    }
    transferable
}
