//! Processing machines.
//!
//! A [`MachineNode`] owns an energy store and a slot inventory (input
//! slots, one output slot, one upgrade slot) and advances a recipe one
//! tick at a time. Everything is re-evaluated each tick: recipe
//! discovery, upgrade modifiers, energy draw. Nothing is cached across
//! ticks except the progress counter itself, so inventory edits and
//! upgrade swaps take effect on the very next tick.

use crate::energy::EnergyStore;
use crate::fixed::{Fixed64, checked_mul_64, div_u32, fraction_u32, scale_u32};
use crate::id::{ItemKindId, RecipeId};
use crate::item::{Inventory, ItemStack, SLOT_STACK_LIMIT};
use crate::recipe::{Recipe, RecipeRegistry};
use crate::transport::ItemSink;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// What a machine upgrade scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Shortens effective duration.
    Speed,
    /// Scales per-tick energy draw. Magnitude is negative for a discount.
    Energy,
    /// Scales completion output counts.
    Output,
}

/// Per-unit effect of one upgrade item kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeSpec {
    pub kind: UpgradeKind,
    /// Modifier contribution per item in the upgrade slot.
    /// The resolved modifier is `1 + magnitude * count`.
    pub magnitude: Fixed64,
}

/// Which item kinds act as upgrades, and what they do.
#[derive(Debug, Clone, Default)]
pub struct UpgradeSet {
    specs: HashMap<ItemKindId, UpgradeSpec>,
}

impl UpgradeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, item: ItemKindId, spec: UpgradeSpec) {
        self.specs.insert(item, spec);
    }

    pub fn get(&self, item: ItemKindId) -> Option<&UpgradeSpec> {
        self.specs.get(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Modifiers resolved from the upgrade slot, recomputed every tick.
#[derive(Debug, Clone, Copy)]
struct ResolvedModifiers {
    speed: Fixed64,
    energy: Fixed64,
    output: Fixed64,
}

impl ResolvedModifiers {
    fn resolve(slot: Option<&ItemStack>, upgrades: &UpgradeSet) -> Self {
        let one = Fixed64::from_num(1);
        let mut resolved = Self {
            speed: one,
            energy: one,
            output: one,
        };
        let Some(stack) = slot else {
            return resolved;
        };
        let Some(spec) = upgrades.get(stack.kind) else {
            return resolved;
        };
        // Large content-supplied magnitudes can blow past the Q32.32
        // range; saturate rather than wrap. The count is capped at the
        // slot limit, which also keeps it inside from_num's range.
        let count = Fixed64::from_num(stack.count.min(SLOT_STACK_LIMIT));
        let modifier = checked_mul_64(spec.magnitude, count)
            .and_then(|m| one.checked_add(m))
            .unwrap_or(Fixed64::MAX);
        match spec.kind {
            // A non-positive speed modifier would stall time itself;
            // treat it as unmodified.
            UpgradeKind::Speed => {
                if modifier > Fixed64::ZERO {
                    resolved.speed = modifier;
                }
            }
            // Energy discounts floor at free, never negative.
            UpgradeKind::Energy => resolved.energy = modifier.max(Fixed64::ZERO),
            UpgradeKind::Output => resolved.output = modifier.max(Fixed64::ZERO),
        }
        resolved
    }
}

// ---------------------------------------------------------------------------
// Machine state
// ---------------------------------------------------------------------------

/// Why a machine with a valid recipe is not advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallReason {
    NoEnergy,
    OutputFull,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineState {
    /// No recipe matches the current inputs.
    #[default]
    Idle,
    /// Advanced progress this tick.
    Processing,
    /// A recipe matches but cannot advance.
    Stalled(StallReason),
}

// ---------------------------------------------------------------------------
// MachineNode
// ---------------------------------------------------------------------------

/// A recipe-processing node.
///
/// Slot layout: slots `0..input_slots` are inputs, then one output slot,
/// then one upgrade slot.
#[derive(Debug)]
pub struct MachineNode {
    energy: EnergyStore,
    inventory: Inventory,
    input_slots: usize,
    progress: u32,
    /// Effective duration of the cycle in flight, for progress reporting.
    /// Zero whenever no cycle is in flight.
    duration: u32,
    state: MachineState,
}

impl MachineNode {
    /// Create a machine with `input_slots` input slots plus the output and
    /// upgrade slots.
    pub fn new(energy: EnergyStore, input_slots: usize) -> Self {
        Self {
            energy,
            inventory: Inventory::new(input_slots + 2),
            input_slots,
            progress: 0,
            duration: 0,
            state: MachineState::Idle,
        }
    }

    pub fn input_slots(&self) -> usize {
        self.input_slots
    }

    pub fn output_slot(&self) -> usize {
        self.input_slots
    }

    pub fn upgrade_slot(&self) -> usize {
        self.input_slots + 1
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn energy(&self) -> &EnergyStore {
        &self.energy
    }

    pub fn energy_mut(&mut self) -> &mut EnergyStore {
        &mut self.energy
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    // -- observable properties ---------------------------------------------

    /// Progress through the current cycle in `[0, 1]`. Zero when idle.
    pub fn progress_fraction(&self) -> Fixed64 {
        fraction_u32(self.progress, self.duration)
    }

    pub fn energy_stored(&self) -> u32 {
        self.energy.stored()
    }

    pub fn energy_capacity(&self) -> u32 {
        self.energy.capacity()
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, MachineState::Processing)
    }

    // -- tick ---------------------------------------------------------------

    /// Advance the machine one tick.
    pub fn tick(&mut self, registry: &RecipeRegistry, upgrades: &UpgradeSet) {
        let modifiers =
            ResolvedModifiers::resolve(self.inventory.stack(self.upgrade_slot()), upgrades);

        let Some((_, recipe)) = self.find_recipe(registry) else {
            self.progress = 0;
            self.duration = 0;
            self.state = MachineState::Idle;
            return;
        };

        let duration = effective_duration(recipe.process_ticks, modifiers.speed);
        let energy_per_tick = scaled_energy_per_tick(recipe, modifiers.energy);

        if self.energy.stored() < energy_per_tick {
            self.progress = 0;
            self.duration = 0;
            self.state = MachineState::Stalled(StallReason::NoEnergy);
            return;
        }
        if !self.has_output_space(recipe, modifiers.output) {
            self.progress = 0;
            self.duration = 0;
            self.state = MachineState::Stalled(StallReason::OutputFull);
            return;
        }

        // The store's extract cap may be tighter than the fill check
        // above. A failed simulation parks the cycle without resetting
        // progress; the drain resumes when the cap allows it.
        if self.energy.extract(energy_per_tick, true) < energy_per_tick {
            self.state = MachineState::Stalled(StallReason::NoEnergy);
            return;
        }
        let _ = self.energy.extract(energy_per_tick, false);

        self.duration = duration;
        self.progress += 1;
        self.state = MachineState::Processing;

        if self.progress >= duration {
            self.complete(recipe, modifiers.output);
        }
    }

    /// Recipe discovery against the current input slots. Single-input
    /// machines use the single-stack query; wider machines match all
    /// slots position-wise.
    pub fn find_recipe<'r>(&self, registry: &'r RecipeRegistry) -> Option<(RecipeId, &'r Recipe)> {
        if self.input_slots == 1 {
            let stack = self.inventory.stack(0)?;
            registry.find_recipe(stack)
        } else {
            let stacks: Vec<Option<ItemStack>> = (0..self.input_slots)
                .map(|i| self.inventory.stack(i).copied())
                .collect();
            registry.find_recipe_multi(&stacks)
        }
    }

    /// Room for the first recipe output: empty slot, or matching kind,
    /// with space for the whole scaled output count under the slot
    /// limit. A count that can never fit parks the machine in
    /// `Stalled(OutputFull)` instead of truncating on completion.
    fn has_output_space(&self, recipe: &Recipe, output_modifier: Fixed64) -> bool {
        let Some(first) = recipe.outputs.first() else {
            return true;
        };
        let incoming = scale_count(first.count, output_modifier);
        match self.inventory.stack(self.output_slot()) {
            None => incoming <= SLOT_STACK_LIMIT,
            Some(existing) => {
                existing.kind == first.kind
                    && incoming <= SLOT_STACK_LIMIT.saturating_sub(existing.count)
            }
        }
    }

    fn complete(&mut self, recipe: &Recipe, output_modifier: Fixed64) {
        for (slot, ingredient) in recipe.inputs.iter().enumerate().take(self.input_slots) {
            self.inventory.shrink(slot, ingredient.quantity);
        }
        let output_slot = self.output_slot();
        for output in &recipe.outputs {
            let scaled = scale_count(output.count, output_modifier);
            let _ = self
                .inventory
                .insert_into(output_slot, ItemStack::new(output.kind, scaled));
        }
        self.progress = 0;
        self.duration = 0;
    }
}

/// Feeding a machine from a pipe lands in input slot 0.
impl ItemSink for MachineNode {
    fn insert(&mut self, stack: ItemStack) -> u32 {
        self.inventory.insert_into(0, stack)
    }
}

// ---------------------------------------------------------------------------
// Modifier arithmetic
// ---------------------------------------------------------------------------

/// `floor(base / speed)`, never below one tick.
fn effective_duration(base_ticks: u32, speed: Fixed64) -> u32 {
    div_u32(base_ticks, speed).max(1)
}

/// Base per-tick draw scaled by the energy modifier, floored.
fn scaled_energy_per_tick(recipe: &Recipe, energy: Fixed64) -> u32 {
    scale_u32(recipe.energy_per_tick(), energy)
}

/// `floor(count * modifier)`, floored at zero.
fn scale_count(count: u32, modifier: Fixed64) -> u32 {
    scale_u32(count, modifier)
}
