//! The factory node bank and the three-phase tick pipeline.
//!
//! One [`Factory::tick`] call advances every simulated node exactly
//! once, in three phases applied across all nodes before the next phase
//! starts:
//!
//! 1. machine processing (energy consumption, progress, completion)
//! 2. energy distribution (greedy neighbor push)
//! 3. item transport (pipe pushes)
//!
//! Distribution therefore sees energy levels as machines left them this
//! tick, and transport sees inventories as completion left them this
//! tick. The loop is single-threaded; the simulate/commit pair per edge
//! is the only coordination transfers need.

use crate::energy::EnergyStore;
use crate::fixed::Ticks;
use crate::id::NodeId;
use crate::machine::{MachineNode, UpgradeSet};
use crate::network;
use crate::recipe::RecipeRegistry;
use crate::transport::{ItemSink, TransportLink};
use crate::world::{CapabilitySet, Direction, GridQuery};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One simulated entity.
#[derive(Debug)]
pub enum Node {
    Machine(MachineNode),
    /// A cable segment: an energy buffer that forwards by distribution.
    Cable(EnergyStore),
    /// A pipe segment pushing toward the face it points at.
    Pipe {
        link: TransportLink,
        facing: Direction,
    },
}

impl Node {
    /// The interfaces this node advertises, fixed at construction.
    pub fn capabilities(&self) -> CapabilitySet {
        match self {
            Node::Machine(_) => CapabilitySet::ENERGY_AND_ITEMS,
            Node::Cable(_) => CapabilitySet::ENERGY,
            Node::Pipe { .. } => CapabilitySet::ITEMS,
        }
    }

    pub fn energy(&self) -> Option<&EnergyStore> {
        match self {
            Node::Machine(m) => Some(m.energy()),
            Node::Cable(store) => Some(store),
            Node::Pipe { .. } => None,
        }
    }

    pub fn energy_mut(&mut self) -> Option<&mut EnergyStore> {
        match self {
            Node::Machine(m) => Some(m.energy_mut()),
            Node::Cable(store) => Some(store),
            Node::Pipe { .. } => None,
        }
    }

    pub fn item_sink(&mut self) -> Option<&mut dyn ItemSink> {
        match self {
            Node::Machine(m) => Some(m),
            Node::Pipe { link, .. } => Some(link),
            Node::Cable(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// The bank of all nodes plus the tick counter.
///
/// Adjacency is not stored here; every neighbor is resolved through the
/// host's [`GridQuery`] at the moment it is needed.
#[derive(Debug, Default)]
pub struct Factory {
    nodes: SlotMap<NodeId, Node>,
    tick: Ticks,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_machine(&mut self, machine: MachineNode) -> NodeId {
        self.nodes.insert(Node::Machine(machine))
    }

    pub fn add_cable(&mut self, store: EnergyStore) -> NodeId {
        self.nodes.insert(Node::Cable(store))
    }

    pub fn add_pipe(&mut self, link: TransportLink, facing: Direction) -> NodeId {
        self.nodes.insert(Node::Pipe { link, facing })
    }

    /// Remove a node. Its id becomes permanently invalid; neighbors that
    /// still name it through the grid simply resolve to nothing.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn machine(&self, id: NodeId) -> Option<&MachineNode> {
        match self.nodes.get(id) {
            Some(Node::Machine(m)) => Some(m),
            _ => None,
        }
    }

    pub fn machine_mut(&mut self, id: NodeId) -> Option<&mut MachineNode> {
        match self.nodes.get_mut(id) {
            Some(Node::Machine(m)) => Some(m),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn current_tick(&self) -> Ticks {
        self.tick
    }

    /// Advance the whole factory one tick.
    pub fn tick(&mut self, registry: &RecipeRegistry, upgrades: &UpgradeSet, grid: &impl GridQuery) {
        // Stable per-tick visit order shared by all three phases.
        let ids: Vec<NodeId> = self.nodes.keys().collect();

        for &id in &ids {
            if !grid.is_simulated(id) {
                continue;
            }
            if let Some(Node::Machine(machine)) = self.nodes.get_mut(id) {
                machine.tick(registry, upgrades);
            }
        }

        for &id in &ids {
            if !grid.is_simulated(id) {
                continue;
            }
            self.distribute_from(id, grid);
        }

        for &id in &ids {
            if !grid.is_simulated(id) {
                continue;
            }
            self.transport_from(id, grid);
        }

        self.tick += 1;
    }

    /// Push energy from a cable to each energy-capable neighbor, budget
    /// `rate` per edge, where `rate` is the cable's extract cap.
    ///
    /// Only cables push. Machines hold an extract budget for their own
    /// processing draw; letting them distribute with it would leak their
    /// working charge straight back into the grid.
    fn distribute_from(&mut self, id: NodeId, grid: &impl GridQuery) {
        let rate = match self.nodes.get(id) {
            Some(Node::Cable(store)) => store.max_extract(),
            _ => return,
        };
        if rate == 0 {
            return;
        }
        for dir in Direction::ALL {
            let Some(neighbor) = grid.neighbor(id, dir) else {
                continue;
            };
            // Non-simulated nodes are skipped entirely, receiving side
            // included.
            if neighbor == id || !grid.is_simulated(neighbor) {
                continue;
            }
            let Some([sender, receiver]) = self.nodes.get_disjoint_mut([id, neighbor]) else {
                continue;
            };
            let (Some(sender), Some(receiver)) = (sender.energy_mut(), receiver.energy_mut())
            else {
                continue;
            };
            let _ = network::transfer(sender, receiver, rate);
        }
    }

    fn transport_from(&mut self, id: NodeId, grid: &impl GridQuery) {
        let facing = match self.nodes.get(id) {
            Some(Node::Pipe { facing, .. }) => *facing,
            _ => return,
        };
        let dest = grid
            .neighbor(id, facing)
            .filter(|&d| d != id && grid.is_simulated(d));
        match dest.and_then(|d| self.nodes.get_disjoint_mut([id, d])) {
            Some([pipe, dest_node]) => {
                let Node::Pipe { link, .. } = pipe else {
                    return;
                };
                link.tick(dest_node.item_sink());
            }
            None => {
                if let Some(Node::Pipe { link, .. }) = self.nodes.get_mut(id) {
                    link.tick(None);
                }
            }
        }
    }
}
