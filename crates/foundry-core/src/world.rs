//! Grid adjacency as seen by the simulation.
//!
//! The core never owns or walks the world. A host hands the tick loop a
//! [`GridQuery`] and the simulation resolves every neighbor through it,
//! fresh, each tick. Removing a node can therefore never leave a stale
//! reference behind inside the core.

use crate::id::NodeId;
use serde::{Serialize, Deserialize};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// The six face directions of a cubic grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// The fixed interface set a node advertises at construction. The tick
/// phases consult this instead of probing node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub energy: bool,
    pub items: bool,
}

impl CapabilitySet {
    pub const NONE: CapabilitySet = CapabilitySet {
        energy: false,
        items: false,
    };
    pub const ENERGY: CapabilitySet = CapabilitySet {
        energy: true,
        items: false,
    };
    pub const ITEMS: CapabilitySet = CapabilitySet {
        energy: false,
        items: true,
    };
    pub const ENERGY_AND_ITEMS: CapabilitySet = CapabilitySet {
        energy: true,
        items: true,
    };
}

// ---------------------------------------------------------------------------
// GridQuery
// ---------------------------------------------------------------------------

/// Host-side adjacency oracle.
pub trait GridQuery {
    /// The node adjacent to `node` in `dir`, if any.
    fn neighbor(&self, node: NodeId, dir: Direction) -> Option<NodeId>;

    /// Whether the host wants this node ticked at all. Nodes on the
    /// paused side of a world are skipped wholesale, never half-ticked.
    fn is_simulated(&self, _node: NodeId) -> bool {
        true
    }
}

/// Straightforward adjacency map, suitable for hosts without real
/// geometry and for tests.
#[derive(Debug, Clone, Default)]
pub struct GridMap {
    edges: HashMap<(NodeId, Direction), NodeId>,
    paused: HashSet<NodeId>,
}

impl GridMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `a` to `b` through `dir`, and `b` back to `a` through the
    /// opposite face.
    pub fn connect(&mut self, a: NodeId, dir: Direction, b: NodeId) {
        self.edges.insert((a, dir), b);
        self.edges.insert((b, dir.opposite()), a);
    }

    pub fn disconnect(&mut self, a: NodeId, dir: Direction) {
        if let Some(b) = self.edges.remove(&(a, dir)) {
            self.edges.remove(&(b, dir.opposite()));
        }
    }

    pub fn pause(&mut self, node: NodeId) {
        self.paused.insert(node);
    }

    pub fn resume(&mut self, node: NodeId) {
        self.paused.remove(&node);
    }
}

impl GridQuery for GridMap {
    fn neighbor(&self, node: NodeId, dir: Direction) -> Option<NodeId> {
        self.edges.get(&(node, dir)).copied()
    }

    fn is_simulated(&self, node: NodeId) -> bool {
        !self.paused.contains(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn make_node_ids(n: usize) -> Vec<NodeId> {
        let mut sm: SlotMap<NodeId, ()> = SlotMap::with_key();
        (0..n).map(|_| sm.insert(())).collect()
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn connect_is_bidirectional() {
        let ids = make_node_ids(2);
        let mut grid = GridMap::new();
        grid.connect(ids[0], Direction::East, ids[1]);

        assert_eq!(grid.neighbor(ids[0], Direction::East), Some(ids[1]));
        assert_eq!(grid.neighbor(ids[1], Direction::West), Some(ids[0]));
        assert_eq!(grid.neighbor(ids[0], Direction::West), None);
    }

    #[test]
    fn disconnect_removes_both_sides() {
        let ids = make_node_ids(2);
        let mut grid = GridMap::new();
        grid.connect(ids[0], Direction::Up, ids[1]);
        grid.disconnect(ids[0], Direction::Up);

        assert_eq!(grid.neighbor(ids[0], Direction::Up), None);
        assert_eq!(grid.neighbor(ids[1], Direction::Down), None);
    }

    #[test]
    fn pause_and_resume() {
        let ids = make_node_ids(1);
        let mut grid = GridMap::new();
        assert!(grid.is_simulated(ids[0]));
        grid.pause(ids[0]);
        assert!(!grid.is_simulated(ids[0]));
        grid.resume(ids[0]);
        assert!(grid.is_simulated(ids[0]));
    }
}
