//! Multi-node energy distribution scenarios: relayed power, pause
//! semantics, and conservation across the grid.

use foundry_core::energy::EnergyStore;
use foundry_core::machine::{MachineNode, UpgradeSet};
use foundry_core::network;
use foundry_core::recipe::RecipeRegistry;
use foundry_core::sim::Factory;
use foundry_core::world::{Direction, GridMap};

fn full_cable() -> EnergyStore {
    EnergyStore::with_stored(
        network::CABLE_CAPACITY,
        network::CABLE_TRANSFER_RATE,
        network::CABLE_TRANSFER_RATE,
        network::CABLE_CAPACITY,
    )
}

fn grid_energy(factory: &Factory, ids: &[foundry_core::id::NodeId]) -> u32 {
    ids.iter()
        .map(|&id| factory.node(id).unwrap().energy().unwrap().stored())
        .sum()
}

#[test]
fn relayed_power_reaches_machine_at_its_receive_cap() {
    let registry = RecipeRegistry::new();
    let upgrades = UpgradeSet::new();
    let mut factory = Factory::new();
    let mut grid = GridMap::new();

    let source = factory.add_cable(full_cable());
    let relay = factory.add_cable(network::cable_store());
    let machine = factory.add_machine(MachineNode::new(EnergyStore::new(10_000, 100, 100), 1));
    grid.connect(source, Direction::East, relay);
    grid.connect(relay, Direction::East, machine);

    for _ in 0..50 {
        factory.tick(&registry, &upgrades, &grid);
    }

    // The machine's receive cap bounds the whole line to 100 per tick,
    // however fast the cables shuttle charge between themselves.
    assert_eq!(factory.machine(machine).unwrap().energy_stored(), 5_000);
    assert_eq!(
        grid_energy(&factory, &[source, relay]) + 5_000,
        network::CABLE_CAPACITY
    );
}

#[test]
fn energy_is_conserved_across_any_topology() {
    let registry = RecipeRegistry::new();
    let upgrades = UpgradeSet::new();
    let mut factory = Factory::new();
    let mut grid = GridMap::new();

    let a = factory.add_cable(full_cable());
    let b = factory.add_cable(network::cable_store());
    let c = factory.add_cable(EnergyStore::with_stored(4_000, 500, 500, 2_000));
    let d = factory.add_cable(EnergyStore::new(2_000, 50, 0));
    grid.connect(a, Direction::East, b);
    grid.connect(b, Direction::East, c);
    grid.connect(c, Direction::North, d);
    grid.connect(a, Direction::South, c);

    let total = grid_energy(&factory, &[a, b, c, d]);
    for _ in 0..200 {
        factory.tick(&registry, &upgrades, &grid);
    }
    assert_eq!(grid_energy(&factory, &[a, b, c, d]), total);
}

#[test]
fn paused_machine_is_untouched_until_resumed() {
    let registry = RecipeRegistry::new();
    let upgrades = UpgradeSet::new();
    let mut factory = Factory::new();
    let mut grid = GridMap::new();

    let source = factory.add_cable(full_cable());
    let machine = factory.add_machine(MachineNode::new(EnergyStore::new(10_000, 100, 100), 1));
    grid.connect(source, Direction::East, machine);
    grid.pause(machine);

    for _ in 0..10 {
        factory.tick(&registry, &upgrades, &grid);
    }
    // Nothing flowed into the paused side.
    assert_eq!(factory.machine(machine).unwrap().energy_stored(), 0);
    assert_eq!(
        factory.node(source).unwrap().energy().unwrap().stored(),
        network::CABLE_CAPACITY
    );

    grid.resume(machine);
    factory.tick(&registry, &upgrades, &grid);
    assert_eq!(factory.machine(machine).unwrap().energy_stored(), 100);
}
