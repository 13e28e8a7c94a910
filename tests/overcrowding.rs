mod common;

use common::WorldBuilder;
use peeps_data::{DeathCause, Gender, Location, TurnEvent};

fn ring(center: Location) -> Vec<Location> {
    let mut cells = Vec::new();
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx != 0 || dy != 0 {
                cells.push(Location::new(center.x + dx, center.y + dy, center.z));
            }
        }
    }
    cells
}

fn surrounded(center_gender: Gender, ring_gender: Gender) -> WorldBuilder {
    let mut builder = WorldBuilder::new().with_entity(center_gender, Location::origin(), 0);
    for cell in ring(Location::origin()) {
        builder = builder.with_entity(ring_gender, cell, 0);
    }
    builder
}

#[test]
fn test_surrounded_by_other_gender_dies() {
    let (mut world, ids) = surrounded(Gender::Blue, Gender::Red)
        .with_config(|c| c.overcrowding.kill_if_surrounded_by_other = true)
        .build();

    let events = world.tick().unwrap();

    assert!(!world.entity(&ids[0]).unwrap().is_alive());
    assert_eq!(world.alive_count(), 8);
    let deaths: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            TurnEvent::Death { id, cause, .. } => Some((*id, *cause)),
            _ => None,
        })
        .collect();
    assert_eq!(deaths, vec![(ids[0], DeathCause::Overcrowding)]);
}

#[test]
fn test_no_toggles_no_overcrowding_deaths() {
    let (mut world, _) = surrounded(Gender::Blue, Gender::Red).build();
    world.tick().unwrap();
    assert_eq!(world.alive_count(), 9);
}

#[test]
fn test_surrounded_by_same_gender() {
    let (mut world, ids) = surrounded(Gender::Green, Gender::Green)
        .with_config(|c| c.overcrowding.kill_if_surrounded_by_other = true)
        .build();
    world.tick().unwrap();
    assert!(world.entity(&ids[0]).unwrap().is_alive());

    let (mut world, ids) = surrounded(Gender::Green, Gender::Green)
        .with_config(|c| c.overcrowding.kill_if_surrounded_by_same = true)
        .build();
    world.tick().unwrap();
    assert!(!world.entity(&ids[0]).unwrap().is_alive());
    assert_eq!(world.alive_count(), 8);
}

#[test]
fn test_mixed_ring_only_counts_as_full() {
    let mut builder = WorldBuilder::new()
        .with_config(|c| {
            c.overcrowding.kill_if_surrounded_by_other = true;
            c.overcrowding.kill_if_surrounded_by_same = true;
        })
        .with_entity(Gender::Blue, Location::origin(), 0);
    for (i, cell) in ring(Location::origin()).into_iter().enumerate() {
        let gender = if i % 2 == 0 { Gender::Blue } else { Gender::Red };
        builder = builder.with_entity(gender, cell, 0);
    }
    let (mut world, ids) = builder.build();
    world.tick().unwrap();
    assert!(world.entity(&ids[0]).unwrap().is_alive());
}

#[test]
fn test_corner_needs_only_three_neighbors() {
    let corner = Location::new(9, 9, 0);
    let (mut world, ids) = WorldBuilder::new()
        .with_config(|c| c.overcrowding.kill_if_surrounded = true)
        .with_entity(Gender::Blue, corner, 0)
        .with_entity(Gender::Red, Location::new(8, 8, 0), 0)
        .with_entity(Gender::Blue, Location::new(8, 9, 0), 0)
        .with_entity(Gender::Yellow, Location::new(9, 8, 0), 0)
        .build();

    world.tick().unwrap();

    assert!(!world.entity(&ids[0]).unwrap().is_alive());
    assert!(ids[1..]
        .iter()
        .all(|id| world.entity(id).unwrap().is_alive()));
}

#[test]
fn test_dead_neighbors_do_not_crowd() {
    let (mut world, ids) = surrounded(Gender::Blue, Gender::Red)
        .with_config(|c| c.overcrowding.kill_if_surrounded = true)
        .build();
    world.entity_mut(&ids[1]).unwrap().die(0);
    world.tick().unwrap();
    assert!(world.entity(&ids[0]).unwrap().is_alive());
}
