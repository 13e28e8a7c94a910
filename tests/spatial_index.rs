mod common;

use common::WorldBuilder;
use peeps_data::{Gender, Location};

#[test]
fn test_occupied_locations_is_sorted_and_includes_the_dead() {
    let (mut world, ids) = WorldBuilder::new()
        .with_entity(Gender::Blue, Location::new(3, -2, 0), 0)
        .with_entity(Gender::Red, Location::new(-4, 6, 0), 0)
        .with_entity(Gender::Green, Location::new(-4, 1, 0), 0)
        .build();
    world.entity_mut(&ids[2]).unwrap().die(0);

    let view = world.occupied_locations();
    let cells: Vec<Location> = view.iter().map(|(l, _)| *l).collect();
    assert_eq!(
        cells,
        vec![
            Location::new(-4, 1, 0),
            Location::new(-4, 6, 0),
            Location::new(3, -2, 0),
        ]
    );
    assert!(!view[0].1.alive);
    assert!(!world.is_occupied(&Location::new(-4, 1, 0)));
    assert!(world.is_occupied(&Location::new(3, -2, 0)));
}

#[test]
fn test_spawning_onto_a_corpse_replaces_it() {
    let (mut world, ids) = WorldBuilder::new()
        .with_entity(Gender::Blue, Location::new(2, 2, 0), 0)
        .build();
    world.entity_mut(&ids[0]).unwrap().die(0);

    let newcomer = world.spawn_entity(Some(Gender::Red), Location::new(2, 2, 0)).unwrap();

    assert_eq!(world.entity_at(&Location::new(2, 2, 0)).map(|e| e.id), Some(newcomer));
    assert_eq!(world.location_of(&ids[0]), None);
    assert_eq!(world.spatial().len(), 1);
    assert!(world.spatial().is_consistent());
}

#[test]
fn test_neighbors_are_clipped_at_the_border() {
    let (world, _) = WorldBuilder::new().build();
    assert_eq!(world.location_neighbors(&Location::origin(), 1).len(), 8);
    assert_eq!(world.location_neighbors(&Location::new(9, 9, 0), 1).len(), 3);
    assert_eq!(world.location_neighbors(&Location::new(9, 0, 0), 2).len(), 14);
}

#[test]
fn test_wide_view_covers_the_whole_world_once() {
    let (world, _) = WorldBuilder::new()
        .with_config(|c| c.perception.view_distance = peeps_core::config::MAX_VIEW_DISTANCE)
        .build();
    let cells = world.location_neighbors(&Location::origin(), world.settings().perception.view_distance);
    assert_eq!(cells.len(), world.size().usable_cells() - 1);
    assert!(cells.windows(2).all(|w| w[0] < w[1]));
    assert!(!cells.contains(&Location::origin()));
}
