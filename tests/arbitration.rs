mod common;

use common::{loc, WorldBuilder};
use peeps_core::config::{ArbitrationMode, CandidateAction};
use peeps_data::{Gender, Location};

#[test]
fn test_look_then_move_then_look_again() {
    let (mut world, ids) = WorldBuilder::new()
        .with_entity(Gender::Blue, Location::origin(), 0)
        .with_entity(Gender::Red, Location::new(2, 0, 0), 0)
        .build();
    let id = ids[0];

    world.tick().unwrap();
    let entity = world.entity(&id).unwrap();
    assert_eq!(entity.look_turn, Some(1));
    assert_eq!(entity.neighbors.get(&Location::new(2, 0, 0)), Some(&ids[1]));

    // Moves are off, so the chosen move fails and the view is not refreshed.
    for _ in 2..=4 {
        world.tick().unwrap();
        assert_eq!(world.entity(&id).unwrap().look_turn, Some(1));
        assert_eq!(loc(&world, &id), Location::origin());
    }

    world.tick().unwrap();
    assert_eq!(world.turn(), 5);
    assert_eq!(world.entity(&id).unwrap().look_turn, Some(5));
}

#[test]
fn test_fresh_view_leads_to_a_move() {
    let (mut world, ids) = WorldBuilder::new()
        .with_config(|c| {
            c.movement.allow_moves = true;
            c.population.max_age = 1000;
        })
        .with_entity(Gender::Blue, Location::origin(), 0)
        .build();

    world.tick().unwrap();
    assert_eq!(loc(&world, &ids[0]), Location::origin());
    world.tick().unwrap();
    let moved = loc(&world, &ids[0]);
    assert!(moved.x.abs() <= 1 && moved.y.abs() <= 1);
}

#[test]
fn test_unknown_candidates_leave_entity_idle() {
    let (mut world, ids) = WorldBuilder::new()
        .with_config(|c| {
            c.actions.candidates = vec![CandidateAction::Unknown, CandidateAction::Idle];
            c.movement.allow_moves = true;
        })
        .with_entity(Gender::Blue, Location::origin(), 0)
        .build();
    for _ in 0..3 {
        world.tick().unwrap();
    }
    assert_eq!(world.entity(&ids[0]).unwrap().look_turn, None);
    assert_eq!(loc(&world, &ids[0]), Location::origin());
}

#[test]
fn test_unknown_candidate_names_parse_from_toml() {
    let config = peeps_core::AppConfig::from_toml(
        r#"
        [actions]
        candidates = ["dance", "look"]
        "#,
    )
    .unwrap();
    assert_eq!(
        config.actions.candidates,
        vec![CandidateAction::Unknown, CandidateAction::Look]
    );
}

#[test]
fn test_every_mode_picks_the_same_action() {
    for mode in [
        ArbitrationMode::Sequential,
        ArbitrationMode::Parallel,
        ArbitrationMode::Racing,
    ] {
        let (mut world, ids) = WorldBuilder::new()
            .with_config(|c| c.actions.arbitration = mode)
            .with_entity(Gender::Green, Location::origin(), 0)
            .build();
        world.tick().unwrap();
        assert_eq!(
            world.entity(&ids[0]).unwrap().look_turn,
            Some(1),
            "{mode:?} did not look first"
        );
    }
}
