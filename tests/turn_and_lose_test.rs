use pose_stack::{
    One, Quaternion, Vector3,
    config::SessionConfig,
    data_structures::{block::Scene, scene_graph::SceneNode},
    input::Action,
    lose::{LoseWatchFlow, LoseWatcher},
    session::GameEvent,
    turn::{PlayerId, TurnState},
};

use crate::common::test_utils::{FRAME, ScriptedInput, count, frozen_driver, last_block_mut};

mod common;

fn scene_with_block_at(y: f32) -> (Scene, pose_stack::data_structures::block::BlockId) {
    let mut scene = Scene::new();
    let id = scene.instantiate(
        &SceneNode::new("block"),
        Vector3::new(0.0, y, 0.0),
        Quaternion::one(),
    );
    (scene, id)
}

#[test]
fn turns_alternate_starting_with_player_one() {
    let mut turn = TurnState::new();
    assert_eq!(turn.current_player(), PlayerId::One);

    assert_eq!(turn.advance_turn(), Some(PlayerId::Two));
    assert_eq!(turn.advance_turn(), Some(PlayerId::One));
    assert_eq!(turn.advance_turn(), Some(PlayerId::Two));
    assert_eq!(turn.turns_taken(), 3);
    assert!(!turn.is_game_over());
}

#[test]
fn advancing_after_game_over_changes_nothing() {
    let mut turn = TurnState::new();
    turn.advance_turn();
    assert!(turn.end_game(PlayerId::Two));

    assert_eq!(turn.advance_turn(), None);
    assert_eq!(turn.current_player(), PlayerId::Two);
    assert_eq!(turn.turns_taken(), 1);
}

#[test]
fn the_first_loser_is_final() {
    let mut turn = TurnState::starting_with(PlayerId::Two);

    assert!(turn.end_game(PlayerId::Two));
    assert!(!turn.end_game(PlayerId::One));

    assert!(turn.is_game_over());
    assert_eq!(turn.loser(), Some(PlayerId::Two));
}

#[test]
fn player_display_names() {
    assert_eq!(PlayerId::One.to_string(), "Player 1");
    assert_eq!(PlayerId::Two.to_string(), "Player 2");
    assert_eq!(PlayerId::One.other(), PlayerId::Two);
}

#[test]
fn watcher_blames_the_player_on_turn_once() {
    let (mut scene, id) = scene_with_block_at(0.0);
    let mut turn = TurnState::new();
    turn.advance_turn();
    let mut watcher = LoseWatcher::new(id, -5.0);

    assert!(!watcher.check(&scene, &mut turn));

    scene.get_mut(id).expect("spawned").set_position(Vector3::new(0.0, -6.0, 0.0));
    assert!(watcher.check(&scene, &mut turn));
    assert!(!watcher.is_enabled());
    assert_eq!(turn.loser(), Some(PlayerId::Two));

    assert!(!watcher.check(&scene, &mut turn));
}

#[test]
fn resting_exactly_on_the_floor_is_safe() {
    let (scene, id) = scene_with_block_at(-5.0);
    let mut turn = TurnState::new();
    let mut watcher = LoseWatcher::new(id, -5.0);

    assert!(!watcher.check(&scene, &mut turn));
    assert!(!turn.is_game_over());
}

#[test]
fn second_watcher_does_not_override_the_loser() {
    let (mut scene, first) = scene_with_block_at(-10.0);
    let second = scene.instantiate(
        &SceneNode::new("block"),
        Vector3::new(0.0, -10.0, 0.0),
        Quaternion::one(),
    );
    let mut turn = TurnState::new();
    let mut watchers = [LoseWatcher::new(first, -5.0), LoseWatcher::new(second, -5.0)];

    assert!(watchers[0].check(&scene, &mut turn));
    turn.advance_turn();
    watchers[1].check(&scene, &mut turn);

    assert_eq!(turn.loser(), Some(PlayerId::One));
}

#[test]
fn watch_flow_registers_each_block_once() {
    let mut flow = LoseWatchFlow::new(-5.0);
    let id = pose_stack::data_structures::block::BlockId(3);

    flow.watch(id);
    flow.watch(id);

    assert_eq!(flow.watchers().len(), 1);
    assert_eq!(flow.watchers()[0].block(), id);
}

#[test]
fn falling_off_after_a_drop_loses_for_the_next_player() {
    let config = SessionConfig::default();
    let mut driver = frozen_driver(&config, Vector3::new(0.0, 5.0, 0.0));
    let mut input = ScriptedInput::new();

    input.tap(Action::Drop);
    driver.step(&mut input, FRAME);
    assert_eq!(driver.state().turn.current_player(), PlayerId::Two);

    last_block_mut(&mut driver).set_position(Vector3::new(0.0, -6.0, 0.0));
    driver.run_frames(&mut input, FRAME, 20, |_| false);

    let events = driver.drain_events();
    assert_eq!(
        count(&events, |e| *e == GameEvent::GameOver { loser: PlayerId::Two }),
        1
    );
    assert_eq!(count(&events, |e| matches!(e, GameEvent::GameOver { .. })), 1);
    assert!(driver.state().turn.is_game_over());
    // the pending respawn never happens
    assert_eq!(driver.state().scene.len(), 1);
}

#[test]
fn staying_above_the_floor_keeps_the_game_going() {
    let config = SessionConfig::default();
    let mut driver = frozen_driver(&config, Vector3::new(0.0, 5.0, 0.0));
    let mut input = ScriptedInput::new();

    input.tap(Action::Drop);
    driver.step(&mut input, FRAME);
    last_block_mut(&mut driver).set_position(Vector3::new(0.0, -4.9, 0.0));
    driver.run_frames(&mut input, FRAME, 20, |_| false);

    assert!(!driver.state().turn.is_game_over());
    assert_eq!(driver.state().scene.len(), 2);
}

#[test]
fn custom_floor_from_config() {
    let mut config = SessionConfig::default();
    config.lose.floor = 2.0;
    let mut driver = frozen_driver(&config, Vector3::new(0.0, 5.0, 0.0));
    let mut input = ScriptedInput::new();

    input.tap(Action::Drop);
    driver.step(&mut input, FRAME);
    last_block_mut(&mut driver).set_position(Vector3::new(0.0, 1.0, 0.0));
    driver.step(&mut input, FRAME);

    assert_eq!(driver.state().turn.loser(), Some(PlayerId::Two));
}
