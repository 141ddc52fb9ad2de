use lunar_lander::compute::{init_state, steer, tick};
use lunar_lander::config::Tuning;
use lunar_lander::entities::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_state() -> SimulationState {
    init_state(&Tuning::default(), &mut StdRng::seed_from_u64(42))
}

#[test]
fn entity_enums_eq() {
    assert_eq!(PlatformKind::Safe, PlatformKind::Safe);
    assert_ne!(PlatformKind::Safe, PlatformKind::Hazard);
    assert_ne!(OverlayKind::Win, OverlayKind::NoFuel);
    assert_eq!(Outcome::default(), Outcome::Flying);
}

#[test]
fn only_win_and_loss_are_terminal() {
    assert!(Outcome::Won.is_terminal());
    assert!(Outcome::Lost.is_terminal());
    assert!(!Outcome::OutOfFuel.is_terminal());
    assert!(!Outcome::Flying.is_terminal());
}

#[test]
fn vec2_arithmetic() {
    let a = Vec2::new(1.0, 2.0);
    let b = Vec2::new(0.5, -1.0);
    assert_eq!(a + b, Vec2::new(1.5, 1.0));
    assert_eq!(a - b, Vec2::new(0.5, 3.0));
    assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
    assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);

    let mut c = a;
    c.set(Axis::Y, 7.0);
    assert_eq!(c.get(Axis::Y), 7.0);
    assert_eq!(c.get(Axis::X), 1.0);
}

#[test]
fn facing_rows_cover_the_frame_table() {
    let rows: Vec<usize> = [Facing::Left, Facing::Right, Facing::Up, Facing::Down]
        .iter()
        .map(|f| f.row())
        .collect();
    assert_eq!(rows, vec![0, 1, 2, 3]);
}

#[test]
fn state_clone_is_independent() {
    let original = make_state();
    let mut cloned = original.clone();

    cloned.player.position.x = 4.0;
    cloned.platforms.clear();
    cloned.outcome = Outcome::Lost;

    assert_eq!(original.player.position, Vec2::new(0.0, 3.0));
    assert_eq!(original.platforms.len(), 5);
    assert_eq!(original.outcome, Outcome::Flying);
}

#[test]
fn restored_snapshot_replays_identically() {
    let tuning = Tuning::default();
    let dt = tuning.fixed_timestep;
    let mut rng = StdRng::seed_from_u64(9);
    let intents: Vec<Vec2> = (0..240)
        .map(|_| Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();

    // Fly a little before snapshotting so the lander has non-trivial state.
    let mut original = make_state();
    original.player.velocity = Vec2::new(0.3, -0.6);
    for intent in &intents[..40] {
        original = tick(&steer(&original, *intent), dt, &tuning);
    }

    let json = serde_json::to_string(&original).unwrap();
    let mut restored: SimulationState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, original);

    for intent in &intents[40..] {
        original = tick(&steer(&original, *intent), dt, &tuning);
        restored = tick(&steer(&restored, *intent), dt, &tuning);
        assert_eq!(restored.player, original.player);
    }
    assert_eq!(restored, original);
}

#[test]
fn lander_round_trips_through_json() {
    let lander = make_state().player;
    let json = serde_json::to_string(&lander).unwrap();
    let back: Lander = serde_json::from_str(&json).unwrap();
    assert_eq!(back, lander);
}
