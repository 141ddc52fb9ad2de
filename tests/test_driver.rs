use lunar_lander::compute::{init_state, tick};
use lunar_lander::config::{Tuning, FIXED_TIMESTEP, MAX_STEPS_PER_FRAME};
use lunar_lander::entities::*;
use lunar_lander::FrameDriver;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn tuning() -> Tuning {
    Tuning::default()
}

fn make_state() -> SimulationState {
    init_state(&tuning(), &mut StdRng::seed_from_u64(42))
}

/// Drifting lander in open sky so every step does real work.
fn drifting_state() -> SimulationState {
    let mut s = make_state();
    s.platforms.clear();
    s.player.velocity = Vec2::new(0.5, -1.0);
    s
}

#[test]
fn short_frame_only_banks_time() {
    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (s, steps) = driver.advance(&make_state(), 0.01, &tuning());
    assert_eq!(steps, 0);
    assert_eq!(s.steps, 0);
    assert!((driver.accumulator() - 0.01).abs() < 1e-6);
}

#[test]
fn banked_time_carries_into_next_frame() {
    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (s, _) = driver.advance(&make_state(), 0.01, &tuning());
    let (s, steps) = driver.advance(&s, 0.01, &tuning());
    assert_eq!(steps, 1);
    assert_eq!(s.steps, 1);
    assert!((driver.accumulator() - (0.02 - FIXED_TIMESTEP)).abs() < 1e-6);
}

#[test]
fn long_frame_drains_whole_steps() {
    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (s, steps) = driver.advance(&make_state(), 0.1, &tuning());
    assert_eq!(steps, 6);
    assert_eq!(s.steps, 6);
    assert!(driver.accumulator() < FIXED_TIMESTEP);
}

#[test]
fn negative_delta_counts_as_zero() {
    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (_, steps) = driver.advance(&make_state(), -1.0, &tuning());
    assert_eq!(steps, 0);
    assert_eq!(driver.accumulator(), 0.0);
}

#[test]
fn driver_matches_direct_ticks() {
    let start = drifting_state();
    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (driven, steps) = driver.advance(&start, 0.1, &tuning());

    let mut manual = start.clone();
    for _ in 0..steps {
        manual = tick(&manual, FIXED_TIMESTEP, &tuning());
    }
    assert_eq!(driven.player, manual.player);
    assert_eq!(driven.steps, manual.steps);
}

#[test]
fn frame_rate_does_not_change_the_trajectory() {
    let start = drifting_state();

    let mut fast = FrameDriver::new(FIXED_TIMESTEP);
    let mut a = start.clone();
    for _ in 0..3 {
        a = fast.advance(&a, 0.04, &tuning()).0;
    }

    let mut slow = FrameDriver::new(FIXED_TIMESTEP);
    let (b, _) = slow.advance(&start, 0.12, &tuning());

    assert_eq!(a.steps, 7);
    assert_eq!(a.player, b.player);
    assert_eq!(a.steps, b.steps);
}

#[test]
fn win_halts_stepping_and_shows_banner() {
    let mut s = make_state();
    s.player.position = Vec2::new(-1.95, -2.21);
    s.player.velocity = Vec2::new(0.0, -1.0);

    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (s, steps) = driver.advance(&s, 1.0, &tuning());
    assert_eq!(steps, 1);
    assert_eq!(s.outcome, Outcome::Won);

    let active: Vec<OverlayKind> = s.overlays.iter().filter(|o| o.active).map(|o| o.kind).collect();
    assert_eq!(active, vec![OverlayKind::Win]);

    let (after, steps) = driver.advance(&s, 1.0, &tuning());
    assert_eq!(steps, 0);
    assert_eq!(after, s);
}

#[test]
fn out_of_fuel_keeps_driver_running() {
    let mut s = make_state();
    s.player.fuel = 0.0;
    s.player.velocity = Vec2::new(0.0, -1.0);

    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (s, steps) = driver.advance(&s, 0.1, &tuning());
    assert_eq!(steps, 6);
    assert_eq!(s.outcome, Outcome::OutOfFuel);
    assert_eq!(s.player.position, Vec2::new(0.0, 3.0));
    assert!(s
        .overlays
        .iter()
        .any(|o| o.kind == OverlayKind::NoFuel && o.active));
}

#[test]
fn hazard_landing_halts_stepping_and_shows_banner() {
    let mut s = make_state();
    s.player.position = Vec2::new(0.0, -0.91);
    s.player.velocity = Vec2::new(0.0, -1.0);

    let mut driver = FrameDriver::new(FIXED_TIMESTEP);
    let (s, steps) = driver.advance(&s, 0.05, &tuning());
    assert_eq!(steps, 1);
    assert_eq!(s.outcome, Outcome::Lost);

    let active: Vec<OverlayKind> = s.overlays.iter().filter(|o| o.active).map(|o| o.kind).collect();
    assert_eq!(active, vec![OverlayKind::Lose]);

    let (after, steps) = driver.advance(&s, 1.0, &tuning());
    assert_eq!(steps, 0);
    assert_eq!(after, s);
}

#[test]
fn stalled_frame_runs_at_most_the_cap_and_drops_backlog() {
    for delta in [5.0, 1.0e6] {
        let mut driver = FrameDriver::new(FIXED_TIMESTEP);
        let (s, steps) = driver.advance(&drifting_state(), delta, &tuning());
        assert_eq!(steps, MAX_STEPS_PER_FRAME);
        assert_eq!(s.steps, u64::from(MAX_STEPS_PER_FRAME));
        assert_eq!(driver.accumulator(), 0.0);
    }
}

#[test]
fn non_finite_delta_counts_as_zero() {
    for delta in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
        let mut driver = FrameDriver::new(FIXED_TIMESTEP);
        let (s, steps) = driver.advance(&drifting_state(), delta, &tuning());
        assert_eq!(steps, 0);
        assert_eq!(s.steps, 0);
        assert_eq!(driver.accumulator(), 0.0);
    }
}

#[test]
fn cap_comes_from_tuning() {
    let mut t = tuning();
    t.max_steps_per_frame = 2;
    let mut driver = FrameDriver::from_tuning(&t);
    assert_eq!(driver.max_steps_per_frame(), 2);
    assert_eq!(driver.fixed_step(), t.fixed_timestep);

    let (s, steps) = driver.advance(&drifting_state(), 0.1, &t);
    assert_eq!(steps, 2);
    assert_eq!(driver.accumulator(), 0.0);

    // Normal frames resume once the backlog is gone.
    let (_, steps) = driver.advance(&s, 0.02, &t);
    assert_eq!(steps, 1);
}
