/// Simulation rules.
///
/// Top-level transitions (`init_state`, `steer`, `jump`, `tick`) take an
/// immutable `SimulationState` and return a brand-new one.  The lander-level
/// helpers they are built from mutate a `Lander` in place so the per-step
/// order (animation → acceleration → integrate Y → resolve Y → integrate X →
/// resolve X) stays readable.

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{
    Animation, Axis, Background, CollisionFlags, Facing, Lander, Outcome, Overlay, OverlayKind,
    Platform, PlatformKind, SimulationState, StepSignals, Transform, Vec2,
};

// ── Texture layout ───────────────────────────────────────────────────────────

const BACKGROUND_SIZE: Vec2 = Vec2::new(16.89, 9.75);
const RESULT_OVERLAY_SIZE: Vec2 = Vec2::new(5.0, 3.0);
const NO_FUEL_OVERLAY_SIZE: Vec2 = Vec2::new(5.39, 1.82);
const STAR_COUNT: usize = 48;

// ── Colliders ────────────────────────────────────────────────────────────────

/// Anything with an axis-aligned box.  `extents` are FULL width and height;
/// every overlap computation halves them.
pub trait Collider {
    fn center(&self) -> Vec2;
    fn extents(&self) -> Vec2;
    fn is_active(&self) -> bool;
}

impl Collider for Lander {
    fn center(&self) -> Vec2 {
        self.position
    }

    fn extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collider for Platform {
    fn center(&self) -> Vec2 {
        self.position
    }

    fn extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the lander described by `tuning`, at rest on its spawn point.
pub fn spawn_lander(tuning: &Tuning) -> Lander {
    let p = &tuning.player;
    let animation = (p.animation_frames > 0 && !p.walking.is_empty()).then(|| Animation {
        frames: p.walking.clone(),
        facing: Facing::Right,
        index: 0,
        frame_count: p.animation_frames,
        cols: p.animation_cols,
        rows: p.animation_rows,
        elapsed: 0.0,
    });

    Lander {
        position: p.spawn,
        velocity: Vec2::ZERO,
        acceleration: Vec2::new(0.0, p.gravity),
        movement: Vec2::ZERO,
        speed: p.speed,
        jump_power: p.jump_power,
        fuel: p.fuel,
        width: p.width,
        height: p.height,
        size: p.size,
        animation,
        collisions: CollisionFlags::default(),
        active: true,
        transform: Transform::new(p.spawn, p.size),
    }
}

/// Build the initial session.  The RNG only scatters background stars, so a
/// seeded RNG reproduces the same sky.
pub fn init_state(tuning: &Tuning, rng: &mut impl Rng) -> SimulationState {
    let platforms: Vec<Platform> = tuning
        .platforms
        .iter()
        .map(|spec| Platform {
            kind: spec.kind,
            position: spec.position,
            width: spec.width,
            height: spec.height,
            size: spec.size,
            active: true,
        })
        .collect();

    let half_w = BACKGROUND_SIZE.x / 2.0;
    let half_h = BACKGROUND_SIZE.y / 2.0;
    let stars = (0..STAR_COUNT)
        .map(|_| Vec2::new(rng.gen_range(-half_w..half_w), rng.gen_range(-half_h..half_h)))
        .collect();

    let overlay = |kind, size| Overlay {
        kind,
        position: Vec2::ZERO,
        size,
        active: false,
    };

    tracing::info!(platforms = platforms.len(), "simulation initialised");

    SimulationState {
        player: spawn_lander(tuning),
        platforms,
        background: Background {
            size: BACKGROUND_SIZE,
            stars,
            active: true,
        },
        overlays: vec![
            overlay(OverlayKind::Win, RESULT_OVERLAY_SIZE),
            overlay(OverlayKind::Lose, RESULT_OVERLAY_SIZE),
            overlay(OverlayKind::NoFuel, NO_FUEL_OVERLAY_SIZE),
        ],
        outcome: Outcome::Flying,
        steps: 0,
        elapsed: 0.0,
    }
}

// ── Input-driven transitions (pure) ──────────────────────────────────────────

/// Clamp a raw intent to magnitude ≤ 1.  Non-finite input counts as no input.
pub fn normalize_intent(raw: Vec2) -> Vec2 {
    if !raw.x.is_finite() || !raw.y.is_finite() {
        return Vec2::ZERO;
    }
    let length = raw.length();
    if length > 1.0 {
        raw * (1.0 / length)
    } else {
        raw
    }
}

/// Sprite facing for an intent; horizontal wins ties.
pub fn facing_for(intent: Vec2) -> Option<Facing> {
    if intent == Vec2::ZERO {
        None
    } else if intent.x.abs() >= intent.y.abs() {
        Some(if intent.x < 0.0 { Facing::Left } else { Facing::Right })
    } else {
        Some(if intent.y > 0.0 { Facing::Up } else { Facing::Down })
    }
}

/// Queue this frame's movement intent on the lander.
pub fn steer(state: &SimulationState, raw: Vec2) -> SimulationState {
    let mut next = state.clone();
    let intent = normalize_intent(raw);
    next.player.movement = intent;
    if let (Some(facing), Some(animation)) = (facing_for(intent), next.player.animation.as_mut()) {
        animation.facing = facing;
    }
    next
}

/// Kick the lander upwards, but only while it rests on something.
pub fn jump(state: &SimulationState) -> SimulationState {
    if !state.player.collisions.bottom || state.outcome.is_terminal() {
        return state.clone();
    }
    let mut next = state.clone();
    next.player.velocity.y += next.player.jump_power;
    next
}

// ── Lander update pieces ─────────────────────────────────────────────────────

/// Step the sprite frame while the lander is steering.
pub fn advance_animation(lander: &mut Lander, dt: f32, seconds_per_frame: f32) {
    let moving = lander.movement.length() != 0.0;
    let Some(animation) = lander.animation.as_mut() else {
        return;
    };
    if !moving {
        return;
    }

    animation.elapsed += dt;
    if animation.elapsed >= seconds_per_frame {
        animation.elapsed = 0.0;
        animation.index = (animation.index + 1) % animation.frame_count.max(1);
    }
}

/// Current atlas cell, if the frame table has one for this facing and index.
pub fn atlas_index(animation: &Animation) -> Option<usize> {
    animation
        .frames
        .get(animation.facing.row())?
        .get(animation.index)
        .copied()
}

/// Acceleration opposing residual drift; none when already still.
fn counter_thrust(velocity: f32, speed: f32) -> f32 {
    if velocity == 0.0 {
        0.0
    } else {
        -velocity.signum() * speed
    }
}

/// Turn the queued intent into acceleration, burning fuel per thrusting axis.
pub fn derive_acceleration(lander: &mut Lander, tuning: &Tuning) {
    let speed = lander.speed;
    let mut burned = 0.0;

    lander.acceleration.x = if lander.movement.x != 0.0 {
        burned += tuning.fuel_per_axis;
        lander.movement.x * speed
    } else {
        counter_thrust(lander.velocity.x, speed)
    };

    lander.acceleration.y = if lander.movement.y != 0.0 {
        burned += tuning.fuel_per_axis;
        lander.movement.y * speed
    } else if lander.velocity.y == tuning.hover_velocity {
        0.0
    } else {
        counter_thrust(lander.velocity.y, speed)
    };

    lander.fuel = (lander.fuel - burned).max(0.0);
}

/// Axis-aligned overlap test.  Symmetric in its arguments.
pub fn check_collision<A, B>(a: &A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    if !a.is_active() || !b.is_active() {
        return false;
    }
    let d = a.center() - b.center();
    let (ea, eb) = (a.extents(), b.extents());
    d.x.abs() < (ea.x + eb.x) / 2.0 && d.y.abs() < (ea.y + eb.y) / 2.0
}

/// Penetration depth along `axis`: `| |distance| − half_a − half_b |`.
pub fn overlap_depth<A, B>(a: &A, b: &B, axis: Axis) -> f32
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let distance = (a.center().get(axis) - b.center().get(axis)).abs();
    (distance - a.extents().get(axis) / 2.0 - b.extents().get(axis) / 2.0).abs()
}

/// Push the lander out of every overlapping neighbour along one axis.
///
/// The push goes against the lander's velocity on that axis, after which the
/// velocity component is zeroed and the matching side flag raised.  With zero
/// velocity the overlap is left as is, though it still counts for win/lose.
pub fn resolve_axis(
    lander: &mut Lander,
    neighbors: &[Platform],
    axis: Axis,
    signals: &mut StepSignals,
) {
    for neighbor in neighbors {
        if !check_collision(&*lander, neighbor) {
            continue;
        }

        match neighbor.kind {
            PlatformKind::Hazard => signals.hazard = true,
            PlatformKind::Safe => signals.safe = true,
            PlatformKind::Solid => {}
        }

        let depth = overlap_depth(&*lander, neighbor, axis);
        let velocity = lander.velocity.get(axis);
        let position = lander.position.get(axis);

        if velocity > 0.0 {
            lander.position.set(axis, position - depth);
            match axis {
                Axis::Y => lander.collisions.top = true,
                Axis::X => lander.collisions.right = true,
            }
        } else if velocity < 0.0 {
            lander.position.set(axis, position + depth);
            match axis {
                Axis::Y => lander.collisions.bottom = true,
                Axis::X => lander.collisions.left = true,
            }
        } else {
            continue;
        }
        lander.velocity.set(axis, 0.0);
    }
}

/// One fixed physics step for the lander against `neighbors`.
pub fn update_lander(
    lander: &mut Lander,
    dt: f32,
    neighbors: &[Platform],
    tuning: &Tuning,
) -> StepSignals {
    let mut signals = StepSignals::default();
    if !lander.active {
        return signals;
    }

    lander.collisions = CollisionFlags::default();
    advance_animation(lander, dt, tuning.seconds_per_frame());

    if lander.fuel <= 0.0 {
        lander.acceleration = Vec2::ZERO;
        lander.movement = Vec2::ZERO;
        signals.out_of_fuel = true;
        return signals;
    }

    derive_acceleration(lander, tuning);
    lander.movement = Vec2::ZERO;

    // Semi-implicit Euler: velocity first, then position with the new velocity.
    lander.velocity += lander.acceleration * dt;

    lander.position.y += lander.velocity.y * dt;
    resolve_axis(lander, neighbors, Axis::Y, &mut signals);

    lander.position.x += lander.velocity.x * dt;
    resolve_axis(lander, neighbors, Axis::X, &mut signals);

    lander.transform = Transform::new(lander.position, lander.size);
    tracing::trace!(fuel = lander.fuel, "lander updated");
    signals
}

// ── Outcome ──────────────────────────────────────────────────────────────────

/// Fold one step's signals into the session outcome.  A decided outcome never
/// changes; within a step a hazard beats a pad, and both beat running dry.
pub fn next_outcome(current: Outcome, signals: StepSignals) -> Outcome {
    if current != Outcome::Flying {
        return current;
    }
    if signals.hazard {
        Outcome::Lost
    } else if signals.safe {
        Outcome::Won
    } else if signals.out_of_fuel {
        Outcome::OutOfFuel
    } else {
        Outcome::Flying
    }
}

/// Activate exactly the overlay matching the outcome.
pub fn sync_overlays(state: &mut SimulationState) {
    let outcome = state.outcome;
    for overlay in &mut state.overlays {
        overlay.active = matches!(
            (overlay.kind, outcome),
            (OverlayKind::Win, Outcome::Won)
                | (OverlayKind::Lose, Outcome::Lost)
                | (OverlayKind::NoFuel, Outcome::OutOfFuel)
        );
    }
}

// ── Per-step tick ────────────────────────────────────────────────────────────

/// Advance the simulation by one fixed step.  Once won or lost the state is
/// returned unchanged.
pub fn tick(state: &SimulationState, dt: f32, tuning: &Tuning) -> SimulationState {
    if state.outcome.is_terminal() {
        return state.clone();
    }

    let mut next = state.clone();
    let signals = update_lander(&mut next.player, dt, &state.platforms, tuning);
    let outcome = next_outcome(state.outcome, signals);

    if outcome != state.outcome {
        match outcome {
            Outcome::OutOfFuel => tracing::warn!(step = state.steps, "lander out of fuel"),
            _ => tracing::info!(step = state.steps, ?outcome, "round decided"),
        }
    }

    next.outcome = outcome;
    next.steps += 1;
    next.elapsed += f64::from(dt);
    next
}
