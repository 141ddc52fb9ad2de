/// Simulation entity types. Pure data, no game rules.
///
/// Rules live in `compute`; everything here derives `Serialize` /
/// `Deserialize` so a whole session can be snapshotted and restored.

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

// ── Math ──────────────────────────────────────────────────────────────────────

/// A 2D vector in world units (the view spans x ∈ [-5, 5], y ∈ [-3.75, 3.75]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn get(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Model transform handed to the renderer: translate, then scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec2,
    pub scale: Vec2,
}

impl Transform {
    pub fn new(translation: Vec2, scale: Vec2) -> Self {
        Self { translation, scale }
    }

    /// Column-major 4x4 model matrix (z unused).
    pub fn matrix(&self) -> [[f32; 4]; 4] {
        [
            [self.scale.x, 0.0, 0.0, 0.0],
            [0.0, self.scale.y, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [self.translation.x, self.translation.y, 0.0, 1.0],
        ]
    }
}

// ── Animation ─────────────────────────────────────────────────────────────────

/// Direction the lander sprite faces; selects a row of the frame table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

impl Facing {
    /// Row of the frame table for this facing.
    pub fn row(self) -> usize {
        match self {
            Facing::Left => 0,
            Facing::Right => 1,
            Facing::Up => 2,
            Facing::Down => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Atlas indices per facing, ordered left, right, up, down.
    pub frames: Vec<Vec<usize>>,
    pub facing: Facing,
    /// Position within the current facing's row.
    pub index: usize,
    pub frame_count: usize,
    pub cols: usize,
    pub rows: usize,
    /// Seconds accumulated towards the next frame.
    pub elapsed: f32,
}

// ── Collision ─────────────────────────────────────────────────────────────────

/// Which sides touched something during the most recent step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// The player-controlled lander, the only entity with physics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lander {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Single-step intent, magnitude ≤ 1. Zeroed by every update.
    pub movement: Vec2,
    pub speed: f32,
    pub jump_power: f32,
    pub fuel: f32,
    /// Full collision extents.
    pub width: f32,
    pub height: f32,
    /// Render scale.
    pub size: Vec2,
    pub animation: Option<Animation>,
    pub collisions: CollisionFlags,
    pub active: bool,
    pub transform: Transform,
}

// ── Scenery ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Landing pad: touching it wins.
    Safe,
    /// Touching it loses.
    Hazard,
    /// Blocks movement, no outcome.
    Solid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub kind: PlatformKind,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub size: Vec2,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    Win,
    Lose,
    NoFuel,
}

/// Full-screen banner shown once the round is decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub position: Vec2,
    pub size: Vec2,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub size: Vec2,
    pub stars: Vec<Vec2>,
    pub active: bool,
}

/// Tag reported to the renderer for every drawn entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    SafePlatform,
    HazardPlatform,
    SolidPlatform,
    WinOverlay,
    LoseOverlay,
    NoFuelOverlay,
    Background,
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Session result. Anything other than `Flying` is sticky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Flying,
    Won,
    Lost,
    OutOfFuel,
}

impl Outcome {
    /// Won or lost: the frame driver stops stepping physics.
    pub fn is_terminal(self) -> bool {
        matches!(self, Outcome::Won | Outcome::Lost)
    }
}

/// Raw signals raised by a single lander update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepSignals {
    pub hazard: bool,
    pub safe: bool,
    pub out_of_fuel: bool,
}

// ── Master simulation state ───────────────────────────────────────────────────

/// The entire session.  Cloneable so `compute::tick` can return a new copy
/// without mutating the original.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub player: Lander,
    pub platforms: Vec<Platform>,
    pub background: Background,
    pub overlays: Vec<Overlay>,
    pub outcome: Outcome,
    /// Fixed steps simulated so far.
    pub steps: u64,
    /// Simulated seconds (steps × fixed timestep).
    pub elapsed: f64,
}
