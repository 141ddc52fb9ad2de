/// What the renderer needs to draw a frame: one `DrawCall` per visible
/// entity, in painter's order.  Inactive entities produce nothing.

use crate::compute::atlas_index;
use crate::entities::{
    EntityKind, OverlayKind, PlatformKind, SimulationState, Transform, Vec2,
};

/// A cell of a sprite atlas in UV space (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRegion {
    pub index: usize,
    pub u: f32,
    pub v: f32,
    pub width: f32,
    pub height: f32,
}

impl SpriteRegion {
    pub fn from_atlas(index: usize, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            index,
            u: (index % cols) as f32 / cols as f32,
            v: (index / cols) as f32 / rows as f32,
            width: 1.0 / cols as f32,
            height: 1.0 / rows as f32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub kind: EntityKind,
    pub transform: Transform,
    /// `None` means the whole texture.
    pub region: Option<SpriteRegion>,
}

fn platform_kind(kind: PlatformKind) -> EntityKind {
    match kind {
        PlatformKind::Safe => EntityKind::SafePlatform,
        PlatformKind::Hazard => EntityKind::HazardPlatform,
        PlatformKind::Solid => EntityKind::SolidPlatform,
    }
}

fn overlay_kind(kind: OverlayKind) -> EntityKind {
    match kind {
        OverlayKind::Win => EntityKind::WinOverlay,
        OverlayKind::Lose => EntityKind::LoseOverlay,
        OverlayKind::NoFuel => EntityKind::NoFuelOverlay,
    }
}

/// Background, lander, platforms, then the active overlay on top.
pub fn draw_list(state: &SimulationState) -> Vec<DrawCall> {
    let mut calls = Vec::with_capacity(state.platforms.len() + 3);

    if state.background.active {
        calls.push(DrawCall {
            kind: EntityKind::Background,
            transform: Transform::new(Vec2::ZERO, state.background.size),
            region: None,
        });
    }

    let player = &state.player;
    if player.active {
        let region = player.animation.as_ref().and_then(|animation| {
            atlas_index(animation)
                .map(|index| SpriteRegion::from_atlas(index, animation.cols, animation.rows))
        });
        calls.push(DrawCall {
            kind: EntityKind::Player,
            transform: player.transform,
            region,
        });
    }

    calls.extend(state.platforms.iter().filter(|p| p.active).map(|p| DrawCall {
        kind: platform_kind(p.kind),
        transform: Transform::new(p.position, p.size),
        region: None,
    }));

    calls.extend(state.overlays.iter().filter(|o| o.active).map(|o| DrawCall {
        kind: overlay_kind(o.kind),
        transform: Transform::new(o.position, o.size),
        region: None,
    }));

    calls
}
