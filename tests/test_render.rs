use lunar_lander::compute::{init_state, steer, sync_overlays};
use lunar_lander::config::Tuning;
use lunar_lander::entities::*;
use lunar_lander::render::{draw_list, SpriteRegion};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> SimulationState {
    init_state(&Tuning::default(), &mut StdRng::seed_from_u64(42))
}

#[test]
fn atlas_region_uv() {
    let r = SpriteRegion::from_atlas(6, 4, 4);
    assert_eq!(r.u, 0.5);
    assert_eq!(r.v, 0.25);
    assert_eq!(r.width, 0.25);
    assert_eq!(r.height, 0.25);
}

#[test]
fn draw_order_background_player_platforms() {
    let calls = draw_list(&make_state());
    assert_eq!(calls.len(), 7);
    assert_eq!(calls[0].kind, EntityKind::Background);
    assert_eq!(calls[1].kind, EntityKind::Player);
    assert!(calls[2..].iter().all(|c| matches!(
        c.kind,
        EntityKind::SafePlatform | EntityKind::HazardPlatform
    )));
}

#[test]
fn player_region_follows_facing() {
    // Spawn facing right: first frame of the right-hand row is cell 8.
    let calls = draw_list(&make_state());
    let region = calls[1].region.unwrap();
    assert_eq!(region.index, 8);
    assert_eq!(region.u, 0.0);
    assert_eq!(region.v, 0.5);

    let turned = steer(&make_state(), Vec2::new(0.0, 1.0));
    let region = draw_list(&turned)[1].region.unwrap();
    assert_eq!(region.index, 0);
}

#[test]
fn platforms_draw_at_their_render_size() {
    let s = make_state();
    let calls = draw_list(&s);
    let pad = calls
        .iter()
        .find(|c| c.kind == EntityKind::SafePlatform)
        .unwrap();
    assert_eq!(pad.transform.scale, Vec2::new(1.128, 1.114));
    assert!(pad.region.is_none());
}

#[test]
fn inactive_entities_are_not_drawn() {
    let mut s = make_state();
    s.player.active = false;
    s.platforms[0].active = false;
    s.background.active = false;
    let calls = draw_list(&s);
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|c| c.kind != EntityKind::Player));
}

#[test]
fn decided_round_draws_its_banner_last() {
    let mut s = make_state();
    s.outcome = Outcome::Won;
    sync_overlays(&mut s);
    let calls = draw_list(&s);
    assert_eq!(calls.last().unwrap().kind, EntityKind::WinOverlay);
    let overlays = calls
        .iter()
        .filter(|c| {
            matches!(
                c.kind,
                EntityKind::WinOverlay | EntityKind::LoseOverlay | EntityKind::NoFuelOverlay
            )
        })
        .count();
    assert_eq!(overlays, 1);
}

#[test]
fn transform_matrix_is_translate_then_scale() {
    let t = Transform::new(Vec2::new(1.5, -2.0), Vec2::new(2.0, 3.0));
    let m = t.matrix();
    assert_eq!(m[0][0], 2.0);
    assert_eq!(m[1][1], 3.0);
    assert_eq!(m[3][0], 1.5);
    assert_eq!(m[3][1], -2.0);
    assert_eq!(m[3][3], 1.0);
}
