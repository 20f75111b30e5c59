use engine::{wrap_text, Canvas, Color, Vec2};

use super::hideout::HideoutScene;
use super::house::{HouseScene, Watcher, WatcherKind};
use super::story::{ActiveScene, StoryState};
use super::types::{
    clamp_unit, Actor, Inventory, ItemId, PlayerMood, ProgressState, SceneId, TimerId,
};
use super::well::WellScene;

const TEXT_COLOR: Color = [232, 232, 242, 255];
const DIM_TEXT_COLOR: Color = [150, 150, 176, 255];
const PANEL_COLOR: Color = [10, 10, 18, 205];
const PANEL_BORDER_COLOR: Color = [90, 90, 120, 255];
const STRESS_BORDER_COLOR: Color = [120, 140, 255, 153];
const LOOKING_TINT: Color = [100, 120, 255, 20];
const ALERT_TINT: Color = [255, 0, 0, 51];
const DARKEN_TINT: Color = [0, 0, 0, 110];
const FEAR_TINT: Color = [255, 0, 0, 38];
const HUD_CELL: f32 = 2.0;
const DIALOGUE_CELL: f32 = 3.0;
const GLYPH_ADVANCE: f32 = 4.0;
const LINE_ADVANCE: f32 = 7.0;

/// Draws one frame from a read-only view of the story.
pub(crate) fn draw_story(canvas: &mut Canvas<'_>, story: &StoryState) {
    let stage = story.stage_size();
    let time = story.clock().tick() as f32;
    let progress = story.progress();

    match story.active() {
        ActiveScene::Well(scene) => draw_well(canvas, stage, scene, progress, time),
        ActiveScene::House(scene) => draw_house(canvas, stage, scene, &progress.inventory, time),
        ActiveScene::Hideout(scene) => draw_hideout(canvas, stage, scene, progress, time),
    }
    draw_player(canvas, story.player(), progress, story.scene_id());

    match story.active() {
        ActiveScene::House(scene) => {
            if scene.any_detecting() {
                canvas.tint(LOOKING_TINT);
            }
            if scene.caught() {
                canvas.tint(ALERT_TINT);
            }
        }
        ActiveScene::Hideout(scene) if scene.darkened() => {
            canvas.tint(DARKEN_TINT);
            canvas.tint(FEAR_TINT);
        }
        _ => {}
    }
    if progress.stress() > story.tuning().player.stressed_threshold {
        draw_stress_border(canvas, stage);
    }
    draw_hud(canvas, story, stage);
}

fn draw_well(
    canvas: &mut Canvas<'_>,
    stage: Vec2,
    scene: &WellScene,
    progress: &ProgressState,
    time: f32,
) {
    draw_vertical_gradient(canvas, stage, [16, 16, 32], [2, 2, 8]);
    canvas.fill_rect(
        Vec2::new(0.0, stage.y * 0.65),
        Vec2::new(stage.x, stage.y * 0.35),
        [28, 28, 42, 255],
    );

    let well = scene.well_position();
    canvas.fill_ellipse(well, 80.0, 30.0, [58, 58, 72, 255]);
    canvas.fill_ellipse(well, 50.0, 16.0, [10, 10, 20, 255]);

    if !scene.discovered() {
        for ring in 0..3 {
            let radius = 50.0 + (time * 0.05 + ring as f32).sin() * 6.0;
            let alpha = 0.2 - ring as f32 * 0.05;
            canvas.stroke_ellipse(
                well,
                radius,
                radius * 0.4,
                with_alpha([180, 200, 255, 255], alpha),
            );
        }
    }

    if progress.gauge() > 0.0 {
        let origin = Vec2::new(stage.x * 0.3, 30.0);
        let size = Vec2::new(stage.x * 0.4, 10.0);
        canvas.fill_rect(origin, size, [34, 34, 34, 255]);
        canvas.fill_rect(
            origin,
            Vec2::new(size.x * progress.gauge(), size.y),
            [143, 220, 255, 255],
        );
        canvas.stroke_rect(origin, size, [255, 255, 255, 255]);
    }
}

fn draw_house(
    canvas: &mut Canvas<'_>,
    stage: Vec2,
    scene: &HouseScene,
    inventory: &Inventory,
    time: f32,
) {
    canvas.fill_rect(Vec2::ZERO, stage, [26, 22, 36, 255]);
    canvas.fill_rect(
        Vec2::new(0.0, stage.y * 0.6),
        Vec2::new(stage.x, stage.y * 0.4),
        [36, 32, 48, 255],
    );
    canvas.fill_rect(
        Vec2::new(stage.x * 0.4, stage.y * 0.55),
        Vec2::new(160.0, 12.0),
        [58, 42, 26, 255],
    );

    if !inventory.contains(ItemId::Bread) {
        canvas.fill_ellipse(scene.item_position(ItemId::Bread), 10.0, 6.0, [210, 163, 106, 255]);
    }
    if !inventory.contains(ItemId::Water) {
        let water = scene.item_position(ItemId::Water);
        canvas.fill_rect(
            Vec2::new(water.x - 6.0, water.y - 10.0),
            Vec2::new(12.0, 20.0),
            [127, 207, 255, 255],
        );
    }
    let door = scene.door_position();
    canvas.fill_rect(
        Vec2::new(door.x - 20.0, door.y - 40.0),
        Vec2::new(40.0, 80.0),
        [64, 42, 32, 255],
    );

    for watcher in scene.watchers() {
        match watcher.kind() {
            WatcherKind::Father => draw_father(canvas, watcher, time),
            WatcherKind::Grandmother => draw_grandmother(canvas, watcher, time),
        }
    }
}

fn draw_father(canvas: &mut Canvas<'_>, father: &Watcher, time: f32) {
    let origin = father.position();
    canvas.fill_rect(offset(origin, -14.0, 10.0), Vec2::new(28.0, 40.0), [44, 44, 56, 255]);
    canvas.fill_circle(offset(origin, 0.0, -6.0), 14.0, [216, 194, 168, 255]);
    canvas.fill_rect(offset(origin, -9.0, -12.0), Vec2::new(7.0, 6.0), [180, 200, 255, 153]);
    canvas.fill_rect(offset(origin, 2.0, -12.0), Vec2::new(7.0, 6.0), [180, 200, 255, 153]);
    canvas.fill_rect(offset(origin, 12.0, 22.0), Vec2::new(8.0, 14.0), [204, 204, 204, 255]);
    canvas.fill_circle(offset(origin, 16.0, 30.0), 4.0, [160, 40, 40, 153]);
    let tremble = (time * 0.2).sin() * 1.5;
    canvas.fill_rect(
        offset(origin, -22.0, 22.0 + tremble),
        Vec2::new(8.0, 10.0),
        [208, 176, 144, 255],
    );

    for drop in 0..3 {
        let sway = (time * 0.1 + drop as f32).sin() * 12.0;
        canvas.fill_circle(
            offset(origin, sway, 50.0 + drop as f32 * 10.0),
            3.0,
            [255, 200, 80, 153],
        );
    }
    if father.is_detecting() {
        canvas.stroke_ellipse(offset(origin, 0.0, -6.0), 20.0, 20.0, [180, 200, 255, 200]);
    }
}

fn draw_grandmother(canvas: &mut Canvas<'_>, grandmother: &Watcher, time: f32) {
    let origin = grandmother.position();
    canvas.fill_rect(offset(origin, -13.0, 8.0), Vec2::new(26.0, 38.0), [70, 52, 60, 255]);
    canvas.fill_rect(offset(origin, -16.0, 6.0), Vec2::new(32.0, 12.0), [96, 74, 86, 255]);
    canvas.fill_circle(offset(origin, 0.0, -6.0), 12.0, [220, 200, 184, 255]);
    canvas.fill_circle(offset(origin, 0.0, -18.0), 6.0, [200, 200, 210, 255]);

    if grandmother.is_detecting() {
        for ripple in 0..2 {
            let radius = 18.0 + ripple as f32 * 8.0 + (time * 0.15).sin() * 2.0;
            canvas.stroke_ellipse(
                offset(origin, 0.0, -6.0),
                radius,
                radius,
                [200, 180, 255, 110],
            );
        }
    }
}

fn draw_hideout(
    canvas: &mut Canvas<'_>,
    stage: Vec2,
    scene: &HideoutScene,
    progress: &ProgressState,
    time: f32,
) {
    canvas.fill_rect(Vec2::ZERO, stage, [7, 7, 12, 255]);
    draw_light_shafts(canvas, stage);

    let origin = scene.spirit_position();
    let morph = clamp_unit(progress.imagination() + progress.trust());
    let facing = scene.spirit_facing();

    canvas.fill_ellipse(
        offset(origin, 0.0, 36.0),
        20.0 + scene.fear() * 30.0,
        8.0,
        [0, 0, 0, 102],
    );
    canvas.fill_rect(offset(origin, -12.0, 8.0), Vec2::new(24.0, 40.0), [58, 58, 58, 255]);
    let breath = (time * 0.03).sin() * 0.5;
    canvas.fill_circle(
        offset(origin, 0.0, -6.0),
        14.0 + morph * 2.0 + breath,
        [119, 119, 119, 255],
    );
    if morph > 0.7 {
        canvas.fill_rect(offset(origin, -18.0, -6.0), Vec2::new(6.0, 4.0), [170, 170, 170, 255]);
        canvas.fill_rect(offset(origin, 12.0, -6.0), Vec2::new(6.0, 4.0), [170, 170, 170, 255]);
    }
    if morph > 0.6 {
        let gold = [255, 217, 102, 255];
        canvas.line(offset(origin, -4.0, 10.0), offset(origin, 0.0, 24.0), gold);
        canvas.line(offset(origin, 0.0, 24.0), offset(origin, 6.0, 14.0), gold);
    }
    canvas.fill_circle(mirrored(origin, facing, -4.0, -8.0), 2.0, [0, 0, 0, 255]);
    canvas.fill_circle(mirrored(origin, facing, 4.0, -8.0), 2.0, [0, 0, 0, 255]);

    if progress.imagination() > 0.6 && progress.stress() < 0.4 {
        canvas.stroke_ellipse(offset(origin, 0.0, -10.0), 22.0, 22.0, [200, 220, 255, 128]);
    }

    let carrying_both =
        progress.inventory.contains(ItemId::Bread) && progress.inventory.contains(ItemId::Water);
    if carrying_both {
        canvas.line(offset(origin, 12.0, 20.0), offset(origin, 24.0, 12.0), [255, 255, 255, 255]);
    } else {
        canvas.line(offset(origin, -12.0, 20.0), offset(origin, -20.0, 28.0), [170, 170, 170, 255]);
    }

    if scene.photo_revealed() {
        let photo = offset(origin, 22.0, 30.0);
        canvas.fill_rect(photo, Vec2::new(12.0, 9.0), [230, 220, 190, 255]);
        canvas.stroke_rect(photo, Vec2::new(12.0, 9.0), [120, 100, 80, 255]);
    }
}

fn draw_light_shafts(canvas: &mut Canvas<'_>, stage: Vec2) {
    const BANDS: usize = 27;
    let band_height = stage.y / BANDS as f32;
    for shaft in 0..3 {
        let top_left = stage.x * (0.2 + shaft as f32 * 0.25);
        let drift = stage.x * 0.05;
        for band in 0..BANDS {
            let t = (band as f32 + 0.5) / BANDS as f32;
            canvas.fill_rect(
                Vec2::new(top_left + drift * t, band as f32 * band_height),
                Vec2::new(stage.x * 0.05, band_height),
                [200, 200, 255, 13],
            );
        }
    }
}

fn draw_player(
    canvas: &mut Canvas<'_>,
    player: &Actor<PlayerMood>,
    progress: &ProgressState,
    scene: SceneId,
) {
    let origin = player.position;
    let facing = player.facing;
    let pulse = player.timers.get(TimerId::EyePulse) as f32;

    fill_facing_rect(canvas, origin, facing, (-12.0, 4.0, 24.0, 30.0), [75, 74, 104, 255]);
    fill_facing_rect(canvas, origin, facing, (-18.0, 2.0, 36.0, 24.0), [59, 58, 85, 255]);
    fill_facing_rect(canvas, origin, facing, (-14.0, 26.0, 28.0, 14.0), [92, 90, 124, 255]);
    fill_facing_rect(canvas, origin, facing, (-8.0, 38.0, 6.0, 12.0), [214, 207, 207, 255]);
    fill_facing_rect(canvas, origin, facing, (2.0, 38.0, 6.0, 14.0), [214, 207, 207, 255]);
    canvas.fill_circle(offset(origin, 0.0, -10.0), 14.0, [240, 212, 192, 255]);
    canvas.fill_ellipse(mirrored(origin, facing, -2.0, -19.0), 15.0, 8.0, [17, 17, 17, 255]);

    let pupil = lerp(3.0, 5.0, progress.imagination()) * lerp(1.0, 1.3, progress.stress()) * 0.6;
    canvas.fill_circle(mirrored(origin, facing, -4.0, -11.0), pupil, [0, 0, 0, 255]);
    canvas.fill_circle(mirrored(origin, facing, 4.0, -11.0), pupil, [0, 0, 0, 255]);

    if progress.imagination() > 0.6 {
        let color = if progress.stress() > 0.6 {
            [102, 255, 224, 128]
        } else if scene == SceneId::Hideout {
            [169, 140, 255, 128]
        } else {
            [255, 217, 102, 128]
        };
        for mote in 0..6 {
            let angle = pulse * 0.05 + mote as f32;
            let radius = 18.0 + (pulse * 0.1 + mote as f32).sin() * 6.0;
            canvas.fill_circle(
                Vec2::new(origin.x + angle.cos() * radius, origin.y - 10.0 + angle.sin() * radius),
                2.0,
                color,
            );
        }
    }
}

fn draw_stress_border(canvas: &mut Canvas<'_>, stage: Vec2) {
    for inset in 10..16 {
        let inset = inset as f32;
        canvas.stroke_rect(
            Vec2::new(inset, inset),
            Vec2::new(stage.x - inset * 2.0, stage.y - inset * 2.0),
            STRESS_BORDER_COLOR,
        );
    }
}

fn draw_hud(canvas: &mut Canvas<'_>, story: &StoryState, stage: Vec2) {
    let progress = story.progress();
    let meters = [
        ("IMAGINATION", progress.imagination(), [255, 217, 102, 255]),
        ("TRUST", progress.trust(), [143, 220, 160, 255]),
        ("STRESS", progress.stress(), [255, 120, 120, 255]),
    ];
    for (row, (label, value, color)) in meters.into_iter().enumerate() {
        let y = 14.0 + row as f32 * 14.0;
        canvas.text(Vec2::new(20.0, y), label, HUD_CELL, DIM_TEXT_COLOR);
        let bar = Vec2::new(120.0, y);
        canvas.fill_rect(bar, Vec2::new(100.0, 8.0), [30, 30, 40, 255]);
        canvas.fill_rect(bar, Vec2::new(100.0 * value, 8.0), color);
    }

    if !progress.inventory.is_empty() {
        let items: Vec<&str> = progress.inventory.iter().map(ItemId::name).collect();
        canvas.text(
            Vec2::new(20.0, stage.y - 24.0),
            &format!("CARRYING: {}", items.join(", ")),
            HUD_CELL,
            TEXT_COLOR,
        );
    }

    if let Some(hint) = story.hint() {
        canvas.text_centered(Vec2::new(stage.x * 0.5, stage.y - 160.0), hint, HUD_CELL, TEXT_COLOR);
    }

    if let Some(line) = story.dialogue().current() {
        draw_dialogue_panel(canvas, stage, line, story.dialogue().pending_len() > 0);
    }
}

fn draw_dialogue_panel(canvas: &mut Canvas<'_>, stage: Vec2, line: &str, more: bool) {
    let panel_origin = Vec2::new(40.0, stage.y - 136.0);
    let panel_size = Vec2::new(stage.x - 80.0, 92.0);
    canvas.fill_rect(panel_origin, panel_size, PANEL_COLOR);
    canvas.stroke_rect(panel_origin, panel_size, PANEL_BORDER_COLOR);

    let max_chars = ((panel_size.x - 32.0) / (GLYPH_ADVANCE * DIALOGUE_CELL)).max(1.0) as usize;
    for (row, text) in wrap_text(line, max_chars).iter().take(3).enumerate() {
        let y = panel_origin.y + 14.0 + row as f32 * LINE_ADVANCE * DIALOGUE_CELL;
        canvas.text(
            Vec2::new(panel_origin.x + 16.0, y),
            text,
            DIALOGUE_CELL,
            TEXT_COLOR,
        );
    }
    let prompt = if more { "SPACE >" } else { "SPACE" };
    let prompt_width = prompt.len() as f32 * GLYPH_ADVANCE * HUD_CELL;
    canvas.text(
        Vec2::new(
            panel_origin.x + panel_size.x - 16.0 - prompt_width,
            panel_origin.y + panel_size.y - 16.0,
        ),
        prompt,
        HUD_CELL,
        DIM_TEXT_COLOR,
    );
}

fn draw_vertical_gradient(canvas: &mut Canvas<'_>, stage: Vec2, top: [u8; 3], bottom: [u8; 3]) {
    const BANDS: usize = 24;
    let band_height = stage.y / BANDS as f32;
    for band in 0..BANDS {
        let t = band as f32 / (BANDS - 1) as f32;
        let color = [
            lerp(f32::from(top[0]), f32::from(bottom[0]), t) as u8,
            lerp(f32::from(top[1]), f32::from(bottom[1]), t) as u8,
            lerp(f32::from(top[2]), f32::from(bottom[2]), t) as u8,
            255,
        ];
        canvas.fill_rect(
            Vec2::new(0.0, band as f32 * band_height),
            Vec2::new(stage.x, band_height + 1.0),
            color,
        );
    }
}

fn offset(origin: Vec2, x: f32, y: f32) -> Vec2 {
    Vec2::new(origin.x + x, origin.y + y)
}

fn mirrored(origin: Vec2, facing: f32, x: f32, y: f32) -> Vec2 {
    Vec2::new(origin.x + x * facing, origin.y + y)
}

/// `rect` is (x, y, width, height) relative to `origin` when facing right.
fn fill_facing_rect(
    canvas: &mut Canvas<'_>,
    origin: Vec2,
    facing: f32,
    rect: (f32, f32, f32, f32),
    color: Color,
) {
    let (x, y, width, height) = rect;
    let left = if facing < 0.0 { -(x + width) } else { x };
    canvas.fill_rect(
        Vec2::new(origin.x + left, origin.y + y),
        Vec2::new(width, height),
        color,
    );
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], (clamp_unit(alpha) * 255.0).round() as u8]
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use engine::Viewport;

    use super::*;
    use crate::app::config::Tuning;

    #[test]
    fn every_scene_draws_into_a_small_frame() {
        let mut story = StoryState::new(Tuning::default());
        for id in [SceneId::Well, SceneId::House, SceneId::Hideout] {
            story.jump_to(id);
            story.progress_mut().set_stress(0.9);
            story.progress_mut().add_imagination(0.5);
            let mut frame = vec![0u8; 320 * 180 * 4];
            let viewport = Viewport {
                width: 320,
                height: 180,
            };
            let mut canvas = Canvas::new(&mut frame, viewport, story.stage_size());
            draw_story(&mut canvas, &story);
            assert!(frame.iter().any(|byte| *byte != 0), "{id} drew nothing");
        }
    }

    #[test]
    fn alpha_is_clamped_into_a_byte() {
        assert_eq!(with_alpha([1, 2, 3, 255], 0.5)[3], 128);
        assert_eq!(with_alpha([1, 2, 3, 255], -1.0)[3], 0);
    }
}
