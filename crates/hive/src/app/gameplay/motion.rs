use engine::{InputAction, InputSnapshot, StageTransform, Vec2, Viewport};

use crate::app::config::{PlayerTuning, StageTuning};

use super::types::{Actor, Intent, PlayerMood, TimerId};

const MOVING_SPEED_EPSILON: f32 = 0.05;

impl Intent {
    /// Samples the engine snapshot; pointer pixels are mapped into the stage.
    pub(crate) fn from_input(input: &InputSnapshot, stage_size: Vec2) -> Self {
        let axis = |negative: InputAction, positive: InputAction| -> f32 {
            let mut value = 0.0;
            if input.is_down(negative) {
                value -= 1.0;
            }
            if input.is_down(positive) {
                value += 1.0;
            }
            value
        };
        let (window_width, window_height) = input.window_size();
        let transform = StageTransform::fit(
            stage_size,
            Viewport {
                width: window_width,
                height: window_height,
            },
        );

        Self {
            move_axis: Vec2::new(
                axis(InputAction::MoveLeft, InputAction::MoveRight),
                axis(InputAction::MoveUp, InputAction::MoveDown),
            ),
            pointer: input
                .pointer_position_px()
                .map(|px| transform.screen_to_stage(px)),
            interact_held: input.is_down(InputAction::Interact),
            interact_pressed: input.interact_pressed(),
            observe_held: input.is_down(InputAction::Observe),
            observe_pressed: input.observe_pressed(),
            retreat_held: input.is_down(InputAction::Retreat),
            continue_pressed: input.continue_pressed(),
        }
    }
}

/// A pointer farther than the dead zone overrides the keyboard axes.
pub(crate) fn movement_direction(intent: &Intent, position: Vec2, dead_zone: f32) -> Vec2 {
    if let Some(pointer) = intent.pointer {
        let offset = pointer - position;
        if offset.length() > dead_zone {
            return offset.normalized_or_zero();
        }
    }
    Vec2::new(
        intent.move_axis.x.clamp(-1.0, 1.0),
        intent.move_axis.y.clamp(-1.0, 1.0),
    )
}

pub(crate) fn player_speed(stress: f32, tuning: &PlayerTuning) -> f32 {
    if stress > tuning.stressed_threshold {
        tuning.stressed_speed
    } else {
        tuning.speed
    }
}

pub(crate) fn clamp_to_stage(position: Vec2, stage: &StageTuning) -> Vec2 {
    Vec2::new(
        position.x.clamp(stage.inset_x, stage.width - stage.inset_x),
        position
            .y
            .clamp(stage.inset_top, stage.height - stage.inset_bottom),
    )
}

pub(crate) fn step_player(
    player: &mut Actor<PlayerMood>,
    intent: &Intent,
    stress: f32,
    player_tuning: &PlayerTuning,
    stage: &StageTuning,
) {
    let direction = movement_direction(intent, player.position, player_tuning.pointer_dead_zone);
    let speed = player_speed(stress, player_tuning);
    player.velocity = player
        .velocity
        .lerp(direction * speed, player_tuning.velocity_smoothing);
    player.position = clamp_to_stage(player.position + player.velocity, stage);
    if direction.x != 0.0 {
        player.facing = direction.x.signum();
    }
    player.timers.advance(TimerId::EyePulse);
    player.mood = classify_player(stress, intent, player.velocity.length(), player_tuning);
}

fn classify_player(
    stress: f32,
    intent: &Intent,
    speed: f32,
    player_tuning: &PlayerTuning,
) -> PlayerMood {
    if stress > player_tuning.stressed_threshold {
        PlayerMood::Stressed
    } else if intent.interact_held || intent.observe_held {
        PlayerMood::Observing
    } else if speed > MOVING_SPEED_EPSILON {
        PlayerMood::Moving
    } else {
        PlayerMood::Idle
    }
}
