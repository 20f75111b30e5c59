use engine::Vec2;
use rand::Rng;
use tracing::info;

use crate::app::config::StageTuning;

use super::cues::Cue;
use super::script;
use super::story::{SceneStep, TickContext};
use super::types::{stage_point, PendingTransition, SceneId};

const WELL_ANCHOR: (f32, f32) = (0.5, 0.6);
const GAUGE_SNAP_EPSILON: f32 = 1e-4;
const BREATH_LEVEL_MAX: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WellScene {
    well_position: Vec2,
    discovered: bool,
    listening: bool,
}

impl WellScene {
    pub(crate) fn new(stage: &StageTuning) -> Self {
        Self {
            well_position: stage_point(stage, WELL_ANCHOR.0, WELL_ANCHOR.1),
            discovered: false,
            listening: false,
        }
    }

    pub(crate) fn well_position(&self) -> Vec2 {
        self.well_position
    }

    pub(crate) fn discovered(&self) -> bool {
        self.discovered
    }

    /// True on ticks where the gauge rose.
    pub(crate) fn listening(&self) -> bool {
        self.listening
    }

    pub(crate) fn update(&mut self, ctx: &mut TickContext<'_>) -> SceneStep {
        let tuning = &ctx.tuning.well;
        let distance = ctx.player.position.distance(self.well_position);
        let in_range = distance < tuning.radius && !self.discovered;
        self.listening = in_range && ctx.intent.interact_held;

        if self.listening {
            let raised = ctx.progress.gauge() + tuning.fill_per_tick;
            ctx.progress.set_gauge(snap_full(raised));
            ctx.progress.add_stress(tuning.listen_stress_per_tick);
            if ctx.rng.gen_bool(tuning.breath_cue_chance) {
                ctx.cues
                    .emit(Cue::BreathLevel(breath_level(ctx.progress.gauge())));
            }
            if ctx.rng.gen_bool(tuning.tick_cue_chance) {
                ctx.cues.emit(Cue::Tick);
            }
        } else {
            ctx.progress
                .set_gauge(ctx.progress.gauge() - tuning.decay_per_tick);
            ctx.progress
                .approach_stress(0.0, tuning.stress_decay_per_tick);
        }

        let mut step = SceneStep::default();
        if ctx.progress.gauge() >= 1.0 && !self.discovered {
            self.discovered = true;
            self.listening = false;
            ctx.progress
                .add_imagination(tuning.discovery_imagination_bonus);
            ctx.dialogue.push(script::WELL_DISCOVERED);
            ctx.cues.emit(Cue::Discovery);
            info!(
                imagination = ctx.progress.imagination(),
                "well_discovered"
            );
            step.schedule = Some(PendingTransition {
                from: SceneId::Well,
                to: SceneId::House,
                remaining_ticks: tuning.transition_delay_ticks,
            });
        }
        step.hint = (in_range && !self.discovered).then_some(script::HINT_LISTEN);
        step
    }
}

fn snap_full(gauge: f32) -> f32 {
    if gauge >= 1.0 - GAUGE_SNAP_EPSILON {
        1.0
    } else {
        gauge
    }
}

pub(crate) fn breath_level(gauge: f32) -> u8 {
    let bucket = (gauge.clamp(0.0, 1.0) * f32::from(BREATH_LEVEL_MAX + 1)).floor() as u8;
    bucket.min(BREATH_LEVEL_MAX)
}
