use engine::Vec2;
use tracing::{debug, info};

use crate::app::config::{HideoutTuning, StageTuning};

use super::cues::Cue;
use super::motion::clamp_to_stage;
use super::script;
use super::story::{SceneStep, TickContext};
use super::types::{clamp_unit, stage_point, Actor, PlayerMood, SpiritMood};

const SPIRIT_ANCHOR: (f32, f32) = (0.5, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DistanceBand {
    TooClose,
    Interaction,
    Far,
}

pub(crate) fn distance_band(distance: f32, tuning: &HideoutTuning) -> DistanceBand {
    if distance < tuning.too_close_radius {
        DistanceBand::TooClose
    } else if distance < tuning.interaction_radius {
        DistanceBand::Interaction
    } else {
        DistanceBand::Far
    }
}

/// Mood from the scalars alone; `Resolved` is layered on by the scene.
pub(crate) fn npc_state(trust: f32, imagination: f32, receptive_threshold: f32) -> SpiritMood {
    if trust >= receptive_threshold && imagination >= receptive_threshold {
        SpiritMood::Receptive
    } else {
        SpiritMood::Wary
    }
}

pub(crate) fn fear_reaction(distance: f32, tuning: &HideoutTuning) -> f32 {
    if distance < tuning.too_close_radius {
        1.0
    } else {
        clamp_unit(1.0 - distance / tuning.fear_falloff)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HideoutScene {
    spirit: Actor<SpiritMood>,
    band: DistanceBand,
    fear: f32,
    resolved: bool,
    photo_revealed: bool,
}

impl HideoutScene {
    pub(crate) fn new(stage: &StageTuning) -> Self {
        Self {
            spirit: Actor::new(
                stage_point(stage, SPIRIT_ANCHOR.0, SPIRIT_ANCHOR.1),
                SpiritMood::Wary,
            ),
            band: DistanceBand::Far,
            fear: 0.0,
            resolved: false,
            photo_revealed: false,
        }
    }

    pub(crate) fn spirit_position(&self) -> Vec2 {
        self.spirit.position
    }

    pub(crate) fn spirit_facing(&self) -> f32 {
        self.spirit.facing
    }

    pub(crate) fn mood(&self) -> SpiritMood {
        self.spirit.mood
    }

    pub(crate) fn band(&self) -> DistanceBand {
        self.band
    }

    pub(crate) fn fear(&self) -> f32 {
        self.fear
    }

    pub(crate) fn resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn photo_revealed(&self) -> bool {
        self.photo_revealed
    }

    /// Screen darkens while the player crowds the spirit.
    pub(crate) fn darkened(&self) -> bool {
        self.band == DistanceBand::TooClose
    }

    pub(crate) fn update(&mut self, ctx: &mut TickContext<'_>) -> SceneStep {
        let tuning = &ctx.tuning.hideout;
        if ctx.intent.retreat_held {
            self.retreat(ctx.player, tuning.retreat_nudge, &ctx.tuning.stage);
        }

        let distance = ctx.player.position.distance(self.spirit.position);
        let band = distance_band(distance, tuning);
        if band != self.band {
            debug!(band = ?band, distance, "spirit_band_changed");
            self.band = band;
        }
        if band == DistanceBand::TooClose {
            ctx.progress.add_trust(-tuning.too_close_trust_drain);
            ctx.progress
                .add_imagination(-tuning.too_close_imagination_drain);
            ctx.progress.set_stress(1.0);
        } else {
            ctx.progress
                .approach_stress(tuning.stress_baseline, tuning.stress_decay_per_tick);
        }
        self.fear = fear_reaction(distance, tuning);
        self.set_mood(self.displayed_mood(band, ctx, tuning));

        let to_player = ctx.player.position.x - self.spirit.position.x;
        if to_player != 0.0 {
            self.spirit.facing = to_player.signum();
        }

        if ctx.intent.interact_pressed {
            self.give(ctx, tuning);
        }
        if ctx.intent.observe_pressed {
            self.observe(ctx, tuning);
        }

        SceneStep {
            hint: self.hint(ctx),
            schedule: None,
        }
    }

    fn displayed_mood(
        &self,
        band: DistanceBand,
        ctx: &TickContext<'_>,
        tuning: &HideoutTuning,
    ) -> SpiritMood {
        if self.resolved {
            SpiritMood::Resolved
        } else if band == DistanceBand::TooClose {
            SpiritMood::Wary
        } else {
            npc_state(
                ctx.progress.trust(),
                ctx.progress.imagination(),
                tuning.receptive_threshold,
            )
        }
    }

    fn set_mood(&mut self, mood: SpiritMood) {
        if self.spirit.mood != mood {
            info!(mood = ?mood, "spirit_mood_changed");
            self.spirit.mood = mood;
        }
    }

    fn retreat(&self, player: &mut Actor<PlayerMood>, nudge: f32, stage: &StageTuning) {
        let away = if player.position.y >= self.spirit.position.y {
            1.0
        } else {
            -1.0
        };
        player.position = clamp_to_stage(player.position + Vec2::new(0.0, away * nudge), stage);
    }

    fn give(&mut self, ctx: &mut TickContext<'_>, tuning: &HideoutTuning) {
        match self.band {
            DistanceBand::TooClose => reject(ctx, "give"),
            DistanceBand::Interaction => match ctx.progress.inventory.take_oldest() {
                Some(item) => {
                    ctx.progress.add_trust(tuning.give_trust_gain);
                    ctx.progress.add_imagination(tuning.give_imagination_gain);
                    ctx.cues.emit(Cue::Drop);
                    ctx.dialogue.push(script::give_line(item));
                    info!(
                        item = item.name(),
                        trust = ctx.progress.trust(),
                        imagination = ctx.progress.imagination(),
                        "item_given"
                    );
                }
                None => ctx.dialogue.push(script::HIDEOUT_NOTHING_LEFT),
            },
            DistanceBand::Far => {}
        }
    }

    fn observe(&mut self, ctx: &mut TickContext<'_>, tuning: &HideoutTuning) {
        match self.band {
            DistanceBand::TooClose => reject(ctx, "observe"),
            DistanceBand::Interaction if !self.resolved => {
                ctx.progress
                    .add_imagination(tuning.observe_imagination_gain);
                ctx.progress.add_trust(tuning.observe_trust_gain);
                self.photo_revealed = true;
                self.resolved = true;
                self.set_mood(SpiritMood::Resolved);
                ctx.cues.emit(Cue::Reveal);
                ctx.dialogue.push(script::HIDEOUT_REVEAL);
                ctx.dialogue.push(script::EPILOGUE);
                info!(
                    imagination = ctx.progress.imagination(),
                    trust = ctx.progress.trust(),
                    "hideout_resolved"
                );
            }
            DistanceBand::Interaction | DistanceBand::Far => {}
        }
    }

    fn hint(&self, ctx: &TickContext<'_>) -> Option<&'static str> {
        match self.band {
            DistanceBand::TooClose => Some(script::HINT_BACK_AWAY),
            DistanceBand::Interaction if !ctx.progress.inventory.is_empty() => {
                Some(script::HINT_GIVE)
            }
            DistanceBand::Interaction if !self.resolved => Some(script::HINT_OBSERVE),
            DistanceBand::Far if !self.resolved => Some(script::HINT_FAR),
            DistanceBand::Interaction | DistanceBand::Far => None,
        }
    }
}

fn reject(ctx: &mut TickContext<'_>, action: &'static str) {
    ctx.dialogue.push(script::HIDEOUT_TOO_CLOSE);
    // Give and observe on the same tick share one cue.
    if !ctx.cues.iter_emitted_so_far().any(|cue| *cue == Cue::Reject) {
        ctx.cues.emit(Cue::Reject);
    }
    debug!(action, "interaction_rejected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npc_state_needs_both_scalars() {
        assert_eq!(npc_state(0.6, 0.6, 0.6), SpiritMood::Receptive);
        assert_eq!(npc_state(0.59, 0.9, 0.6), SpiritMood::Wary);
        assert_eq!(npc_state(0.9, 0.59, 0.6), SpiritMood::Wary);
    }

    #[test]
    fn bands_split_at_their_radii() {
        let tuning = HideoutTuning::default();
        assert_eq!(distance_band(49.9, &tuning), DistanceBand::TooClose);
        assert_eq!(distance_band(50.0, &tuning), DistanceBand::Interaction);
        assert_eq!(distance_band(139.9, &tuning), DistanceBand::Interaction);
        assert_eq!(distance_band(140.0, &tuning), DistanceBand::Far);
    }

    #[test]
    fn fear_falls_off_with_distance() {
        let tuning = HideoutTuning::default();
        assert_eq!(fear_reaction(10.0, &tuning), 1.0);
        assert!((fear_reaction(60.0, &tuning) - 0.5).abs() < 1e-5);
        assert_eq!(fear_reaction(200.0, &tuning), 0.0);
    }
}
