use engine::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::app::config::Tuning;

use super::cues::CueBus;
use super::dialogue::DialogueSequencer;
use super::hideout::HideoutScene;
use super::house::HouseScene;
use super::motion::step_player;
use super::script;
use super::types::{
    stage_point, Actor, Clock, Intent, PendingTransition, PlayerMood, ProgressState, SceneId,
};
use super::well::WellScene;

const PLAYER_SPAWN: (f32, f32) = (0.5, 0.65);

/// Everything a scene's rules may read or mutate during one tick.
pub(crate) struct TickContext<'a> {
    pub tuning: &'a Tuning,
    pub intent: &'a Intent,
    pub progress: &'a mut ProgressState,
    pub player: &'a mut Actor<PlayerMood>,
    pub dialogue: &'a mut DialogueSequencer,
    pub cues: &'a mut CueBus,
    pub rng: &'a mut StdRng,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SceneStep {
    pub hint: Option<&'static str>,
    pub schedule: Option<PendingTransition>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ActiveScene {
    Well(WellScene),
    House(HouseScene),
    Hideout(HideoutScene),
}

impl ActiveScene {
    fn enter(id: SceneId, tuning: &Tuning) -> Self {
        match id {
            SceneId::Well => ActiveScene::Well(WellScene::new(&tuning.stage)),
            SceneId::House => ActiveScene::House(HouseScene::new(&tuning.stage, &tuning.house)),
            SceneId::Hideout => ActiveScene::Hideout(HideoutScene::new(&tuning.stage)),
        }
    }

    pub(crate) fn id(&self) -> SceneId {
        match self {
            ActiveScene::Well(_) => SceneId::Well,
            ActiveScene::House(_) => SceneId::House,
            ActiveScene::Hideout(_) => SceneId::Hideout,
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        match self {
            ActiveScene::Well(scene) => scene.discovered(),
            ActiveScene::House(scene) => scene.escaped(),
            ActiveScene::Hideout(scene) => scene.resolved(),
        }
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> SceneStep {
        match self {
            ActiveScene::Well(scene) => scene.update(ctx),
            ActiveScene::House(scene) => scene.update(ctx),
            ActiveScene::Hideout(scene) => scene.update(ctx),
        }
    }
}

/// The whole story: one current scene plus the state that outlives scenes.
pub(crate) struct StoryState {
    tuning: Tuning,
    clock: Clock,
    progress: ProgressState,
    player: Actor<PlayerMood>,
    active: ActiveScene,
    pending: Option<PendingTransition>,
    dialogue: DialogueSequencer,
    hint: Option<&'static str>,
    cues: CueBus,
    rng: StdRng,
}

impl StoryState {
    pub(crate) fn new(tuning: Tuning) -> Self {
        let spawn = stage_point(&tuning.stage, PLAYER_SPAWN.0, PLAYER_SPAWN.1);
        let mut story = Self {
            clock: Clock::new(),
            progress: ProgressState::new(
                tuning.progress.initial_imagination,
                tuning.progress.initial_trust,
            ),
            player: Actor::new(spawn, PlayerMood::Idle),
            active: ActiveScene::enter(SceneId::Well, &tuning),
            pending: None,
            dialogue: DialogueSequencer::new(tuning.dialogue.auto_advance_ticks),
            hint: None,
            cues: CueBus::default(),
            rng: StdRng::seed_from_u64(tuning.cue_seed),
            tuning,
        };
        story.enter_scene(SceneId::Well);
        story
    }

    /// Clock, dialogue, player motion, scene rules, then the pending transition.
    pub(crate) fn tick(&mut self, fixed_dt_seconds: f32, intent: &Intent) {
        self.clock.advance(fixed_dt_seconds);
        self.dialogue.tick(intent.continue_pressed);
        step_player(
            &mut self.player,
            intent,
            self.progress.stress(),
            &self.tuning.player,
            &self.tuning.stage,
        );

        let step = {
            let mut ctx = TickContext {
                tuning: &self.tuning,
                intent,
                progress: &mut self.progress,
                player: &mut self.player,
                dialogue: &mut self.dialogue,
                cues: &mut self.cues,
                rng: &mut self.rng,
            };
            self.active.update(&mut ctx)
        };
        self.hint = step.hint;

        self.advance_pending();
        if let Some(transition) = step.schedule {
            self.schedule(transition);
        }
        self.cues.finish_tick_rollover();
    }

    fn schedule(&mut self, transition: PendingTransition) {
        if let Some(existing) = self.pending {
            debug!(
                from = %transition.from,
                to = %transition.to,
                pending_to = %existing.to,
                "transition_already_pending"
            );
            return;
        }
        info!(
            from = %transition.from,
            to = %transition.to,
            delay_ticks = transition.remaining_ticks,
            "transition_scheduled"
        );
        if transition.remaining_ticks == 0 {
            self.fire(transition);
        } else {
            self.pending = Some(transition);
        }
    }

    fn advance_pending(&mut self) {
        let Some(mut transition) = self.pending.take() else {
            return;
        };
        transition.remaining_ticks = transition.remaining_ticks.saturating_sub(1);
        if transition.remaining_ticks > 0 {
            self.pending = Some(transition);
            return;
        }
        self.fire(transition);
    }

    fn fire(&mut self, transition: PendingTransition) {
        if self.active.id() != transition.from || !self.active.is_complete() {
            debug!(
                from = %transition.from,
                to = %transition.to,
                current = %self.active.id(),
                "transition_discarded"
            );
            return;
        }
        info!(
            from = %transition.from,
            to = %transition.to,
            tick = self.clock.tick(),
            "scene_transition"
        );
        self.enter_scene(transition.to);
    }

    fn enter_scene(&mut self, id: SceneId) {
        self.active = ActiveScene::enter(id, &self.tuning);
        self.progress.set_gauge(0.0);
        self.player.position = stage_point(&self.tuning.stage, PLAYER_SPAWN.0, PLAYER_SPAWN.1);
        self.player.velocity = Vec2::ZERO;
        self.hint = None;
        for line in script::opening_lines(id).iter().copied() {
            self.dialogue.push(line);
        }
        info!(
            scene = %id,
            tick = self.clock.tick(),
            imagination = self.progress.imagination(),
            trust = self.progress.trust(),
            "scene_entered"
        );
    }

    pub(crate) fn scene_id(&self) -> SceneId {
        self.active.id()
    }

    pub(crate) fn active(&self) -> &ActiveScene {
        &self.active
    }

    pub(crate) fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub(crate) fn player(&self) -> &Actor<PlayerMood> {
        &self.player
    }

    pub(crate) fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    pub(crate) fn dialogue(&self) -> &DialogueSequencer {
        &self.dialogue
    }

    pub(crate) fn hint(&self) -> Option<&'static str> {
        self.hint
    }

    pub(crate) fn cues(&self) -> &CueBus {
        &self.cues
    }

    pub(crate) fn clock(&self) -> &Clock {
        &self.clock
    }

    pub(crate) fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub(crate) fn stage_size(&self) -> Vec2 {
        Vec2::new(self.tuning.stage.width, self.tuning.stage.height)
    }
}

#[cfg(test)]
impl StoryState {
    pub(crate) fn jump_to(&mut self, id: SceneId) {
        self.pending = None;
        self.enter_scene(id);
    }

    pub(crate) fn set_pending(&mut self, transition: PendingTransition) {
        self.pending = Some(transition);
    }

    pub(crate) fn progress_mut(&mut self) -> &mut ProgressState {
        &mut self.progress
    }

    pub(crate) fn player_mut(&mut self) -> &mut Actor<PlayerMood> {
        &mut self.player
    }

    pub(crate) fn active_mut(&mut self) -> &mut ActiveScene {
        &mut self.active
    }
}
