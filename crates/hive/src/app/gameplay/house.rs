use engine::Vec2;
use tracing::{debug, info};

use crate::app::config::{HouseTuning, StageTuning};

use super::cues::Cue;
use super::script;
use super::story::{SceneStep, TickContext};
use super::types::{
    stage_point, Actor, Inventory, ItemId, PendingTransition, SceneId, TimerId, WatcherMood,
};

const BREAD_ANCHOR: (f32, f32) = (0.45, 0.62);
const WATER_ANCHOR: (f32, f32) = (0.55, 0.62);
const DOOR_ANCHOR: (f32, f32) = (0.9, 0.6);
const FATHER_ANCHOR: (f32, f32) = (0.65, 0.6);
const GRANDMOTHER_ANCHOR: (f32, f32) = (0.2, 0.58);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatcherKind {
    Father,
    Grandmother,
}

impl WatcherKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            WatcherKind::Father => "father",
            WatcherKind::Grandmother => "grandmother",
        }
    }

    fn sense(self) -> &'static str {
        match self {
            WatcherKind::Father => "sight",
            WatcherKind::Grandmother => "hearing",
        }
    }
}

/// An NPC cycling between calm and detecting on a fixed tick schedule.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Watcher {
    kind: WatcherKind,
    actor: Actor<WatcherMood>,
    calm_ticks: u32,
    alert_ticks: u32,
}

impl Watcher {
    fn new(
        kind: WatcherKind,
        position: Vec2,
        calm_ticks: u32,
        alert_ticks: u32,
        phase_offset_ticks: u32,
    ) -> Self {
        let mut actor = Actor::new(position, WatcherMood::Calm);
        actor.timers.set(TimerId::Watch, phase_offset_ticks);
        Self {
            kind,
            actor,
            calm_ticks,
            alert_ticks,
        }
    }

    pub(crate) fn kind(&self) -> WatcherKind {
        self.kind
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.actor.position
    }

    pub(crate) fn is_detecting(&self) -> bool {
        self.actor.mood == WatcherMood::Alert
    }

    /// Ticks spent in the current phase.
    pub(crate) fn phase_elapsed(&self) -> u32 {
        self.actor.timers.get(TimerId::Watch)
    }

    fn phase_ticks(&self) -> u32 {
        match self.actor.mood {
            WatcherMood::Calm => self.calm_ticks,
            WatcherMood::Alert => self.alert_ticks,
        }
    }

    /// Returns true when the watcher changed phase this tick.
    fn tick(&mut self) -> bool {
        let elapsed = self.actor.timers.advance(TimerId::Watch);
        if elapsed < self.phase_ticks() {
            return false;
        }
        self.actor.mood = match self.actor.mood {
            WatcherMood::Calm => WatcherMood::Alert,
            WatcherMood::Alert => WatcherMood::Calm,
        };
        self.actor.timers.set(TimerId::Watch, 0);
        true
    }

    #[cfg(test)]
    pub(crate) fn force(&mut self, mood: WatcherMood) {
        self.actor.mood = mood;
        self.actor.timers.set(TimerId::Watch, 0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HouseTarget {
    Item(ItemId),
    Door,
}

impl HouseTarget {
    fn hint(self) -> &'static str {
        match self {
            HouseTarget::Item(item) => script::take_hint(item),
            HouseTarget::Door => script::HINT_SLIP_OUT,
        }
    }

    fn name(self) -> &'static str {
        match self {
            HouseTarget::Item(item) => item.name(),
            HouseTarget::Door => "door",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HouseScene {
    father: Watcher,
    grandmother: Watcher,
    bread_position: Vec2,
    water_position: Vec2,
    door_position: Vec2,
    escaped: bool,
    caught: bool,
}

impl HouseScene {
    pub(crate) fn new(stage: &StageTuning, tuning: &HouseTuning) -> Self {
        Self {
            father: Watcher::new(
                WatcherKind::Father,
                stage_point(stage, FATHER_ANCHOR.0, FATHER_ANCHOR.1),
                tuning.father_calm_ticks,
                tuning.father_looking_ticks,
                0,
            ),
            grandmother: Watcher::new(
                WatcherKind::Grandmother,
                stage_point(stage, GRANDMOTHER_ANCHOR.0, GRANDMOTHER_ANCHOR.1),
                tuning.grandmother_calm_ticks,
                tuning.grandmother_listening_ticks,
                tuning.grandmother_phase_offset_ticks,
            ),
            bread_position: stage_point(stage, BREAD_ANCHOR.0, BREAD_ANCHOR.1),
            water_position: stage_point(stage, WATER_ANCHOR.0, WATER_ANCHOR.1),
            door_position: stage_point(stage, DOOR_ANCHOR.0, DOOR_ANCHOR.1),
            escaped: false,
            caught: false,
        }
    }

    pub(crate) fn escaped(&self) -> bool {
        self.escaped
    }

    /// True while the player stands inside a detecting watcher's radius.
    pub(crate) fn caught(&self) -> bool {
        self.caught
    }

    pub(crate) fn watchers(&self) -> [&Watcher; 2] {
        [&self.father, &self.grandmother]
    }

    pub(crate) fn any_detecting(&self) -> bool {
        self.watchers().iter().any(|watcher| watcher.is_detecting())
    }

    pub(crate) fn item_position(&self, item: ItemId) -> Vec2 {
        match item {
            ItemId::Bread => self.bread_position,
            ItemId::Water => self.water_position,
        }
    }

    pub(crate) fn door_position(&self) -> Vec2 {
        self.door_position
    }

    #[cfg(test)]
    pub(crate) fn force_watchers(&mut self, father: WatcherMood, grandmother: WatcherMood) {
        self.father.force(father);
        self.grandmother.force(grandmother);
    }

    pub(crate) fn update(&mut self, ctx: &mut TickContext<'_>) -> SceneStep {
        let tuning = &ctx.tuning.house;
        for watcher in [&mut self.father, &mut self.grandmother] {
            if watcher.tick() {
                info!(
                    watcher = watcher.kind.name(),
                    sense = watcher.kind.sense(),
                    detecting = watcher.is_detecting(),
                    "watcher_state_changed"
                );
            }
        }
        ctx.player.timers.count_down(TimerId::RejectCooldown);

        let player_position = ctx.player.position;
        let safe = !self.any_detecting();
        let caught = self.watchers().iter().any(|watcher| {
            watcher.is_detecting()
                && watcher.position().distance(player_position) < tuning.detection_radius
        });
        if caught {
            ctx.progress.set_stress(1.0);
            if !self.caught {
                ctx.cues.emit(Cue::Alarm);
                ctx.dialogue.push(script::HOUSE_CAUGHT);
                info!(
                    x = player_position.x,
                    y = player_position.y,
                    "player_detected"
                );
            }
        } else {
            let pressured = self.watchers().iter().any(|watcher| {
                watcher.is_detecting()
                    && (watcher.position().x - player_position.x).abs()
                        < tuning.stress_horizontal_range
            });
            if pressured {
                ctx.progress
                    .approach_stress(1.0, tuning.stress_rise_per_tick);
            } else {
                ctx.progress
                    .approach_stress(tuning.stress_baseline, tuning.stress_decay_per_tick);
            }
        }
        self.caught = caught;

        let mut step = SceneStep::default();
        if self.escaped {
            return step;
        }
        let target = self.interaction_target(player_position, &ctx.progress.inventory, tuning);
        step.hint = target.map(HouseTarget::hint);

        let Some(target) = target.filter(|_| ctx.intent.interact_pressed) else {
            return step;
        };
        if !safe {
            reject(ctx, target, tuning);
            return step;
        }
        match target {
            HouseTarget::Item(item) => {
                if ctx.progress.inventory.insert(item) {
                    ctx.cues.emit(Cue::Pickup);
                    info!(
                        item = item.name(),
                        held = ctx.progress.inventory.len(),
                        "item_picked_up"
                    );
                }
            }
            HouseTarget::Door => {
                self.escaped = true;
                ctx.cues.emit(Cue::Door);
                ctx.dialogue.push(script::HOUSE_ESCAPED);
                info!(stress = ctx.progress.stress(), "house_escaped");
                step.hint = None;
                step.schedule = Some(PendingTransition {
                    from: SceneId::House,
                    to: SceneId::Hideout,
                    remaining_ticks: tuning.transition_delay_ticks,
                });
            }
        }
        step
    }

    fn interaction_target(
        &self,
        player_position: Vec2,
        inventory: &Inventory,
        tuning: &HouseTuning,
    ) -> Option<HouseTarget> {
        for item in [ItemId::Bread, ItemId::Water] {
            if !inventory.contains(item)
                && player_position.distance(self.item_position(item)) < tuning.pickup_radius
            {
                return Some(HouseTarget::Item(item));
            }
        }
        let has_both = inventory.contains(ItemId::Bread) && inventory.contains(ItemId::Water);
        if has_both && player_position.distance(self.door_position) < tuning.door_radius {
            return Some(HouseTarget::Door);
        }
        None
    }
}

fn reject(ctx: &mut TickContext<'_>, target: HouseTarget, tuning: &HouseTuning) {
    if ctx.player.timers.get(TimerId::RejectCooldown) > 0 {
        ctx.progress.add_stress(tuning.reject_repeat_stress);
        debug!(
            target = target.name(),
            stress = ctx.progress.stress(),
            "interaction_rejected_during_cooldown"
        );
        return;
    }
    ctx.progress.add_stress(tuning.reject_stress_spike);
    ctx.cues.emit(Cue::Reject);
    ctx.dialogue.push(script::HOUSE_REJECTED);
    ctx.player
        .timers
        .set(TimerId::RejectCooldown, tuning.reject_cooldown_ticks);
    debug!(target = target.name(), "interaction_rejected");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watcher(calm: u32, alert: u32, offset: u32) -> Watcher {
        Watcher::new(WatcherKind::Father, Vec2::ZERO, calm, alert, offset)
    }

    #[test]
    fn watcher_cycles_calm_then_alert() {
        let mut watcher = watcher(3, 2, 0);
        let moods: Vec<bool> = (0..10)
            .map(|_| {
                watcher.tick();
                watcher.is_detecting()
            })
            .collect();
        assert_eq!(
            moods,
            vec![false, false, true, true, false, false, false, true, true, false]
        );
    }

    #[test]
    fn phase_offset_shifts_the_first_glance() {
        let mut watcher = watcher(5, 1, 3);
        watcher.tick();
        assert!(!watcher.is_detecting());
        watcher.tick();
        assert!(watcher.is_detecting());
        assert_eq!(watcher.phase_elapsed(), 0);
    }

    #[test]
    fn default_watchers_do_not_start_aligned() {
        let scene = HouseScene::new(&StageTuning::default(), &HouseTuning::default());
        let [father, grandmother] = scene.watchers();
        assert_ne!(father.phase_elapsed(), grandmother.phase_elapsed());
        assert!(!scene.any_detecting());
    }

    #[test]
    fn door_is_only_a_target_with_both_items() {
        let scene = HouseScene::new(&StageTuning::default(), &HouseTuning::default());
        let tuning = HouseTuning::default();
        let mut inventory = Inventory::default();
        let at_door = scene.door_position();

        assert_eq!(scene.interaction_target(at_door, &inventory, &tuning), None);
        inventory.insert(ItemId::Bread);
        inventory.insert(ItemId::Water);
        assert_eq!(
            scene.interaction_target(at_door, &inventory, &tuning),
            Some(HouseTarget::Door)
        );
    }

    #[test]
    fn held_items_are_not_targets() {
        let scene = HouseScene::new(&StageTuning::default(), &HouseTuning::default());
        let tuning = HouseTuning::default();
        let mut inventory = Inventory::default();
        let at_bread = scene.item_position(ItemId::Bread);

        assert_eq!(
            scene.interaction_target(at_bread, &inventory, &tuning),
            Some(HouseTarget::Item(ItemId::Bread))
        );
        inventory.insert(ItemId::Bread);
        assert_eq!(scene.interaction_target(at_bread, &inventory, &tuning), None);
    }
}
