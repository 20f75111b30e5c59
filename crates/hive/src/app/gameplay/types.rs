use std::collections::BTreeMap;
use std::fmt;

use engine::Vec2;

use crate::app::config::StageTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SceneId {
    Well,
    House,
    Hideout,
}

impl SceneId {
    pub(crate) fn name(self) -> &'static str {
        match self {
            SceneId::Well => "well",
            SceneId::House => "house",
            SceneId::Hideout => "hideout",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ItemId {
    Bread,
    Water,
}

impl ItemId {
    pub(crate) fn name(self) -> &'static str {
        match self {
            ItemId::Bread => "bread",
            ItemId::Water => "water",
        }
    }
}

/// Held items in acquisition order; each item at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Inventory {
    items: Vec<ItemId>,
}

impl Inventory {
    /// Returns false when the item was already held.
    pub(crate) fn insert(&mut self, item: ItemId) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub(crate) fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub(crate) fn take_oldest(&mut self) -> Option<ItemId> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }
}

/// Story-wide scalars. Every write clamps to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProgressState {
    imagination: f32,
    trust: f32,
    stress: f32,
    gauge: f32,
    pub inventory: Inventory,
}

impl ProgressState {
    pub(crate) fn new(imagination: f32, trust: f32) -> Self {
        Self {
            imagination: clamp_unit(imagination),
            trust: clamp_unit(trust),
            stress: 0.0,
            gauge: 0.0,
            inventory: Inventory::default(),
        }
    }

    pub(crate) fn imagination(&self) -> f32 {
        self.imagination
    }

    pub(crate) fn trust(&self) -> f32 {
        self.trust
    }

    pub(crate) fn stress(&self) -> f32 {
        self.stress
    }

    pub(crate) fn gauge(&self) -> f32 {
        self.gauge
    }

    pub(crate) fn add_imagination(&mut self, delta: f32) {
        self.imagination = clamp_unit(self.imagination + delta);
    }

    pub(crate) fn add_trust(&mut self, delta: f32) {
        self.trust = clamp_unit(self.trust + delta);
    }

    pub(crate) fn set_stress(&mut self, value: f32) {
        self.stress = clamp_unit(value);
    }

    pub(crate) fn add_stress(&mut self, delta: f32) {
        self.stress = clamp_unit(self.stress + delta);
    }

    /// Moves stress toward `target` by at most `rate`.
    pub(crate) fn approach_stress(&mut self, target: f32, rate: f32) {
        self.stress = clamp_unit(approach(self.stress, target, rate));
    }

    pub(crate) fn set_gauge(&mut self, value: f32) {
        self.gauge = clamp_unit(value);
    }
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub(crate) fn approach(current: f32, target: f32, rate: f32) -> f32 {
    if current < target {
        (current + rate).min(target)
    } else {
        (current - rate).max(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum TimerId {
    EyePulse,
    Watch,
    RejectCooldown,
}

/// Named tick counters owned by one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Timers {
    ticks: BTreeMap<TimerId, u32>,
}

impl Timers {
    pub(crate) fn get(&self, id: TimerId) -> u32 {
        self.ticks.get(&id).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, id: TimerId, ticks: u32) {
        self.ticks.insert(id, ticks);
    }

    /// Counts up and returns the new value.
    pub(crate) fn advance(&mut self, id: TimerId) -> u32 {
        let entry = self.ticks.entry(id).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    /// Counts down toward zero and returns the new value.
    pub(crate) fn count_down(&mut self, id: TimerId) -> u32 {
        let entry = self.ticks.entry(id).or_insert(0);
        *entry = entry.saturating_sub(1);
        *entry
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayerMood {
    Idle,
    Moving,
    Observing,
    Stressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatcherMood {
    Calm,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpiritMood {
    Wary,
    Receptive,
    Resolved,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Actor<M> {
    pub position: Vec2,
    pub velocity: Vec2,
    /// +1 faces right, -1 faces left.
    pub facing: f32,
    pub mood: M,
    pub timers: Timers,
}

impl<M> Actor<M> {
    pub(crate) fn new(position: Vec2, mood: M) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: 1.0,
            mood,
            timers: Timers::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Clock {
    tick: u64,
    elapsed_seconds: f64,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self {
            tick: 0,
            elapsed_seconds: 0.0,
        }
    }

    pub(crate) fn advance(&mut self, fixed_dt_seconds: f32) {
        self.tick = self.tick.saturating_add(1);
        self.elapsed_seconds += f64::from(fixed_dt_seconds);
    }

    pub(crate) fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }
}

/// A scene change that fires after `remaining_ticks`, only if `from` is still
/// current and complete by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingTransition {
    pub from: SceneId,
    pub to: SceneId,
    pub remaining_ticks: u32,
}

/// Normalized player intent for one tick, in stage space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Intent {
    /// Keyboard axes, each -1, 0 or 1.
    pub move_axis: Vec2,
    pub pointer: Option<Vec2>,
    pub interact_held: bool,
    pub interact_pressed: bool,
    pub observe_held: bool,
    pub observe_pressed: bool,
    pub retreat_held: bool,
    pub continue_pressed: bool,
}

/// Maps a stage fraction to stage units.
pub(crate) fn stage_point(stage: &StageTuning, fraction_x: f32, fraction_y: f32) -> Vec2 {
    Vec2::new(stage.width * fraction_x, stage.height * fraction_y)
}
