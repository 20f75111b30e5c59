use std::fmt;

use tracing::debug;

/// Fire-and-forget audio events. The display form is the cue name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Cue {
    Pickup,
    Drop,
    /// Breathing intensity bucket, 0..=4.
    BreathLevel(u8),
    Tick,
    Discovery,
    Alarm,
    Door,
    Reveal,
    Reject,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Pickup => f.write_str("pickup"),
            Cue::Drop => f.write_str("drop"),
            Cue::BreathLevel(level) => write!(f, "breath-level:{level}"),
            Cue::Tick => f.write_str("tick"),
            Cue::Discovery => f.write_str("discovery"),
            Cue::Alarm => f.write_str("alarm"),
            Cue::Door => f.write_str("door"),
            Cue::Reveal => f.write_str("reveal"),
            Cue::Reject => f.write_str("reject"),
        }
    }
}

/// Cues emitted during the current tick; rolled over when the tick ends.
#[derive(Debug, Clone, Default)]
pub(crate) struct CueBus {
    current_tick_cues: Vec<Cue>,
    last_tick_cues: Vec<Cue>,
}

impl CueBus {
    pub(crate) fn emit(&mut self, cue: Cue) {
        self.current_tick_cues.push(cue);
    }

    pub(crate) fn iter_emitted_so_far(&self) -> impl Iterator<Item = &Cue> {
        self.current_tick_cues.iter()
    }

    pub(crate) fn finish_tick_rollover(&mut self) {
        std::mem::swap(&mut self.last_tick_cues, &mut self.current_tick_cues);
        self.current_tick_cues.clear();
    }

    pub(crate) fn last_tick(&self) -> &[Cue] {
        &self.last_tick_cues
    }
}

pub(crate) trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Default sink: no synthesis, one debug event per cue.
#[derive(Debug, Default)]
pub(crate) struct TracingCueSink;

impl CueSink for TracingCueSink {
    fn play(&mut self, cue: Cue) {
        debug!(cue = %cue, "cue_played");
    }
}
