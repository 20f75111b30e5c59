use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub(crate) const TUNING_PATH_ENV_VAR: &str = "HIVE_TUNING_PATH";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse tuning file {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every gameplay constant. Distances are stage units, rates are per tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Tuning {
    pub stage: StageTuning,
    pub player: PlayerTuning,
    pub progress: ProgressTuning,
    pub well: WellTuning,
    pub house: HouseTuning,
    pub hideout: HideoutTuning,
    pub dialogue: DialogueTuning,
    pub cue_seed: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StageTuning {
    pub width: f32,
    pub height: f32,
    pub inset_x: f32,
    pub inset_top: f32,
    pub inset_bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerTuning {
    pub speed: f32,
    pub stressed_speed: f32,
    pub stressed_threshold: f32,
    pub velocity_smoothing: f32,
    pub pointer_dead_zone: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProgressTuning {
    pub initial_imagination: f32,
    pub initial_trust: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WellTuning {
    pub radius: f32,
    pub fill_per_tick: f32,
    pub decay_per_tick: f32,
    pub listen_stress_per_tick: f32,
    pub stress_decay_per_tick: f32,
    pub discovery_imagination_bonus: f32,
    pub transition_delay_ticks: u32,
    pub breath_cue_chance: f64,
    pub tick_cue_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HouseTuning {
    pub father_calm_ticks: u32,
    pub father_looking_ticks: u32,
    pub grandmother_calm_ticks: u32,
    pub grandmother_listening_ticks: u32,
    pub grandmother_phase_offset_ticks: u32,
    pub stress_horizontal_range: f32,
    pub stress_rise_per_tick: f32,
    pub stress_decay_per_tick: f32,
    pub stress_baseline: f32,
    pub pickup_radius: f32,
    pub door_radius: f32,
    pub detection_radius: f32,
    pub reject_stress_spike: f32,
    /// Stress added by an unsafe attempt while the spike is cooling down.
    pub reject_repeat_stress: f32,
    pub reject_cooldown_ticks: u32,
    pub transition_delay_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HideoutTuning {
    pub too_close_radius: f32,
    pub interaction_radius: f32,
    pub too_close_trust_drain: f32,
    pub too_close_imagination_drain: f32,
    pub give_trust_gain: f32,
    pub give_imagination_gain: f32,
    pub observe_imagination_gain: f32,
    pub observe_trust_gain: f32,
    pub receptive_threshold: f32,
    pub stress_baseline: f32,
    pub stress_decay_per_tick: f32,
    pub retreat_nudge: f32,
    pub fear_falloff: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DialogueTuning {
    /// `None` keeps each line up until the player continues.
    pub auto_advance_ticks: Option<u32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            stage: StageTuning::default(),
            player: PlayerTuning::default(),
            progress: ProgressTuning::default(),
            well: WellTuning::default(),
            house: HouseTuning::default(),
            hideout: HideoutTuning::default(),
            dialogue: DialogueTuning::default(),
            cue_seed: 0x5eed_4817,
        }
    }
}

impl Default for StageTuning {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            inset_x: 40.0,
            inset_top: 80.0,
            inset_bottom: 40.0,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 2.2,
            stressed_speed: 1.2,
            stressed_threshold: 0.6,
            velocity_smoothing: 0.25,
            pointer_dead_zone: 12.0,
        }
    }
}

impl Default for ProgressTuning {
    fn default() -> Self {
        Self {
            initial_imagination: 0.4,
            initial_trust: 0.3,
        }
    }
}

impl Default for WellTuning {
    fn default() -> Self {
        Self {
            radius: 90.0,
            fill_per_tick: 1.0 / 128.0,
            decay_per_tick: 1.0 / 512.0,
            listen_stress_per_tick: 0.0008,
            stress_decay_per_tick: 0.002,
            discovery_imagination_bonus: 0.15,
            transition_delay_ticks: 90,
            breath_cue_chance: 0.05,
            tick_cue_chance: 0.02,
        }
    }
}

impl Default for HouseTuning {
    fn default() -> Self {
        Self {
            father_calm_ticks: 600,
            father_looking_ticks: 108,
            grandmother_calm_ticks: 420,
            grandmother_listening_ticks: 150,
            grandmother_phase_offset_ticks: 210,
            stress_horizontal_range: 260.0,
            stress_rise_per_tick: 0.02,
            stress_decay_per_tick: 0.01,
            stress_baseline: 0.2,
            pickup_radius: 24.0,
            door_radius: 40.0,
            detection_radius: 140.0,
            reject_stress_spike: 0.35,
            reject_repeat_stress: 0.05,
            reject_cooldown_ticks: 30,
            transition_delay_ticks: 30,
        }
    }
}

impl Default for HideoutTuning {
    fn default() -> Self {
        Self {
            too_close_radius: 50.0,
            interaction_radius: 140.0,
            too_close_trust_drain: 0.002,
            too_close_imagination_drain: 0.001,
            give_trust_gain: 0.2,
            give_imagination_gain: 0.15,
            observe_imagination_gain: 0.1,
            observe_trust_gain: 0.1,
            receptive_threshold: 0.6,
            stress_baseline: 0.2,
            stress_decay_per_tick: 0.01,
            retreat_nudge: 1.5,
            fear_falloff: 120.0,
        }
    }
}

impl Default for DialogueTuning {
    fn default() -> Self {
        Self {
            auto_advance_ticks: Some(240),
        }
    }
}

impl Tuning {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let stage = &self.stage;
        positive("stage.width", stage.width)?;
        positive("stage.height", stage.height)?;
        non_negative("stage.inset_x", stage.inset_x)?;
        non_negative("stage.inset_top", stage.inset_top)?;
        non_negative("stage.inset_bottom", stage.inset_bottom)?;
        if stage.inset_x * 2.0 >= stage.width {
            return Err(invalid("stage.inset_x", "insets leave no walkable width"));
        }
        if stage.inset_top + stage.inset_bottom >= stage.height {
            return Err(invalid("stage.inset_top", "insets leave no walkable height"));
        }

        let player = &self.player;
        positive("player.speed", player.speed)?;
        positive("player.stressed_speed", player.stressed_speed)?;
        unit("player.stressed_threshold", player.stressed_threshold)?;
        unit("player.velocity_smoothing", player.velocity_smoothing)?;
        non_negative("player.pointer_dead_zone", player.pointer_dead_zone)?;

        unit("progress.initial_imagination", self.progress.initial_imagination)?;
        unit("progress.initial_trust", self.progress.initial_trust)?;

        let well = &self.well;
        positive("well.radius", well.radius)?;
        positive("well.fill_per_tick", well.fill_per_tick)?;
        unit("well.fill_per_tick", well.fill_per_tick)?;
        unit("well.decay_per_tick", well.decay_per_tick)?;
        unit("well.listen_stress_per_tick", well.listen_stress_per_tick)?;
        unit("well.stress_decay_per_tick", well.stress_decay_per_tick)?;
        unit(
            "well.discovery_imagination_bonus",
            well.discovery_imagination_bonus,
        )?;
        chance("well.breath_cue_chance", well.breath_cue_chance)?;
        chance("well.tick_cue_chance", well.tick_cue_chance)?;

        let house = &self.house;
        non_zero("house.father_calm_ticks", house.father_calm_ticks)?;
        non_zero("house.father_looking_ticks", house.father_looking_ticks)?;
        non_zero("house.grandmother_calm_ticks", house.grandmother_calm_ticks)?;
        non_zero(
            "house.grandmother_listening_ticks",
            house.grandmother_listening_ticks,
        )?;
        positive("house.stress_horizontal_range", house.stress_horizontal_range)?;
        unit("house.stress_rise_per_tick", house.stress_rise_per_tick)?;
        unit("house.stress_decay_per_tick", house.stress_decay_per_tick)?;
        unit("house.stress_baseline", house.stress_baseline)?;
        positive("house.pickup_radius", house.pickup_radius)?;
        positive("house.door_radius", house.door_radius)?;
        positive("house.detection_radius", house.detection_radius)?;
        unit("house.reject_stress_spike", house.reject_stress_spike)?;
        unit("house.reject_repeat_stress", house.reject_repeat_stress)?;

        let hideout = &self.hideout;
        positive("hideout.too_close_radius", hideout.too_close_radius)?;
        positive("hideout.interaction_radius", hideout.interaction_radius)?;
        if hideout.interaction_radius <= hideout.too_close_radius {
            return Err(invalid(
                "hideout.interaction_radius",
                "must be larger than hideout.too_close_radius",
            ));
        }
        unit("hideout.too_close_trust_drain", hideout.too_close_trust_drain)?;
        unit(
            "hideout.too_close_imagination_drain",
            hideout.too_close_imagination_drain,
        )?;
        unit("hideout.give_trust_gain", hideout.give_trust_gain)?;
        unit("hideout.give_imagination_gain", hideout.give_imagination_gain)?;
        unit(
            "hideout.observe_imagination_gain",
            hideout.observe_imagination_gain,
        )?;
        unit("hideout.observe_trust_gain", hideout.observe_trust_gain)?;
        unit("hideout.receptive_threshold", hideout.receptive_threshold)?;
        unit("hideout.stress_baseline", hideout.stress_baseline)?;
        unit("hideout.stress_decay_per_tick", hideout.stress_decay_per_tick)?;
        non_negative("hideout.retreat_nudge", hideout.retreat_nudge)?;
        positive("hideout.fear_falloff", hideout.fear_falloff)?;

        if self.dialogue.auto_advance_ticks == Some(0) {
            return Err(invalid(
                "dialogue.auto_advance_ticks",
                "use null to disable auto-advance",
            ));
        }
        Ok(())
    }
}

/// Loads the file named by `HIVE_TUNING_PATH`, or the defaults when unset.
pub(crate) fn load_tuning_from_env() -> Result<Tuning, ConfigError> {
    match env::var_os(TUNING_PATH_ENV_VAR) {
        Some(path) if !path.is_empty() => load_tuning(Path::new(&path)),
        _ => {
            let tuning = Tuning::default();
            tuning.validate()?;
            Ok(tuning)
        }
    }
}

pub(crate) fn load_tuning(path: &Path) -> Result<Tuning, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tuning = parse_tuning(&raw, path)?;
    tuning.validate()?;
    info!(path = %path.display(), "tuning_loaded");
    Ok(tuning)
}

fn parse_tuning(raw: &str, path: &Path) -> Result<Tuning, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, Tuning>(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a value in [0, 1], got {value}"),
        })
    }
}

fn chance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a probability in [0, 1], got {value}"),
        })
    }
}

fn non_zero(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(invalid(field, "expected at least one tick"))
    }
}
