//! User settings
//!
//! Defines all configurable options for the automation. The host app
//! ships these as JSON; unknown fields are ignored and a broken payload
//! falls back to defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Opponent picking on competitive screens
    pub opponent_selection: OpponentSelectionSettings,
    /// Patience knobs for screen navigation
    pub navigation: NavigationSettings,
    /// Fixed waits between game actions
    pub timing: TimingSettings,
    /// Co-op mode options
    pub coop: CoopSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opponent_selection: OpponentSelectionSettings::default(),
            navigation: NavigationSettings::default(),
            timing: TimingSettings::default(),
            coop: CoopSettings::default(),
        }
    }
}

impl Settings {
    /// Settings tuned for unattended arena sweeps
    pub fn arena_preset() -> Self {
        Self {
            opponent_selection: OpponentSelectionSettings {
                enable: true,
                selection_strategy: "Min".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Fast timings for driving the scripted device in tests and demos
    pub fn sim_preset() -> Self {
        Self {
            navigation: NavigationSettings {
                detect_passes: 40,
                hop_passes: 400,
                retap_ms: 120,
                confirm_ms: 60,
                confirm_count: 2,
            },
            timing: TimingSettings {
                tap_settle_ms: 5,
                task_settle_ms: 10,
                stage_load_ms: 20,
                round_gap_ms: 10,
            },
            ..Default::default()
        }
    }
}

/// Opponent picking on competitive screens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentSelectionSettings {
    /// Score the board instead of always taking the default slot
    pub enable: bool,
    /// Attribute weights fed into the scorer
    pub sorting_weight: HashMap<String, f64>,
    /// Which scored entry to take: Max, Min or Middle
    pub selection_strategy: String,
}

impl Default for OpponentSelectionSettings {
    fn default() -> Self {
        let mut sorting_weight = HashMap::new();
        sorting_weight.insert("Power".to_string(), 1.0);
        sorting_weight.insert("CommanderLevel".to_string(), 0.3);
        sorting_weight.insert("SynchroLevel".to_string(), 0.3);
        sorting_weight.insert("Ranking".to_string(), 0.5);
        Self {
            enable: true,
            sorting_weight,
            selection_strategy: "Max".to_string(),
        }
    }
}

/// Patience knobs for screen navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Capture passes allowed while identifying the current page
    pub detect_passes: u32,
    /// Capture passes allowed per hop before giving up
    pub hop_passes: u32,
    /// How long to wait before re-tapping a hop trigger (ms)
    pub retap_ms: u64,
    /// How long an arrival check must hold (ms)
    pub confirm_ms: u64,
    /// How many sightings an arrival check must collect
    pub confirm_count: u32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            detect_passes: 60,
            hop_passes: 120,
            retap_ms: 2000,
            confirm_ms: 500,
            confirm_count: 2,
        }
    }
}

/// Fixed waits between game actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Pause after a plain tap (ms)
    pub tap_settle_ms: u64,
    /// Pause after a task finishes (ms)
    pub task_settle_ms: u64,
    /// Wait for a stage to load (ms)
    pub stage_load_ms: u64,
    /// Pause between arena rounds (ms)
    pub round_gap_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            tap_settle_ms: 200,
            task_settle_ms: 1000,
            stage_load_ms: 5000,
            round_gap_ms: 500,
        }
    }
}

/// Co-op mode options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoopSettings {
    /// Enter co-op through the seasonal event screen instead of home
    pub event_coop: bool,
}

impl Default for CoopSettings {
    fn default() -> Self {
        Self { event_coop: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.opponent_selection.enable);
        assert_eq!(settings.opponent_selection.selection_strategy, "Max");
        assert_eq!(settings.navigation.retap_ms, 2000);
        assert_eq!(settings.timing.stage_load_ms, 5000);
        assert!(!settings.coop.event_coop);
    }

    #[test]
    fn test_default_weights() {
        let weights = OpponentSelectionSettings::default().sorting_weight;
        assert_eq!(weights.get("Power"), Some(&1.0));
        assert_eq!(weights.get("Ranking"), Some(&0.5));
        assert_eq!(weights.len(), 4);
    }

    #[test]
    fn test_arena_preset() {
        let settings = Settings::arena_preset();
        assert!(settings.opponent_selection.enable);
        assert_eq!(settings.opponent_selection.selection_strategy, "Min");
    }

    #[test]
    fn test_sim_preset_is_fast() {
        let settings = Settings::sim_preset();
        assert!(settings.navigation.retap_ms < 1000);
        assert!(settings.timing.stage_load_ms < 100);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::arena_preset();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.opponent_selection.selection_strategy, "Min");
        assert_eq!(back.navigation.hop_passes, settings.navigation.hop_passes);
    }

    #[test]
    fn test_broken_json_falls_back_to_defaults() {
        let settings: Settings = serde_json::from_str("not json").unwrap_or_default();
        assert_eq!(settings.opponent_selection.selection_strategy, "Max");
    }
}
