//! Configuration module
//!
//! Handles user settings and automation preferences.

pub mod settings;

pub use settings::{
    CoopSettings, NavigationSettings, OpponentSelectionSettings, Settings, TimingSettings,
};
