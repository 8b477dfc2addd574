//! Screen automation core for NIKKE on Android
//!
//! The game is driven the way a player would: capture the screen, find
//! buttons and digit fields on it, tap. [`ui`] models the menus as a
//! page graph with a breadth-first router, [`poll`] provides the
//! debounced rule loops every interaction is built from, [`ai`] scores
//! opponent boards, [`tasks`] are the shipped automations, and
//! [`device`] binds the whole thing to an Android host over JNI or to
//! the scripted simulator used in tests.

pub mod ai;
pub mod config;
pub mod device;
pub mod poll;
pub mod tasks;
pub mod ui;
pub mod vision;

use crate::config::Settings;
use crate::device::{Device, DeviceError, Jitter};
use crate::ui::{NavigateError, Navigator, PageId, PAGES};
use crate::vision::Rect;

pub use crate::tasks::{TaskError, TaskOutcome};

/// A device paired with settings, the working context of every task
pub struct Commander<D: Device> {
    pub device: D,
    pub settings: Settings,
    pub jitter: Jitter,
}

impl<D: Device> Commander<D> {
    pub fn new(device: D, settings: Settings) -> Self {
        Self {
            device,
            settings,
            jitter: Jitter::new(),
        }
    }

    /// Bring the game to `target` over the standard page map
    pub fn ensure(&mut self, target: PageId) -> Result<(), NavigateError> {
        Navigator::new(&PAGES.graph, self.settings.navigation.clone())
            .ensure(&mut self.device, target)
    }

    /// Tap somewhere inside `rect` and give the UI a moment to react
    pub fn tap_region(&mut self, rect: Rect) -> Result<(), DeviceError> {
        let (x, y) = self.jitter.point_in(rect);
        self.device.tap(x, y)?;
        let pause = self
            .jitter
            .spread_ms(self.settings.timing.tap_settle_ms, 30);
        self.device.sleep(pause);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::sim::{SimDevice, SimScreen};
    use crate::ui::assets::MAIN_CHECK;
    use std::time::Duration;

    #[test]
    fn test_ensure_is_a_noop_on_target() {
        let dev = SimDevice::new("main")
            .with_frame_interval(Duration::from_millis(1))
            .with_screen(SimScreen::new("main").shows(MAIN_CHECK.name()));
        let mut cmd = Commander::new(dev, Settings::sim_preset());
        cmd.ensure(PAGES.main).unwrap();
        assert!(cmd.device.taps().is_empty());
    }

    #[test]
    fn test_tap_region_lands_inside() {
        let dev = SimDevice::new("main")
            .with_frame_interval(Duration::from_millis(1))
            .with_screen(SimScreen::new("main"));
        let mut cmd = Commander::new(dev, Settings::sim_preset());
        let rect = Rect::new(300, 600, 120, 60);
        cmd.tap_region(rect).unwrap();
        let &[(x, y)] = cmd.device.taps() else {
            panic!("expected exactly one tap");
        };
        assert!(rect.contains(x, y));
    }
}
