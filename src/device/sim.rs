//! Scripted in-memory device
//!
//! [`SimDevice`] models the game as a handful of named screens joined
//! by tap zones. Element lookups are symbolic (a screen either shows an
//! element or it does not), captures are paced by a configurable frame
//! interval, and transitions can swallow a few captures to imitate
//! loading animations. Tests drive the exact same task code production
//! runs against the Android bridge.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crate::device::{Actuator, DeviceError};
use crate::vision::{DigitReader, DigitStyle, Frame, LocateOpts, Locator, Perceptor, Rect};

/// One named screen and the element names visible on it
#[derive(Debug, Clone)]
pub struct SimScreen {
    name: &'static str,
    visible: Vec<&'static str>,
}

impl SimScreen {
    /// Empty screen
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            visible: Vec::new(),
        }
    }

    /// Mark an element as visible on this screen
    pub fn shows(mut self, element: &'static str) -> Self {
        self.visible.push(element);
        self
    }
}

/// Tap zone wiring one screen to another
#[derive(Debug, Clone)]
struct SimLink {
    from: &'static str,
    zone: Rect,
    to: &'static str,
    /// Captures to swallow before the destination shows; nothing is
    /// visible while in transit
    latency: u32,
}

/// Scripted device for driving tasks without a phone
pub struct SimDevice {
    screens: HashMap<&'static str, SimScreen>,
    links: Vec<SimLink>,
    numbers: HashMap<(u32, u32), i64>,
    current: &'static str,
    pending: Option<(&'static str, u32)>,
    shown: Vec<&'static str>,
    shown_before: Vec<&'static str>,
    frame_interval: Duration,
    taps: Vec<(i32, i32)>,
    reads: Vec<(Rect, DigitStyle)>,
    captures: u32,
    input_clears: u32,
    stuck_clears: u32,
}

impl SimDevice {
    /// Device starting on the named screen
    pub fn new(start: &'static str) -> Self {
        Self {
            screens: HashMap::new(),
            links: Vec::new(),
            numbers: HashMap::new(),
            current: start,
            pending: None,
            shown: Vec::new(),
            shown_before: Vec::new(),
            frame_interval: Duration::from_millis(5),
            taps: Vec::new(),
            reads: Vec::new(),
            captures: 0,
            input_clears: 0,
            stuck_clears: 0,
        }
    }

    /// Register a screen
    pub fn with_screen(mut self, screen: SimScreen) -> Self {
        self.screens.insert(screen.name, screen);
        self
    }

    /// Wire a tap zone on `from` to land on `to` after `latency` captures
    pub fn with_link(mut self, from: &'static str, zone: Rect, to: &'static str, latency: u32) -> Self {
        self.links.push(SimLink {
            from,
            zone,
            to,
            latency,
        });
        self
    }

    /// Script the number a digit read of `area` returns
    pub fn with_number(mut self, area: Rect, value: i64) -> Self {
        self.numbers.insert((area.x, area.y), value);
        self
    }

    /// Pace captures; the default 5 ms keeps timer-driven loops honest
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Screen the device currently rests on
    pub fn screen(&self) -> &'static str {
        self.current
    }

    /// Every tap issued, in order
    pub fn taps(&self) -> &[(i32, i32)] {
        &self.taps
    }

    /// Digit reads attempted so far, hits and misses alike
    pub fn reads(&self) -> &[(Rect, DigitStyle)] {
        &self.reads
    }

    /// Frames captured so far
    pub fn captures(&self) -> u32 {
        self.captures
    }

    /// Times the tap history was cleared
    pub fn input_clears(&self) -> u32 {
        self.input_clears
    }

    /// Times the idle watchdog was cleared
    pub fn stuck_clears(&self) -> u32 {
        self.stuck_clears
    }

    fn visible_on_current(&self) -> Vec<&'static str> {
        self.screens
            .get(self.current)
            .map(|s| s.visible.clone())
            .unwrap_or_default()
    }
}

impl Perceptor for SimDevice {
    fn capture(&mut self) -> Result<Frame, DeviceError> {
        thread::sleep(self.frame_interval);
        self.captures += 1;
        self.shown_before = std::mem::take(&mut self.shown);
        match self.pending.take() {
            Some((to, 0)) => {
                self.current = to;
                self.shown = self.visible_on_current();
            }
            Some((to, n)) => {
                // Still in transit, the screen shows nothing recognizable
                self.pending = Some((to, n - 1));
            }
            None => {
                self.shown = self.visible_on_current();
            }
        }
        // Content is irrelevant, lookups are symbolic
        Ok(Frame::new(72, 128))
    }

    fn locate(&mut self, locator: &Locator, _frame: &Frame, opts: LocateOpts) -> Option<Rect> {
        let hit = self.shown.contains(&locator.name());
        let held = !opts.stable || self.shown_before.contains(&locator.name());
        (hit && held).then(|| locator.button())
    }
}

impl DigitReader for SimDevice {
    fn read_number(
        &mut self,
        _frame: &Frame,
        area: Rect,
        style: DigitStyle,
    ) -> Result<i64, DeviceError> {
        self.reads.push((area, style));
        self.numbers
            .get(&(area.x, area.y))
            .copied()
            .ok_or_else(|| DeviceError::Recognizer(format!("no digits at ({}, {})", area.x, area.y)))
    }
}

impl Actuator for SimDevice {
    fn tap(&mut self, x: i32, y: i32) -> Result<(), DeviceError> {
        self.taps.push((x, y));
        if self.pending.is_none() {
            if let Some(link) = self
                .links
                .iter()
                .find(|l| l.from == self.current && l.zone.contains(x, y))
            {
                self.pending = Some((link.to, link.latency));
            }
        }
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn clear_input_history(&mut self) {
        self.input_clears += 1;
    }

    fn clear_stuck_detector(&mut self) {
        self.stuck_clears += 1;
    }
}
