//! Coordinate scaling between reference and physical screens
//!
//! All game coordinates in this crate are expressed against a 720x1280
//! portrait reference. The Android side reports the real panel size and
//! taps are scaled on the way out.

pub use crate::vision::{REF_HEIGHT, REF_WIDTH};

/// Physical screen dimensions for coordinate conversion
#[derive(Debug, Clone, Copy)]
pub struct ScreenCoords {
    /// Actual screen width in pixels
    pub screen_width: u32,
    /// Actual screen height in pixels
    pub screen_height: u32,
}

impl ScreenCoords {
    /// Create with actual screen dimensions
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
        }
    }

    /// Scale an x coordinate from reference to actual
    pub fn scale_x(&self, x: i32) -> i32 {
        (x as f32 * self.screen_width as f32 / REF_WIDTH as f32) as i32
    }

    /// Scale a y coordinate from reference to actual
    pub fn scale_y(&self, y: i32) -> i32 {
        (y as f32 * self.screen_height as f32 / REF_HEIGHT as f32) as i32
    }

    /// Scale a point from reference to actual
    pub fn scale(&self, point: (i32, i32)) -> (i32, i32) {
        (self.scale_x(point.0), self.scale_y(point.1))
    }
}

impl Default for ScreenCoords {
    fn default() -> Self {
        Self::new(REF_WIDTH, REF_HEIGHT)
    }
}
