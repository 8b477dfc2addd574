//! Named screen anchors
//!
//! A [`Locator`] records where a UI element lives at the reference
//! resolution and what it roughly looks like. Locators are plain data;
//! how they get matched is up to the perception backend.

use std::fmt;

/// Axis-aligned rectangle in reference-resolution pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub w: u32,
    /// Height
    pub h: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Center point
    pub fn center(&self) -> (i32, i32) {
        ((self.x + self.w / 2) as i32, (self.y + self.h / 2) as i32)
    }

    /// Translate by a signed offset; `None` if that would cross the origin
    pub fn translated(&self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x as i32 + dx;
        let y = self.y as i32 + dy;
        if x < 0 || y < 0 {
            return None;
        }
        Some(Self::new(x as u32, y as u32, self.w, self.h))
    }

    /// Whether the rectangle lies fully inside a `width` x `height` frame
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.x + self.w <= width && self.y + self.h <= height
    }

    /// Whether a point lies inside
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x as i32
            && y >= self.y as i32
            && x < (self.x + self.w) as i32
            && y < (self.y + self.h) as i32
    }
}

/// A named UI anchor at the reference resolution
///
/// `area` is where the element is searched, `button` is where a tap on it
/// should land, `color` is the mean color the area shows when the element
/// is present. `file` names the template asset heavier matchers would use;
/// the core never opens it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    name: &'static str,
    area: Rect,
    button: Rect,
    color: (u8, u8, u8),
    file: &'static str,
}

impl Locator {
    /// Define an anchor with separate search and tap rectangles
    pub const fn new(
        name: &'static str,
        area: Rect,
        button: Rect,
        color: (u8, u8, u8),
        file: &'static str,
    ) -> Self {
        Self {
            name,
            area,
            button,
            color,
            file,
        }
    }

    /// Define an anchor whose tap rectangle is its search area
    pub const fn fixed(
        name: &'static str,
        area: Rect,
        color: (u8, u8, u8),
        file: &'static str,
    ) -> Self {
        Self::new(name, area, area, color, file)
    }

    /// Anchor name, unique across the asset set
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Search rectangle
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// Tap rectangle
    pub const fn button(&self) -> Rect {
        self.button
    }

    /// Expected mean color of the search area
    pub const fn color(&self) -> (u8, u8, u8) {
        self.color
    }

    /// Template asset path, opaque to the core
    pub const fn file(&self) -> &'static str {
        self.file
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Rectangles are noise in logs; the name is what matters
        write!(f, "Locator({})", self.name)
    }
}

/// Options for a single locate call
#[derive(Debug, Clone, Copy)]
pub struct LocateOpts {
    /// Maximum positional drift to tolerate, in pixels
    pub offset: u32,
    /// Per-channel color tolerance
    pub tolerance: u8,
    /// Require the element to hold still across two consecutive frames
    pub stable: bool,
}

impl Default for LocateOpts {
    fn default() -> Self {
        Self {
            offset: 0,
            tolerance: 10,
            stable: false,
        }
    }
}

impl LocateOpts {
    /// Tolerate positional drift up to `px` pixels
    pub fn with_offset(mut self, px: u32) -> Self {
        self.offset = px;
        self
    }

    /// Loosen or tighten the color tolerance
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Demand agreement across two consecutive frames
    pub fn require_stable(mut self) -> Self {
        self.stable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let r = Rect::new(100, 200, 50, 30);
        assert_eq!(r.center(), (125, 215));
    }

    #[test]
    fn test_rect_translated() {
        let r = Rect::new(10, 10, 5, 5);
        assert_eq!(r.translated(5, -5), Some(Rect::new(15, 5, 5, 5)));
        assert_eq!(r.translated(-20, 0), None);
    }

    #[test]
    fn test_rect_fits_and_contains() {
        let r = Rect::new(700, 1260, 20, 20);
        assert!(r.fits(720, 1280));
        assert!(!r.fits(719, 1280));
        assert!(r.contains(700, 1260));
        assert!(r.contains(719, 1279));
        assert!(!r.contains(720, 1279));
    }

    #[test]
    fn test_locator_identity() {
        const A: Locator = Locator::fixed(
            "A_CHECK",
            Rect::new(0, 0, 10, 10),
            (1, 2, 3),
            "./assets/a_check.png",
        );
        assert_eq!(A.name(), "A_CHECK");
        assert_eq!(A.button(), A.area());
        assert_eq!(format!("{A:?}"), "Locator(A_CHECK)");
    }
}
