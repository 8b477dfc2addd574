//! Perception layer
//!
//! Everything the automation core knows about the screen comes through
//! the two small traits here: [`Perceptor`] answers "is this element on
//! screen, and where do I tap it", [`DigitReader`] turns a cropped
//! region into a number. Heavy recognition (template matching, OCR
//! models) lives behind these traits on the host side; the core only
//! consumes their answers.

pub mod locator;
pub mod probe;

pub use locator::{LocateOpts, Locator, Rect};

use crate::device::DeviceError;

/// A captured screen at the reference resolution, RGBA
pub type Frame = image::RgbaImage;

/// Portrait reference width all coordinates are expressed in
pub const REF_WIDTH: u32 = 720;
/// Portrait reference height all coordinates are expressed in
pub const REF_HEIGHT: u32 = 1280;

/// Screen capture and element lookup
pub trait Perceptor {
    /// Grab the next frame
    ///
    /// Blocks until a frame is available; failing to produce one within
    /// the backend's patience is an error, a missing element is not.
    fn capture(&mut self) -> Result<Frame, DeviceError>;

    /// Look for `locator` in `frame`
    ///
    /// Returns the rectangle a tap on the element should target,
    /// adjusted for any drift the lookup tolerated. A miss is `None`,
    /// never an error.
    fn locate(&mut self, locator: &Locator, frame: &Frame, opts: LocateOpts) -> Option<Rect>;
}

/// Which digit model a read should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitModel {
    /// General numerals
    Number,
    /// Condensed numerals used by competitive scoreboards
    ArenaNumber,
}

impl DigitModel {
    /// Stable identifier the host recognizer keys its models by
    pub const fn model_id(&self) -> &'static str {
        match self {
            Self::Number => "cnocr_num",
            Self::ArenaNumber => "cnocr_23_num_fc",
        }
    }
}

/// How to preprocess a region before digit recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitStyle {
    /// Color the digits are printed in
    pub letter: (u8, u8, u8),
    /// Binarization threshold
    pub threshold: u8,
    /// Model to run
    pub model: DigitModel,
}

impl DigitStyle {
    /// Describe digits of a given color read with `model`
    pub const fn new(letter: (u8, u8, u8), threshold: u8, model: DigitModel) -> Self {
        Self {
            letter,
            threshold,
            model,
        }
    }
}

impl Default for DigitStyle {
    fn default() -> Self {
        // Near-white digits on dark panels, the common case
        Self::new((247, 247, 247), 128, DigitModel::Number)
    }
}

/// Numeric readout from a screen region
pub trait DigitReader {
    /// Read the number printed inside `area`
    fn read_number(
        &mut self,
        frame: &Frame,
        area: Rect,
        style: DigitStyle,
    ) -> Result<i64, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids() {
        assert_eq!(DigitModel::Number.model_id(), "cnocr_num");
        assert_eq!(DigitModel::ArenaNumber.model_id(), "cnocr_23_num_fc");
    }

    #[test]
    fn test_default_style() {
        let s = DigitStyle::default();
        assert_eq!(s.letter, (247, 247, 247));
        assert_eq!(s.threshold, 128);
        assert_eq!(s.model, DigitModel::Number);
    }
}
