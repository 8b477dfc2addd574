//! Color probing over captured frames
//!
//! The lightweight matcher behind [`Locator`](crate::vision::Locator)
//! lookups: average the pixels under a search area and compare against
//! the anchor's recorded color, retrying at small drift offsets so a
//! slightly shifted layout still matches.

use crate::vision::{Frame, LocateOpts, Locator, Rect};

/// Mean RGB over `area`; `None` if the area leaves the frame or is empty
pub fn mean_color(frame: &Frame, area: Rect) -> Option<(u8, u8, u8)> {
    if area.w == 0 || area.h == 0 || !area.fits(frame.width(), frame.height()) {
        return None;
    }
    let mut sum = (0u64, 0u64, 0u64);
    for y in area.y..area.y + area.h {
        for x in area.x..area.x + area.w {
            let p = frame.get_pixel(x, y).0;
            sum.0 += u64::from(p[0]);
            sum.1 += u64::from(p[1]);
            sum.2 += u64::from(p[2]);
        }
    }
    let n = u64::from(area.w) * u64::from(area.h);
    Some(((sum.0 / n) as u8, (sum.1 / n) as u8, (sum.2 / n) as u8))
}

/// Whether two colors agree within a per-channel tolerance
pub fn color_close(a: (u8, u8, u8), b: (u8, u8, u8), tolerance: u8) -> bool {
    a.0.abs_diff(b.0) <= tolerance && a.1.abs_diff(b.1) <= tolerance && a.2.abs_diff(b.2) <= tolerance
}

/// Offsets to probe at, nearest first
fn drift_offsets(offset: u32) -> Vec<(i32, i32)> {
    let mut probes = vec![(0, 0)];
    if offset > 0 {
        let d = offset as i32;
        probes.extend([
            (0, -d),
            (0, d),
            (-d, 0),
            (d, 0),
            (-d, -d),
            (d, -d),
            (-d, d),
            (d, d),
        ]);
    }
    probes
}

/// Find `locator` in `frame` by mean color
///
/// Probes the search area at its nominal position first, then at the
/// eight drift offsets `opts.offset` allows. On a hit, returns the tap
/// rectangle translated by the same drift so taps follow the element.
pub fn locate_by_color(frame: &Frame, locator: &Locator, opts: LocateOpts) -> Option<Rect> {
    for (dx, dy) in drift_offsets(opts.offset) {
        let Some(area) = locator.area().translated(dx, dy) else {
            continue;
        };
        let Some(seen) = mean_color(frame, area) else {
            continue;
        };
        if color_close(seen, locator.color(), opts.tolerance) {
            log::debug!(
                "{:?} matched at drift ({}, {}), color {:?}",
                locator,
                dx,
                dy,
                seen
            );
            return locator.button().translated(dx, dy);
        }
    }
    None
}

/// Two-frame agreement for stable lookups
///
/// A lookup counts as stable only when both frames matched and the tap
/// rectangles landed in the same place.
pub fn agree(now: Option<Rect>, before: Option<Rect>) -> Option<Rect> {
    match (now, before) {
        (Some(a), Some(b)) if a == b => Some(a),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const PROBE: Locator = Locator::fixed(
        "PROBE_CHECK",
        Rect::new(20, 20, 8, 8),
        (200, 40, 40),
        "./assets/probe_check.png",
    );

    fn frame_with_patch(x: u32, y: u32) -> Frame {
        let mut frame = Frame::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        for py in y..y + 8 {
            for px in x..x + 8 {
                frame.put_pixel(px, py, Rgba([200, 40, 40, 255]));
            }
        }
        frame
    }

    #[test]
    fn test_mean_color_uniform() {
        let frame = Frame::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
        assert_eq!(mean_color(&frame, Rect::new(0, 0, 16, 16)), Some((10, 20, 30)));
        assert_eq!(mean_color(&frame, Rect::new(10, 10, 10, 10)), None);
    }

    #[test]
    fn test_color_close_tolerance() {
        assert!(color_close((100, 100, 100), (105, 95, 100), 5));
        assert!(!color_close((100, 100, 100), (106, 100, 100), 5));
    }

    #[test]
    fn test_locate_exact_position() {
        let frame = frame_with_patch(20, 20);
        let hit = locate_by_color(&frame, &PROBE, LocateOpts::default());
        assert_eq!(hit, Some(PROBE.button()));
    }

    #[test]
    fn test_locate_with_drift() {
        // Patch sits 5px right of nominal; only an offset-aware probe finds it
        let frame = frame_with_patch(25, 20);
        assert_eq!(locate_by_color(&frame, &PROBE, LocateOpts::default()), None);
        let hit = locate_by_color(&frame, &PROBE, LocateOpts::default().with_offset(5));
        assert_eq!(hit, PROBE.button().translated(5, 0));
    }

    #[test]
    fn test_locate_miss() {
        let frame = Frame::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        assert_eq!(
            locate_by_color(&frame, &PROBE, LocateOpts::default().with_offset(10)),
            None
        );
    }

    #[test]
    fn test_agree_requires_same_spot() {
        let a = Some(Rect::new(1, 1, 4, 4));
        let b = Some(Rect::new(2, 1, 4, 4));
        assert_eq!(agree(a, a), a);
        assert_eq!(agree(a, b), None);
        assert_eq!(agree(a, None), None);
    }
}
