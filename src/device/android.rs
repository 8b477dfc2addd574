//! Frame mailbox device for the Android host
//!
//! The Android app owns the screen projection and the tap injector; the
//! core runs on a worker thread. [`channel`] splits the two worlds:
//! [`AndroidDevice`] is the core-side [`Device`](crate::device::Device)
//! that blocks on fresh frames and queues outgoing commands, while
//! [`AndroidLink`] is the host-side handle that pushes frames, drains
//! commands, and answers digit reads.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, LockResult, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use image::imageops::{self, FilterType};

use crate::device::input::ScreenCoords;
use crate::device::{Actuator, DeviceError};
use crate::poll::Timer;
use crate::vision::{
    probe, DigitModel, DigitReader, DigitStyle, Frame, LocateOpts, Locator, Perceptor, Rect,
    REF_HEIGHT, REF_WIDTH,
};

/// Give up on a frame or a digit reply after this long
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Declare the automation stuck after this long without a tap
const STUCK_LIMIT: Duration = Duration::from_secs(120);
/// Tap watchdog ring size
const TAP_RING: usize = 30;
/// Taps on the same spot tolerated within the ring
const SAME_SPOT_LIMIT: u32 = 12;
/// Watchdog cell size; taps are jittered, so matching is by coarse cell
const TAP_GRID: i32 = 100;

/// Outgoing request for the host to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Inject a tap at physical screen coordinates
    Tap { x: i32, y: i32 },
    /// Run digit recognition over `area` of the current screen
    ReadDigits {
        /// Reply tag for [`AndroidLink::post_digits`]
        seq: u8,
        /// Region to read, reference coordinates
        area: Rect,
        /// Model to run
        model: DigitModel,
    },
}

struct FrameSlot {
    frame: Option<Frame>,
    /// Dimensions the frame was pushed at, before any resize
    width: u32,
    height: u32,
    seq: u64,
    open: bool,
}

struct Mailbox {
    frame: Mutex<FrameSlot>,
    frame_cv: Condvar,
    commands: Mutex<VecDeque<Command>>,
    styles: Mutex<HashMap<u8, DigitStyle>>,
    digits: Mutex<HashMap<u8, i64>>,
    digits_cv: Condvar,
}

fn relock<T>(result: LockResult<T>) -> T {
    // A panicked holder cannot corrupt the slot invariants, keep going
    result.unwrap_or_else(PoisonError::into_inner)
}

/// Create a connected device/link pair
pub fn channel() -> (AndroidDevice, AndroidLink) {
    let shared = Arc::new(Mailbox {
        frame: Mutex::new(FrameSlot {
            frame: None,
            width: REF_WIDTH,
            height: REF_HEIGHT,
            seq: 0,
            open: true,
        }),
        frame_cv: Condvar::new(),
        commands: Mutex::new(VecDeque::new()),
        styles: Mutex::new(HashMap::new()),
        digits: Mutex::new(HashMap::new()),
        digits_cv: Condvar::new(),
    });

    let mut stuck = Timer::new(STUCK_LIMIT);
    stuck.start();

    let device = AndroidDevice {
        shared: Arc::clone(&shared),
        last_seen: 0,
        latest: None,
        prev_frame: None,
        coords: ScreenCoords::default(),
        tap_ring: VecDeque::with_capacity(TAP_RING),
        stuck,
        read_seq: 0,
        timeout: DEFAULT_TIMEOUT,
    };
    (device, AndroidLink { shared })
}

/// Core-side device backed by the host mailbox
pub struct AndroidDevice {
    shared: Arc<Mailbox>,
    last_seen: u64,
    latest: Option<Frame>,
    prev_frame: Option<Frame>,
    coords: ScreenCoords,
    tap_ring: VecDeque<(i32, i32)>,
    stuck: Timer,
    read_seq: u8,
    timeout: Duration,
}

impl AndroidDevice {
    /// Change how long captures and digit reads block
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn wait_fresh_frame(&self) -> Result<(Frame, u64, u32, u32), DeviceError> {
        let deadline = Instant::now() + self.timeout;
        let mut slot = relock(self.shared.frame.lock());
        loop {
            if !slot.open {
                return Err(DeviceError::Disconnected);
            }
            if slot.seq > self.last_seen {
                if let Some(frame) = slot.frame.clone() {
                    return Ok((frame, slot.seq, slot.width, slot.height));
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(DeviceError::CaptureTimeout(self.timeout));
            }
            let (next, _) = relock(self.shared.frame_cv.wait_timeout(slot, deadline - now));
            slot = next;
        }
    }

    fn guard_tap_watchdog(&mut self, x: i32, y: i32) -> Result<(), DeviceError> {
        let cell = (x / TAP_GRID, y / TAP_GRID);
        if self.tap_ring.len() == TAP_RING {
            self.tap_ring.pop_front();
        }
        self.tap_ring.push_back(cell);
        let count = self.tap_ring.iter().filter(|c| **c == cell).count() as u32;
        if count > SAME_SPOT_LIMIT {
            log::error!("tapped around ({x}, {y}) {count} times with no progress");
            return Err(DeviceError::TooManyTaps {
                target: format!("({x}, {y})"),
                count,
            });
        }
        Ok(())
    }
}

impl Perceptor for AndroidDevice {
    fn capture(&mut self) -> Result<Frame, DeviceError> {
        if self.stuck.reached() {
            let idle = self.stuck.current();
            log::error!("no taps for {idle:?}, raising stuck");
            return Err(DeviceError::Stuck { idle });
        }

        let (raw, seq, width, height) = self.wait_fresh_frame()?;
        self.last_seen = seq;
        self.coords = ScreenCoords::new(width, height);

        let frame = if raw.width() == REF_WIDTH && raw.height() == REF_HEIGHT {
            raw
        } else {
            imageops::resize(&raw, REF_WIDTH, REF_HEIGHT, FilterType::Triangle)
        };

        self.prev_frame = self.latest.take();
        self.latest = Some(frame.clone());
        Ok(frame)
    }

    fn locate(&mut self, locator: &Locator, frame: &Frame, opts: LocateOpts) -> Option<Rect> {
        let now = probe::locate_by_color(frame, locator, opts);
        if opts.stable {
            let before = self
                .prev_frame
                .as_ref()
                .and_then(|f| probe::locate_by_color(f, locator, opts));
            probe::agree(now, before)
        } else {
            now
        }
    }
}

impl DigitReader for AndroidDevice {
    /// Ask the host recognizer to read `area` of its current screen
    ///
    /// The frame argument is unused; the host crops from the same
    /// projection it pushes frames from.
    fn read_number(
        &mut self,
        _frame: &Frame,
        area: Rect,
        style: DigitStyle,
    ) -> Result<i64, DeviceError> {
        self.read_seq = self.read_seq.wrapping_add(1);
        let seq = self.read_seq;

        relock(self.shared.styles.lock()).insert(seq, style);
        relock(self.shared.commands.lock()).push_back(Command::ReadDigits {
            seq,
            area,
            model: style.model,
        });

        let deadline = Instant::now() + self.timeout;
        let mut replies = relock(self.shared.digits.lock());
        loop {
            if let Some(value) = replies.remove(&seq) {
                return Ok(value);
            }
            if !relock(self.shared.frame.lock()).open {
                return Err(DeviceError::Disconnected);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(DeviceError::Recognizer(format!(
                    "no reply for read {seq} within {:?}",
                    self.timeout
                )));
            }
            let (next, _) = relock(self.shared.digits_cv.wait_timeout(replies, deadline - now));
            replies = next;
        }
    }
}

impl Actuator for AndroidDevice {
    fn tap(&mut self, x: i32, y: i32) -> Result<(), DeviceError> {
        self.guard_tap_watchdog(x, y)?;
        self.stuck.reset();
        let (px, py) = self.coords.scale((x, y));
        log::debug!("tap ({x}, {y}) -> physical ({px}, {py})");
        relock(self.shared.commands.lock()).push_back(Command::Tap { x: px, y: py });
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn clear_input_history(&mut self) {
        self.tap_ring.clear();
    }

    fn clear_stuck_detector(&mut self) {
        self.stuck.reset();
    }
}

/// Host-side handle to the mailbox
#[derive(Clone)]
pub struct AndroidLink {
    shared: Arc<Mailbox>,
}

impl AndroidLink {
    /// Publish a captured screen, RGBA bytes at any resolution
    pub fn push_frame(&self, data: &[u8], width: u32, height: u32) -> Result<(), DeviceError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DeviceError::InvalidFrame {
                expected,
                actual: data.len(),
                width,
                height,
            });
        }
        let frame = Frame::from_raw(width, height, data.to_vec()).ok_or(
            DeviceError::InvalidFrame {
                expected,
                actual: data.len(),
                width,
                height,
            },
        )?;

        let mut slot = relock(self.shared.frame.lock());
        slot.frame = Some(frame);
        slot.width = width;
        slot.height = height;
        slot.seq += 1;
        self.shared.frame_cv.notify_all();
        Ok(())
    }

    /// Next command to execute, if any
    pub fn next_command(&self) -> Option<Command> {
        relock(self.shared.commands.lock()).pop_front()
    }

    /// Preprocessing style for a pending digit read
    pub fn read_style(&self, seq: u8) -> Option<DigitStyle> {
        relock(self.shared.styles.lock()).get(&seq).copied()
    }

    /// Deliver the result of a digit read
    pub fn post_digits(&self, seq: u8, value: i64) {
        relock(self.shared.styles.lock()).remove(&seq);
        relock(self.shared.digits.lock()).insert(seq, value);
        self.shared.digits_cv.notify_all();
    }

    /// Shut the mailbox; blocked device calls return `Disconnected`
    pub fn close(&self) {
        relock(self.shared.frame.lock()).open = false;
        self.shared.frame_cv.notify_all();
        self.shared.digits_cv.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame_bytes(width: u32, height: u32, rgb: (u8, u8, u8)) -> Vec<u8> {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
        }
        data
    }

    #[test]
    fn test_push_then_capture_resizes_to_reference() {
        let (mut dev, link) = channel();
        link.push_frame(&solid_frame_bytes(360, 640, (9, 9, 9)), 360, 640)
            .unwrap();
        let frame = dev.capture().unwrap();
        assert_eq!((frame.width(), frame.height()), (REF_WIDTH, REF_HEIGHT));
    }

    #[test]
    fn test_capture_waits_for_unseen_frame() {
        let (mut dev, link) = channel();
        dev.set_timeout(Duration::from_millis(50));
        link.push_frame(&solid_frame_bytes(36, 64, (1, 1, 1)), 36, 64)
            .unwrap();
        dev.capture().unwrap();
        // Same frame again, capture must not return it twice
        match dev.capture() {
            Err(DeviceError::CaptureTimeout(_)) => {}
            other => panic!("expected CaptureTimeout, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_frame_rejected() {
        let (_dev, link) = channel();
        match link.push_frame(&[0u8; 16], 720, 1280) {
            Err(DeviceError::InvalidFrame { expected, actual, .. }) => {
                assert_eq!(expected, 720 * 1280 * 4);
                assert_eq!(actual, 16);
            }
            other => panic!("expected InvalidFrame, got {other:?}"),
        }
    }

    #[test]
    fn test_tap_scales_to_pushed_resolution() {
        let (mut dev, link) = channel();
        link.push_frame(&solid_frame_bytes(144, 256, (2, 2, 2)), 144, 256)
            .unwrap();
        dev.capture().unwrap();
        dev.tap(360, 640).unwrap();
        assert_eq!(link.next_command(), Some(Command::Tap { x: 72, y: 128 }));
        assert_eq!(link.next_command(), None);
    }

    #[test]
    fn test_tap_watchdog_trips_on_repeats() {
        let (mut dev, _link) = channel();
        for _ in 0..12 {
            dev.tap(250, 250).unwrap();
        }
        match dev.tap(255, 245) {
            Err(DeviceError::TooManyTaps { count, .. }) => assert_eq!(count, 13),
            other => panic!("expected TooManyTaps, got {other:?}"),
        }
    }

    #[test]
    fn test_tap_watchdog_ignores_varied_targets() {
        let (mut dev, _link) = channel();
        for i in 0..40 {
            let x = 100 + (i % 4) * 150;
            dev.tap(x, 600).unwrap();
        }
    }

    #[test]
    fn test_clear_input_history_resets_watchdog() {
        let (mut dev, _link) = channel();
        for _ in 0..12 {
            dev.tap(250, 250).unwrap();
        }
        dev.clear_input_history();
        dev.tap(250, 250).unwrap();
    }

    #[test]
    fn test_digit_read_round_trip() {
        let (mut dev, link) = channel();
        let host = link.clone();
        let worker = thread::spawn(move || loop {
            if let Some(Command::ReadDigits { seq, area, model }) = host.next_command() {
                assert_eq!(area, Rect::new(395, 650, 75, 25));
                assert_eq!(model, DigitModel::ArenaNumber);
                assert!(host.read_style(seq).is_some());
                host.post_digits(seq, 271_828);
                break;
            }
            thread::sleep(Duration::from_millis(1));
        });

        link.push_frame(&solid_frame_bytes(36, 64, (3, 3, 3)), 36, 64)
            .unwrap();
        let frame = dev.capture().unwrap();
        let style = DigitStyle::new((107, 107, 107), 128, DigitModel::ArenaNumber);
        let value = dev
            .read_number(&frame, Rect::new(395, 650, 75, 25), style)
            .unwrap();
        assert_eq!(value, 271_828);
        worker.join().unwrap();
    }

    #[test]
    fn test_close_disconnects_capture() {
        let (mut dev, link) = channel();
        link.close();
        match dev.capture() {
            Err(DeviceError::Disconnected) => {}
            other => panic!("expected Disconnected, got {other:?}"),
        }
    }

    #[test]
    fn test_stable_locate_across_pushed_frames() {
        const MARK: Locator = Locator::fixed(
            "MARK",
            Rect::new(100, 100, 40, 40),
            (250, 10, 10),
            "./assets/test/mark.png",
        );
        let mut bytes = solid_frame_bytes(REF_WIDTH, REF_HEIGHT, (0, 0, 0));
        for y in 100..140u32 {
            for x in 100..140u32 {
                let i = ((y * REF_WIDTH + x) * 4) as usize;
                bytes[i] = 250;
                bytes[i + 1] = 10;
                bytes[i + 2] = 10;
            }
        }

        let (mut dev, link) = channel();
        let stable = LocateOpts::default().require_stable();

        link.push_frame(&bytes, REF_WIDTH, REF_HEIGHT).unwrap();
        let frame = dev.capture().unwrap();
        assert!(dev.locate(&MARK, &frame, LocateOpts::default()).is_some());
        // First sighting has no prior frame to agree with
        assert!(dev.locate(&MARK, &frame, stable).is_none());

        link.push_frame(&bytes, REF_WIDTH, REF_HEIGHT).unwrap();
        let frame = dev.capture().unwrap();
        assert_eq!(dev.locate(&MARK, &frame, stable), Some(MARK.button()));
    }
}
