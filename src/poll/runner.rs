//! Prioritized condition/action polling
//!
//! An [`ActionLoop`] is the unit of screen interaction: capture a
//! frame, check for failure, check for success, otherwise walk a
//! prioritized rule list and fire the first rule whose debounce timer
//! and condition both allow it. Tasks are built by chaining these loops
//! and inspecting the [`Verdict`] each one returns.

use std::time::{Duration, Instant};

use crate::device::{Device, DeviceError, Jitter};
use crate::poll::Timer;
use crate::vision::{Frame, LocateOpts, Locator};

/// How an [`ActionLoop`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The success condition held
    Success,
    /// The named failure condition triggered
    Failed(&'static str),
    /// Pass limit or deadline exhausted first
    TimedOut,
}

/// Condition over the current frame and loop state
pub type Cond<S> = Box<dyn FnMut(&mut dyn Device, &Frame, &S) -> bool>;

/// Action taken when a rule fires
pub type Act<S> = Box<dyn FnMut(&mut dyn Device, &Frame, &mut S) -> Result<(), DeviceError>>;

/// One prioritized condition/action pair
pub struct Rule<S> {
    name: &'static str,
    debounce: Timer,
    cond: Cond<S>,
    act: Act<S>,
}

impl<S> Rule<S> {
    /// Build a rule from a condition and an action
    ///
    /// The debounce timer gates re-fires: it is checked before the
    /// condition and reset whenever the action runs, so a fresh timer
    /// fires immediately and then holds for its interval.
    pub fn new(
        name: &'static str,
        debounce: Timer,
        cond: impl FnMut(&mut dyn Device, &Frame, &S) -> bool + 'static,
        act: impl FnMut(&mut dyn Device, &Frame, &mut S) -> Result<(), DeviceError> + 'static,
    ) -> Self {
        Self {
            name,
            debounce,
            cond: Box::new(cond),
            act: Box::new(act),
        }
    }

    /// Tap `trigger` whenever it is on screen
    pub fn tap_on(trigger: Locator, debounce: Timer) -> Self {
        Self::tap_on_with(trigger, debounce, LocateOpts::default())
    }

    /// Tap `trigger` whenever it is on screen, with lookup options
    pub fn tap_on_with(trigger: Locator, debounce: Timer, opts: LocateOpts) -> Self {
        let mut jitter = Jitter::new();
        Self::new(
            trigger.name(),
            debounce,
            move |dev, frame, _| dev.locate(&trigger, frame, opts).is_some(),
            move |dev, frame, _| {
                // Re-locate on the same frame so the tap follows drift
                if let Some(rect) = dev.locate(&trigger, frame, opts) {
                    let (x, y) = jitter.point_in(rect);
                    dev.tap(x, y)?;
                    let pause = jitter.settle();
                    dev.sleep(pause);
                }
                Ok(())
            },
        )
    }
}

/// A single screen-interaction loop
///
/// Single shot: [`run`](ActionLoop::run) consumes the loop, so stale
/// debounce state can never leak into a later attempt. Build a fresh
/// loop per attempt.
pub struct ActionLoop<S = ()> {
    name: &'static str,
    rules: Vec<Rule<S>>,
    success: Cond<S>,
    confirm: Option<Timer>,
    failure: Option<(&'static str, Cond<S>)>,
    max_passes: u32,
    deadline: Option<Duration>,
}

impl<S> ActionLoop<S> {
    /// Loop that ends when `success` holds
    pub fn new(
        name: &'static str,
        success: impl FnMut(&mut dyn Device, &Frame, &S) -> bool + 'static,
    ) -> Self {
        Self {
            name,
            rules: Vec::new(),
            success: Box::new(success),
            confirm: None,
            failure: None,
            max_passes: 120,
            deadline: None,
        }
    }

    /// Append a rule; earlier rules win ties
    pub fn with_rule(mut self, rule: Rule<S>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Demand the success condition hold across `timer` before trusting it
    pub fn with_confirm(mut self, timer: Timer) -> Self {
        self.confirm = Some(timer);
        self
    }

    /// Abort with [`Verdict::Failed`] when `cond` holds
    pub fn with_failure(
        mut self,
        name: &'static str,
        cond: impl FnMut(&mut dyn Device, &Frame, &S) -> bool + 'static,
    ) -> Self {
        self.failure = Some((name, Box::new(cond)));
        self
    }

    /// Cap the number of capture passes
    pub fn with_pass_limit(mut self, passes: u32) -> Self {
        self.max_passes = passes;
        self
    }

    /// Cap total wall-clock time
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Drive the loop to a verdict
    ///
    /// Each pass: check the deadline, take `seed` or capture a frame,
    /// check failure, check success (gated by the confirm timer), then
    /// fire at most one rule. Firing a rule resets its own debounce and
    /// the confirm timer. Device faults abort immediately.
    pub fn run(
        mut self,
        dev: &mut dyn Device,
        state: &mut S,
        mut seed: Option<Frame>,
    ) -> Result<Verdict, DeviceError> {
        if let Some(confirm) = &mut self.confirm {
            confirm.start();
        }
        let began = Instant::now();

        for pass in 0..self.max_passes {
            if let Some(deadline) = self.deadline {
                if began.elapsed() >= deadline {
                    log::warn!("{}: deadline {deadline:?} exhausted", self.name);
                    return Ok(Verdict::TimedOut);
                }
            }

            let frame = match seed.take() {
                Some(frame) => frame,
                None => dev.capture()?,
            };

            if let Some((name, cond)) = &mut self.failure {
                if cond(dev, &frame, state) {
                    log::warn!("{}: failure condition {name}", self.name);
                    return Ok(Verdict::Failed(name));
                }
            }

            if (self.success)(dev, &frame, state) {
                let confirmed = match &mut self.confirm {
                    None => true,
                    Some(confirm) => confirm.reached(),
                };
                if confirmed {
                    log::debug!("{}: success on pass {pass}", self.name);
                    return Ok(Verdict::Success);
                }
            }

            for rule in &mut self.rules {
                // Debounce first so blocked rules skip their lookups
                if rule.debounce.reached() && (rule.cond)(dev, &frame, state) {
                    log::debug!("{}: rule {} fired on pass {pass}", self.name, rule.name);
                    (rule.act)(dev, &frame, state)?;
                    rule.debounce.reset();
                    if let Some(confirm) = &mut self.confirm {
                        confirm.reset();
                    }
                    break;
                }
            }
        }

        log::warn!("{}: no verdict within {} passes", self.name, self.max_passes);
        Ok(Verdict::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::sim::{SimDevice, SimScreen};
    use crate::vision::Rect;

    const BUTTON: Locator = Locator::fixed(
        "BUTTON",
        Rect::new(300, 600, 120, 60),
        (200, 160, 40),
        "./assets/test/button.png",
    );
    const DONE: Locator = Locator::fixed(
        "DONE",
        Rect::new(40, 40, 80, 40),
        (40, 200, 120),
        "./assets/test/done.png",
    );
    const ERROR_POPUP: Locator = Locator::fixed(
        "ERROR_POPUP",
        Rect::new(200, 500, 320, 200),
        (220, 40, 40),
        "./assets/test/error_popup.png",
    );

    fn two_screen_device() -> SimDevice {
        SimDevice::new("start")
            .with_screen(SimScreen::new("start").shows(BUTTON.name()))
            .with_screen(SimScreen::new("finish").shows(DONE.name()))
            .with_link("start", BUTTON.button(), "finish", 1)
    }

    fn locate_done(dev: &mut dyn Device, frame: &Frame) -> bool {
        dev.locate(&DONE, frame, LocateOpts::default()).is_some()
    }

    #[test]
    fn test_immediate_success() {
        let mut dev = SimDevice::new("finish").with_screen(SimScreen::new("finish").shows(DONE.name()));
        let verdict = ActionLoop::new("immediate", |dev, frame, _: &()| locate_done(dev, frame))
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::Success);
        assert!(dev.taps().is_empty());
    }

    #[test]
    fn test_rule_drives_to_success() {
        let mut dev = two_screen_device();
        let verdict = ActionLoop::new("advance", |dev, frame, _: &()| locate_done(dev, frame))
            .with_rule(Rule::tap_on(BUTTON, Timer::from_millis(200)))
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::Success);
        assert_eq!(dev.taps().len(), 1);
        assert_eq!(dev.screen(), "finish");
    }

    #[test]
    fn test_failure_preempts_rules() {
        let mut dev = SimDevice::new("broken").with_screen(
            SimScreen::new("broken")
                .shows(BUTTON.name())
                .shows(ERROR_POPUP.name()),
        );
        let verdict = ActionLoop::new("abort", |dev, frame, _: &()| locate_done(dev, frame))
            .with_failure("error-popup", |dev, frame, _| {
                dev.locate(&ERROR_POPUP, frame, LocateOpts::default()).is_some()
            })
            .with_rule(Rule::tap_on(BUTTON, Timer::from_millis(10)))
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::Failed("error-popup"));
        assert!(dev.taps().is_empty());
    }

    #[test]
    fn test_debounce_blocks_retap() {
        // Destination never appears; the rule may fire once, then its
        // long debounce holds for the rest of the passes
        let mut dev = SimDevice::new("start")
            .with_screen(SimScreen::new("start").shows(BUTTON.name()));
        let verdict = ActionLoop::new("stuck", |dev, frame, _: &()| locate_done(dev, frame))
            .with_rule(Rule::tap_on(BUTTON, Timer::from_millis(60_000)))
            .with_pass_limit(6)
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::TimedOut);
        assert_eq!(dev.taps().len(), 1);
    }

    #[test]
    fn test_pass_limit_times_out() {
        let mut dev = SimDevice::new("start")
            .with_screen(SimScreen::new("start").shows(BUTTON.name()));
        let verdict = ActionLoop::new("empty", |dev, frame, _: &()| locate_done(dev, frame))
            .with_pass_limit(3)
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::TimedOut);
    }

    #[test]
    fn test_deadline_times_out() {
        let mut dev = SimDevice::new("start")
            .with_screen(SimScreen::new("start").shows(BUTTON.name()))
            .with_frame_interval(Duration::from_millis(10));
        let verdict = ActionLoop::new("slow", |dev, frame, _: &()| locate_done(dev, frame))
            .with_deadline(Duration::from_millis(30))
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::TimedOut);
    }

    #[test]
    fn test_confirm_gates_success() {
        let mut dev = SimDevice::new("finish").with_screen(SimScreen::new("finish").shows(DONE.name()));
        // Needs three consecutive sightings, two passes cannot deliver them
        let verdict = ActionLoop::new("unconfirmed", |dev, frame, _: &()| locate_done(dev, frame))
            .with_confirm(Timer::from_millis(1).with_count(3))
            .with_pass_limit(2)
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::TimedOut);

        let mut dev = SimDevice::new("finish").with_screen(SimScreen::new("finish").shows(DONE.name()));
        let verdict = ActionLoop::new("confirmed", |dev, frame, _: &()| locate_done(dev, frame))
            .with_confirm(Timer::from_millis(1).with_count(3))
            .with_pass_limit(10)
            .run(&mut dev, &mut (), None)
            .unwrap();
        assert_eq!(verdict, Verdict::Success);
    }

    #[test]
    fn test_state_flag_handoff() {
        struct Progress {
            tapped: bool,
        }
        let mut dev = two_screen_device();
        let mut state = Progress { tapped: false };
        let jitter_button = BUTTON;
        let verdict = ActionLoop::new("stateful", |_, _, s: &Progress| s.tapped)
            .with_rule(Rule::new(
                "tap-once",
                Timer::from_millis(10),
                move |dev, frame, s: &Progress| {
                    !s.tapped && dev.locate(&jitter_button, frame, LocateOpts::default()).is_some()
                },
                move |dev, frame, s| {
                    if let Some(rect) = dev.locate(&jitter_button, frame, LocateOpts::default()) {
                        let (x, y) = rect.center();
                        dev.tap(x, y)?;
                    }
                    s.tapped = true;
                    Ok(())
                },
            ))
            .run(&mut dev, &mut state, None)
            .unwrap();
        assert_eq!(verdict, Verdict::Success);
        assert!(state.tapped);
        assert_eq!(dev.taps().len(), 1);
    }

    #[test]
    fn test_seed_frame_is_used_first() {
        // Success is decided on the seeded frame without touching capture
        let mut dev = SimDevice::new("start")
            .with_screen(SimScreen::new("start").shows(BUTTON.name()));
        let seed = Frame::new(72, 128);
        let verdict = ActionLoop::new("seeded", |_, _, _: &()| true)
            .run(&mut dev, &mut (), Some(seed))
            .unwrap();
        assert_eq!(verdict, Verdict::Success);
        assert_eq!(dev.captures(), 0);
    }
}
