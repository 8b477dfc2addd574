//! Cooperative tower climb
//!
//! Opens the tribe tower from its hub page, steps into the current
//! stage, then loops fight/auto/next-stage until the game refuses to
//! go further. The refusal dialog is the climb's natural end, not an
//! error; the task backs out to the main screen and reports done.

use std::time::Duration;

use crate::device::{Device, Jitter};
use crate::poll::{ActionLoop, Rule, Timer, Verdict};
use crate::tasks::{TaskError, TaskOutcome};
use crate::ui::assets::{GOTO_BACK, MAIN_CHECK, OPERATION_FAILED_CHECK, TRIBE_TOWER_CHECK};
use crate::ui::PAGES;
use crate::vision::{LocateOpts, Locator, Rect};
use crate::Commander;

const TASK: &str = "coop";

/// Co-op banner on the tower hub page
const TRIBE_CHECK: Locator = Locator::fixed(
    "TRIBE_CHECK",
    Rect::new(200, 980, 320, 90),
    (90, 160, 220),
    "./assets/tribe_tower/TRIBE_CHECK.png",
);

/// Anchor of the opened tower detail view
const TRIBE_TOWER_DETAILED_CHECK: Locator = Locator::fixed(
    "TRIBE_TOWER_DETAILED_CHECK",
    Rect::new(40, 120, 140, 48),
    (210, 210, 215),
    "./assets/tribe_tower/TRIBE_TOWER_DETAILED_CHECK.png",
);

/// Current stage marker on the tower detail view
const STAGE_POINT: Rect = Rect::new(340, 540, 40, 40);

/// Anchor of the stage info sheet
const STAGE_INFO_CHECK: Locator = Locator::fixed(
    "STAGE_INFO_CHECK",
    Rect::new(60, 170, 180, 44),
    (239, 239, 242),
    "./assets/tribe_tower/STAGE_INFO_CHECK.png",
);

/// Start-battle button on the stage info sheet
const FIGHT: Locator = Locator::fixed(
    "FIGHT",
    Rect::new(170, 1130, 380, 84),
    (247, 223, 74),
    "./assets/tribe_tower/FIGHT.png",
);

/// In-battle auto-fire toggle
const AUTO_SHOOT: Locator = Locator::fixed(
    "AUTO_SHOOT",
    Rect::new(596, 420, 100, 44),
    (230, 230, 230),
    "./assets/tribe_tower/AUTO_SHOOT.png",
);

/// In-battle auto-burst toggle
const AUTO_BURST: Locator = Locator::fixed(
    "AUTO_BURST",
    Rect::new(596, 500, 100, 44),
    (230, 230, 230),
    "./assets/tribe_tower/AUTO_BURST.png",
);

/// Advance button on the clear screen
const NEXT_STAGE: Locator = Locator::fixed(
    "NEXT_STAGE",
    Rect::new(390, 1130, 260, 78),
    (86, 132, 230),
    "./assets/tribe_tower/NEXT_STAGE.png",
);

/// Post-battle confirm button
const END_CHECK: Locator = Locator::fixed(
    "END_CHECK",
    Rect::new(230, 1130, 260, 78),
    (235, 235, 238),
    "./assets/tribe_tower/END_CHECK.png",
);

/// Promotional gift popup anchor, shows up at random
const PAID_GIFT_CHECK: Locator = Locator::fixed(
    "PAID_GIFT_CHECK",
    Rect::new(180, 320, 360, 80),
    (250, 205, 92),
    "./assets/popup/PAID_GIFT_CHECK.png",
);

/// Close button of the gift popup
const PAID_GIFT_CLOSE: Locator = Locator::fixed(
    "PAID_GIFT_CLOSE",
    Rect::new(640, 250, 48, 48),
    (240, 240, 240),
    "./assets/popup/PAID_GIFT_CLOSE.png",
);

/// Confirm button of the operation-failed dialog
const OPERATION_FAILED_CONFIRM: Rect = Rect::new(260, 788, 200, 64);

/// Capture passes allowed for entry and the walk back out
const ENTRY_PASSES: u32 = 600;

/// Capture passes allowed for the whole climb
const CLIMB_PASSES: u32 = 2000;

/// Dismiss the gift popup wherever it interrupts
fn paid_gift_rule<S>() -> Rule<S> {
    let mut jitter = Jitter::new();
    Rule::new(
        "paid-gift",
        Timer::from_millis(1000),
        |dev, frame, _| {
            dev.locate(&PAID_GIFT_CHECK, frame, LocateOpts::default().with_offset(10))
                .is_some()
        },
        move |dev, _, _| {
            let (x, y) = jitter.point_in(PAID_GIFT_CLOSE.button());
            dev.tap(x, y)?;
            let pause = jitter.settle();
            dev.sleep(pause);
            Ok(())
        },
    )
}

/// Climbs the co-op tower until the game refuses the next stage
#[derive(Default)]
pub struct CoopTask;

impl CoopTask {
    pub fn new() -> Self {
        Self
    }

    pub fn run<D: Device>(&self, cmd: &mut Commander<D>) -> Result<TaskOutcome, TaskError> {
        if cmd.settings.coop.event_coop {
            log::warn!("{TASK}: event entry rides seasonal assets, not on the stable page map");
            return Ok(TaskOutcome::Unavailable);
        }
        log::info!("{TASK}: starting tower climb");
        cmd.ensure(PAGES.tribe_tower)?;
        self.open_tower(cmd)?;
        self.select_stage(cmd)?;
        self.climb(cmd)
    }

    /// Tap the co-op banner until the tower detail view opens
    fn open_tower<D: Device>(&self, cmd: &mut Commander<D>) -> Result<(), TaskError> {
        let mut jitter = Jitter::new();
        let verdict = ActionLoop::new("tower-open", |dev, frame, _| {
            dev.locate(
                &TRIBE_TOWER_DETAILED_CHECK,
                frame,
                LocateOpts::default().with_offset(10),
            )
            .is_some()
        })
        .with_failure("operation-failed", |dev, frame, _| {
            dev.locate(&OPERATION_FAILED_CHECK, frame, LocateOpts::default().with_offset(10))
                .is_some()
        })
        .with_rule(paid_gift_rule())
        .with_rule(Rule::new(
            "open-tribe",
            Timer::from_millis(1000),
            |dev, frame, _| {
                dev.locate(&TRIBE_TOWER_CHECK, frame, LocateOpts::default().with_offset(10))
                    .is_some()
                    && dev
                        .locate(&TRIBE_CHECK, frame, LocateOpts::default().with_offset(10))
                        .is_some()
            },
            move |dev, frame, _| {
                if let Some(rect) =
                    dev.locate(&TRIBE_CHECK, frame, LocateOpts::default().with_offset(10))
                {
                    let (x, y) = jitter.point_in(rect);
                    dev.tap(x, y)?;
                    let pause = jitter.settle();
                    dev.sleep(pause);
                }
                Ok(())
            },
        ))
        .with_pass_limit(ENTRY_PASSES)
        .run(&mut cmd.device, &mut (), None)?;

        match verdict {
            Verdict::Success => Ok(()),
            Verdict::Failed(_) => {
                log::warn!("{TASK}: operation failed before the tower opened");
                self.back_out(cmd)?;
                Err(TaskError::OperationFailed { task: TASK })
            }
            Verdict::TimedOut => Err(TaskError::Stalled { task: TASK }),
        }
    }

    /// Tap the current stage marker until its info sheet opens
    fn select_stage<D: Device>(&self, cmd: &mut Commander<D>) -> Result<(), TaskError> {
        let mut jitter = Jitter::new();
        let verdict = ActionLoop::new("stage-select", |dev, frame, _| {
            dev.locate(&STAGE_INFO_CHECK, frame, LocateOpts::default().with_offset(10))
                .is_some()
        })
        .with_failure("operation-failed", |dev, frame, _| {
            dev.locate(&OPERATION_FAILED_CHECK, frame, LocateOpts::default().with_offset(10))
                .is_some()
        })
        .with_rule(paid_gift_rule())
        .with_rule(Rule::new(
            "open-stage",
            Timer::from_millis(5000),
            |dev, frame, _| {
                dev.locate(
                    &TRIBE_TOWER_DETAILED_CHECK,
                    frame,
                    LocateOpts::default().with_offset(10),
                )
                .is_some()
            },
            move |dev, _, _| {
                let (x, y) = jitter.point_in(STAGE_POINT);
                dev.tap(x, y)?;
                let pause = jitter.settle();
                dev.sleep(pause);
                Ok(())
            },
        ))
        .with_pass_limit(ENTRY_PASSES)
        .run(&mut cmd.device, &mut (), None)?;

        match verdict {
            Verdict::Success => Ok(()),
            Verdict::Failed(_) => {
                log::warn!("{TASK}: operation failed on stage select");
                self.back_out(cmd)?;
                Err(TaskError::OperationFailed { task: TASK })
            }
            Verdict::TimedOut => Err(TaskError::Stalled { task: TASK }),
        }
    }

    /// Fight stage after stage; ends at the refusal dialog
    fn climb<D: Device>(&self, cmd: &mut Commander<D>) -> Result<TaskOutcome, TaskError> {
        let stage_load = Duration::from_millis(cmd.settings.timing.stage_load_ms);
        let mut next_jitter = Jitter::new();
        let mut end_jitter = Jitter::new();

        // No screen ever means "climb finished"; only the refusal
        // dialog ends a climb
        let verdict = ActionLoop::new("tower-climb", |_, _, _| false)
            .with_failure("operation-failed", |dev, frame, _| {
                dev.locate(&OPERATION_FAILED_CHECK, frame, LocateOpts::default().with_offset(10))
                    .is_some()
            })
            .with_rule(paid_gift_rule())
            .with_rule(Rule::tap_on_with(
                FIGHT,
                Timer::from_millis(1000),
                LocateOpts::default().with_offset(30),
            ))
            .with_rule(Rule::tap_on_with(
                AUTO_SHOOT,
                Timer::from_millis(5000),
                LocateOpts::default().with_offset(10),
            ))
            .with_rule(Rule::tap_on_with(
                AUTO_BURST,
                Timer::from_millis(5000),
                LocateOpts::default().with_offset(10),
            ))
            .with_rule(Rule::new(
                "next-stage",
                Timer::from_millis(1000),
                |dev, frame, _| {
                    dev.locate(&NEXT_STAGE, frame, LocateOpts::default().with_offset(10))
                        .is_some()
                },
                move |dev, frame, _| {
                    if let Some(rect) =
                        dev.locate(&NEXT_STAGE, frame, LocateOpts::default().with_offset(10))
                    {
                        let (x, y) = next_jitter.point_in(rect);
                        dev.tap(x, y)?;
                        // The next stage takes a while to load in
                        dev.sleep(stage_load);
                    }
                    Ok(())
                },
            ))
            .with_rule(Rule::new(
                "end-battle",
                Timer::from_millis(1000),
                |dev, frame, _| {
                    dev.locate(&NEXT_STAGE, frame, LocateOpts::default().with_offset(10))
                        .is_none()
                        && dev
                            .locate(&END_CHECK, frame, LocateOpts::default().with_offset(10))
                            .is_some()
                },
                move |dev, frame, _| {
                    if let Some(rect) =
                        dev.locate(&END_CHECK, frame, LocateOpts::default().with_offset(10))
                    {
                        let (x, y) = end_jitter.point_in(rect);
                        dev.tap(x, y)?;
                        let pause = end_jitter.settle();
                        dev.sleep(pause);
                    }
                    Ok(())
                },
            ))
            .with_pass_limit(CLIMB_PASSES)
            .run(&mut cmd.device, &mut (), None)?;

        match verdict {
            Verdict::Success | Verdict::Failed(_) => {
                log::info!("{TASK}: no stage beyond this one, backing out");
                self.back_out(cmd)?;
                Ok(TaskOutcome::Completed)
            }
            Verdict::TimedOut => Err(TaskError::Stalled { task: TASK }),
        }
    }

    /// Walk back to the main screen, dismissing whatever is in the way
    fn back_out<D: Device>(&self, cmd: &mut Commander<D>) -> Result<(), TaskError> {
        let mut jitter = Jitter::new();
        let verdict = ActionLoop::new("back-to-main", |dev, frame, _| {
            dev.locate(&MAIN_CHECK, frame, LocateOpts::default().with_offset(10))
                .is_some()
        })
        .with_confirm(Timer::from_millis(500).with_count(2))
        .with_rule(paid_gift_rule())
        .with_rule(Rule::new(
            "dismiss-failure",
            Timer::from_millis(1000),
            |dev, frame, _| {
                dev.locate(&OPERATION_FAILED_CHECK, frame, LocateOpts::default().with_offset(10))
                    .is_some()
            },
            move |dev, _, _| {
                let (x, y) = jitter.point_in(OPERATION_FAILED_CONFIRM);
                dev.tap(x, y)?;
                let pause = jitter.settle();
                dev.sleep(pause);
                Ok(())
            },
        ))
        .with_rule(Rule::tap_on_with(
            GOTO_BACK,
            Timer::from_millis(1000),
            LocateOpts::default().with_offset(10),
        ))
        .with_pass_limit(ENTRY_PASSES)
        .run(&mut cmd.device, &mut (), None)?;

        match verdict {
            Verdict::Success => {
                // Settle the canonical position before handing back
                cmd.ensure(PAGES.main)?;
                Ok(())
            }
            Verdict::Failed(_) | Verdict::TimedOut => Err(TaskError::Stalled { task: TASK }),
        }
    }
}
