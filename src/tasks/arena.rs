//! Arena rounds
//!
//! Plays the free PvP attempts: enter the chosen arena lobby from the
//! ark hub, read the three opponent rows off the board, pick one, then
//! ride the fight through skip and result screens back to the lobby.
//! Repeats while the free-attempt label is still up.

use std::time::Duration;

use crate::ai::{select, Candidate, ScoreDimension, Strategy};
use crate::device::{Device, DeviceError, Jitter};
use crate::poll::{ActionLoop, Rule, Timer, Verdict};
use crate::tasks::{TaskError, TaskOutcome};
use crate::ui::assets::{
    ARENA_GOTO_ROOKIE_ARENA, ARENA_GOTO_SPECIAL_ARENA, OPERATION_FAILED_CHECK, ROOKIE_ARENA_CHECK,
    SPECIAL_ARENA_CHECK,
};
use crate::ui::PAGES;
use crate::vision::{DigitModel, DigitStyle, Frame, LocateOpts, Locator, Rect};
use crate::Commander;

/// Season-break banner shown while the arena is closed
const NEXT_SEASON: Locator = Locator::fixed(
    "NEXT_SEASON",
    Rect::new(180, 560, 360, 80),
    (233, 101, 81),
    "./assets/arena/NEXT_SEASON.png",
);

/// Battle-skip button, up for the whole fight
const SKIP: Locator = Locator::fixed(
    "SKIP",
    Rect::new(600, 1190, 90, 50),
    (244, 244, 244),
    "./assets/arena/SKIP.png",
);

/// Confirmation button on the opponent details sheet
const INTO_COMPETITION: Locator = Locator::fixed(
    "INTO_COMPETITION",
    Rect::new(250, 1040, 220, 64),
    (71, 133, 232),
    "./assets/arena/INTO_COMPETITION.png",
);

/// End-of-battle result banner
const END_COMPETITION: Locator = Locator::fixed(
    "END_COMPETITION",
    Rect::new(260, 1120, 200, 60),
    (140, 119, 67),
    "./assets/arena/END_COMPETITION.png",
);

/// Neutral spot that dismisses result screens
const DISMISS: Rect = Rect::new(80, 80, 40, 40);

/// Commander power readout above the opponent list
const OWN_POWER: Rect = Rect::new(150, 430, 110, 28);

const POWER: &str = "Power";
const COMMANDER_LEVEL: &str = "CommanderLevel";
const SYNCHRO_LEVEL: &str = "SynchroLevel";
const RANKING: &str = "Ranking";

const POWER_LETTER: (u8, u8, u8) = (107, 107, 107);
const LEVEL_LETTER: (u8, u8, u8) = (222, 222, 222);
const SYNCHRO_LETTER: (u8, u8, u8) = (255, 255, 255);
const SELF_LETTER: (u8, u8, u8) = (247, 247, 247);
const DIGIT_THRESHOLD: u8 = 128;

/// Row tapped when selection is disabled; boards order weakest last
const DEFAULT_SLOT: usize = 3;

/// Capture passes allowed per polling loop, battles included
const FIGHT_PASSES: u32 = 2000;

/// Digit regions for one opponent row
struct SlotFields {
    power: Rect,
    commander_level: Rect,
    synchro_level: Rect,
    /// Absent when the mode derives ranking from row position
    ranking: Option<Rect>,
}

/// Static screen layout of one arena mode
struct ModeData {
    name: &'static str,
    /// Lobby anchor
    check: Locator,
    /// Entry button on the ark arena hub
    enter: Locator,
    /// Free-attempt label, gone once the attempts are spent
    free: Locator,
    /// Digit model trained on this mode's typography
    model: DigitModel,
    /// Tap targets for the three opponent rows
    slots: [Rect; 3],
    fields: [SlotFields; 3],
}

const ROOKIE: ModeData = ModeData {
    name: "rookie arena",
    check: ROOKIE_ARENA_CHECK,
    enter: ARENA_GOTO_ROOKIE_ARENA,
    free: Locator::fixed(
        "ROOKIE_FREE_CHECK",
        Rect::new(250, 560, 220, 36),
        (94, 202, 119),
        "./assets/rookie_arena/FREE_CHECK.png",
    ),
    model: DigitModel::Number,
    slots: [
        Rect::new(550, 705, 80, 50),
        Rect::new(550, 875, 80, 50),
        Rect::new(550, 1075, 80, 50),
    ],
    fields: [
        SlotFields {
            power: Rect::new(395, 650, 75, 25),
            commander_level: Rect::new(74, 733, 42, 17),
            synchro_level: Rect::new(308, 779, 21, 18),
            ranking: Some(Rect::new(85, 765, 35, 25)),
        },
        SlotFields {
            power: Rect::new(395, 830, 75, 25),
            commander_level: Rect::new(74, 911, 42, 17),
            synchro_level: Rect::new(308, 957, 21, 19),
            ranking: Some(Rect::new(85, 945, 35, 25)),
        },
        SlotFields {
            power: Rect::new(395, 1010, 75, 25),
            commander_level: Rect::new(74, 1089, 42, 17),
            synchro_level: Rect::new(308, 1137, 21, 18),
            ranking: Some(Rect::new(85, 1125, 35, 25)),
        },
    ],
};

const SPECIAL: ModeData = ModeData {
    name: "special arena",
    check: SPECIAL_ARENA_CHECK,
    enter: ARENA_GOTO_SPECIAL_ARENA,
    free: Locator::fixed(
        "SPECIAL_FREE_CHECK",
        Rect::new(250, 640, 220, 36),
        (94, 202, 119),
        "./assets/special_arena/FREE_CHECK.png",
    ),
    model: DigitModel::ArenaNumber,
    slots: [
        Rect::new(550, 775, 80, 50),
        Rect::new(550, 925, 80, 50),
        Rect::new(550, 1075, 80, 50),
    ],
    fields: [
        SlotFields {
            power: Rect::new(376, 736, 79, 31),
            commander_level: Rect::new(72, 801, 39, 16),
            synchro_level: Rect::new(392, 836, 22, 19),
            ranking: None,
        },
        SlotFields {
            power: Rect::new(376, 886, 79, 31),
            commander_level: Rect::new(72, 951, 39, 16),
            synchro_level: Rect::new(392, 986, 22, 19),
            ranking: None,
        },
        SlotFields {
            power: Rect::new(376, 1036, 79, 31),
            commander_level: Rect::new(72, 1101, 39, 16),
            synchro_level: Rect::new(392, 1136, 22, 19),
            ranking: None,
        },
    ],
};

/// Which arena to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaMode {
    Rookie,
    Special,
}

impl ArenaMode {
    fn data(self) -> &'static ModeData {
        match self {
            Self::Rookie => &ROOKIE,
            Self::Special => &SPECIAL,
        }
    }
}

/// Per-round progress shared by the competition rules
struct Round {
    /// Set once a result screen has been dismissed
    settled: bool,
}

/// Plays free arena rounds until the attempts run out
pub struct ArenaTask {
    mode: ArenaMode,
}

impl ArenaTask {
    pub fn new(mode: ArenaMode) -> Self {
        Self { mode }
    }

    pub fn run<D: Device>(&self, cmd: &mut Commander<D>) -> Result<TaskOutcome, TaskError> {
        let data = self.mode.data();
        log::info!("{}: starting", data.name);
        cmd.ensure(PAGES.arena)?;
        if !self.enter_lobby(cmd)? {
            log::info!("{}: closed until next season", data.name);
            return Ok(TaskOutcome::Unavailable);
        }
        self.log_own_power(cmd);

        let mut rounds = 0u32;
        loop {
            let frame = cmd.device.capture()?;
            let free = cmd
                .device
                .locate(&data.free, &frame, LocateOpts::default().with_tolerance(20))
                .is_some();
            if !free {
                break;
            }
            let slot = self.pick_opponent(cmd, &frame)?;
            log::info!("{}: fighting slot {slot}", data.name);
            self.compete(cmd, slot)?;
            rounds += 1;
            cmd.device.clear_input_history();
            cmd.device.clear_stuck_detector();
            let gap = cmd.settings.timing.round_gap_ms;
            cmd.device.sleep(Duration::from_millis(gap));
        }

        log::info!("{}: done after {rounds} rounds", data.name);
        Ok(if rounds == 0 {
            TaskOutcome::Nothing
        } else {
            TaskOutcome::Completed
        })
    }

    /// Tap into the lobby from the ark arena hub
    ///
    /// Returns false when the season-break banner shows up instead.
    fn enter_lobby<D: Device>(&self, cmd: &mut Commander<D>) -> Result<bool, TaskError> {
        let data = self.mode.data();
        let check = data.check;
        let verdict = ActionLoop::new(data.name, move |dev, frame, _| {
            dev.locate(&check, frame, LocateOpts::default().with_offset(10))
                .is_some()
        })
        .with_confirm(Timer::from_millis(2000).with_count(3))
        .with_failure("next-season", |dev, frame, _| {
            dev.locate(&NEXT_SEASON, frame, LocateOpts::default().with_offset(50))
                .is_some()
        })
        .with_rule(Rule::tap_on_with(
            data.enter,
            Timer::from_millis(5000),
            LocateOpts::default().with_offset(30),
        ))
        .with_pass_limit(FIGHT_PASSES)
        .run(&mut cmd.device, &mut (), None)?;

        match verdict {
            Verdict::Success => Ok(true),
            Verdict::Failed(_) => Ok(false),
            Verdict::TimedOut => Err(TaskError::Stalled { task: data.name }),
        }
    }

    /// Best-effort read of our own power, for the logs
    fn log_own_power<D: Device>(&self, cmd: &mut Commander<D>) {
        let data = self.mode.data();
        let style = DigitStyle::new(SELF_LETTER, DIGIT_THRESHOLD, data.model);
        let read = cmd
            .device
            .capture()
            .and_then(|frame| cmd.device.read_number(&frame, OWN_POWER, style));
        match read {
            Ok(power) => log::info!("{}: own power {power}", data.name),
            Err(err) => log::debug!("{}: own power unreadable: {err}", data.name),
        }
    }

    /// Choose an opponent row from the lobby frame
    ///
    /// A row field that will not read on this frame just leaves the
    /// candidate without that attribute; device faults abort.
    fn pick_opponent<D: Device>(
        &self,
        cmd: &mut Commander<D>,
        frame: &Frame,
    ) -> Result<usize, TaskError> {
        let data = self.mode.data();
        let selection = &cmd.settings.opponent_selection;
        if !selection.enable {
            return Ok(DEFAULT_SLOT);
        }
        let strategy: Strategy = selection.selection_strategy.parse()?;
        let mut dims: Vec<ScoreDimension> = selection
            .sorting_weight
            .iter()
            .map(|(name, weight)| {
                if name == RANKING {
                    ScoreDimension::inverted(name.clone(), *weight)
                } else {
                    ScoreDimension::new(name.clone(), *weight)
                }
            })
            .collect();
        // Map order is arbitrary; fix it so float summation is too
        dims.sort_by(|a, b| a.name.cmp(&b.name));

        let mut candidates = Vec::with_capacity(data.fields.len());
        for (i, fields) in data.fields.iter().enumerate() {
            let slot = i + 1;
            let mut candidate = Candidate::new(slot);
            let mut reads = vec![
                (POWER, fields.power, POWER_LETTER),
                (COMMANDER_LEVEL, fields.commander_level, LEVEL_LETTER),
                (SYNCHRO_LEVEL, fields.synchro_level, SYNCHRO_LETTER),
            ];
            match fields.ranking {
                Some(area) => reads.push((RANKING, area, POWER_LETTER)),
                // Rows are already rank-ordered top to bottom
                None => candidate = candidate.with_attr(RANKING, slot as i64),
            }
            for (name, area, letter) in reads {
                let style = DigitStyle::new(letter, DIGIT_THRESHOLD, data.model);
                match cmd.device.read_number(frame, area, style) {
                    Ok(value) => candidate = candidate.with_attr(name, value),
                    Err(DeviceError::Recognizer(err)) => {
                        log::warn!("{}: slot {slot} {name} unreadable: {err}", data.name);
                    }
                    Err(other) => return Err(other.into()),
                }
            }
            candidates.push(candidate);
        }

        let slot = select(&candidates, &dims, strategy)?;
        Ok(slot)
    }

    /// Fight one round against `slot` and ride it back to the lobby
    fn compete<D: Device>(&self, cmd: &mut Commander<D>, slot: usize) -> Result<(), TaskError> {
        let data = self.mode.data();
        let check = data.check;
        let slot_zone = data.slots[slot - 1];
        let mut round = Round { settled: false };
        let mut slot_jitter = Jitter::new();
        let mut into_jitter = Jitter::new();
        let mut end_jitter = Jitter::new();

        let verdict = ActionLoop::new("arena-round", move |dev, frame, round: &Round| {
            round.settled
                && dev
                    .locate(&check, frame, LocateOpts::default().with_offset(10))
                    .is_some()
        })
        .with_confirm(Timer::from_millis(1000).with_count(5))
        .with_failure("operation-failed", |dev, frame, _| {
            dev.locate(&OPERATION_FAILED_CHECK, frame, LocateOpts::default())
                .is_some()
        })
        .with_rule(Rule::new(
            "pick-slot",
            Timer::from_millis(5000),
            move |dev, frame, round: &Round| {
                !round.settled
                    && dev
                        .locate(&check, frame, LocateOpts::default().with_offset(10))
                        .is_some()
            },
            move |dev, _, _| {
                let (x, y) = slot_jitter.point_in(slot_zone);
                dev.tap(x, y)?;
                let pause = slot_jitter.settle();
                dev.sleep(pause);
                Ok(())
            },
        ))
        .with_rule(Rule::tap_on_with(
            SKIP,
            Timer::from_millis(1000),
            LocateOpts::default().with_offset(5),
        ))
        .with_rule(Rule::new(
            "into-competition",
            Timer::from_millis(5000),
            move |dev, frame, round: &Round| {
                !round.settled
                    && dev
                        .locate(&INTO_COMPETITION, frame, LocateOpts::default().with_offset(30))
                        .is_some()
            },
            move |dev, frame, _| {
                if let Some(rect) =
                    dev.locate(&INTO_COMPETITION, frame, LocateOpts::default().with_offset(30))
                {
                    let (x, y) = into_jitter.point_in(rect);
                    dev.tap(x, y)?;
                    let pause = into_jitter.settle();
                    dev.sleep(pause);
                }
                Ok(())
            },
        ))
        .with_rule(Rule::new(
            "end-competition",
            Timer::from_millis(2000),
            |dev, frame, _: &Round| {
                dev.locate(&END_COMPETITION, frame, LocateOpts::default().with_offset(5))
                    .is_some()
            },
            move |dev, _, round| {
                let (x, y) = end_jitter.point_in(DISMISS);
                dev.tap(x, y)?;
                round.settled = true;
                Ok(())
            },
        ))
        .with_pass_limit(FIGHT_PASSES)
        .run(&mut cmd.device, &mut round, None)?;

        match verdict {
            Verdict::Success => Ok(()),
            Verdict::Failed(_) => {
                log::warn!("{}: operation failed, backing out", data.name);
                cmd.ensure(PAGES.arena)?;
                Err(TaskError::OperationFailed { task: data.name })
            }
            Verdict::TimedOut => Err(TaskError::Stalled { task: data.name }),
        }
    }
}
