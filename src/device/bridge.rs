//! JNI function exports for the Android host
//!
//! Called from Kotlin to feed frames in, drain commands out, answer
//! digit reads, and launch tasks. Commands cross the boundary packed
//! into a single `jlong` so the hot path never allocates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;

use jni::objects::{JByteArray, JClass, JString};
use jni::sys::{jboolean, jint, jlong, JNI_TRUE};
use jni::JNIEnv;
use once_cell::sync::OnceCell;

use crate::config::Settings;
use crate::device::android::{channel, AndroidDevice, AndroidLink, Command};
use crate::tasks::arena::{ArenaMode, ArenaTask};
use crate::tasks::coop::CoopTask;
use crate::Commander;

static LINK: OnceCell<AndroidLink> = OnceCell::new();
static DEVICE: Mutex<Option<AndroidDevice>> = Mutex::new(None);
static SETTINGS: Mutex<Option<Settings>> = Mutex::new(None);
static RUNNING: AtomicBool = AtomicBool::new(false);

/// Initialize the engine
///
/// Called once when the Android service starts.
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_init<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    config_json: JString<'local>,
) -> jboolean {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("Rapi"),
    );

    log::info!("initializing automation core");

    let settings = if config_json.is_null() {
        Settings::default()
    } else {
        match env.get_string(&config_json) {
            Ok(config_str) => {
                let config: String = config_str.into();
                serde_json::from_str(&config).unwrap_or_default()
            }
            Err(e) => {
                log::error!("failed to read config string: {e}");
                Settings::default()
            }
        }
    };

    let (device, link) = channel();
    if LINK.set(link).is_err() {
        log::warn!("core already initialized, ignoring");
        return JNI_TRUE;
    }
    if let Ok(mut slot) = DEVICE.lock() {
        *slot = Some(device);
    }
    if let Ok(mut slot) = SETTINGS.lock() {
        *slot = Some(settings);
    }

    log::info!("core initialized");
    JNI_TRUE
}

/// Publish a captured screen frame, RGBA bytes
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_pushFrame<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    frame_data: JByteArray<'local>,
    width: jint,
    height: jint,
) -> jboolean {
    let Some(link) = LINK.get() else {
        log::error!("core not initialized");
        return 0;
    };

    let bytes = match env.convert_byte_array(frame_data) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("failed to convert frame data: {e}");
            return 0;
        }
    };

    match link.push_frame(&bytes, width as u32, height as u32) {
        Ok(()) => JNI_TRUE,
        Err(e) => {
            log::error!("rejected frame: {e}");
            0
        }
    }
}

/// Next command for the host to execute, or 0 when idle
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_nextCommand<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jlong {
    LINK.get()
        .and_then(AndroidLink::next_command)
        .map_or(0, |cmd| encode_command(&cmd))
}

/// Command type from an encoded command
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getCommandType<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    command_type(code)
}

/// Tap X coordinate from an encoded tap
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getCommandX<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    tap_x(code)
}

/// Tap Y coordinate from an encoded tap
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getCommandY<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    tap_y(code)
}

/// Reply tag from an encoded digit read
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getReadSeq<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    read_seq(code)
}

/// Read area left edge, reference coordinates
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getReadX<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    read_x(code)
}

/// Read area top edge, reference coordinates
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getReadY<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    read_y(code)
}

/// Read area width
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getReadW<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    read_w(code)
}

/// Read area height
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_getReadH<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    code: jlong,
) -> jint {
    read_h(code)
}

/// Recognizer model id for a pending digit read
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_readModelId<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    seq: jint,
) -> JString<'local> {
    let id = LINK
        .get()
        .and_then(|link| link.read_style(seq as u8))
        .map_or("", |style| style.model.model_id());
    env.new_string(id).unwrap()
}

/// Digit color for a pending read, packed 0xRRGGBB
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_readLetter<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    seq: jint,
) -> jint {
    LINK.get()
        .and_then(|link| link.read_style(seq as u8))
        .map_or(0, |style| {
            let (r, g, b) = style.letter;
            ((r as i32) << 16) | ((g as i32) << 8) | b as i32
        })
}

/// Binarization threshold for a pending digit read
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_readThreshold<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    seq: jint,
) -> jint {
    LINK.get()
        .and_then(|link| link.read_style(seq as u8))
        .map_or(0, |style| style.threshold as i32)
}

/// Deliver a digit read result
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_postDigits<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    seq: jint,
    value: jlong,
) {
    if let Some(link) = LINK.get() {
        link.post_digits(seq as u8, value);
    }
}

/// Replace the settings used by subsequent tasks
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_updateSettings<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    settings_json: JString<'local>,
) -> jboolean {
    let settings_str: String = match env.get_string(&settings_json) {
        Ok(s) => s.into(),
        Err(_) => return 0,
    };

    let settings: Settings = match serde_json::from_str(&settings_str) {
        Ok(s) => s,
        Err(e) => {
            log::error!("failed to parse settings: {e}");
            return 0;
        }
    };

    match SETTINGS.lock() {
        Ok(mut slot) => {
            *slot = Some(settings);
            JNI_TRUE
        }
        Err(_) => 0,
    }
}

/// Launch a task on a worker thread
///
/// One task at a time; the call is rejected while one is running.
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_runTask<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    task: jint,
) -> jboolean {
    if !(task_ids::ROOKIE_ARENA..=task_ids::COOP).contains(&task) {
        log::error!("unknown task id {task}");
        return 0;
    }
    if RUNNING.swap(true, Ordering::SeqCst) {
        log::warn!("a task is already running");
        return 0;
    }

    let device = match DEVICE.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };
    let Some(device) = device else {
        log::error!("device unavailable, init first");
        RUNNING.store(false, Ordering::SeqCst);
        return 0;
    };
    let settings = match SETTINGS.lock() {
        Ok(slot) => slot.clone().unwrap_or_default(),
        Err(_) => Settings::default(),
    };

    thread::spawn(move || {
        let mut cmd = Commander::new(device, settings);
        let result = match task {
            task_ids::ROOKIE_ARENA => ArenaTask::new(ArenaMode::Rookie).run(&mut cmd),
            task_ids::SPECIAL_ARENA => ArenaTask::new(ArenaMode::Special).run(&mut cmd),
            _ => CoopTask::new().run(&mut cmd),
        };
        match result {
            Ok(outcome) => log::info!("task {task} finished: {outcome:?}"),
            Err(e) => log::error!("task {task} failed: {e}"),
        }
        if let Ok(mut slot) = DEVICE.lock() {
            *slot = Some(cmd.device);
        }
        RUNNING.store(false, Ordering::SeqCst);
    });

    JNI_TRUE
}

/// Tear the mailbox down; blocked workers bail out with a device error
///
/// The engine cannot be revived afterwards, the host restarts the
/// process to start a new session.
#[no_mangle]
pub extern "system" fn Java_io_rapi_RapiCore_stop<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    if let Some(link) = LINK.get() {
        log::info!("closing device link");
        link.close();
    }
}

/// Encode a command into a long for efficient JNI transfer
///
/// Tap format (64 bits):
/// - Bits 56-63: command type
/// - Bits 32-55: X coordinate (24 bits)
/// - Bits 8-31: Y coordinate (24 bits)
///
/// Digit read format:
/// - Bits 56-63: command type
/// - Bits 48-55: reply tag (8 bits)
/// - Bits 36-47, 24-35, 12-23, 0-11: area x, y, w, h (12 bits each)
fn encode_command(cmd: &Command) -> jlong {
    match cmd {
        Command::Tap { x, y } => {
            let kind = command_types::TAP as i64;
            (kind << 56) | ((*x as i64 & 0xFF_FFFF) << 32) | ((*y as i64 & 0xFF_FFFF) << 8)
        }
        Command::ReadDigits { seq, area, .. } => {
            let kind = command_types::READ_DIGITS as i64;
            (kind << 56)
                | ((*seq as i64) << 48)
                | ((area.x as i64 & 0xFFF) << 36)
                | ((area.y as i64 & 0xFFF) << 24)
                | ((area.w as i64 & 0xFFF) << 12)
                | (area.h as i64 & 0xFFF)
        }
    }
}

fn command_type(code: jlong) -> jint {
    ((code >> 56) & 0xFF) as jint
}

fn tap_x(code: jlong) -> jint {
    ((code >> 32) & 0xFF_FFFF) as jint
}

fn tap_y(code: jlong) -> jint {
    ((code >> 8) & 0xFF_FFFF) as jint
}

fn read_seq(code: jlong) -> jint {
    ((code >> 48) & 0xFF) as jint
}

fn read_x(code: jlong) -> jint {
    ((code >> 36) & 0xFFF) as jint
}

fn read_y(code: jlong) -> jint {
    ((code >> 24) & 0xFFF) as jint
}

fn read_w(code: jlong) -> jint {
    ((code >> 12) & 0xFFF) as jint
}

fn read_h(code: jlong) -> jint {
    (code & 0xFFF) as jint
}

/// Command type constants (must match the Kotlin side)
pub mod command_types {
    pub const NONE: i32 = 0;
    pub const TAP: i32 = 1;
    pub const READ_DIGITS: i32 = 2;
}

/// Task id constants (must match the Kotlin side)
pub mod task_ids {
    pub const ROOKIE_ARENA: i32 = 1;
    pub const SPECIAL_ARENA: i32 = 2;
    pub const COOP: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::{DigitModel, Rect};

    #[test]
    fn test_tap_encoding_round_trip() {
        let code = encode_command(&Command::Tap { x: 540, y: 960 });
        assert_eq!(command_type(code), command_types::TAP);
        assert_eq!(tap_x(code), 540);
        assert_eq!(tap_y(code), 960);
    }

    #[test]
    fn test_tap_encoding_large_coordinates() {
        // A 4K panel still fits the 24-bit fields
        let code = encode_command(&Command::Tap { x: 2160, y: 3840 });
        assert_eq!(tap_x(code), 2160);
        assert_eq!(tap_y(code), 3840);
    }

    #[test]
    fn test_read_encoding_round_trip() {
        let code = encode_command(&Command::ReadDigits {
            seq: 7,
            area: Rect::new(395, 650, 75, 25),
            model: DigitModel::ArenaNumber,
        });
        assert_eq!(command_type(code), command_types::READ_DIGITS);
        assert_eq!(read_seq(code), 7);
        assert_eq!(read_x(code), 395);
        assert_eq!(read_y(code), 650);
        assert_eq!(read_w(code), 75);
        assert_eq!(read_h(code), 25);
    }

    #[test]
    fn test_read_encoding_reference_extremes() {
        let code = encode_command(&Command::ReadDigits {
            seq: 255,
            area: Rect::new(0, 1279, 720, 1),
            model: DigitModel::Number,
        });
        assert_eq!(read_seq(code), 255);
        assert_eq!(read_x(code), 0);
        assert_eq!(read_y(code), 1279);
        assert_eq!(read_w(code), 720);
        assert_eq!(read_h(code), 1);
    }
}
