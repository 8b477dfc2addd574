//! Shared navigation anchors
//!
//! Check anchors prove which screen is up; goto anchors are the buttons
//! that move between screens. Coordinates are calibrated against the
//! 720x1280 portrait reference. Task-specific buttons live with their
//! tasks; only anchors the page graph needs are collected here.

use crate::vision::{Locator, Rect};

// Shared chrome

/// Home button shown in the top-right of most sub-screens
pub const GOTO_MAIN: Locator = Locator::fixed(
    "GOTO_MAIN",
    Rect::new(652, 36, 44, 44),
    (235, 203, 92),
    "./assets/ui/GOTO_MAIN.png",
);

/// Back arrow shown in the top-left of most sub-screens
pub const GOTO_BACK: Locator = Locator::fixed(
    "GOTO_BACK",
    Rect::new(18, 38, 40, 40),
    (222, 226, 231),
    "./assets/ui/GOTO_BACK.png",
);

/// System popup shown when an operation is rejected server-side
pub const OPERATION_FAILED_CHECK: Locator = Locator::fixed(
    "OPERATION_FAILED_CHECK",
    Rect::new(210, 586, 300, 48),
    (64, 68, 79),
    "./assets/ui/OPERATION_FAILED_CHECK.png",
);

// Main

/// Bottom command deck, only the home screen shows it
pub const MAIN_CHECK: Locator = Locator::fixed(
    "MAIN_CHECK",
    Rect::new(306, 1196, 108, 64),
    (233, 176, 62),
    "./assets/main/MAIN_CHECK.png",
);

pub const MAIN_GOTO_REWARD: Locator = Locator::fixed(
    "MAIN_GOTO_REWARD",
    Rect::new(24, 118, 64, 58),
    (96, 154, 212),
    "./assets/main/MAIN_GOTO_REWARD.png",
);

pub const MAIN_GOTO_FRIEND: Locator = Locator::fixed(
    "MAIN_GOTO_FRIEND",
    Rect::new(662, 246, 46, 46),
    (188, 196, 207),
    "./assets/main/MAIN_GOTO_FRIEND.png",
);

pub const MAIN_GOTO_DAILY: Locator = Locator::fixed(
    "MAIN_GOTO_DAILY",
    Rect::new(662, 316, 46, 46),
    (206, 162, 94),
    "./assets/main/MAIN_GOTO_DAILY.png",
);

pub const MAIN_GOTO_SHOP: Locator = Locator::fixed(
    "MAIN_GOTO_SHOP",
    Rect::new(256, 1206, 60, 54),
    (124, 134, 148),
    "./assets/main/MAIN_GOTO_SHOP.png",
);

pub const MAIN_GOTO_CASH_SHOP: Locator = Locator::fixed(
    "MAIN_GOTO_CASH_SHOP",
    Rect::new(598, 1206, 60, 54),
    (214, 120, 132),
    "./assets/main/MAIN_GOTO_CASH_SHOP.png",
);

pub const MAIN_GOTO_TEAM: Locator = Locator::fixed(
    "MAIN_GOTO_TEAM",
    Rect::new(62, 1206, 60, 54),
    (142, 150, 163),
    "./assets/main/MAIN_GOTO_TEAM.png",
);

pub const MAIN_GOTO_INVENTORY: Locator = Locator::fixed(
    "MAIN_GOTO_INVENTORY",
    Rect::new(158, 1206, 60, 54),
    (133, 141, 155),
    "./assets/main/MAIN_GOTO_INVENTORY.png",
);

pub const MAIN_GOTO_PASS: Locator = Locator::fixed(
    "MAIN_GOTO_PASS",
    Rect::new(662, 386, 46, 46),
    (120, 190, 170),
    "./assets/main/MAIN_GOTO_PASS.png",
);

pub const MAIN_GOTO_ARK: Locator = Locator::fixed(
    "MAIN_GOTO_ARK",
    Rect::new(430, 1206, 60, 54),
    (88, 118, 186),
    "./assets/main/MAIN_GOTO_ARK.png",
);

pub const MAIN_GOTO_OUTPOST: Locator = Locator::fixed(
    "MAIN_GOTO_OUTPOST",
    Rect::new(526, 1206, 60, 54),
    (110, 160, 120),
    "./assets/main/MAIN_GOTO_OUTPOST.png",
);

pub const MAIN_GOTO_MAILBOX: Locator = Locator::fixed(
    "MAIN_GOTO_MAILBOX",
    Rect::new(662, 176, 46, 46),
    (196, 184, 120),
    "./assets/main/MAIN_GOTO_MAILBOX.png",
);

pub const MAIN_GOTO_RECRUIT: Locator = Locator::fixed(
    "MAIN_GOTO_RECRUIT",
    Rect::new(636, 1108, 64, 58),
    (222, 146, 158),
    "./assets/main/MAIN_GOTO_RECRUIT.png",
);

// Reward and destroy

pub const REWARD_CHECK: Locator = Locator::fixed(
    "REWARD_CHECK",
    Rect::new(58, 92, 150, 40),
    (90, 148, 205),
    "./assets/reward/REWARD_CHECK.png",
);

pub const REWARD_GOTO_MAIN: Locator = Locator::fixed(
    "REWARD_GOTO_MAIN",
    Rect::new(652, 36, 44, 44),
    (231, 199, 88),
    "./assets/reward/REWARD_GOTO_MAIN.png",
);

pub const REWARD_GOTO_DESTROY: Locator = Locator::fixed(
    "REWARD_GOTO_DESTROY",
    Rect::new(80, 980, 260, 96),
    (158, 96, 102),
    "./assets/reward/REWARD_GOTO_DESTROY.png",
);

pub const DESTROY_CHECK: Locator = Locator::fixed(
    "DESTROY_CHECK",
    Rect::new(58, 92, 170, 40),
    (170, 88, 94),
    "./assets/destroy/DESTROY_CHECK.png",
);

pub const DESTROY_GOTO_REWARD: Locator = Locator::fixed(
    "DESTROY_GOTO_REWARD",
    Rect::new(18, 38, 40, 40),
    (224, 228, 233),
    "./assets/destroy/DESTROY_GOTO_REWARD.png",
);

// Friend, daily, shops

pub const FRIEND_CHECK: Locator = Locator::fixed(
    "FRIEND_CHECK",
    Rect::new(58, 92, 120, 40),
    (184, 192, 203),
    "./assets/friend/FRIEND_CHECK.png",
);

pub const FRIEND_GOTO_MAIN: Locator = Locator::fixed(
    "FRIEND_GOTO_MAIN",
    Rect::new(652, 36, 44, 44),
    (233, 201, 90),
    "./assets/friend/FRIEND_GOTO_MAIN.png",
);

pub const DAILY_CHECK: Locator = Locator::fixed(
    "DAILY_CHECK",
    Rect::new(58, 92, 160, 40),
    (202, 158, 90),
    "./assets/daily/DAILY_CHECK.png",
);

pub const DAILY_GOTO_MAIN: Locator = Locator::fixed(
    "DAILY_GOTO_MAIN",
    Rect::new(652, 36, 44, 44),
    (229, 197, 86),
    "./assets/daily/DAILY_GOTO_MAIN.png",
);

pub const SHOP_CHECK: Locator = Locator::fixed(
    "SHOP_CHECK",
    Rect::new(58, 92, 110, 40),
    (120, 130, 144),
    "./assets/shop/SHOP_CHECK.png",
);

pub const CASH_SHOP_CHECK: Locator = Locator::fixed(
    "CASH_SHOP_CHECK",
    Rect::new(58, 92, 180, 40),
    (210, 116, 128),
    "./assets/cash_shop/CASH_SHOP_CHECK.png",
);

// Squad screens

pub const TEAM_CHECK: Locator = Locator::fixed(
    "TEAM_CHECK",
    Rect::new(58, 92, 130, 40),
    (138, 146, 159),
    "./assets/team/TEAM_CHECK.png",
);

/// Shared by the squad family of screens, they use the same top bar
pub const TEAM_GOTO_MAIN: Locator = Locator::fixed(
    "TEAM_GOTO_MAIN",
    Rect::new(652, 36, 44, 44),
    (227, 195, 84),
    "./assets/team/TEAM_GOTO_MAIN.png",
);

pub const TEAM_GOTO_CONVERSATION: Locator = Locator::fixed(
    "TEAM_GOTO_CONVERSATION",
    Rect::new(540, 1180, 150, 70),
    (152, 188, 214),
    "./assets/team/TEAM_GOTO_CONVERSATION.png",
);

pub const INVENTORY_CHECK: Locator = Locator::fixed(
    "INVENTORY_CHECK",
    Rect::new(58, 92, 190, 40),
    (129, 137, 151),
    "./assets/inventory/INVENTORY_CHECK.png",
);

pub const PASS_CHECK: Locator = Locator::fixed(
    "PASS_CHECK",
    Rect::new(58, 92, 140, 40),
    (116, 186, 166),
    "./assets/pass/PASS_CHECK.png",
);

pub const PASS_GOTO_MAIN: Locator = Locator::fixed(
    "PASS_GOTO_MAIN",
    Rect::new(652, 36, 44, 44),
    (225, 193, 82),
    "./assets/pass/PASS_GOTO_MAIN.png",
);

pub const CONVERSATION_CHECK: Locator = Locator::fixed(
    "CONVERSATION_CHECK",
    Rect::new(58, 92, 210, 40),
    (148, 184, 210),
    "./assets/conversation/CONVERSATION_CHECK.png",
);

// Ark hub

pub const ARK_CHECK: Locator = Locator::fixed(
    "ARK_CHECK",
    Rect::new(58, 92, 100, 40),
    (84, 114, 182),
    "./assets/ark/ARK_CHECK.png",
);

pub const ARK_GOTO_TRIBE_TOWER: Locator = Locator::fixed(
    "ARK_GOTO_TRIBE_TOWER",
    Rect::new(60, 300, 280, 160),
    (104, 92, 160),
    "./assets/ark/ARK_GOTO_TRIBE_TOWER.png",
);

pub const ARK_GOTO_INTERCEPTION: Locator = Locator::fixed(
    "ARK_GOTO_INTERCEPTION",
    Rect::new(380, 300, 280, 160),
    (160, 98, 92),
    "./assets/ark/ARK_GOTO_INTERCEPTION.png",
);

pub const ARK_GOTO_SIMULATION_ROOM: Locator = Locator::fixed(
    "ARK_GOTO_SIMULATION_ROOM",
    Rect::new(60, 500, 280, 160),
    (92, 148, 160),
    "./assets/ark/ARK_GOTO_SIMULATION_ROOM.png",
);

pub const ARK_GOTO_ARENA: Locator = Locator::fixed(
    "ARK_GOTO_ARENA",
    Rect::new(380, 500, 280, 160),
    (182, 146, 88),
    "./assets/ark/ARK_GOTO_ARENA.png",
);

pub const ARK_GOTO_RANKING: Locator = Locator::fixed(
    "ARK_GOTO_RANKING",
    Rect::new(60, 700, 280, 160),
    (120, 156, 112),
    "./assets/ark/ARK_GOTO_RANKING.png",
);

// Ark destinations

pub const TRIBE_TOWER_CHECK: Locator = Locator::fixed(
    "TRIBE_TOWER_CHECK",
    Rect::new(58, 92, 200, 40),
    (100, 88, 156),
    "./assets/tribe_tower/TRIBE_TOWER_CHECK.png",
);

pub const INTERCEPTION_CHECK: Locator = Locator::fixed(
    "INTERCEPTION_CHECK",
    Rect::new(58, 92, 220, 40),
    (156, 94, 88),
    "./assets/interception/INTERCEPTION_CHECK.png",
);

pub const SPECIAL_INTERCEPTION_CHECK: Locator = Locator::fixed(
    "SPECIAL_INTERCEPTION_CHECK",
    Rect::new(58, 92, 250, 40),
    (172, 80, 96),
    "./assets/interception/SPECIAL_INTERCEPTION_CHECK.png",
);

pub const SIMULATION_ROOM_CHECK: Locator = Locator::fixed(
    "SIMULATION_ROOM_CHECK",
    Rect::new(58, 92, 230, 40),
    (88, 144, 156),
    "./assets/simulation_room/SIMULATION_ROOM_CHECK.png",
);

pub const ARENA_CHECK: Locator = Locator::fixed(
    "ARENA_CHECK",
    Rect::new(58, 92, 130, 40),
    (178, 142, 84),
    "./assets/arena/ARENA_CHECK.png",
);

pub const ARENA_GOTO_ROOKIE_ARENA: Locator = Locator::fixed(
    "ARENA_GOTO_ROOKIE_ARENA",
    Rect::new(80, 420, 560, 150),
    (96, 140, 198),
    "./assets/arena/ARENA_GOTO_ROOKIE_ARENA.png",
);

pub const ARENA_GOTO_SPECIAL_ARENA: Locator = Locator::fixed(
    "ARENA_GOTO_SPECIAL_ARENA",
    Rect::new(80, 620, 560, 150),
    (186, 112, 104),
    "./assets/arena/ARENA_GOTO_SPECIAL_ARENA.png",
);

pub const ROOKIE_ARENA_CHECK: Locator = Locator::fixed(
    "ROOKIE_ARENA_CHECK",
    Rect::new(58, 92, 210, 40),
    (92, 136, 194),
    "./assets/rookie_arena/ROOKIE_ARENA_CHECK.png",
);

pub const SPECIAL_ARENA_CHECK: Locator = Locator::fixed(
    "SPECIAL_ARENA_CHECK",
    Rect::new(58, 92, 220, 40),
    (182, 108, 100),
    "./assets/special_arena/SPECIAL_ARENA_CHECK.png",
);

pub const RANKING_CHECK: Locator = Locator::fixed(
    "RANKING_CHECK",
    Rect::new(58, 92, 160, 40),
    (116, 152, 108),
    "./assets/ranking/RANKING_CHECK.png",
);

// Outpost

pub const OUTPOST_CHECK: Locator = Locator::fixed(
    "OUTPOST_CHECK",
    Rect::new(58, 92, 160, 40),
    (106, 156, 116),
    "./assets/outpost/OUTPOST_CHECK.png",
);

pub const OUTPOST_GOTO_COMMISSION: Locator = Locator::fixed(
    "OUTPOST_GOTO_COMMISSION",
    Rect::new(420, 880, 220, 90),
    (144, 168, 130),
    "./assets/outpost/OUTPOST_GOTO_COMMISSION.png",
);

pub const COMMISSION_CHECK: Locator = Locator::fixed(
    "COMMISSION_CHECK",
    Rect::new(58, 92, 200, 40),
    (138, 162, 124),
    "./assets/commission/COMMISSION_CHECK.png",
);

pub const COMMISSION_GOTO_OUTPOST: Locator = Locator::fixed(
    "COMMISSION_GOTO_OUTPOST",
    Rect::new(18, 38, 40, 40),
    (226, 230, 235),
    "./assets/commission/COMMISSION_GOTO_OUTPOST.png",
);

// Mailbox, recruit

pub const MAILBOX_CHECK: Locator = Locator::fixed(
    "MAILBOX_CHECK",
    Rect::new(58, 92, 150, 40),
    (192, 180, 116),
    "./assets/mailbox/MAILBOX_CHECK.png",
);

pub const MAILBOX_GOTO_MAIN: Locator = Locator::fixed(
    "MAILBOX_GOTO_MAIN",
    Rect::new(652, 36, 44, 44),
    (223, 191, 80),
    "./assets/mailbox/MAILBOX_GOTO_MAIN.png",
);

pub const RECRUIT_CHECK: Locator = Locator::fixed(
    "RECRUIT_CHECK",
    Rect::new(58, 92, 140, 40),
    (218, 142, 154),
    "./assets/recruit/RECRUIT_CHECK.png",
);
