//! Rapi desktop demo
//!
//! Exercises the automation core against the scripted simulator, no
//! phone required. For a real device, build the cdylib and load it
//! from the Android host app.

use std::time::Duration;

use nikke_rapi::ai::{choose, rank, Candidate, ScoreDimension, Strategy};
use nikke_rapi::config::Settings;
use nikke_rapi::device::sim::{SimDevice, SimScreen};
use nikke_rapi::ui::assets::{
    ARENA_CHECK, ARK_CHECK, ARK_GOTO_ARENA, GOTO_BACK, GOTO_MAIN, MAIN_CHECK, MAIN_GOTO_ARK,
};
use nikke_rapi::ui::PAGES;
use nikke_rapi::Commander;

fn main() {
    println!("Rapi - screen automation core for NIKKE");
    println!("=======================================");
    println!();

    plan_route();
    println!();
    drive_simulator();
    println!();
    score_board();
}

/// Ask the page graph for a deep route and print the hops
fn plan_route() {
    let pages = &*PAGES;
    match pages.graph.route(pages.main, pages.special_arena) {
        Ok(route) => {
            println!("Planned route, main -> special arena:");
            for (i, hop) in route.iter().enumerate() {
                println!(
                    "  {}. tap {:<24} -> {}",
                    i + 1,
                    hop.trigger.name(),
                    pages.graph.get(hop.to).name
                );
            }
        }
        Err(e) => eprintln!("routing failed: {e}"),
    }
}

/// Walk a scripted three-screen game to the arena hub
fn drive_simulator() {
    let dev = SimDevice::new("main")
        .with_frame_interval(Duration::from_millis(2))
        .with_screen(
            SimScreen::new("main")
                .shows(MAIN_CHECK.name())
                .shows(MAIN_GOTO_ARK.name()),
        )
        .with_screen(
            SimScreen::new("ark")
                .shows(ARK_CHECK.name())
                .shows(ARK_GOTO_ARENA.name())
                .shows(GOTO_BACK.name()),
        )
        .with_screen(
            SimScreen::new("arena")
                .shows(ARENA_CHECK.name())
                .shows(GOTO_BACK.name())
                .shows(GOTO_MAIN.name()),
        )
        .with_link("main", MAIN_GOTO_ARK.button(), "ark", 1)
        .with_link("ark", ARK_GOTO_ARENA.button(), "arena", 1)
        .with_link("arena", GOTO_MAIN.button(), "main", 1);

    let mut cmd = Commander::new(dev, Settings::sim_preset());
    match cmd.ensure(PAGES.arena) {
        Ok(()) => println!(
            "Simulator driven to {:?} in {} taps",
            cmd.device.screen(),
            cmd.device.taps().len()
        ),
        Err(e) => eprintln!("navigation failed: {e}"),
    }
}

/// Score a hand-made opponent board and pick from it
fn score_board() {
    let board = vec![
        Candidate::new(1)
            .with_attr("Power", 183_224)
            .with_attr("Ranking", 12),
        Candidate::new(2)
            .with_attr("Power", 170_551)
            .with_attr("Ranking", 48),
        Candidate::new(3)
            .with_attr("Power", 152_003)
            .with_attr("Ranking", 95),
    ];
    let dims = vec![
        ScoreDimension::new("Power", 1.0),
        ScoreDimension::inverted("Ranking", 0.5),
    ];
    match rank(&board, &dims) {
        Ok(scored) => {
            println!("Opponent board, strongest first:");
            for (slot, score) in &scored {
                println!("  slot {slot}: {score:.3}");
            }
            match choose(&scored, Strategy::Min) {
                Some(slot) => println!("Min strategy picks slot {slot}"),
                None => eprintln!("empty board"),
            }
        }
        Err(e) => eprintln!("scoring failed: {e}"),
    }
}
