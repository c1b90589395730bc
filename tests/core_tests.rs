//! Integration tests for clichess core infrastructure
//!
//! Covers the path from command-line flags to a session configuration and
//! the consume-once contract of the recovery file.

mod common;

use std::time::Duration;

use clap::Parser;
use clichess::core::{Autosave, Cli, Console, RecoveryStore, AUTOSAVE_FILE};
use clichess::game::{PlayAs, Roles, START_FEN};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shakmaty::Color;

use common::{position_after, temp_autosave};

#[test]
fn test_cli_to_session_config() {
    let cli = Cli::try_parse_from(["clichess", "-b", "-t", "2.5", "-d", "12", "-p", "1"]).unwrap();
    let config = cli.session_config();

    assert!(config.show_board);
    assert_eq!(config.limit.time, Duration::from_millis(2500));
    assert_eq!(config.limit.depth, 12);
    assert_eq!(config.limit.go_command(), "go movetime 2500 depth 12");
    assert_eq!(config.play_as, PlayAs::White);
    assert_eq!(config.load, None);
}

#[test]
fn test_play_flag_fixes_human_colour() {
    //! `--play 1` always gives the human White, `--play 2` always Black,
    //! whatever the random source says.

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let white = Cli::try_parse_from(["clichess", "--play", "1"]).unwrap();
        let black = Cli::try_parse_from(["clichess", "--play", "2"]).unwrap();
        let white = Roles::assign(white.session_config().play_as, &mut rng);
        let black = Roles::assign(black.session_config().play_as, &mut rng);
        assert_eq!(white.human_color(), Color::White);
        assert_eq!(black.human_color(), Color::Black);
    }
}

#[test]
fn test_default_recovery_location() {
    let autosave = Autosave::default_location();
    assert_eq!(autosave.store(), &RecoveryStore::new(AUTOSAVE_FILE));
    assert_eq!(AUTOSAVE_FILE, "autosave.chess");
}

#[test]
fn test_recovery_record_is_consumed_once() {
    //! After `save(P)` and an accepted `maybe_load`, the loaded position
    //! serializes like `P`; an immediate second `maybe_load` yields nothing
    //! and the file stays gone.

    let autosave = temp_autosave("consume-once");
    let saved = position_after(&["g1f3", "d7d5", "g2g3"]);
    autosave.save(&saved).unwrap();

    let mut console = Console::scripted(["Y", "y"], Vec::new());
    let first = autosave.maybe_load(&mut console).unwrap();
    assert_eq!(first.map(|p| p.to_fen()), Some(saved.to_fen()));
    assert!(!autosave.store().exists());

    let second = autosave.maybe_load(&mut console).unwrap();
    assert!(second.is_none());
    assert!(!autosave.store().exists());
}

#[test]
fn test_fresh_start_record_is_deleted_without_prompt() {
    let autosave = temp_autosave("fresh");
    autosave.store().write(START_FEN).unwrap();

    let mut console = Console::scripted(["y"], Vec::new());
    assert!(autosave.maybe_load(&mut console).unwrap().is_none());
    assert!(console.output().is_empty());
    assert!(!autosave.store().exists());
}
