//! Integration tests against a tiny shell-script engine.
//!
//! The script is run through `sh` so the tests do not depend on any real
//! chess engine being installed.
#![cfg(unix)]

use std::fs;
use std::process::Command;
use std::time::Duration;

use tempfile::TempDir;
use uci_client::{UciClient, UciError};

const SCRIPTED_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci)
      echo "id name Scripted Engine"
      echo "id author Test Suite"
      echo "option name Hash type spin default 16 min 1 max 32"
      echo "uciok"
      ;;
    isready) echo "readyok" ;;
    "position startpos") last="startpos" ;;
    position*) last="moves" ;;
    go*)
      echo "info depth 1 score cp 20"
      if [ "$last" = "startpos" ]; then
        echo "bestmove e2e4 ponder e7e5"
      else
        echo "bestmove g8f6"
      fi
      ;;
    quit) exit 0 ;;
  esac
done
"#;

const SILENT_ENGINE: &str = r#"
read -r line
exit 0
"#;

fn spawn_script(dir: &TempDir, body: &str) -> UciClient {
    let path = dir.path().join("engine.sh");
    fs::write(&path, body).expect("Failed to write engine script");
    let mut command = Command::new("sh");
    command.arg(&path);
    UciClient::spawn_command(command).expect("Failed to spawn sh")
}

#[test]
fn test_handshake_reports_identification() {
    let dir = TempDir::new().unwrap();
    let mut client = spawn_script(&dir, SCRIPTED_ENGINE);

    let id = client.init().expect("Handshake failed");

    assert_eq!(id.name, "Scripted Engine");
    assert_eq!(id.author, "Test Suite");
    assert_eq!(client.id(), &id);
    assert!(client.is_alive());
}

#[test]
fn test_best_move_from_start_and_after_moves() {
    let dir = TempDir::new().unwrap();
    let mut client = spawn_script(&dir, SCRIPTED_ENGINE);
    client.init().unwrap();

    let first = client
        .best_move(None, &[], Duration::from_millis(1))
        .expect("No move from start position");
    assert_eq!(first, "e2e4");

    let reply = client
        .best_move(None, &["e2e4".to_string()], Duration::from_millis(1))
        .expect("No reply move");
    assert_eq!(reply, "g8f6");
}

#[test]
fn test_quit_stops_the_process() {
    let dir = TempDir::new().unwrap();
    let mut client = spawn_script(&dir, SCRIPTED_ENGINE);
    client.init().unwrap();

    client.quit().unwrap();

    assert!(!client.is_alive());
}

#[test]
fn test_engine_that_hangs_up_is_disconnected() {
    let dir = TempDir::new().unwrap();
    let mut client = spawn_script(&dir, SILENT_ENGINE);

    match client.init() {
        Err(UciError::Disconnected) | Err(UciError::Io(_)) => {}
        other => panic!("Expected a disconnect, got {other:?}"),
    }
}
