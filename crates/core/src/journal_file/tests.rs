use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::game::Game;
use crate::replay::replay_to_end;
use crate::types::TickInput;

fn tick(move_x: f32) -> InputPayload {
    InputPayload::Tick { dt: 0.016, input: TickInput { move_x, ..TickInput::default() } }
}

fn fresh_writer(path: &Path) -> JournalWriter {
    JournalWriter::create(path, &InputJournal::new(1, SimConfig::default())).unwrap()
}

#[test]
fn header_and_records_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip.jsonl");
    let mut header = InputJournal::new(42, SimConfig { difficulty: 1.25, ..SimConfig::default() });
    header.build_id = "test-build".to_string();

    let mut writer = JournalWriter::create(&path, &header).unwrap();
    writer.append(&tick(1.0)).unwrap();
    writer.append(&InputPayload::Continue).unwrap();
    writer.append(&InputPayload::Restart).unwrap();
    assert_eq!(writer.next_seq(), 3);

    let loaded = load_journal_from_file(&path).unwrap();
    assert_eq!(loaded.format_version, 1);
    assert_eq!(loaded.build_id, "test-build");
    assert_eq!(loaded.seed, 42);
    assert_eq!(loaded.config.difficulty, 1.25);
    assert_eq!(loaded.inputs.len(), 3);
    assert_eq!(loaded.inputs[0].payload, tick(1.0));
    assert_eq!(loaded.inputs[1].payload, InputPayload::Continue);
    assert_eq!(loaded.inputs[2].seq, 2);
}

#[test]
fn every_record_links_to_the_digest_before_it() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("links.jsonl");
    let mut writer = fresh_writer(&path);
    writer.append(&tick(0.25)).unwrap();
    writer.append(&tick(-0.25)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> =
        content.lines().skip(1).map(|line| serde_json::from_str(line).unwrap()).collect();

    assert_eq!(records[0]["prev"], CHAIN_ROOT);
    assert_eq!(records[1]["prev"], records[0]["digest"]);
    assert_ne!(records[0]["digest"], records[1]["digest"]);
}

#[test]
fn saved_journal_loads_back_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("saved.jsonl");
    let mut journal = InputJournal::new(8, SimConfig::default());
    for step in 0..20 {
        let input = TickInput { move_y: step as f32 / 20.0, ..TickInput::default() };
        journal.append_tick(0.05, input);
    }
    journal.append_continue();

    save_journal_to_file(&path, &journal).unwrap();

    assert_eq!(load_journal_from_file(&path).unwrap(), journal);
}

#[test]
fn nan_frame_survives_the_file_and_replays_like_the_live_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nan.jsonl");
    let walk = TickInput { move_x: 1.0, ..TickInput::default() };
    let frames = [
        (0.02, walk),
        (f32::NAN, walk),
        (0.02, TickInput { move_y: f32::NAN, ..walk }),
        (f32::INFINITY, walk),
        (0.02, walk),
    ];

    let mut live = Game::new(3, SimConfig::default()).unwrap();
    let mut journal = InputJournal::new(3, SimConfig::default());
    for (dt, input) in frames {
        live.tick(dt, &input);
        journal.append_tick(dt, input);
    }
    save_journal_to_file(&path, &journal).unwrap();

    let loaded = load_journal_from_file(&path).unwrap();
    assert_eq!(loaded, journal);
    let replayed = replay_to_end(&loaded).unwrap();
    assert_eq!(replayed.final_tick, live.current_tick());
    assert_eq!(replayed.final_snapshot_hash, live.snapshot_hash());
}

#[test]
fn writer_stores_non_finite_payloads_in_loadable_form() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("raw_nan.jsonl");
    let mut writer = fresh_writer(&path);
    let stuck = TickInput { move_x: f32::NEG_INFINITY, move_y: 1.0, ..TickInput::default() };
    writer.append(&InputPayload::Tick { dt: f32::NAN, input: stuck }).unwrap();

    let loaded = load_journal_from_file(&path).unwrap();

    let centered = TickInput { move_x: 0.0, move_y: 0.0, ..stuck };
    assert_eq!(loaded.inputs[0].payload, InputPayload::Tick { dt: 0.0, input: centered });
}

#[test]
fn hash_chain_detects_tampered_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tampered.jsonl");
    let mut writer = fresh_writer(&path);
    writer.append(&tick(0.5)).unwrap();
    writer.append(&InputPayload::Continue).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    assert!(lines.len() >= 3, "expected header + 2 records");
    lines[2] = lines[2].replace("Continue", "Restart");
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::HashChainBroken { line: 3 })),
        "expected hash chain broken at line 3, got: {result:?}"
    );
}

#[test]
fn hash_chain_detects_deleted_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deleted.jsonl");
    let mut writer = fresh_writer(&path);
    for i in 0..3 {
        writer.append(&tick(i as f32)).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    fs::write(&path, format!("{}\n{}\n{}\n", lines[0], lines[1], lines[3])).unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(
            result,
            Err(JournalLoadError::HashChainBroken { .. })
                | Err(JournalLoadError::InvalidRecord { .. })
        ),
        "expected chain corruption error, got: {result:?}"
    );
}

#[test]
fn truncated_last_line_returns_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.jsonl");
    let mut writer = fresh_writer(&path);
    writer.append(&tick(1.0)).unwrap();

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "{{\"seq\":1,\"payl").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::IncompleteLine { line: 3 })),
        "expected incomplete line at line 3, got: {result:?}"
    );
}

#[test]
fn empty_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.jsonl");
    fs::write(&path, "").unwrap();

    assert!(matches!(load_journal_from_file(&path), Err(JournalLoadError::EmptyFile)));
}

#[test]
fn header_only_file_loads_empty_journal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("header_only.jsonl");

    let _writer =
        JournalWriter::create(&path, &InputJournal::new(555, SimConfig::default())).unwrap();

    let loaded = load_journal_from_file(&path).unwrap();
    assert_eq!(loaded.seed, 555);
    assert!(loaded.inputs.is_empty());
}

#[test]
fn invalid_header_returns_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad_header.jsonl");
    fs::write(&path, "not valid json\n").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::InvalidHeader { line: 1, .. })),
        "expected invalid header error, got: {result:?}"
    );
}
