// End-to-end behaviour of the screenplay core through the public session API

use screenplay_wasm::config::EditorConfig;
use screenplay_wasm::models::{CellAddress, ColumnKey, Document, Row, Scene};
use screenplay_wasm::parse::{parse_document, serialize_document};
use screenplay_wasm::persist::{ManualClock, MemoryFileStore, SaveStatus, ScreenplaySession};
use screenplay_wasm::structure::find;
use screenplay_wasm::text::{Key, KeyInput};

type Session = ScreenplaySession<MemoryFileStore, ManualClock>;

fn open(store: MemoryFileStore, path: &str) -> (Session, ManualClock) {
    let clock = ManualClock::new(1_000);
    let mut session = ScreenplaySession::new(store, clock.clone(), EditorConfig::default());
    session.open_file(path);
    (session, clock)
}

fn sample_document() -> Document {
    let mut doc = Document::new();
    let page = &mut doc.pages[0];
    page.scenes[0].rows[0] = Row {
        heading: "INT. KITCHEN - NIGHT".into(),
        character: "MARA".into(),
        dialogue: "Who <b>left</b> the light on?".into(),
        action: String::new(),
        notes: "tense".into(),
    };
    let mut second = Scene::new(4);
    second.rows[0].action = "Rain &amp; thunder.".into();
    page.scenes.push(second);
    doc
}

#[test]
fn test_round_trip_preserves_document() {
    let doc = sample_document();
    let once = serialize_document(&doc);
    let reparsed = parse_document(&once).expect("parse serialized document");
    assert_eq!(serialize_document(&reparsed), once);
}

#[test]
fn test_collapsed_flags_reset_on_reload() {
    let mut doc = sample_document();
    doc.pages[0].scenes[1].collapsed = true;
    let reparsed = parse_document(&serialize_document(&doc)).unwrap();
    assert!(reparsed.pages[0].scenes.iter().all(|s| !s.collapsed));
}

#[test]
fn test_trailing_garbage_is_recovered() {
    let doc = sample_document();
    let damaged = format!("{}\n}}, \"x\": 1 }}garbage", serialize_document(&doc));
    assert_eq!(parse_document(&damaged), Some(doc));
}

#[test]
fn test_legacy_scenes_are_migrated() {
    let legacy = r#"{
        "format": "screenplay",
        "scenes": [
            { "scene": 1, "rows": [ { "heading": "EXT. PIER", "character": "", "dialogue": "", "action": "", "notes": "" } ] },
            { "scene": 3, "rows": [ { "heading": "", "character": "JO", "dialogue": "Hey.", "action": "", "notes": "" } ] }
        ]
    }"#;
    let doc = parse_document(legacy).unwrap();
    assert_eq!(doc.version, 2);
    assert_eq!(doc.pages.len(), 1);
    assert_eq!(doc.pages[0].name, "Page 1");
    let numbers: Vec<u32> = doc.pages[0].scenes.iter().map(|s| s.scene).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(doc.pages[0].scenes[1].rows[0].dialogue, "Hey.");
}

#[test]
fn test_last_row_survives_delete() {
    let (mut session, _) = open(MemoryFileStore::new(), "a.screenplay");
    assert!(session.delete_row(0, 0).is_err());
    assert_eq!(session.document().pages[0].scenes[0].rows.len(), 1);
}

#[test]
fn test_deleting_only_scene_resets_it() {
    let (mut session, _) = open(MemoryFileStore::new(), "a.screenplay");
    session
        .edit_cell(CellAddress::new(0, 0, ColumnKey::Action), "something")
        .unwrap();
    session.request_delete_scene(0).unwrap();
    session.confirm_pending().unwrap();

    let scenes = &session.document().pages[0].scenes;
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].scene, 1);
    assert_eq!(scenes[0].rows, vec![Row::default()]);
}

#[test]
fn test_down_twice_from_bottom_creates_two_rows() {
    let (mut session, _) = open(MemoryFileStore::new(), "a.screenplay");
    session.add_scene();
    session.select(1, 0, ColumnKey::Notes);

    let first = session.handle_key(KeyInput::plain(Key::ArrowDown)).selected.unwrap();
    let second = session.handle_key(KeyInput::plain(Key::Enter)).selected.unwrap();

    assert_eq!(first, CellAddress::new(1, 1, ColumnKey::Notes));
    assert_eq!(second.row_index, first.row_index + 1);
    assert!(second.resolves_in(&session.document().pages[0]));
    assert_eq!(session.document().pages[0].scenes[1].rows.len(), 3);
}

#[test]
fn test_three_line_paste_fills_scene() {
    let (mut session, _) = open(MemoryFileStore::new(), "a.screenplay");
    session
        .edit_cell(CellAddress::new(0, 0, ColumnKey::Notes), "keep me")
        .unwrap();
    session.select(0, 0, ColumnKey::Heading);

    let clipboard = "INT. HALL\tMARA\tHello\r\n\tJO\tHi\r\n\t\t\tDoor slams\r\n";
    assert_eq!(session.paste(clipboard), Ok(Some(3)));

    let rows = &session.document().pages[0].scenes[0].rows;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].heading, "INT. HALL");
    assert_eq!(rows[0].dialogue, "Hello");
    assert_eq!(rows[0].notes, "keep me");
    assert_eq!(rows[1].character, "JO");
    assert_eq!(rows[2].action, "Door slams");
}

#[test]
fn test_search_order_and_wrap_across_pages() {
    let (mut session, _) = open(MemoryFileStore::new(), "a.screenplay");
    session
        .edit_cell(CellAddress::new(0, 0, ColumnKey::Notes), "x marks")
        .unwrap();
    session
        .edit_cell(CellAddress::new(0, 0, ColumnKey::Heading), "EXT. BOX")
        .unwrap();
    session.add_page(None);
    session.append_row(0).unwrap();
    session
        .edit_cell(CellAddress::new(0, 1, ColumnKey::Character), "XAVIER")
        .unwrap();

    let matches = find(session.document(), "x");
    let order: Vec<(usize, usize, usize, ColumnKey)> = matches
        .iter()
        .map(|m| (m.page_index, m.scene_index, m.row_index, m.column_key))
        .collect();
    assert_eq!(
        order,
        vec![
            (0, 0, 0, ColumnKey::Heading),
            (0, 0, 0, ColumnKey::Notes),
            (1, 0, 1, ColumnKey::Character),
        ]
    );

    assert_eq!(session.search("x"), 3);
    let first = session.next_match().unwrap();
    session.next_match();
    session.next_match();
    assert_eq!(session.next_match(), Some(first));
    assert_eq!(session.current_page(), 0);
}

#[test]
fn test_scene_numbers_are_stable() {
    let (mut session, _) = open(MemoryFileStore::new(), "a.screenplay");
    session.add_scene();
    session.add_scene();
    session.request_delete_scene(1).unwrap();
    session.confirm_pending().unwrap();

    let numbers = |s: &Session| -> Vec<u32> {
        s.document().pages[0].scenes.iter().map(|sc| sc.scene).collect()
    };
    assert_eq!(numbers(&session), vec![1, 3]);
    assert_eq!(session.add_scene(), (2, 4));
    assert_eq!(numbers(&session), vec![1, 3, 4]);
}

#[test]
fn test_debounced_and_structural_writes_reach_store() {
    let (mut session, clock) = open(MemoryFileStore::new(), "a.screenplay");
    for text in ["M", "MA", "MAR", "MARA"] {
        session
            .edit_cell(CellAddress::new(0, 0, ColumnKey::Character), text)
            .unwrap();
        clock.advance(50);
    }
    assert_eq!(session.store().write_count(), 0);
    clock.advance(300);
    assert!(session.poll());
    assert_eq!(session.store().write_count(), 1);

    session.insert_row_after(0, 0).unwrap();
    assert_eq!(session.store().write_count(), 2);
    assert_eq!(session.status(), SaveStatus::Saved);

    let saved = parse_document(session.store().get("a.screenplay").unwrap()).unwrap();
    assert_eq!(saved.pages[0].scenes[0].rows.len(), 2);
    assert_eq!(saved.pages[0].scenes[0].rows[0].character, "MARA");
}

#[test]
fn test_file_switch_flushes_and_reopen_restores() {
    let (mut session, _) = open(MemoryFileStore::new(), "a.screenplay");
    session
        .edit_cell(CellAddress::new(0, 0, ColumnKey::Dialogue), "unsaved line")
        .unwrap();
    session.open_file("b.screenplay");
    session.open_file("a.screenplay");
    assert_eq!(session.document().pages[0].scenes[0].rows[0].dialogue, "unsaved line");
}

#[test]
fn test_native_store_session_survives_reopen() {
    use screenplay_wasm::persist::{FsFileStore, SystemClock};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pilot.screenplay");
    let path = path.to_str().unwrap();

    let mut session = ScreenplaySession::new(FsFileStore::new(), SystemClock::default(), EditorConfig::default());
    session.open_file(path);
    session.add_page(Some("Cold Open"));
    session
        .edit_cell(CellAddress::new(0, 0, ColumnKey::Heading), "EXT. HIGHWAY - NIGHT")
        .unwrap();
    session.close_file();

    let mut reopened = ScreenplaySession::new(FsFileStore::new(), SystemClock::default(), EditorConfig::default());
    reopened.open_file(path);
    let doc = reopened.document();
    assert_eq!(doc.pages.len(), 2);
    assert_eq!(doc.pages[1].name, "Cold Open");
    assert_eq!(doc.pages[1].scenes[0].rows[0].heading, "EXT. HIGHWAY - NIGHT");
}

#[test]
fn test_yaml_config_drives_debounce() {
    let config = EditorConfig::from_yaml("debounceMs: 50\ndefaultPageName: Draft\n").unwrap();
    let clock = ManualClock::new(0);
    let mut session = ScreenplaySession::new(MemoryFileStore::new(), clock.clone(), config);
    session.open_file("y.screenplay");
    assert_eq!(session.document().pages[0].name, "Draft");

    session
        .edit_cell(CellAddress::new(0, 0, ColumnKey::Action), "waits")
        .unwrap();
    clock.advance(50);
    assert!(session.poll());
    assert_eq!(session.store().write_count(), 1);
}
