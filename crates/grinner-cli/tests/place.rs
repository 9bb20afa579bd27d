use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};

const U: f64 = 19.05;

fn grinner(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_grinner"))
        .args(args)
        .output()
        .expect("run grinner")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn write_board(path: &Path, locked: Option<&str>) {
    let mut footprints: Vec<Value> = (1..=5)
        .map(|n| {
            json!({
                "reference": format!("SW{n}"),
                "library": "Switch_MX_1u",
                "position": [100.0 + f64::from(n - 1) * U, 50.0],
                "rotation": 0.0,
                "selected": true,
                "locked": locked == Some(format!("SW{n}").as_str()),
            })
        })
        .collect();
    footprints.push(json!({
        "reference": "D1",
        "position": [0.0, 0.0],
        "selected": true,
    }));
    let board = json!({ "title": "test", "footprints": footprints });
    std::fs::write(path, serde_json::to_string_pretty(&board).unwrap()).unwrap();
}

fn read_board(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn footprint<'a>(board: &'a Value, reference: &str) -> &'a Value {
    board["footprints"]
        .as_array()
        .unwrap()
        .iter()
        .find(|fp| fp["reference"] == reference)
        .unwrap()
}

fn pos(board: &Value, reference: &str) -> (f64, f64) {
    let p = &footprint(board, reference)["position"];
    (p[0].as_f64().unwrap(), p[1].as_f64().unwrap())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn preview_json_hangs_the_middle_key() {
    let out = grinner(&["preview", "1u", "1u", "1u", "1u", "1u", "--sag", "5", "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    let placements = v["placements"].as_array().unwrap();
    assert_eq!(placements.len(), 5);
    assert_eq!(placements[0]["role"], "flat_left");
    assert_eq!(placements[4]["role"], "flat_right");
    assert!(close(placements[2]["y_mm"].as_f64().unwrap(), 5.0));
    assert!(close(placements[0]["y_mm"].as_f64().unwrap(), 0.0));
    assert!(placements[1]["rotation_deg"].as_f64().unwrap() > 0.0);
    assert_eq!(v["params"]["sag_mm"], 5.0);
}

#[test]
fn place_then_reopen_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let board = dir.path().join("board.json");
    let placed = dir.path().join("placed.json");
    write_board(&board, None);

    let out = grinner(&[
        "place",
        path_str(&board),
        "--sag",
        "10",
        "--output",
        path_str(&placed),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("placed 5 of 5 keys"));

    let v = read_board(&placed);
    assert_eq!(v["title"], "test");
    let (x1, y1) = pos(&v, "SW1");
    assert!(close(x1, 100.0) && close(y1, 50.0));
    let (x3, y3) = pos(&v, "SW3");
    assert!(close(x3, 100.0 + 2.0 * U));
    assert!(close(y3, 60.0));
    assert_eq!(pos(&v, "D1"), (0.0, 0.0));
    assert!(footprint(&v, "SW1")["fields"]["grinner_params"].is_string());
    assert!(footprint(&v, "SW2").get("fields").is_none());
    // Input board untouched when --output is given.
    assert_eq!(pos(&read_board(&board), "SW3"), (100.0 + 2.0 * U, 50.0));

    let out = grinner(&["rows", path_str(&placed)]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("SW1〜SW5 (5 keys)"));

    // Re-open in place with a shallower sag; the saved profile and flats carry over.
    let out = grinner(&["place", path_str(&placed), "--reopen", "SW1", "--sag", "4"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let v = read_board(&placed);
    let (_, y3) = pos(&v, "SW3");
    assert!(close(y3, 54.0));

    let field = footprint(&v, "SW1")["fields"]["grinner_params"]
        .as_str()
        .unwrap()
        .to_string();
    let out = grinner(&["decode", &field]);
    assert!(out.status.success());
    let decoded: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(decoded["params"]["sag_mm"], 4.0);
    assert_eq!(decoded["row_name"], "SW1〜SW5");
    assert_eq!(decoded["widths"], json!([1.0, 1.0, 1.0, 1.0, 1.0]));
}

#[test]
fn dry_run_leaves_board_alone() {
    let dir = tempfile::tempdir().unwrap();
    let board = dir.path().join("board.json");
    write_board(&board, None);
    let before = std::fs::read_to_string(&board).unwrap();

    let out = grinner(&["place", path_str(&board), "--dry-run"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("SW3"));
    assert_eq!(std::fs::read_to_string(&board).unwrap(), before);
}

#[test]
fn locked_switch_is_a_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    let board = dir.path().join("board.json");
    write_board(&board, Some("SW3"));
    let before = std::fs::read_to_string(&board).unwrap();

    let out = grinner(&["place", path_str(&board)]);
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("2 of 5 footprints updated before SW3"), "{stderr}");
    assert_eq!(std::fs::read_to_string(&board).unwrap(), before);
}

#[test]
fn single_selected_switch_is_not_a_row() {
    let dir = tempfile::tempdir().unwrap();
    let board = dir.path().join("board.json");
    let one = json!({ "footprints": [
        { "reference": "SW1", "position": [0.0, 0.0], "selected": true },
        { "reference": "SW2", "position": [19.05, 0.0], "selected": false }
    ]});
    std::fs::write(&board, one.to_string()).unwrap();
    let out = grinner(&["place", path_str(&board)]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("at least 2 keys"));
}

#[test]
fn decodes_legacy_fields() {
    let legacy = r#"{"sag": 20, "end_flat": 1, "profile": "cosine", "use_asymmetric_curve": false,
        "footprints": ["SW1", "SW2", "SW3"], "row_name": "SW1〜SW3", "version": "2025.10.2"}"#;
    let out = grinner(&["decode", legacy]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["params"]["flat_left"], 1);
    assert_eq!(v["params"]["flat_right"], 1);
    assert_eq!(v["row_name"], "SW1〜SW3");
}
