mod common;

use common::*;
use core_actions::EditSettings;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::EditorMode;
use pretty_assertions::assert_eq;

const PYTHON: &str = "def foo():\n    print(\"hello\")\n    x = 1\n    return x\n";

#[test]
fn backspace_in_command_mode_only_moves_left() {
    let mut st = fixture_session("basic_python.py");
    st.buffer.cursor_mut().to_pos(pos(1, 3));
    let before = line_text(&st, 1);

    press(&mut st, KeyEvent::plain(KeyCode::Backspace));

    assert_eq!(cursor(&st), pos(1, 2));
    assert_eq!(line_text(&st, 1), before);
    assert!(st.buffer.history().is_empty());
}

#[test]
fn dd_on_last_line_lands_on_previous_line() {
    let mut st = fixture_session("basic_python.py");
    st.buffer.cursor_mut().to_last_line();
    let last = cursor(&st).line;
    let second_to_last = line_text(&st, last - 1);

    replay(&mut st, "dd");

    assert_eq!(cursor(&st).line, last - 1);
    assert_eq!(line_text(&st, cursor(&st).line), second_to_last);
    assert_eq!(st.mode(), EditorMode::Command);
}

#[test]
fn shift_j_joins_without_a_chord() {
    let mut st = fixture_session("basic_python.py");
    assert_eq!(num_lines(&st), 4);

    press(
        &mut st,
        KeyEvent::new(KeyCode::Char('j'), KeyModifiers::SHIFT),
    );

    assert_eq!(num_lines(&st), 3);
    assert_eq!(line_text(&st, 1), "def foo():    print(\"hello\")\n");
    replay(&mut st, "u");
    assert_eq!(text(&st), PYTHON);
}

#[test]
fn delete_chord_waits_for_confirmation() {
    let mut st = fixture_session("basic_python.py");
    replay(&mut st, "dx");
    assert_eq!(st.mode(), EditorMode::Delete);
    assert_eq!(num_lines(&st), 4);

    replay(&mut st, "<Esc>");
    assert_eq!(st.mode(), EditorMode::Command);
    assert_eq!(text(&st), PYTHON);
    assert!(st.buffer.history().is_empty());
}

#[test]
fn directional_key_inside_chord_keeps_it_armed() {
    let mut st = fixture_session("basic_python.py");
    replay(&mut st, "d<Down>");
    assert_eq!(st.mode(), EditorMode::Delete);
    assert_eq!(cursor(&st), pos(2, 1));

    replay(&mut st, "d");
    assert_eq!(num_lines(&st), 3);
    assert_eq!(line_text(&st, 2), "    x = 1\n");
    assert_eq!(cursor(&st), pos(2, 1));
}

#[test]
fn go_chord_and_last_line() {
    let mut st = fixture_session("basic_python.py");
    replay(&mut st, "G");
    assert_eq!(cursor(&st), pos(4, 1));
    replay(&mut st, "g<Esc>");
    assert_eq!(cursor(&st), pos(4, 1));
    assert_eq!(st.mode(), EditorMode::Command);
    replay(&mut st, "gg");
    assert_eq!(cursor(&st), pos(1, 1));
    assert_eq!(st.mode(), EditorMode::Command);
}

#[test]
fn insert_run_is_one_undo_step() {
    let mut st = fixture_session("basic_python.py");
    replay(&mut st, "A<CR>pass<Esc>");
    assert_eq!(num_lines(&st), 5);
    assert_eq!(line_text(&st, 2), "pass\n");
    assert_eq!(st.buffer.history().len(), 2);

    replay(&mut st, "u");
    assert_eq!(line_text(&st, 2), "\n");
    replay(&mut st, "u");
    assert_eq!(text(&st), PYTHON);
    assert_eq!(cursor(&st), pos(1, 11));
}

#[test]
fn navigation_splits_insert_runs() {
    let mut st = session("\n");
    replay(&mut st, "ia<Left>b<Esc>");
    assert_eq!(text(&st), "ba\n");
    assert_eq!(st.buffer.history().len(), 2);
    replay(&mut st, "u");
    assert_eq!(text(&st), "a\n");
    replay(&mut st, "u");
    assert_eq!(text(&st), "\n");
}

#[test]
fn open_line_below_copies_indentation() {
    let mut st = fixture_session("basic_python.py");
    replay(&mut st, "jjoy = 2<Esc>");
    assert_eq!(num_lines(&st), 5);
    assert_eq!(line_text(&st, 4), "    y = 2\n");
    assert_eq!(line_text(&st, 5), "    return x\n");

    replay(&mut st, "uu");
    assert_eq!(text(&st), PYTHON);
    assert_eq!(cursor(&st), pos(3, 1));
}

#[test]
fn open_line_above_and_insert_at_line_start() {
    let mut st = session("    body\n");
    replay(&mut st, "O# head<Esc>");
    assert_eq!(text(&st), "    # head\n    body\n");
    replay(&mut st, "jI><Esc>");
    assert_eq!(line_text(&st, 2), ">    body\n");
}

#[test]
fn x_deletes_under_cursor_and_at_line_end() {
    let mut st = session("abc\n");
    replay(&mut st, "x");
    assert_eq!(text(&st), "bc\n");
    replay(&mut st, "A<Esc>x");
    assert_eq!(text(&st), "b\n");
    assert_eq!(cursor(&st), pos(1, 2));
}

#[test]
fn append_after_cursor() {
    let mut st = session("ac\n");
    replay(&mut st, "ab<Esc>");
    assert_eq!(text(&st), "abc\n");
}

#[test]
fn insert_backspace_respects_line_start() {
    let mut st = session("ab\n");
    replay(&mut st, "i<BS>");
    assert_eq!(text(&st), "ab\n");
    assert!(st.buffer.history().is_empty());

    replay(&mut st, "<End><BS>");
    assert_eq!(text(&st), "a\n");
    assert_eq!(st.mode(), EditorMode::Insert);
}

#[test]
fn tab_inserts_configured_spaces() {
    let mut st = session("x\n");
    let settings = EditSettings {
        tab_width: 2,
        ..EditSettings::default()
    };
    replay_with(&mut st, "i<Tab><Esc>", settings);
    assert_eq!(text(&st), "  x\n");
}

#[test]
fn unbound_keys_are_ignored() {
    let mut st = session("abc\n");
    let r = press(
        &mut st,
        KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CTRL),
    );
    assert!(!r.dirty);
    replay(&mut st, "zZ");
    assert_eq!(text(&st), "abc\n");
    assert_eq!(st.mode(), EditorMode::Command);
}

#[test]
fn undo_with_empty_history_reports_status() {
    let mut st = session("abc\n");
    replay(&mut st, "u");
    assert_eq!(st.status(), Some("already at oldest change"));
    assert_eq!(text(&st), "abc\n");
}
