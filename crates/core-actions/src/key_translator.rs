//! Key to action translation.
//!
//! One flat table keyed by mode. Directional keys are checked before the
//! mode so they navigate the same way everywhere. Keys a mode does not know
//! translate to `None` and are dropped by the dispatcher.

use crate::{Action, EditKind, ModeChange, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::EditorMode;

pub fn translate(mode: EditorMode, key: &KeyEvent) -> Option<Action> {
    if let Some(motion) = directional(key) {
        return Some(Action::Motion(motion));
    }
    match mode {
        EditorMode::Command => command_mode(key),
        EditorMode::Insert => insert_mode(key),
        EditorMode::Delete => chord(key, 'd', ModeChange::ConfirmDelete),
        EditorMode::Go => chord(key, 'g', ModeChange::ConfirmGo),
        EditorMode::CommandInput | EditorMode::SearchForward | EditorMode::SearchBackward => {
            command_line(key)
        }
    }
}

fn directional(key: &KeyEvent) -> Option<MotionKind> {
    Some(match key.code {
        KeyCode::Up => MotionKind::Up,
        KeyCode::Down => MotionKind::Down,
        KeyCode::Left => MotionKind::Left,
        KeyCode::Right => MotionKind::Right,
        KeyCode::Home => MotionKind::LineStart,
        KeyCode::End => MotionKind::LineEnd,
        KeyCode::PageUp => MotionKind::PageUp,
        KeyCode::PageDown => MotionKind::PageDown,
        _ => return None,
    })
}

/// The character a command key stands for, with shift folded in
/// (`J` for shift+`j`). Control and alt chords have none.
fn command_char(key: &KeyEvent) -> Option<char> {
    if key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
        return None;
    }
    let mut chars = key.printable_text()?.chars().collect::<Vec<_>>();
    if chars.len() == 1 { chars.pop() } else { None }
}

fn command_mode(key: &KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Backspace {
        return Some(Action::Motion(MotionKind::Left));
    }
    let action = match command_char(key)? {
        'i' => Action::ModeChange(ModeChange::EnterInsert),
        'I' => Action::ModeChange(ModeChange::EnterInsertLineStart),
        'a' => Action::ModeChange(ModeChange::EnterInsertAfter),
        'A' => Action::ModeChange(ModeChange::EnterInsertLineEnd),
        'o' => Action::Edit(EditKind::OpenLineBelow),
        'O' => Action::Edit(EditKind::OpenLineAbove),
        'x' => Action::Edit(EditKind::DeleteCharUnder),
        'J' => Action::Edit(EditKind::JoinLines),
        'u' => Action::Undo,
        'd' => Action::ModeChange(ModeChange::ArmDelete),
        'g' => Action::ModeChange(ModeChange::ArmGo),
        'G' => Action::Motion(MotionKind::LastLine),
        'h' => Action::Motion(MotionKind::Left),
        'j' => Action::Motion(MotionKind::Down),
        'k' => Action::Motion(MotionKind::Up),
        'l' => Action::Motion(MotionKind::Right),
        ':' => Action::CommandStart(EditorMode::CommandInput),
        '/' => Action::CommandStart(EditorMode::SearchForward),
        '?' => Action::CommandStart(EditorMode::SearchBackward),
        'n' => Action::SearchNext { reverse: false },
        'N' => Action::SearchNext { reverse: true },
        _ => return None,
    };
    Some(action)
}

fn insert_mode(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::ModeChange(ModeChange::Cancel)),
        KeyCode::Backspace => Some(Action::Edit(EditKind::DeleteCharBefore)),
        KeyCode::Enter => Some(Action::Edit(EditKind::BreakLine)),
        KeyCode::Tab => Some(Action::Edit(EditKind::InsertTab)),
        _ => key
            .printable_text()
            .filter(|t| !t.is_empty())
            .map(|t| Action::Edit(EditKind::InsertText(t))),
    }
}

/// Second key of a two-key chord: `confirm` completes it, Escape backs out,
/// anything else leaves the chord armed.
fn chord(key: &KeyEvent, confirm: char, action: ModeChange) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return Some(Action::ModeChange(ModeChange::Cancel));
    }
    (command_char(key)? == confirm).then_some(Action::ModeChange(action))
}

fn command_line(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::CommandCancel),
        KeyCode::Enter => Some(Action::CommandSubmit),
        KeyCode::Backspace => Some(Action::CommandBackspace),
        KeyCode::Tab => None,
        _ => key
            .printable_text()
            .filter(|t| !t.is_empty())
            .map(Action::CommandText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: char) -> KeyEvent {
        KeyEvent::char(c)
    }

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn directional_keys_navigate_in_every_mode() {
        for mode in [
            EditorMode::Command,
            EditorMode::Insert,
            EditorMode::Delete,
            EditorMode::Go,
            EditorMode::CommandInput,
            EditorMode::SearchForward,
            EditorMode::SearchBackward,
        ] {
            assert_eq!(
                translate(mode, &plain(KeyCode::Up)),
                Some(Action::Motion(MotionKind::Up))
            );
            assert_eq!(
                translate(mode, &plain(KeyCode::PageDown)),
                Some(Action::Motion(MotionKind::PageDown))
            );
        }
    }

    #[test]
    fn shifted_letters_pick_the_uppercase_binding() {
        let shift_j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::SHIFT);
        assert_eq!(
            translate(EditorMode::Command, &shift_j),
            Some(Action::Edit(EditKind::JoinLines))
        );
        assert_eq!(
            translate(EditorMode::Command, &ch('j')),
            Some(Action::Motion(MotionKind::Down))
        );
        assert_eq!(
            translate(EditorMode::Command, &ch('G')),
            Some(Action::Motion(MotionKind::LastLine))
        );
    }

    #[test]
    fn control_chords_are_ignored_in_command_mode() {
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CTRL);
        assert_eq!(translate(EditorMode::Command, &ctrl_d), None);
        assert_eq!(translate(EditorMode::Command, &ch('z')), None);
    }

    #[test]
    fn chords_confirm_or_cancel() {
        assert_eq!(
            translate(EditorMode::Delete, &ch('d')),
            Some(Action::ModeChange(ModeChange::ConfirmDelete))
        );
        assert_eq!(
            translate(EditorMode::Go, &plain(KeyCode::Esc)),
            Some(Action::ModeChange(ModeChange::Cancel))
        );
        assert_eq!(translate(EditorMode::Delete, &ch('D')), None);
        assert_eq!(translate(EditorMode::Go, &ch('x')), None);
    }

    #[test]
    fn insert_mode_keys() {
        assert_eq!(
            translate(EditorMode::Insert, &ch('q')),
            Some(Action::Edit(EditKind::InsertText("q".into())))
        );
        assert_eq!(
            translate(EditorMode::Insert, &plain(KeyCode::Tab)),
            Some(Action::Edit(EditKind::InsertTab))
        );
        let committed = plain(KeyCode::Char('e')).with_text("é");
        assert_eq!(
            translate(EditorMode::Insert, &committed),
            Some(Action::Edit(EditKind::InsertText("é".into())))
        );
    }

    #[test]
    fn command_line_keys() {
        assert_eq!(
            translate(EditorMode::Command, &ch('/')),
            Some(Action::CommandStart(EditorMode::SearchForward))
        );
        assert_eq!(
            translate(EditorMode::CommandInput, &ch('w')),
            Some(Action::CommandText("w".into()))
        );
        assert_eq!(
            translate(EditorMode::SearchBackward, &plain(KeyCode::Enter)),
            Some(Action::CommandSubmit)
        );
    }
}
