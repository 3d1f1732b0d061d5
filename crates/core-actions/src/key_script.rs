//! Key script notation for headless replay and tests.
//!
//! Plain characters stand for themselves (uppercase implies shift). Named
//! keys are written in angle brackets: `<Esc>`, `<CR>` / `<Enter>`, `<BS>`,
//! `<Tab>`, `<Up>`, `<Down>`, `<Left>`, `<Right>`, `<Home>`, `<End>`,
//! `<PageUp>`, `<PageDown>`, `<Space>` and `<lt>` for a literal `<`.
//! `<C-x>` sends control+`x`. A raw newline is Enter and a raw tab is Tab.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyScriptError {
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
    #[error("unterminated key name starting at offset {0}")]
    Unterminated(usize),
}

pub fn parse_key_script(script: &str) -> Result<Vec<KeyEvent>, KeyScriptError> {
    let mut keys = Vec::new();
    let mut rest = script.char_indices();
    while let Some((offset, c)) = rest.next() {
        let key = match c {
            '<' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in rest.by_ref() {
                    if n == '>' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(KeyScriptError::Unterminated(offset));
                }
                named_key(&name)?
            }
            '\n' => KeyEvent::plain(KeyCode::Enter),
            '\t' => KeyEvent::plain(KeyCode::Tab),
            '\r' => continue,
            c => KeyEvent::char(c),
        };
        keys.push(key);
    }
    Ok(keys)
}

fn named_key(name: &str) -> Result<KeyEvent, KeyScriptError> {
    if let Some(target) = name
        .strip_prefix("C-")
        .or_else(|| name.strip_prefix("c-"))
    {
        let mut chars = target.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CTRL));
        }
        return Err(KeyScriptError::UnknownKey(name.to_string()));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        _ => return Err(KeyScriptError::UnknownKey(name.to_string())),
    };
    Ok(KeyEvent::plain(code))
}
