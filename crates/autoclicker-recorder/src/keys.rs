//! Key names
//!
//! Keystroke actions store a key as a short name (`"a"`, `"space"`,
//! `"f5"`). Hotkeys are compared against names produced from the global
//! hook: printable keys in lower case, everything else upper case
//! (`"F7"`, `"ENTER"`).

use enigo::Key;

/// Injection key for a stored key name, case-insensitive
pub fn parse_key(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(match c {
            ' ' => Key::Space,
            '\n' => Key::Return,
            '\t' => Key::Tab,
            c => Key::Unicode(c),
        });
    }

    Some(match name.trim().to_lowercase().as_str() {
        "enter" | "return" => Key::Return,
        "space" | "spacebar" => Key::Space,
        "tab" => Key::Tab,
        "esc" | "escape" => Key::Escape,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "up" | "arrow_up" | "uparrow" => Key::UpArrow,
        "down" | "arrow_down" | "downarrow" => Key::DownArrow,
        "left" | "arrow_left" | "leftarrow" => Key::LeftArrow,
        "right" | "arrow_right" | "rightarrow" => Key::RightArrow,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" | "page_up" | "pgup" => Key::PageUp,
        "pagedown" | "page_down" | "pgdn" => Key::PageDown,
        "shift" => Key::Shift,
        "ctrl" | "control" => Key::Control,
        "alt" | "option" => Key::Alt,
        "win" | "cmd" | "command" | "super" | "meta" => Key::Meta,
        "capslock" | "caps_lock" => Key::CapsLock,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "f13" => Key::F13,
        "f14" => Key::F14,
        "f15" => Key::F15,
        "f16" => Key::F16,
        "f17" => Key::F17,
        "f18" => Key::F18,
        "f19" => Key::F19,
        "f20" => Key::F20,
        _ => return None,
    })
}

/// Name for a key reported by the global hook
pub fn key_name(key: rdev::Key) -> String {
    use rdev::Key as K;

    let s = match key {
        K::KeyA => "a",
        K::KeyB => "b",
        K::KeyC => "c",
        K::KeyD => "d",
        K::KeyE => "e",
        K::KeyF => "f",
        K::KeyG => "g",
        K::KeyH => "h",
        K::KeyI => "i",
        K::KeyJ => "j",
        K::KeyK => "k",
        K::KeyL => "l",
        K::KeyM => "m",
        K::KeyN => "n",
        K::KeyO => "o",
        K::KeyP => "p",
        K::KeyQ => "q",
        K::KeyR => "r",
        K::KeyS => "s",
        K::KeyT => "t",
        K::KeyU => "u",
        K::KeyV => "v",
        K::KeyW => "w",
        K::KeyX => "x",
        K::KeyY => "y",
        K::KeyZ => "z",
        K::Num0 => "0",
        K::Num1 => "1",
        K::Num2 => "2",
        K::Num3 => "3",
        K::Num4 => "4",
        K::Num5 => "5",
        K::Num6 => "6",
        K::Num7 => "7",
        K::Num8 => "8",
        K::Num9 => "9",
        K::F1 => "F1",
        K::F2 => "F2",
        K::F3 => "F3",
        K::F4 => "F4",
        K::F5 => "F5",
        K::F6 => "F6",
        K::F7 => "F7",
        K::F8 => "F8",
        K::F9 => "F9",
        K::F10 => "F10",
        K::F11 => "F11",
        K::F12 => "F12",
        K::Return | K::KpReturn => "ENTER",
        K::Space => "SPACE",
        K::Tab => "TAB",
        K::Escape => "ESC",
        K::Backspace => "BACKSPACE",
        K::Delete => "DELETE",
        K::Insert => "INSERT",
        K::UpArrow => "UP",
        K::DownArrow => "DOWN",
        K::LeftArrow => "LEFT",
        K::RightArrow => "RIGHT",
        K::Home => "HOME",
        K::End => "END",
        K::PageUp => "PAGE_UP",
        K::PageDown => "PAGE_DOWN",
        K::ShiftLeft => "SHIFT",
        K::ShiftRight => "SHIFT_R",
        K::ControlLeft => "CTRL_L",
        K::ControlRight => "CTRL_R",
        K::Alt => "ALT_L",
        K::AltGr => "ALT_GR",
        K::MetaLeft => "CMD",
        K::MetaRight => "CMD_R",
        K::CapsLock => "CAPS_LOCK",
        K::Unknown(code) => return format!("KEY_{}", code),
        other => return format!("{:?}", other).to_uppercase(),
    };
    s.to_string()
}
