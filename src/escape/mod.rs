//! Shortest C string-literal bodies.
//!
//! Works on UTF-16 code units, so characters outside the BMP are escaped as
//! their two surrogate halves. Each unit is escaped looking one unit ahead,
//! because a numeric escape would otherwise swallow a following digit.

use std::cell::RefCell;
use std::collections::HashMap;

#[cfg(test)]
mod tests;

const MAX_CACHE_SIZE: usize = 16384;

/// Largest value an octal escape can express.
const MAX_OCTAL: u32 = 0o777;

fn is_octal_digit(unit: Option<u16>) -> bool {
    matches!(unit, Some(u) if (b'0' as u16..=b'7' as u16).contains(&u))
}

fn is_hex_digit(unit: Option<u16>) -> bool {
    matches!(unit, Some(u) if u < 0x80 && (u as u8).is_ascii_hexdigit())
}

fn named_escape(unit: u16) -> Option<&'static str> {
    Some(match unit {
        7 => "\\a",
        8 => "\\b",
        9 => "\\t",
        10 => "\\n",
        11 => "\\v",
        12 => "\\f",
        13 => "\\r",
        34 => "\\\"",
        92 => "\\\\",
        _ => return None,
    })
}

/// Writes the escape of a unit above the octal range followed by `next`.
fn push_wide(out: &mut String, unit: u32, next: Option<u16>) {
    let hex = format!("{unit:x}");
    if !is_hex_digit(next) {
        out.push_str("\\x");
        out.push_str(&hex);
        return;
    }
    // \xHH"" ends the literal so the follower can't extend the escape
    let split_cost = 4 + hex.len();
    let short_cost = (hex.len() <= 4).then_some(6);
    let long_cost = (hex.len() <= 8).then_some(10);
    match (short_cost, long_cost) {
        (Some(cost), _) if cost <= split_cost => out.push_str(&format!("\\u{unit:04x}")),
        (None, Some(cost)) if cost <= split_cost => out.push_str(&format!("\\U{unit:08x}")),
        _ => {
            out.push_str("\\x");
            out.push_str(&hex);
            out.push_str("\"\"");
        }
    }
}

/// Escapes `text` into the body of a C string literal, without the quotes.
pub fn escape(text: &str) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut out = String::with_capacity(units.len());
    for (i, &unit) in units.iter().enumerate() {
        let next = units.get(i + 1).copied();
        if let Some(named) = named_escape(unit) {
            out.push_str(named);
        } else if (32..=126).contains(&unit) {
            out.push(unit as u8 as char);
        } else if u32::from(unit) <= MAX_OCTAL {
            if is_octal_digit(next) {
                out.push_str(&format!("\\{unit:03o}"));
            } else {
                out.push_str(&format!("\\{unit:o}"));
            }
        } else {
            push_wide(&mut out, u32::from(unit), next);
        }
    }
    out
}

/// Insert-if-absent memo of [`escape`].
#[derive(Debug, Default)]
pub struct EscapeCache {
    map: RefCell<HashMap<String, String>>,
}

impl EscapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> String {
        if let Some(hit) = self.map.borrow().get(text) {
            return hit.clone();
        }
        let escaped = escape(text);
        let mut map = self.map.borrow_mut();
        if map.len() < MAX_CACHE_SIZE {
            map.insert(text.to_owned(), escaped.clone());
        }
        escaped
    }
}
