//! Lore text helpers
//!
//! Display names and lore lines carry two-character formatting markers
//! (`§` followed by a color or style code). Everything downstream matches on
//! the cleaned text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading character of every formatting marker
pub const FORMAT_MARKER: char = '§';

static FORMAT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"§[0-9a-fklmnor]").expect("format code pattern"));

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]?[\d,]+\.?\d*").expect("number pattern"));

/// Strip color (`0-9a-f`) and style (`k l m n o r`) markers
///
/// Only the fixed code alphabet is removed; a marker followed by any other
/// character is left in place.
pub fn clean(text: &str) -> String {
    FORMAT_CODE.replace_all(text, "").into_owned()
}

/// First signed number in `text`, with thousands separators removed
///
/// Returns 0 when nothing number-like is present.
pub fn extract_number(text: &str) -> f64 {
    FIRST_NUMBER
        .find(text)
        .and_then(|m| parse_amount(m.as_str()))
        .unwrap_or(0.0)
}

/// Parse a captured amount such as `+1,250.5`
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_colors_and_styles() {
        assert_eq!(clean("§6§lLEGENDARY SWORD"), "LEGENDARY SWORD");
        assert_eq!(clean("§7Damage: §c+120 §8(+30)"), "Damage: +120 (+30)");
        assert_eq!(clean("§kobf§r plain"), "obf plain");
    }

    #[test]
    fn test_clean_keeps_unknown_codes() {
        assert_eq!(clean("§zOdd"), "§zOdd");
        assert_eq!(clean("§AUpper"), "§AUpper");
        assert_eq!(clean("no markers"), "no markers");
    }

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("Mana Cost: 100"), 100.0);
        assert_eq!(extract_number("Soulflow Cost: 1,250"), 1250.0);
        assert_eq!(extract_number("Costs 1,000,000 coins"), 1_000_000.0);
        assert_eq!(extract_number("Speed: -5"), -5.0);
        assert_eq!(extract_number("Crit Chance: +12.5%"), 12.5);
    }

    #[test]
    fn test_extract_number_without_digits() {
        assert_eq!(extract_number("Mana Cost: none"), 0.0);
        assert_eq!(extract_number(""), 0.0);
    }
}
