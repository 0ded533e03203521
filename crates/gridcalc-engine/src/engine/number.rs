//! Text to number coercion.
//!
//! Two flavours are needed:
//! - [`to_number`] decides whether a whole cell value is numeric (used when
//!   substituting scalar references and when summing text arguments);
//! - [`parse_float`] reads the longest numeric prefix of a value and yields
//!   NaN when there is none (used for range contents).

use regex::Regex;
use std::sync::OnceLock;

fn float_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("float prefix regex must compile")
    })
}

/// Numeric value of the whole text, ignoring surrounding whitespace.
/// Blank text counts as 0.
pub fn to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed.trim_start_matches(['+', '-']) {
        "Infinity" => {}
        // Rust also accepts these spellings; a cell holding them is text.
        rest if rest.eq_ignore_ascii_case("inf")
            || rest.eq_ignore_ascii_case("infinity")
            || rest.eq_ignore_ascii_case("nan") =>
        {
            return None;
        }
        _ => {}
    }
    let n = trimmed.parse::<f64>().ok()?;
    if n.is_nan() { None } else { Some(n) }
}

/// Leading numeric prefix of the text (after leading whitespace), or NaN.
pub fn parse_float(text: &str) -> f64 {
    float_prefix_re()
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
