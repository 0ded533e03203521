//! Built-in spreadsheet functions (Rust) and their metadata.
//!
//! Conventions:
//! - Built-in names are ALL CAPS and case-sensitive (`SUM`, `CONCATENATE`).
//! - The call rewriter hands every built-in a single array of arguments.
//!   Elements are numbers, strings, or bound ranges ([`ExpandedRange`]).
//! - If you add a built-in, list it in `BUILTINS` (the evaluator rejects
//!   any other identifier) and register it in `register_builtins`.

use rhai::{Array, Dynamic, Engine, ImmutableString};

use crate::engine::{ExpandedRange, format_number, to_number};

pub struct Builtin {
    pub name: &'static str,
    #[allow(dead_code)]
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        description: "Sum of numbers and range contents",
    },
    Builtin {
        name: "CONCATENATE",
        description: "Join values and range contents as text",
    },
];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|b| b.name == name)
}

/// Numeric value of one argument. Text is coerced; anything that does not
/// read as a number is NaN.
fn number_of(item: &Dynamic) -> f64 {
    if let Ok(n) = item.as_float() {
        return n;
    }
    if let Ok(n) = item.as_int() {
        return n as f64;
    }
    if let Ok(s) = item.clone().into_string() {
        return to_number(&s).unwrap_or(f64::NAN);
    }
    f64::NAN
}

fn text_of(item: &Dynamic) -> String {
    if let Ok(n) = item.as_float() {
        return format_number(n);
    }
    if item.is_unit() {
        return String::new();
    }
    if let Ok(s) = item.clone().into_string() {
        return s;
    }
    item.to_string()
}

pub(crate) fn sum(items: &[Dynamic]) -> f64 {
    let mut total = 0.0;
    for item in items {
        if let Some(range) = item.read_lock::<ExpandedRange>() {
            total += range.sum();
        } else {
            total += number_of(item);
        }
    }
    total
}

pub(crate) fn concatenate(items: &[Dynamic]) -> String {
    let mut out = String::new();
    for item in items {
        if let Some(range) = item.read_lock::<ExpandedRange>() {
            range.texts().for_each(|t| out.push_str(t));
        } else {
            out.push_str(&text_of(item));
        }
    }
    out
}

/// Register all built-in functions into the Rhai engine.
pub fn register_builtins(engine: &mut Engine) {
    engine.register_type_with_name::<ExpandedRange>("Range");

    engine.register_fn("SUM", |items: Array| -> f64 { sum(&items) });
    engine.register_fn("CONCATENATE", |items: Array| -> String {
        concatenate(&items)
    });

    // `"total: " + 3` joins the display form of the number ("3", not "3.0").
    engine.register_fn("+", |s: ImmutableString, n: f64| -> String {
        format!("{}{}", s, format_number(n))
    });
    engine.register_fn("+", |n: f64, s: ImmutableString| -> String {
        format!("{}{}", format_number(n), s)
    });
}
