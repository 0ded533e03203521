use rhai::Dynamic;

/// Format an evaluation result for writing into a cell.
pub fn format_dynamic(value: &Dynamic) -> String {
    if value.is_unit() {
        String::new()
    } else if let Ok(n) = value.as_float() {
        format_number(n)
    } else if let Ok(n) = value.as_int() {
        n.to_string()
    } else if let Ok(b) = value.as_bool() {
        if b { "TRUE" } else { "FALSE" }.to_string()
    } else if let Ok(s) = value.clone().into_string() {
        s
    } else {
        value.to_string()
    }
}

/// Format a number for display.
///
/// Integral values print without a fractional part; everything else uses
/// the shortest text that reads back to the same number. Infinities print
/// as `Infinity`/`-Infinity` so later references read them as numbers.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_infinities_read_back_as_numbers() {
        for n in [f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(crate::engine::to_number(&format_number(n)), Some(n));
        }
    }

    #[test]
    fn test_format_dynamic() {
        assert_eq!(format_dynamic(&Dynamic::from(2.0_f64)), "2");
        assert_eq!(format_dynamic(&Dynamic::from("ab".to_string())), "ab");
        assert_eq!(format_dynamic(&Dynamic::UNIT), "");
        assert_eq!(format_dynamic(&Dynamic::from(true)), "TRUE");
    }
}
