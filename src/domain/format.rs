/// Renders a float without trailing zeros, integers without a decimal point.
pub fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if (value.fract()).abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.6}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}

/// Two-decimal rendering used for measurement cells.
pub fn format_fixed2(value: f64) -> String {
    format!("{value:.2}")
}

/// Coerces free text into a number the way numeric inputs do: the longest
/// leading numeric prefix wins, anything unparseable becomes 0.
pub fn parse_float_lenient(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let candidate: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .collect();

    let mut end = candidate.len();
    while end > 0 {
        if let Ok(value) = candidate[..end].parse::<f64>() {
            return if value.is_nan() { 0.0 } else { value };
        }
        end -= 1;
    }
    0.0
}

/// Strict numeric parse used for sort comparison.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| !value.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_f64_trims_trailing_zeros() {
        assert_eq!(format_f64(12.0), "12");
        assert_eq!(format_f64(12.5), "12.5");
        assert_eq!(format_f64(0.125), "0.125");
        assert_eq!(format_f64(f64::NAN), "");
    }

    #[test]
    fn parse_float_lenient_takes_numeric_prefix() {
        assert_eq!(parse_float_lenient("12.5"), 12.5);
        assert_eq!(parse_float_lenient("  7kg"), 7.0);
        assert_eq!(parse_float_lenient("1e3"), 1000.0);
        assert_eq!(parse_float_lenient("1e"), 1.0);
        assert_eq!(parse_float_lenient("-0.5"), -0.5);
        assert_eq!(parse_float_lenient("abc"), 0.0);
        assert_eq!(parse_float_lenient(""), 0.0);
        assert_eq!(parse_float_lenient("-"), 0.0);
    }

    #[test]
    fn parse_number_rejects_blank_and_text() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("Alice"), None);
    }
}
