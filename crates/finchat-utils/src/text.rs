//! Text helpers shared by the resolver and the formatters

/// Case-insensitive substring test.
///
/// Both sides are lowercased with full Unicode case mapping before comparing.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Title-case a string: the first letter of every run of cased letters is
/// uppercased and the remaining letters of the run are lowercased.
///
/// Anything without case splits runs, so `"o'neil"` becomes `"O'Neil"`,
/// `"3m company"` becomes `"3M Company"` and `"中a"` becomes `"中A"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.chars() {
        if is_cased(c) {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase()
}

/// Render a decimal using the shortest representation that round-trips,
/// keeping a trailing `.0` on whole numbers (`50.0`, not `50`).
///
/// Magnitudes below `1e-4` or from `1e16` up use exponent form with a signed,
/// two-digit exponent (`1e-05`, `1.5e+20`).
pub fn format_decimal(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude > 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(value);
    }

    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn format_exponent(value: f64) -> String {
    let formatted = format!("{value:e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}
