//! Number and date formatting for tooltips, badges and axis ticks.

use chrono::NaiveDate;

/// Placeholder for a value that is missing or not finite.
pub const MISSING: &str = "—";

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

const MINUS: &str = "\u{2212}";

fn sign_prefix(negative: bool, force_plus: bool) -> &'static str {
    match (negative, force_plus) {
        (true, _) => MINUS,
        (false, true) => "+",
        (false, false) => "",
    }
}

/// Insert thousands separators into a plain digit string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point with optional grouping; the sign is handled separately so
/// negative zero after rounding prints without one.
fn fixed(value: f64, decimals: usize, grouping: bool) -> (bool, String) {
    let body = format!("{:.*}", decimals, value.abs());
    let negative = value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
    if !grouping {
        return (negative, body);
    }
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body.as_str(), None),
    };
    let mut out = group_digits(int_part);
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    (negative, out)
}

/// `,.Nf`: grouped fixed-point.
pub fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let (negative, body) = fixed(value, decimals, true);
    format!("{}{body}", sign_prefix(negative, false))
}

/// `$,.2f`: dollars and cents, sign before the currency symbol.
pub fn dollars(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let (negative, body) = fixed(value, 2, true);
    format!("{}${body}", sign_prefix(negative, false))
}

/// `.2%`: percent with two decimals.
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let (negative, body) = fixed(value * 100.0, 2, false);
    format!("{}{body}%", sign_prefix(negative, false))
}

/// `+.2%`: percent with two decimals and an explicit sign.
pub fn signed_percent(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let (negative, body) = fixed(value * 100.0, 2, false);
    format!("{}{body}%", sign_prefix(negative, true))
}

/// `.Ns`: `precision` significant digits with an SI prefix.
pub fn si(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exp.parse().unwrap_or(0);
    let coefficient: String = mantissa.chars().filter(|c| *c != '.').collect();
    let negative = value < 0.0 && coefficient.chars().any(|c| c != '0');

    let prefix_exp = exponent.div_euclid(3).clamp(-8, 8);
    let i = exponent - prefix_exp * 3 + 1;
    let n = coefficient.len() as i32;

    let digits = if i == n {
        coefficient
    } else if i > n {
        format!("{coefficient}{}", "0".repeat((i - n) as usize))
    } else if i > 0 {
        let (head, tail) = coefficient.split_at(i as usize);
        format!("{head}.{tail}")
    } else {
        let scaled = value.abs() / 10f64.powi(prefix_exp * 3);
        format!("{:.*}", (precision as i32 + i - 1).max(0) as usize, scaled)
    };
    let prefix = SI_PREFIXES[(prefix_exp + 8) as usize];
    format!("{}{digits}{prefix}", sign_prefix(negative, false))
}

/// `%b %d, %Y`, e.g. `Mar 05, 2021`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Optional value through `f`, or [`MISSING`].
pub fn or_missing<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| MISSING.to_string())
}
