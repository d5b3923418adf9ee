//! Numeric interpolation between strings that differ only in numerals
//!
//! Numerals are an optional `-`, up to twenty digits, and optionally a `.`
//! followed by up to twenty digits. Exponents are not recognised. Each
//! numeral is treated as a fixed-point value whose number of fractional
//! digits interpolates along with the value itself.

use regex::Regex;
use std::sync::OnceLock;

fn numeral() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?[0-9]{1,20}(?:\.[0-9]{1,20})?").expect("valid numeral pattern"))
}

fn skeleton(text: &str) -> std::borrow::Cow<'_, str> {
    numeral().replace_all(text, "0")
}

/// Whether `source` and `target` are equal once every numeral is masked
pub fn are_numeric_twins(source: &str, target: &str) -> bool {
    skeleton(source) == skeleton(target)
}

fn fractional_digits(numeral: &str) -> f64 {
    numeral
        .find('.')
        .map(|point| (numeral.len() - 1 - point) as f64)
        .unwrap_or(0.0)
}

fn lerp_numeral(from: &str, to: &str, amount: f64) -> String {
    if from == to {
        return to.to_owned();
    }
    let a: f64 = from.parse().unwrap_or_default();
    let b: f64 = to.parse().unwrap_or_default();
    let value = a + (b - a) * amount;

    let (da, db) = (fractional_digits(from), fractional_digits(to));
    // Digit count stays within the two endpoints even when the value extrapolates
    let digits = (da + (db - da) * amount).round().clamp(da.min(db), da.max(db)) as usize;
    format!("{value:.digits$}")
}

/// Interpolate every numeral of `source` toward its counterpart in `target`
///
/// The non-numeral text of `target` is kept as the skeleton. `amount` is not
/// clamped, so values extrapolate outside `0.0..=1.0`.
///
/// The inputs must be numeric twins (see [`are_numeric_twins`]); other
/// inputs pair numerals positionally and leave unpaired target numerals
/// untouched.
///
/// ```rust
/// use kinetic_animation::text::numeric_lerp;
///
/// assert_eq!(numeric_lerp("0.0", "100.0", 0.5), "50.0");
/// assert_eq!(numeric_lerp("0.", "100.", 0.123), "12.");
/// assert_eq!(numeric_lerp("x: 1, y: 2", "x: 3, y: -2", 0.5), "x: 2, y: 0");
/// ```
pub fn numeric_lerp(source: &str, target: &str, amount: f32) -> String {
    debug_assert!(
        are_numeric_twins(source, target),
        "numeric_lerp on strings that differ outside numerals: {source:?} / {target:?}"
    );

    let amount = amount as f64;
    let mut sources = numeral().find_iter(source).map(|m| m.as_str());
    let mut out = String::with_capacity(target.len());
    let mut last = 0;

    for m in numeral().find_iter(target) {
        out.push_str(&target[last..m.start()]);
        match sources.next() {
            Some(from) => out.push_str(&lerp_numeral(from, m.as_str(), amount)),
            None => out.push_str(m.as_str()),
        }
        last = m.end();
    }
    out.push_str(&target[last..]);
    out
}
