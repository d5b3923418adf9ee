//! Text interpolation
//!
//! Produces visually smooth transitions between arbitrary strings. Three
//! strategies are chosen from, cheapest result first:
//!
//! - **numeric**: strings that differ only in numerals interpolate the
//!   numbers themselves (`"10px"` -> `"15px"` -> `"20px"`)
//! - **diff**: short strings morph through a partial Levenshtein edit,
//!   costing O(m·n) time and memory
//! - **length**: long strings swap a growing prefix of the target in front
//!   of a shrinking tail of the source, in O(m + n)
//!
//! Both text strategies progress left to right: the front of the result
//! turns into the target first.

pub mod diff;
mod glyph;
mod numeric;

pub use diff::{
    cost_matrix, diff, edit_distance, edit_path, patch, CostMatrix, Edit, EditCosts, EditKind,
};
pub use glyph::has_multi_codepoint_glyphs;
pub use numeric::{are_numeric_twins, numeric_lerp};

/// Largest cost matrix (in cells) the diff strategy may allocate
pub const MAX_MATRIX_CELLS: usize = 256 * 256;

/// Interpolate between `source` (at 0) and `target` (at 1)
///
/// Numeric twins extrapolate for `amount` outside `0.0..=1.0`; every other
/// pair clamps to the nearer endpoint.
///
/// ```rust
/// use kinetic_animation::text::interpolate;
///
/// assert_eq!(interpolate("10px", "20px", 0.5), "15px");
/// assert_eq!(interpolate("cat", "dog", 0.0), "cat");
/// assert_eq!(interpolate("cat", "dog", 1.0), "dog");
/// ```
pub fn interpolate(source: &str, target: &str, amount: f32) -> String {
    if amount.is_nan() || amount == 0.0 {
        return source.to_owned();
    }
    if amount == 1.0 || source == target {
        return target.to_owned();
    }

    if are_numeric_twins(source, target) {
        return numeric_lerp(source, target, amount);
    }

    if amount < 0.0 {
        return source.to_owned();
    }
    if amount > 1.0 {
        return target.to_owned();
    }

    let (source_tokens, target_tokens) = glyph::tokenize_pair(source, target);
    let cells = source_tokens.len() * target_tokens.len();
    if cells != 0 && cells < MAX_MATRIX_CELLS {
        diff_lerp_tokens(&source_tokens, &target_tokens, amount)
    } else {
        fast_lerp_tokens(&source_tokens, &target_tokens, amount)
    }
}

/// Interpolate by applying a fraction of the edits between the strings
///
/// Looks best on short or similar strings. Memory grows with the product of
/// the two lengths, so prefer [`interpolate`], which falls back to
/// [`fast_lerp`] for long inputs.
pub fn diff_lerp(source: &str, target: &str, amount: f32) -> String {
    let (source_tokens, target_tokens) = glyph::tokenize_pair(source, target);
    diff_lerp_tokens(&source_tokens, &target_tokens, amount.clamp(0.0, 1.0))
}

/// Interpolate by replacing the front of `source` with the front of `target`
pub fn fast_lerp(source: &str, target: &str, amount: f32) -> String {
    let (source_tokens, target_tokens) = glyph::tokenize_pair(source, target);
    fast_lerp_tokens(&source_tokens, &target_tokens, amount.clamp(0.0, 1.0))
}

fn scaled_len(len: usize, amount: f32) -> usize {
    ((len as f32 * amount).round() as usize).min(len)
}

fn diff_lerp_tokens(source: &[&str], target: &[&str], amount: f32) -> String {
    // Edits run target -> source so that the applied tail of the list
    // rewrites the end of the string first; what remains of the target at
    // the front matches how fast_lerp reads left to right.
    let edits = diff::diff(target, source, EditCosts::TEXT_MORPH);
    let keep = scaled_len(edits.len(), 1.0 - amount);
    let tail = &edits[edits.len() - keep..];
    diff::patch(tail, target).concat()
}

fn fast_lerp_tokens(source: &[&str], target: &[&str], amount: f32) -> String {
    let head = &target[..scaled_len(target.len(), amount)];
    let tail = &source[scaled_len(source.len(), amount)..];
    let mut out = String::with_capacity(head.iter().chain(tail).map(|t| t.len()).sum());
    for token in head.iter().chain(tail) {
        out.push_str(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        for (a, b) in [("", "abc"), ("hello", "world"), ("1", "x"), ("", "")] {
            assert_eq!(interpolate(a, b, 0.0), a);
            assert_eq!(interpolate(a, b, 1.0), b);
        }
    }

    #[test]
    fn test_identical_strings_are_fixed_points() {
        for s in ["", "abc", "007", "1.50 of 3", "e\u{0301}t\u{0301}e\u{0301}"] {
            for i in 0..=10 {
                assert_eq!(interpolate(s, s, i as f32 / 10.0), s);
            }
        }
    }

    #[test]
    fn test_numeric_twins_interpolate_numbers() {
        assert_eq!(interpolate("Health: 0/20", "Health: 20/20", 0.25), "Health: 5/20");
        assert_eq!(interpolate("0", "10", 2.0), "20");
    }

    #[test]
    fn test_numeric_twins_survive_large_fractions() {
        assert_eq!(interpolate("0", "1.0", 1e5), "100000.0");
        let out = interpolate("width: 0px", "width: 2.5px", f32::MAX);
        assert!(out.starts_with("width: ") && out.ends_with(".0px"), "{out}");
    }

    #[test]
    fn test_non_numeric_clamps() {
        assert_eq!(interpolate("cat", "dog", -1.0), "cat");
        assert_eq!(interpolate("cat", "dog", 7.0), "dog");
        assert_eq!(interpolate("cat", "dog", f32::NAN), "cat");
    }

    #[test]
    fn test_diff_lerp_single_substitution() {
        assert_eq!(interpolate("cat", "cut", 0.4), "cat");
        assert_eq!(interpolate("cat", "cut", 0.6), "cut");
    }

    #[test]
    fn test_diff_lerp_rewrites_end_first() {
        assert_eq!(interpolate("abc", "abcdef", 0.5), "abcd");
        assert_eq!(interpolate("abcdef", "abc", 0.5), "abcef");
    }

    #[test]
    fn test_diff_lerp_length_bound() {
        let pairs = [("kitten", "sitting"), ("hello world", "goodbye moon"), ("a", "zzzz")];
        for (a, b) in pairs {
            let a_tokens: Vec<char> = a.chars().collect();
            let b_tokens: Vec<char> = b.chars().collect();
            let bound = a_tokens.len().max(b_tokens.len())
                + edit_distance(&a_tokens, &b_tokens) as usize;
            for i in 0..=20 {
                let out = interpolate(a, b, i as f32 / 20.0);
                assert!(out.chars().count() <= bound, "{a:?} -> {b:?}: {out:?}");
            }
        }
    }

    #[test]
    fn test_fast_lerp_prefix_and_tail() {
        assert_eq!(fast_lerp("aaaa", "bbbb", 0.5), "bbaa");
        assert_eq!(fast_lerp("aaaa", "bb", 0.5), "baa");
    }

    #[test]
    fn test_long_strings_use_length_strategy() {
        let source = "a".repeat(300);
        let target = "b".repeat(300);
        let out = interpolate(&source, &target, 0.5);
        assert_eq!(out, format!("{}{}", "b".repeat(150), "a".repeat(150)));
    }

    #[test]
    fn test_empty_side_uses_length_strategy() {
        assert_eq!(interpolate("", "abcd", 0.5), "ab");
        assert_eq!(interpolate("abcd", "", 0.5), "cd");
    }

    #[test]
    fn test_glyphs_never_split() {
        let source = "cafe\u{0301}";
        let target = "cafe";
        for i in 0..=10 {
            let out = interpolate(source, target, i as f32 / 10.0);
            assert!(!out.starts_with('\u{0301}'));
            if let Some(pos) = out.find('\u{0301}') {
                assert!(out[..pos].ends_with('e'), "{out:?}");
            }
        }
    }
}
