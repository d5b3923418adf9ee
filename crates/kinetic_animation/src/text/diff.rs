//! Edit distance and patching over token sequences
//!
//! Builds a Levenshtein cost matrix, walks it back into a minimal edit list,
//! and applies edit lists to token sequences. Tokens are anything comparable;
//! the text engine uses `&str` slices holding one character or one glyph.
//!
//! Deletion is modelled as a substitution with no replacement token, so an
//! edit list only ever contains two kinds of operation.

/// Costs of the three edit operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditCosts {
    pub insert: u32,
    pub delete: u32,
    pub substitute: u32,
}

impl EditCosts {
    /// Costs used when morphing text: deleting and re-inserting a token is
    /// cheaper than two substitutions, which keeps unrelated characters
    /// from churning through intermediate glyphs.
    pub const TEXT_MORPH: EditCosts = EditCosts {
        insert: 2,
        delete: 2,
        substitute: 3,
    };

    /// Substitution defaults to the more expensive of insert and delete
    pub const fn new(insert: u32, delete: u32) -> Self {
        let substitute = if insert > delete { insert } else { delete };
        Self {
            insert,
            delete,
            substitute,
        }
    }

    pub const fn with_substitute(mut self, substitute: u32) -> Self {
        self.substitute = substitute;
        self
    }
}

impl Default for EditCosts {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Operation performed by an [`Edit`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    /// Insert `token` before `position`
    Insert,
    /// Replace the token at `position`; no token means delete it
    Substitute,
}

/// A single patch operation against the original source sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit<T> {
    pub kind: EditKind,
    /// Index into the unpatched source sequence
    pub position: usize,
    pub token: Option<T>,
}

impl<T> Edit<T> {
    pub fn insert(position: usize, token: T) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            token: Some(token),
        }
    }

    pub fn substitute(position: usize, token: T) -> Self {
        Self {
            kind: EditKind::Substitute,
            position,
            token: Some(token),
        }
    }

    pub fn delete(position: usize) -> Self {
        Self {
            kind: EditKind::Substitute,
            position,
            token: None,
        }
    }

    pub fn is_deletion(&self) -> bool {
        self.kind == EditKind::Substitute && self.token.is_none()
    }
}

/// Flattened `(source.len() + 1) × (target.len() + 1)` Levenshtein table
///
/// Cell `(i, j)` holds the cheapest cost of turning `source[..i]` into
/// `target[..j]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl CostMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }

    /// Total cost of the cheapest edit, the bottom-right cell
    pub fn distance(&self) -> u32 {
        self.cells[self.cells.len() - 1]
    }
}

/// Build the cost matrix for turning `source` into `target`
pub fn cost_matrix<T: PartialEq>(source: &[T], target: &[T], costs: EditCosts) -> CostMatrix {
    let rows = source.len() + 1;
    let cols = target.len() + 1;
    let mut cells = vec![0u32; rows * cols];

    for i in 1..rows {
        cells[i * cols] = cells[(i - 1) * cols] + costs.delete;
    }
    for j in 1..cols {
        cells[j] = cells[j - 1] + costs.insert;
    }

    for i in 1..rows {
        for j in 1..cols {
            let diagonal = cells[(i - 1) * cols + j - 1];
            cells[i * cols + j] = if source[i - 1] == target[j - 1] {
                diagonal
            } else {
                let up = cells[(i - 1) * cols + j];
                let left = cells[i * cols + j - 1];
                (costs.delete + up)
                    .min(costs.insert + left)
                    .min(costs.substitute + diagonal)
            };
        }
    }

    CostMatrix { rows, cols, cells }
}

/// Walk `costs` back from the bottom-right cell into an edit list
///
/// `target` must be the sequence the matrix was built against. Ties prefer
/// substitution, then insertion, then deletion. The result is in document
/// order: positions never decrease, and edits sharing a position are listed
/// in the order [`patch`] must apply them.
pub fn edit_path<T: Clone>(costs: &CostMatrix, target: &[T]) -> Vec<Edit<T>> {
    debug_assert_eq!(costs.cols, target.len() + 1);

    let cell = |i: usize, j: usize| costs.get(i, j) as u64;
    let mut path = Vec::new();
    let mut i = costs.rows - 1;
    let mut j = costs.cols - 1;

    while i != 0 || j != 0 {
        let sub = if i != 0 && j != 0 { cell(i - 1, j - 1) } else { u64::MAX };
        let del = if i != 0 { cell(i - 1, j) } else { u64::MAX };
        let ins = if j != 0 { cell(i, j - 1) } else { u64::MAX };

        if sub <= ins && sub <= del {
            if cell(i, j) != sub {
                path.push(Edit::substitute(i - 1, target[j - 1].clone()));
            }
            i -= 1;
            j -= 1;
        } else if ins <= del {
            path.push(Edit::insert(i, target[j - 1].clone()));
            j -= 1;
        } else {
            path.push(Edit::delete(i - 1));
            i -= 1;
        }
    }

    // Collected back to front
    path.reverse();
    path
}

/// Edit list turning `source` into `target`
pub fn diff<T: PartialEq + Clone>(source: &[T], target: &[T], costs: EditCosts) -> Vec<Edit<T>> {
    edit_path(&cost_matrix(source, target, costs), target)
}

/// Cheapest edit cost between two sequences using unit costs
pub fn edit_distance<T: PartialEq>(source: &[T], target: &[T]) -> u32 {
    cost_matrix(source, target, EditCosts::default()).distance()
}

/// Apply `edits` in order to a copy of `source`
///
/// Positions refer to the unpatched `source`; the running length change of
/// already-applied edits is carried forward so any contiguous tail of an
/// [`edit_path`] result can be applied on its own. Edits pointing past the
/// end of the sequence are ignored.
pub fn patch<T: Clone>(edits: &[Edit<T>], source: &[T]) -> Vec<T> {
    let mut out = source.to_vec();
    let mut shift: isize = 0;

    for edit in edits {
        let Some(index) = edit.position.checked_add_signed(shift) else {
            continue;
        };
        match (edit.kind, &edit.token) {
            (EditKind::Insert, Some(token)) => {
                out.insert(index.min(out.len()), token.clone());
                shift += 1;
            }
            (EditKind::Insert, None) => {}
            (EditKind::Substitute, Some(token)) => {
                if let Some(slot) = out.get_mut(index) {
                    *slot = token.clone();
                }
            }
            (EditKind::Substitute, None) => {
                if index < out.len() {
                    out.remove(index);
                    shift -= 1;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn round_trip(source: &str, target: &str, costs: EditCosts) {
        let source = chars(source);
        let target = chars(target);
        let edits = diff(&source, &target, costs);
        assert_eq!(patch(&edits, &source), target, "edits: {:?}", edits);
    }

    #[test]
    fn test_cost_matrix_distance() {
        assert_eq!(edit_distance(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(edit_distance(&chars(""), &chars("abc")), 3);
        assert_eq!(edit_distance(&chars("abc"), &chars("")), 3);
        assert_eq!(edit_distance(&chars("flaw"), &chars("lawn")), 2);
    }

    #[test]
    fn test_cost_matrix_borders_use_costs() {
        let costs = EditCosts::TEXT_MORPH;
        let matrix = cost_matrix(&chars("ab"), &chars("xyz"), costs);
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 4);
        assert_eq!(matrix.get(2, 0), 4);
        assert_eq!(matrix.get(0, 3), 6);
    }

    #[test]
    fn test_default_substitute_is_max() {
        assert_eq!(EditCosts::new(1, 4).substitute, 4);
        assert_eq!(EditCosts::default(), EditCosts::new(1, 1));
    }

    #[test]
    fn test_identical_sequences_have_no_edits() {
        let s = chars("unchanged");
        assert!(diff(&s, &s, EditCosts::default()).is_empty());
    }

    #[test]
    fn test_edit_path_prefers_substitution() {
        let edits = diff(&chars("cat"), &chars("cut"), EditCosts::default());
        assert_eq!(edits, vec![Edit::substitute(1, 'u')]);
    }

    #[test]
    fn test_edit_path_deletion() {
        let edits = diff(&chars("ab"), &chars("b"), EditCosts::default());
        assert_eq!(edits, vec![Edit::delete(0)]);
        assert!(edits[0].is_deletion());
    }

    #[test]
    fn test_edit_path_in_document_order() {
        let edits = diff(&chars("abcdef"), &chars("xbcdy"), EditCosts::TEXT_MORPH);
        let positions: Vec<usize> = edits.iter().map(|e| e.position).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_diff_patch_round_trip() {
        let pairs = [
            ("", ""),
            ("", "abc"),
            ("abc", ""),
            ("kitten", "sitting"),
            ("abc", "abcdef"),
            ("abcdef", "abc"),
            ("hello world", "yellow word"),
            ("aaaa", "bbbbbb"),
            ("interpolate", "extrapolation"),
        ];
        for (source, target) in pairs {
            round_trip(source, target, EditCosts::default());
            round_trip(source, target, EditCosts::TEXT_MORPH);
            round_trip(target, source, EditCosts::TEXT_MORPH);
        }
    }

    #[test]
    fn test_patch_tail_of_edit_list() {
        let source = chars("abcdef");
        let target = chars("abc");
        let edits = diff(&source, &target, EditCosts::TEXT_MORPH);
        assert_eq!(edits.len(), 3);

        let tail = &edits[1..];
        assert_eq!(patch(tail, &source), chars("abcd"));
    }

    #[test]
    fn test_patch_ignores_out_of_range_edits() {
        let source = chars("ab");
        let edits = vec![Edit::substitute(9, 'x'), Edit::delete(7)];
        assert_eq!(patch(&edits, &source), source);
    }
}
