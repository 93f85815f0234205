//! Positional helpers for immutable item-array edits.
//!
//! Indices are clamped to the array bounds: inserting at `len` appends,
//! replacing at `len` appends, removing at `len` is a no-op.

pub fn insert_at<T: Clone>(items: &[T], index: usize, value: T) -> Vec<T> {
    let index = index.min(items.len());
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(&items[..index]);
    out.push(value);
    out.extend_from_slice(&items[index..]);
    out
}

pub fn replace_at<T: Clone>(items: &[T], index: usize, value: T) -> Vec<T> {
    let index = index.min(items.len());
    let rest = (index + 1).min(items.len());
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(&items[..index]);
    out.push(value);
    out.extend_from_slice(&items[rest..]);
    out
}

pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if index < out.len() {
        out.remove(index);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, vec!["x", "a", "b", "c"])]
    #[case(1, vec!["a", "x", "b", "c"])]
    #[case(3, vec!["a", "b", "c", "x"])]
    // Beyond the end clamps to append.
    #[case(9, vec!["a", "b", "c", "x"])]
    fn insert_at_boundaries(#[case] index: usize, #[case] expected: Vec<&str>) {
        assert_eq!(insert_at(&["a", "b", "c"], index, "x"), expected);
    }

    #[rstest]
    #[case(0, vec!["y", "b", "c"])]
    #[case(1, vec!["a", "y", "c"])]
    #[case(2, vec!["a", "b", "y"])]
    // Replacing at len appends, mirroring slice-and-splice semantics.
    #[case(3, vec!["a", "b", "c", "y"])]
    fn replace_at_boundaries(#[case] index: usize, #[case] expected: Vec<&str>) {
        assert_eq!(replace_at(&["a", "b", "c"], index, "y"), expected);
    }

    #[rstest]
    #[case(0, vec!["b", "c"])]
    #[case(1, vec!["a", "c"])]
    #[case(2, vec!["a", "b"])]
    #[case(3, vec!["a", "b", "c"])]
    fn remove_at_boundaries(#[case] index: usize, #[case] expected: Vec<&str>) {
        assert_eq!(remove_at(&["a", "b", "c"], index), expected);
    }

    #[test]
    fn empty_array_edge_cases() {
        let empty: [&str; 0] = [];
        assert_eq!(insert_at(&empty, 0, "x"), vec!["x"]);
        assert_eq!(replace_at(&empty, 0, "x"), vec!["x"]);
        assert_eq!(remove_at(&empty, 0), Vec::<&str>::new());
    }
}
