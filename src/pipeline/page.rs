//! Page stage: fixed-size windows over the sorted result.

/// Number of pages needed for `len` rows, never less than 1.
pub fn page_count(len: usize, size: usize) -> usize {
    len.div_ceil(size.max(1)).max(1)
}

/// Clamp a 1-based page index into `[1, page_count(len, size)]`.
pub fn clamp_index(len: usize, size: usize, index: usize) -> usize {
    index.clamp(1, page_count(len, size))
}

/// The rows of page `index` (1-based). Out-of-range indexes are clamped.
///
/// A `size` of 0 is treated as 1.
pub fn page<R>(records: &[R], size: usize, index: usize) -> &[R] {
    let size = size.max(1);
    let index = clamp_index(records.len(), size, index);
    let start = ((index - 1) * size).min(records.len());
    let end = start.saturating_add(size).min(records.len());
    &records[start..end]
}

/// Position of the current window within the result set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub size: usize,
    pub index: usize,
    pub total: usize,
}

impl PageWindow {
    pub fn for_len(len: usize, size: usize, index: usize) -> Self {
        let size = size.max(1);
        Self { size, index: clamp_index(len, size, index), total: page_count(len, size) }
    }

    pub fn is_first(&self) -> bool {
        self.index <= 1
    }

    pub fn is_last(&self) -> bool {
        self.index >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_may_be_short() {
        let v: Vec<u32> = (1..=7).collect();
        assert_eq!(page(&v, 3, 1), &[1, 2, 3]);
        assert_eq!(page(&v, 3, 3), &[7]);
        assert_eq!(page_count(v.len(), 3), 3);
    }

    #[test]
    fn out_of_range_indexes_clamp() {
        let v: Vec<u32> = (1..=7).collect();
        assert_eq!(page(&v, 3, 0), page(&v, 3, 1));
        assert_eq!(page(&v, 3, 9999), page(&v, 3, 3));
    }

    #[test]
    fn empty_input_has_one_empty_page() {
        let v: Vec<u32> = Vec::new();
        assert!(page(&v, 10, 1).is_empty());
        assert!(page(&v, 10, 5).is_empty());
        assert_eq!(page_count(0, 10), 1);
        let w = PageWindow::for_len(0, 10, 4);
        assert_eq!((w.index, w.total), (1, 1));
        assert!(w.is_first() && w.is_last());
    }

    #[test]
    fn zero_size_behaves_like_one() {
        let v = [1, 2, 3];
        assert_eq!(page(&v, 0, 2), &[2]);
        assert_eq!(page_count(3, 0), 3);
    }
}
