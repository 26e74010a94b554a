//! Pagination math and the "Mostrando a-b de n" label.

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Derived pagination for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
    total_count: usize,
}

impl Pagination {
    /// `page_index` is zero-based. A zero page size is treated as 1.
    pub fn new(page_index: usize, page_size: usize, total_count: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
            total_count,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// `ceil(total_count / page_size)`.
    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }

    /// First/previous controls are enabled.
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Next/last controls are enabled.
    ///
    /// Disabled on the last page, and when there are no pages at all.
    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn first(&self) -> Option<usize> {
        self.can_previous().then_some(0)
    }

    pub fn previous(&self) -> Option<usize> {
        self.can_previous().then(|| self.page_index - 1)
    }

    pub fn next(&self) -> Option<usize> {
        self.can_next().then(|| self.page_index + 1)
    }

    pub fn last(&self) -> Option<usize> {
        self.can_next().then(|| self.page_count() - 1)
    }

    /// One-based inclusive range of rows on this page, `(0, 0)` if none.
    pub fn range(&self) -> (usize, usize) {
        let from = self.page_index * self.page_size + 1;
        if self.total_count == 0 || from > self.total_count {
            return (0, 0);
        }
        let to = ((self.page_index + 1) * self.page_size).min(self.total_count);
        (from, to)
    }

    pub fn label(&self) -> String {
        let (from, to) = self.range();
        format!("Mostrando {}-{} de {}", from, to, self.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(Pagination::new(0, 10, 23).page_count(), 3);
        assert_eq!(Pagination::new(0, 10, 20).page_count(), 2);
        assert_eq!(Pagination::new(0, 10, 0).page_count(), 0);
    }

    #[test]
    fn test_navigation_targets() {
        let middle = Pagination::new(1, 10, 23);
        assert_eq!(middle.first(), Some(0));
        assert_eq!(middle.previous(), Some(0));
        assert_eq!(middle.next(), Some(2));
        assert_eq!(middle.last(), Some(2));

        let first = Pagination::new(0, 10, 23);
        assert_eq!(first.first(), None);
        assert_eq!(first.previous(), None);
    }

    #[test]
    fn test_empty_table_disables_everything() {
        let empty = Pagination::new(0, 10, 0);
        assert!(!empty.can_previous());
        assert!(!empty.can_next());
        assert_eq!(empty.label(), "Mostrando 0-0 de 0");
    }
}
