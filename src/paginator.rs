/// Page window over a list of `total_count` items, for the page `page` (1-based).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_count: u32,
}

/// How many page numbers are shown around the edges and around the current page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEdges {
    pub left_edge: u32,
    pub left_current: u32,
    pub right_current: u32,
    pub right_edge: u32,
}

impl Default for PageEdges {
    fn default() -> Self {
        PageEdges {
            left_edge: 2,
            left_current: 2,
            right_current: 5,
            right_edge: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageItem {
    Page(u32),
    /// One or more pages left out
    Gap,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32, total_count: u32) -> Self {
        Pagination {
            page,
            per_page,
            total_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// Number of items before the current page
    pub fn skip(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * (self.per_page as usize)
    }

    /// Page numbers to display, `1 2 … 5 6 7 8 9 10 11 … 19 20` style
    pub fn pages(&self) -> PageSequence {
        self.pages_with(PageEdges::default())
    }

    pub fn pages_with(&self, edges: PageEdges) -> PageSequence {
        PageSequence {
            page: self.page as i64,
            page_count: self.page_count(),
            edges,
            next: 1,
            last: 0,
            pending: None,
        }
    }
}

/// Lazy sequence of page numbers and gaps. Clone it to walk it again.
#[derive(Debug, Clone)]
pub struct PageSequence {
    page: i64,
    page_count: u32,
    edges: PageEdges,
    next: u32,
    last: u32,
    pending: Option<u32>,
}

impl PageSequence {
    fn is_shown(&self, num: u32) -> bool {
        let n = num as i64;
        let edges = &self.edges;
        num <= edges.left_edge
            || (n > self.page - edges.left_current as i64 - 1 && n < self.page + edges.right_current as i64)
            || n > self.page_count as i64 - edges.right_edge as i64
    }
}

impl Iterator for PageSequence {
    type Item = PageItem;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(num) = self.pending.take() {
            self.last = num;
            return Some(PageItem::Page(num));
        }

        while self.next <= self.page_count {
            let num = self.next;
            self.next += 1;

            if !self.is_shown(num) {
                continue;
            }

            if self.last + 1 != num {
                self.pending = Some(num);
                return Some(PageItem::Gap);
            }
            self.last = num;
            return Some(PageItem::Page(num));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageItem::{Gap, Page};

    #[test]
    fn test_page_count() {
        let pagination = Pagination::new(1, 10, 45);
        assert_eq!(pagination.page_count(), 5);
        assert!(!pagination.has_previous());
        assert!(pagination.has_next());

        let pagination = Pagination::new(5, 10, 45);
        assert!(pagination.has_previous());
        assert!(!pagination.has_next());

        assert_eq!(Pagination::new(1, 10, 40).page_count(), 4);
        assert_eq!(Pagination::new(1, 10, 0).page_count(), 0);
        assert_eq!(Pagination::new(1, 0, 10).page_count(), 0);
    }

    #[test]
    fn test_skip() {
        assert_eq!(Pagination::new(1, 10, 45).skip(), 0);
        assert_eq!(Pagination::new(3, 10, 45).skip(), 20);
        assert_eq!(Pagination::new(0, 10, 45).skip(), 0);
    }

    #[test]
    fn test_pages_without_gaps() {
        let pages: Vec<PageItem> = Pagination::new(1, 10, 45).pages().collect();
        assert_eq!(pages, [Page(1), Page(2), Page(3), Page(4), Page(5)]);
    }

    #[test]
    fn test_pages_with_gaps() {
        let pages: Vec<PageItem> = Pagination::new(7, 10, 200).pages().collect();
        assert_eq!(pages, [
            Page(1), Page(2), Gap,
            Page(5), Page(6), Page(7), Page(8), Page(9), Page(10), Page(11), Gap,
            Page(19), Page(20),
        ]);
    }

    #[test]
    fn test_pages_first_and_last() {
        let pages: Vec<PageItem> = Pagination::new(1, 10, 200).pages().collect();
        assert_eq!(pages, [Page(1), Page(2), Page(3), Page(4), Page(5), Gap, Page(19), Page(20)]);

        let pages: Vec<PageItem> = Pagination::new(20, 10, 200).pages().collect();
        assert_eq!(pages, [Page(1), Page(2), Gap, Page(18), Page(19), Page(20)]);
    }

    #[test]
    fn test_pages_custom_edges() {
        let edges = PageEdges { left_edge: 1, left_current: 1, right_current: 2, right_edge: 1 };
        let pages: Vec<PageItem> = Pagination::new(5, 1, 10).pages_with(edges).collect();
        assert_eq!(pages, [Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]);
    }

    #[test]
    fn test_pages_restartable() {
        let sequence = Pagination::new(7, 10, 200).pages();
        let first: Vec<PageItem> = sequence.clone().collect();
        let second: Vec<PageItem> = sequence.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pages_empty() {
        assert_eq!(Pagination::new(1, 10, 0).pages().count(), 0);
    }
}
