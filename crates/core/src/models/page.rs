use serde::{Deserialize, Serialize};

/// One page of a paginated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// 1-based page number actually returned (requested page clamped into range)
    pub page: usize,

    /// Always at least 1
    pub total_pages: usize,

    pub total_items: usize,

    pub page_size: usize,
}

impl<T> Page<T> {
    /// 1-based index of the first item on this page (0 when there are no items).
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item on this page.
    pub fn last_index(&self) -> usize {
        ((self.page - 1) * self.page_size + self.items.len()).min(self.total_items)
    }

    /// `"Showing 11 to 20 of 34 trades"`
    pub fn range_label(&self, noun: &str) -> String {
        format!(
            "Showing {} to {} of {} {noun}",
            self.first_index(),
            self.last_index(),
            self.total_items
        )
    }

    /// `"Page 2 of 4"`
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }

    /// Next page number, wrapping from the last page to the first.
    pub fn next_page(&self) -> usize {
        if self.page >= self.total_pages {
            1
        } else {
            self.page + 1
        }
    }

    /// Previous page number, wrapping from the first page to the last.
    pub fn prev_page(&self) -> usize {
        if self.page <= 1 {
            self.total_pages
        } else {
            self.page - 1
        }
    }

    /// Pagination controls are only shown when there is more than one page.
    pub fn needs_pagination(&self) -> bool {
        self.total_pages > 1
    }
}
