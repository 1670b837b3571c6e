use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const MAX_PAGE_SIZE: usize = 200;

/// Одна страница списка (страницы нумеруются с 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> PageResponse<T> {
    /// Slices an already filtered and sorted list into the requested page.
    /// A page past the end is clamped to the last page.
    pub fn paginate(all: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = normalize_page_size(page_size);
        let total_count = all.len();
        let total_pages = total_pages(total_count, page_size);
        let page = page.min(total_pages - 1);
        let start = page * page_size;
        let items = all.into_iter().skip(start).take(page_size).collect();
        Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        }
    }

    pub fn empty(page_size: usize) -> Self {
        Self::paginate(Vec::new(), 0, page_size)
    }
}

/// 0 means "use the default", anything above the cap is cut down to it
pub fn normalize_page_size(page_size: usize) -> usize {
    match page_size {
        0 => DEFAULT_PAGE_SIZE,
        n => n.min(MAX_PAGE_SIZE),
    }
}

/// Всегда хотя бы одна страница, даже для пустого списка
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if total_count == 0 {
        1
    } else {
        total_count.div_ceil(page_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let data: Vec<u32> = (0..55).collect();
        let page = PageResponse::paginate(data, 1, 25);
        assert_eq!(page.items.first(), Some(&25));
        assert_eq!(page.items.len(), 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 55);
    }

    #[test]
    fn test_paginate_clamps_page_past_end() {
        let data: Vec<u32> = (0..30).collect();
        let page = PageResponse::paginate(data, 9, 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, (25..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let page: PageResponse<u32> = PageResponse::empty(0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 0);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_size_is_capped() {
        assert_eq!(normalize_page_size(10_000), MAX_PAGE_SIZE);
        assert_eq!(normalize_page_size(50), 50);
    }
}
