//! Категории страниц внутри табов.
//!
//! Корневой элемент каждой страницы несёт `id="{сущность}--{категория}"`
//! (например `a003_inquiry--list`) и `data-page-category`. По id из
//! инспектора DOM сразу находится каталог модуля.

pub const PAGE_CAT_LIST: &str = "list";
pub const PAGE_CAT_DETAIL: &str = "detail";
/// Отчёты d4xx
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";
pub const PAGE_CAT_SYSTEM: &str = "system";

/// CSS-класс корня страницы для категории; `None` для неизвестной
pub fn category_class(category: &str) -> Option<&'static str> {
    match category {
        PAGE_CAT_LIST | PAGE_CAT_SYSTEM => Some("page"),
        PAGE_CAT_DETAIL => Some("page page--detail"),
        PAGE_CAT_DASHBOARD => Some("page page--dashboard"),
        _ => None,
    }
}

/// Разбирает id страницы на сущность и категорию
pub fn split_page_id(id: &str) -> Option<(&str, &str)> {
    id.split_once("--")
        .filter(|(entity, category)| !entity.is_empty() && !category.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_page_id() {
        assert_eq!(
            split_page_id("d400_inquiry_summary--dashboard"),
            Some(("d400_inquiry_summary", "dashboard"))
        );
        assert_eq!(split_page_id("a003_inquiry"), None);
        assert_eq!(split_page_id("--list"), None);
        assert_eq!(split_page_id("a003_inquiry--"), None);
    }

    #[test]
    fn test_category_class() {
        assert_eq!(category_class(PAGE_CAT_SYSTEM), Some("page"));
        assert_eq!(category_class(PAGE_CAT_DETAIL), Some("page page--detail"));
        assert_eq!(category_class("legacy"), None);
    }
}
