//! Tab labels - единственный источник правды для заголовков табов.
//!
//! Для агрегатов берём `list_name` из contracts, для остального хардкод.

use contracts::domain::a001_section::aggregate::Section;
use contracts::domain::a002_category::aggregate::Category;
use contracts::domain::common::AggregateRoot;

const INQUIRY_DETAIL_PREFIX: &str = "a003_inquiry_detail_";

/// Возвращает читаемый заголовок таба для данного ключа.
/// Fallback: пустая строка.
pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        // ── Aggregates ───────────────────────────────────────────────────
        "a001_section" => Section::list_name(),
        "a002_category" => Category::list_name(),
        "a003_inquiry_mine" => "Мои обращения",
        "a003_inquiry_assigned" => "Назначенные обращения",
        "a003_inquiry_all" => "Все обращения",
        "a003_inquiry_detail" => "Обращение",
        "a004_follow_up_inbox" => "Запросы в отдел",
        "a006_notification" => "Уведомления",
        "a007_trainer_board" => "Доска тренеров",

        // ── Dashboards (d4xx) ────────────────────────────────────────────
        "d400_inquiry_summary" => "Сводка по обращениям",
        "d401_trainer_performance" => "Эффективность тренеров",
        "d402_section_follow_ups" => "Запросы по отделам",

        // ── System ───────────────────────────────────────────────────────
        "sys_users" => "Пользователи",
        "sys_change_password" => "Смена пароля",

        _ => "",
    }
}

/// Формирует заголовок detail-таба: «<entity> · <identifier>».
pub fn detail_tab_label(entity_label: &'static str, identifier: &str) -> String {
    format!("{} · {}", entity_label, identifier)
}

pub fn inquiry_tab_key(id: &str) -> String {
    format!("{}{}", INQUIRY_DETAIL_PREFIX, id)
}

/// Id обращения из ключа detail-таба
pub fn parse_inquiry_tab_key(key: &str) -> Option<&str> {
    key.strip_prefix(INQUIRY_DETAIL_PREFIX)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_have_labels() {
        for key in [
            "a001_section",
            "a002_category",
            "a003_inquiry_mine",
            "a003_inquiry_assigned",
            "a004_follow_up_inbox",
            "a006_notification",
            "a007_trainer_board",
            "d400_inquiry_summary",
            "sys_users",
        ] {
            assert!(!tab_label_for_key(key).is_empty(), "no label for {}", key);
        }
        assert_eq!(tab_label_for_key("a001_section"), "Отделы");
        assert_eq!(tab_label_for_key("unknown"), "");
    }

    #[test]
    fn test_inquiry_key_round_trip() {
        let key = inquiry_tab_key("3f1c");
        assert_eq!(key, "a003_inquiry_detail_3f1c");
        assert_eq!(parse_inquiry_tab_key(&key), Some("3f1c"));
        assert_eq!(parse_inquiry_tab_key("a003_inquiry_detail_"), None);
        assert_eq!(parse_inquiry_tab_key("a003_inquiry_mine"), None);
    }

    #[test]
    fn test_detail_label() {
        assert_eq!(
            detail_tab_label("Обращение", "INQ-20250301-AB12"),
            "Обращение · INQ-20250301-AB12"
        );
    }
}
