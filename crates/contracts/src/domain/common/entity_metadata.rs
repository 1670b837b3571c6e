use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Служебные поля записи: время создания и изменения, пометка удаления, версия
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    /// Растёт на 1 при каждой записи; фронт использует её в ключах списков
    pub version: i32,
}

impl EntityMetadata {
    pub fn new() -> Self {
        Self::created_at(Utc::now())
    }

    pub fn created_at(at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            updated_at: at,
            is_deleted: false,
            version: 0,
        }
    }

    /// Восстановление из строки таблицы. Старые строки могли не иметь дат,
    /// тогда считаем их созданными сейчас.
    pub fn restore(
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        is_deleted: bool,
        version: i32,
    ) -> Self {
        let created_at = created_at.unwrap_or_else(Utc::now);
        Self {
            created_at,
            updated_at: updated_at.unwrap_or(created_at),
            is_deleted,
            version,
        }
    }

    pub fn record_change(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }

    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.record_change();
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_without_dates() {
        let m = EntityMetadata::restore(None, None, false, 3);
        assert_eq!(m.created_at, m.updated_at);
        assert_eq!(m.version, 3);
    }

    #[test]
    fn test_record_change_bumps_version() {
        let mut m = EntityMetadata::new();
        m.record_change();
        m.mark_deleted();
        assert_eq!(m.version, 2);
        assert!(m.is_deleted);
        assert!(m.updated_at >= m.created_at);
    }
}
