use super::EntityMetadata;

/// Корень агрегата: идентичность, служебные поля и имена для UI и БД.
/// Таблица агрегата называется `{aggregate_index}_{collection_name}`.
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    fn code(&self) -> &str;

    fn description(&self) -> &str;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// "a001", "a002", ...
    fn aggregate_index() -> &'static str;

    fn collection_name() -> &'static str;

    /// "Отдел"
    fn element_name() -> &'static str;

    /// "Отделы"; заголовок списка и таба
    fn list_name() -> &'static str;

    fn full_name() -> String {
        [Self::aggregate_index(), Self::collection_name()].join("_")
    }
}
