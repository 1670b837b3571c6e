use serde::{Deserialize, Serialize};

/// Строка отчёта по работе тренеров
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerPerformanceRow {
    pub trainer_id: String,
    pub trainer_name: String,
    pub assigned: usize,
    pub closed: usize,
    /// Обращения, которые переоткрывались хотя бы раз
    pub reopened: usize,
    pub avg_rating: Option<f64>,
    pub ratings_count: usize,
    /// Среднее время от создания до закрытия, часы
    pub avg_close_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainerPerformanceReport {
    pub rows: Vec<TrainerPerformanceRow>,
}
