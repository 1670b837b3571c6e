use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFollowUpRow {
    pub section_id: String,
    pub section_name: String,
    pub requested: usize,
    pub answered: usize,
    pub pending: usize,
    pub avg_answer_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionFollowUpReport {
    pub rows: Vec<SectionFollowUpRow>,
}
