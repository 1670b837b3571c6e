use crate::dashboards::common::{DayCount, GroupCount};
use crate::domain::a003_inquiry::list::StatusCounts;
use serde::{Deserialize, Serialize};

/// Сводка по обращениям за период
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InquirySummaryReport {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_category: Vec<GroupCount>,
    /// Ключ "" означает обращения без тренера
    pub by_trainer: Vec<GroupCount>,
    pub by_day: Vec<DayCount>,
}
