pub mod common;
pub mod d400_inquiry_summary;
pub mod d401_trainer_performance;
pub mod d402_section_follow_ups;

pub use d400_inquiry_summary::ui::InquirySummaryDashboard;
pub use d401_trainer_performance::ui::TrainerPerformanceDashboard;
pub use d402_section_follow_ups::ui::SectionFollowUpsDashboard;
