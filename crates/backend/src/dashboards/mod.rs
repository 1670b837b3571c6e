pub mod common;
pub mod d400_inquiry_summary;
pub mod d401_trainer_performance;
pub mod d402_section_follow_ups;
pub mod export;
