pub mod a001_section;
pub mod a002_category;
pub mod a003_inquiry;
pub mod a004_follow_up;
pub mod a005_rating;
pub mod a006_notification;
pub mod a007_trainer_task;
pub mod reports;
