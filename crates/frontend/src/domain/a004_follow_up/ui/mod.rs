pub mod answer_dialog;
pub mod inbox;
pub mod inquiry_panel;
pub mod route_dialog;
