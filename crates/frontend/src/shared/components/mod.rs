pub mod date_input;
pub mod filter_panel;
pub mod pagination_controls;
pub mod status_tabs;
