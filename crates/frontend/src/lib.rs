pub mod app;
pub mod dashboards;
pub mod domain;
pub mod layout;
pub mod routes;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

/// Точка входа wasm: лог в консоль браузера, паники с трассой, монтирование App
#[wasm_bindgen(start)]
pub fn start() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(app::App);
}
