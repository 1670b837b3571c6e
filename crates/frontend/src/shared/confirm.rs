/// Браузерный confirm(); без window считаем, что пользователь отказался
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|win| win.confirm_with_message(message).ok())
        .unwrap_or(false)
}
