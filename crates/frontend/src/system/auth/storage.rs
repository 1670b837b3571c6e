//! Сессия в localStorage: токены и карточка пользователя.
//! Ошибки хранилища (приватный режим, квота) не фатальны, сессия просто
//! не переживёт перезагрузку страницы.
use contracts::system::auth::{LoginResponse, UserInfo};
use web_sys::Storage;

#[derive(Clone, Copy)]
enum Key {
    AccessToken,
    RefreshToken,
    User,
}

impl Key {
    const ALL: [Key; 3] = [Key::AccessToken, Key::RefreshToken, Key::User];

    fn name(self) -> &'static str {
        match self {
            Key::AccessToken => "helpdesk_access_token",
            Key::RefreshToken => "helpdesk_refresh_token",
            Key::User => "helpdesk_user",
        }
    }
}

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn read(key: Key) -> Option<String> {
    local_storage()?.get_item(key.name()).ok().flatten()
}

fn write(key: Key, value: &str) {
    let Some(storage) = local_storage() else {
        return;
    };
    if storage.set_item(key.name(), value).is_err() {
        log::warn!("localStorage: failed to write {}", key.name());
    }
}

pub fn get_access_token() -> Option<String> {
    read(Key::AccessToken)
}

pub fn save_access_token(token: &str) {
    write(Key::AccessToken, token);
}

pub fn get_refresh_token() -> Option<String> {
    read(Key::RefreshToken)
}

/// Карточка пользователя лежит рядом с токенами: шапка и меню
/// рисуются сразу, не дожидаясь /me
pub fn get_user() -> Option<UserInfo> {
    serde_json::from_str(&read(Key::User)?).ok()
}

pub fn save_user(user: &UserInfo) {
    match serde_json::to_string(user) {
        Ok(json) => write(Key::User, &json),
        Err(e) => log::warn!("Failed to serialize user record: {}", e),
    }
}

/// Всё, что вернул успешный вход
pub fn save_session(response: &LoginResponse) {
    save_access_token(&response.access_token);
    write(Key::RefreshToken, &response.refresh_token);
    save_user(&response.user);
}

pub fn clear_tokens() {
    if let Some(storage) = local_storage() {
        for key in Key::ALL {
            let _ = storage.remove_item(key.name());
        }
    }
}
