use contracts::system::auth::UserInfo;
use contracts::system::users::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::RefCell;

use super::{api, storage};
use crate::shared::api_utils::ApiError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some() && self.user_info.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user_info.as_ref().map(|u| u.role)
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_info.as_ref().map(|u| u.id.clone())
    }
}

thread_local! {
    // API-хелперы работают вне дерева компонентов, поэтому сеттер
    // регистрируется здесь при монтировании AuthProvider
    static AUTH_SETTER: RefCell<Option<WriteSignal<AuthState>>> = const { RefCell::new(None) };
}

fn with_setter(f: impl FnOnce(WriteSignal<AuthState>)) {
    if let Some(setter) = AUTH_SETTER.with(|cell| *cell.borrow()) {
        f(setter);
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    // The stored record lets the shell render before /me answers
    let restored = AuthState {
        access_token: storage::get_access_token(),
        user_info: storage::get_user(),
    };
    let (auth_state, set_auth_state) = signal(restored);
    AUTH_SETTER.with(|cell| *cell.borrow_mut() = Some(set_auth_state));

    // Validate the restored session once on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let Some(access_token) = storage::get_access_token() else {
                return;
            };
            match api::get_current_user(&access_token).await {
                Ok(user_info) => {
                    storage::save_user(&user_info);
                    set_auth_state.set(AuthState {
                        access_token: Some(access_token),
                        user_info: Some(user_info),
                    });
                }
                Err(ApiError::Unauthorized) => {
                    // Token expired, try refresh
                    match refresh_session().await {
                        Some(token) => match api::get_current_user(&token).await {
                            Ok(user_info) => {
                                storage::save_user(&user_info);
                                set_auth_state.set(AuthState {
                                    access_token: Some(token),
                                    user_info: Some(user_info),
                                });
                            }
                            Err(e) => {
                                log::warn!("Session restore failed: {}", e);
                                expire_session();
                            }
                        },
                        None => expire_session(),
                    }
                }
                // сервер недоступен: оставляем сохранённую сессию
                Err(e) => log::warn!("Could not validate session: {}", e),
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Обменивает refresh token на новый access token.
/// `None`, если обновить сессию не удалось.
pub async fn refresh_session() -> Option<String> {
    let refresh_token = storage::get_refresh_token()?;
    match api::refresh_token(refresh_token).await {
        Ok(response) => {
            storage::save_access_token(&response.access_token);
            let token = response.access_token;
            with_setter(|set| {
                let token = token.clone();
                set.update(move |s| s.access_token = Some(token));
            });
            Some(token)
        }
        Err(e) => {
            log::warn!("Token refresh failed: {}", e);
            None
        }
    }
}

/// Принудительный выход: токены стираются, показывается страница входа
pub fn expire_session() {
    storage::clear_tokens();
    with_setter(|set| set.set(AuthState::default()));
}

/// Helper: Perform login
pub async fn do_login(
    username: String,
    password: String,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), ApiError> {
    let response = api::login(username, password).await?;

    storage::save_session(&response);

    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
    });

    Ok(())
}

/// Helper: Perform logout
pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }

    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
