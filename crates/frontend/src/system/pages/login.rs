use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::context::{do_login, use_auth};

/// Логин и пароль из формы; пустые поля до сервера не отправляем
pub fn login_credentials(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Введите логин и пароль");
    }
    Ok((username.to_string(), password.to_string()))
}

#[component]
pub fn LoginPage(on_register: Callback<()>) -> impl IntoView {
    let (_, set_auth_state) = use_auth();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error_message = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (login, secret) = match login_credentials(&username.get(), &password.get()) {
            Ok(pair) => pair,
            Err(msg) => {
                error_message.set(Some(msg.to_string()));
                return;
            }
        };
        is_loading.set(true);
        error_message.set(None);

        spawn_local(async move {
            // успешный вход меняет AuthState, дальше AppRoutes покажет MainLayout
            if let Err(e) = do_login(login, secret, set_auth_state).await {
                password.set(String::new());
                error_message.set(Some(e.to_string()));
            }
            is_loading.set(false);
        });
    };

    let field = move |id: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      autocomplete: &'static str,
                      value: RwSignal<String>| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type=kind
                    id=id
                    autocomplete=autocomplete
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                    disabled=move || is_loading.get()
                />
            </div>
        }
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Helpdesk"</h1>
                <h2>"Вход в систему"</h2>

                {move || error_message.get().map(|msg| view! { <div class="error-message">{msg}</div> })}

                <form on:submit=on_submit>
                    {field("username", "Логин", "text", "username", username)}
                    {field("password", "Пароль", "password", "current-password", password)}
                    <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                        {move || if is_loading.get() { "Вход..." } else { "Войти" }}
                    </button>
                </form>

                <div class="login-info">
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        on_register.run(());
                    }>
                        "Нет учётной записи? Зарегистрироваться"
                    </a>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_credentials_trim_username_only() {
        assert_eq!(
            login_credentials("  anna ", " pw "),
            Ok(("anna".to_string(), " pw ".to_string()))
        );
        assert!(login_credentials("   ", "pw").is_err());
        assert!(login_credentials("anna", "").is_err());
    }
}
