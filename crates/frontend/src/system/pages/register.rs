use contracts::system::users::RegisterDto;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::toast::use_toasts;
use crate::system::auth::api;

pub const MIN_PASSWORD_LEN: usize = 4;

/// Проверка формы до отправки; сервер проверяет то же самое
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), &'static str> {
    if username.trim().is_empty() {
        return Err("Укажите логин");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Пароль должен быть не короче 4 символов");
    }
    if password != confirm {
        return Err("Пароли не совпадают");
    }
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[component]
pub fn RegisterPage(on_back: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();

    let username = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error_message = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Err(msg) =
            validate_registration(&username.get(), &password.get(), &confirm.get())
        {
            error_message.set(Some(msg.to_string()));
            return;
        }

        let dto = RegisterDto {
            username: username.get().trim().to_string(),
            password: password.get(),
            email: non_empty(email.get()),
            full_name: non_empty(full_name.get()),
        };
        is_loading.set(true);
        error_message.set(None);

        spawn_local(async move {
            match api::register(&dto).await {
                Ok(()) => {
                    toasts.success("Регистрация выполнена, войдите с новым паролем");
                    on_back.run(());
                }
                Err(e) => error_message.set(Some(e.to_string())),
            }
            is_loading.set(false);
        });
    };

    let field = move |id: &'static str, label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type=kind
                    id=id
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
                <h2>"Регистрация"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    {field("reg-username", "Логин", "text", username)}
                    {field("reg-full-name", "ФИО", "text", full_name)}
                    {field("reg-email", "Email", "email", email)}
                    {field("reg-password", "Пароль", "password", password)}
                    {field("reg-confirm", "Повтор пароля", "password", confirm)}

                    <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                        {move || if is_loading.get() { "Отправка..." } else { "Зарегистрироваться" }}
                    </button>
                </form>

                <div class="login-info">
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        on_back.run(());
                    }>
                        "Уже есть учётная запись? Войти"
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
    fn test_validate_registration() {
        assert!(validate_registration("ivan", "secret1", "secret1").is_ok());
        assert_eq!(validate_registration(" ", "secret1", "secret1"), Err("Укажите логин"));
        assert!(validate_registration("ivan", "123", "123").is_err());
        assert_eq!(
            validate_registration("ivan", "secret1", "secret2"),
            Err("Пароли не совпадают")
        );
    }
}
