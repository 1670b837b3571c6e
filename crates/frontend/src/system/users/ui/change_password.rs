use contracts::system::users::{ChangePasswordDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::modal_frame::ModalFrame;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;
use crate::system::pages::register::MIN_PASSWORD_LEN;
use crate::system::users::api;

pub fn validate_new_password(new_password: &str, confirm: &str) -> Result<(), &'static str> {
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Пароль должен быть не короче 4 символов");
    }
    if new_password != confirm {
        return Err("Пароли не совпадают");
    }
    Ok(())
}

/// Смена собственного пароля (нужен текущий пароль)
#[component]
pub fn ChangePasswordPage() -> impl IntoView {
    let toasts = use_toasts();
    let (auth_state, _) = use_auth();

    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let on_save = move |_| {
        let Some(user_id) = auth_state.get_untracked().user_id() else {
            return;
        };
        if old_password.get().is_empty() {
            set_error.set(Some("Укажите текущий пароль".to_string()));
            return;
        }
        if let Err(msg) = validate_new_password(&new_password.get(), &confirm.get()) {
            set_error.set(Some(msg.to_string()));
            return;
        }

        let dto = ChangePasswordDto {
            user_id,
            old_password: Some(old_password.get()),
            new_password: new_password.get(),
        };
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => {
                    toasts.success("Пароль изменён");
                    old_password.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_saving.set(false);
        });
    };

    view! {
        <PageFrame page_id="sys_users--change_password" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Смена пароля"</h1>
                </div>
            </div>
            <div class="page__content" style="max-width: 420px;">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="form__group">
                    <Label>"Текущий пароль"</Label>
                    <Input value=old_password input_type=InputType::Password />
                </div>
                <div class="form__group">
                    <Label>"Новый пароль"</Label>
                    <Input value=new_password input_type=InputType::Password />
                </div>
                <div class="form__group">
                    <Label>"Повтор нового пароля"</Label>
                    <Input value=confirm input_type=InputType::Password />
                </div>

                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Сохранение..." } else { "Сменить пароль" }}
                </Button>
            </div>
        </PageFrame>
    }
}

/// Сброс пароля другого пользователя администратором
#[component]
pub fn ResetPasswordForm<F>(user: User, on_close: F) -> impl IntoView
where
    F: Fn() + 'static + Copy + Send + Sync,
{
    let toasts = use_toasts();
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let user_id = user.id.clone();

    let on_save = move |_| {
        if let Err(msg) = validate_new_password(&new_password.get(), &confirm.get()) {
            set_error.set(Some(msg.to_string()));
            return;
        }
        let dto = ChangePasswordDto {
            user_id: user_id.clone(),
            old_password: None,
            new_password: new_password.get(),
        };
        set_saving.set(true);
        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => {
                    toasts.success("Пароль сброшен");
                    on_close();
                }
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <ModalFrame
            title=format!("Новый пароль: {}", user.username)
            on_close=Callback::new(move |_| on_close())
        >
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__group">
                <Label>"Новый пароль"</Label>
                <Input value=new_password input_type=InputType::Password />
            </div>
            <div class="form__group">
                <Label>"Повтор пароля"</Label>
                <Input value=confirm input_type=InputType::Password />
            </div>

            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close()>
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=Signal::derive(move || saving.get())
                >
                    "Сохранить"
                </Button>
            </div>
        </ModalFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("abcd", "abcd").is_ok());
        assert!(validate_new_password("abc", "abc").is_err());
        assert_eq!(validate_new_password("abcd", "abce"), Err("Пароли не совпадают"));
    }
}
