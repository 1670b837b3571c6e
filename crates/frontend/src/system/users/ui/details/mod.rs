use contracts::domain::a001_section::aggregate::Section;
use contracts::domain::common::AggregateId;
use contracts::system::users::{CreateUserDto, Role, UpdateUserDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::modal_frame::ModalFrame;
use crate::system::pages::register::MIN_PASSWORD_LEN;
use crate::system::users::api;

/// Проверка формы пользователя; `password` задаётся только при создании
pub fn validate_user_form(
    username: &str,
    password: Option<&str>,
    role: Role,
    section_id: &str,
) -> Result<(), &'static str> {
    if username.trim().is_empty() {
        return Err("Укажите логин");
    }
    if let Some(password) = password {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Пароль должен быть не короче 4 символов");
        }
    }
    if role.requires_section() && section_id.trim().is_empty() {
        return Err("Для ассистента нужно выбрать отдел");
    }
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Создание (`user = None`) или редактирование пользователя
#[component]
pub fn UserForm<F1, F2>(
    user: Option<User>,
    sections: Vec<Section>,
    on_close: F1,
    on_saved: F2,
) -> impl IntoView
where
    F1: Fn() + 'static + Copy + Send + Sync,
    F2: Fn() + 'static + Copy + Send + Sync,
{
    let is_new = user.is_none();
    let user_id = user.as_ref().map(|u| u.id.clone());
    let title = match &user {
        Some(u) => format!("Редактирование: {}", u.username),
        None => "Новый пользователь".to_string(),
    };

    let username = RwSignal::new(user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let password = RwSignal::new(String::new());
    let email = RwSignal::new(user.as_ref().and_then(|u| u.email.clone()).unwrap_or_default());
    let full_name =
        RwSignal::new(user.as_ref().and_then(|u| u.full_name.clone()).unwrap_or_default());
    let role = RwSignal::new(
        user.as_ref()
            .map(|u| u.role)
            .unwrap_or_default()
            .as_str()
            .to_string(),
    );
    let section_id =
        RwSignal::new(user.as_ref().and_then(|u| u.section_id.clone()).unwrap_or_default());
    let is_active = RwSignal::new(user.as_ref().map(|u| u.is_active).unwrap_or(true));
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let selected_role = move || role.get().parse::<Role>().unwrap_or_default();

    let on_save = move |_| {
        let role_value = selected_role();
        let pwd = password.get();
        if let Err(msg) = validate_user_form(
            &username.get(),
            is_new.then_some(pwd.as_str()),
            role_value,
            &section_id.get(),
        ) {
            set_error.set(Some(msg.to_string()));
            return;
        }
        // отдел храним только у ассистентов
        let section = if role_value.requires_section() {
            non_empty(section_id.get())
        } else {
            None
        };

        set_saving.set(true);
        set_error.set(None);
        let user_id = user_id.clone();
        spawn_local(async move {
            let result = match user_id {
                None => {
                    let dto = CreateUserDto {
                        username: username.get_untracked().trim().to_string(),
                        password: pwd,
                        email: non_empty(email.get_untracked()),
                        full_name: non_empty(full_name.get_untracked()),
                        role: role_value,
                        section_id: section,
                    };
                    api::create_user(&dto).await.map(|_| ())
                }
                Some(id) => {
                    let dto = UpdateUserDto {
                        id,
                        email: non_empty(email.get_untracked()),
                        full_name: non_empty(full_name.get_untracked()),
                        role: role_value,
                        section_id: section,
                        is_active: is_active.get_untracked(),
                    };
                    api::update_user(&dto).await
                }
            };
            match result {
                Ok(()) => on_saved(),
                Err(e) => {
                    set_error.set(Some(format!("Ошибка сохранения: {}", e)));
                    set_saving.set(false);
                }
            }
        });
    };

    let section_options = StoredValue::new(
        sections
            .into_iter()
            .filter(|s| s.is_active)
            .map(|s| (s.base.id.as_string(), s.base.description))
            .collect::<Vec<_>>(),
    );

    view! {
        <ModalFrame title=title on_close=Callback::new(move |_| on_close())>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            {is_new.then(|| view! {
                <div class="form__group">
                    <Label>"Логин"</Label>
                    <Input value=username disabled=Signal::derive(move || saving.get()) />
                </div>
                <div class="form__group">
                    <Label>"Пароль"</Label>
                    <Input
                        value=password
                        input_type=InputType::Password
                        disabled=Signal::derive(move || saving.get())
                    />
                </div>
            })}

            <div class="form__group">
                <Label>"ФИО"</Label>
                <Input value=full_name disabled=Signal::derive(move || saving.get()) />
            </div>

            <div class="form__group">
                <Label>"Email"</Label>
                <Input
                    value=email
                    input_type=InputType::Email
                    disabled=Signal::derive(move || saving.get())
                />
            </div>

            <div class="form__group">
                <Label>"Роль"</Label>
                <Select value=role>
                    {Role::ALL
                        .iter()
                        .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                        .collect_view()}
                </Select>
            </div>

            <Show when=move || selected_role().requires_section()>
                <div class="form__group">
                    <Label>"Отдел"</Label>
                    <Select value=section_id>
                        <option value="">"-- Выберите отдел --"</option>
                        {section_options
                            .get_value()
                            .into_iter()
                            .map(|(id, name)| view! { <option value=id>{name}</option> })
                            .collect_view()}
                    </Select>
                </div>
            </Show>

            {(!is_new).then(|| view! {
                <div class="form__group">
                    <Checkbox checked=is_active label="Активен" />
                </div>
            })}

            <div class="modal-footer">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_close()
                    disabled=Signal::derive(move || saving.get())
                >
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Сохранение..." } else { "Сохранить" }}
                </Button>
            </div>
        </ModalFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_requires_section() {
        assert_eq!(
            validate_user_form("anna", None, Role::Assistant, " "),
            Err("Для ассистента нужно выбрать отдел")
        );
        assert!(validate_user_form("anna", None, Role::Assistant, "s1").is_ok());
        assert!(validate_user_form("anna", None, Role::Trainer, "").is_ok());
    }

    #[test]
    fn test_password_checked_only_on_create() {
        assert!(validate_user_form("boris", Some("123"), Role::User, "").is_err());
        assert!(validate_user_form("boris", Some("1234"), Role::User, "").is_ok());
        assert_eq!(validate_user_form("", None, Role::User, ""), Err("Укажите логин"));
    }
}
