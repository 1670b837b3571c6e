use contracts::domain::a004_follow_up::aggregate::{FollowUpStatus, FollowUpView};
use contracts::domain::common::AggregateId;
use contracts::system::auth::UserInfo;
use contracts::system::users::Role;
use leptos::prelude::*;
use thaw::*;

use super::answer_dialog::AnswerFollowUpDialog;
use crate::shared::date_utils::{format_datetime, format_datetime_opt};
use crate::system::auth::context::use_auth;

/// Отвечать может администратор или ассистент отдела, куда ушёл запрос
pub fn can_answer(user: &UserInfo, follow_up: &FollowUpView) -> bool {
    if !follow_up.follow_up.is_pending() {
        return false;
    }
    match user.role {
        Role::Admin => true,
        Role::Assistant => {
            user.section_id.as_deref() == Some(follow_up.follow_up.section_id.as_string().as_str())
        }
        _ => false,
    }
}

pub fn status_badge_class(status: FollowUpStatus) -> &'static str {
    match status {
        FollowUpStatus::Pending => "badge badge--warning",
        FollowUpStatus::Answered => "badge badge--success",
    }
}

/// Запросы в отделы в карточке обращения
#[component]
pub fn FollowUpPanel(
    #[prop(into)] follow_ups: Signal<Vec<FollowUpView>>,
    /// Вызывается после ответа, чтобы карточка перечитала данные
    on_changed: Callback<()>,
) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let answering: RwSignal<Option<FollowUpView>> = RwSignal::new(None);

    view! {
        <div class="detail-section">
            <h3 class="detail-section__title">"Запросы в отделы"</h3>
            <Show
                when=move || !follow_ups.get().is_empty()
                fallback=|| view! { <div class="text-muted">"Запросов в отделы не было"</div> }
            >
                <For
                    each=move || follow_ups.get()
                    key=|f| (f.follow_up.id, f.follow_up.status)
                    children=move |item: FollowUpView| {
                        let answerable = auth_state
                            .with_untracked(|s| s.user_info.as_ref().map(|u| can_answer(u, &item)))
                            .unwrap_or(false);
                        let for_answer = item.clone();
                        let fu = item.follow_up.clone();
                        view! {
                            <div class="follow-up">
                                <div class="follow-up__header">
                                    <strong>{item.section_name.clone()}</strong>
                                    <span class=status_badge_class(fu.status)>{fu.status.label()}</span>
                                    <span class="text-muted">
                                        {format!("{} · {}", item.author_name, format_datetime(&fu.created_at))}
                                    </span>
                                </div>
                                <div class="follow-up__body">{fu.body.clone()}</div>
                                {fu.answer.clone().map(|answer| view! {
                                    <div class="follow-up__answer">
                                        <div class="text-muted">
                                            {format!(
                                                "Ответ: {} · {}",
                                                item.answered_by_name.clone().unwrap_or_default(),
                                                format_datetime_opt(fu.answered_at.as_ref()),
                                            )}
                                        </div>
                                        <div>{answer}</div>
                                    </div>
                                })}
                                {answerable.then(|| view! {
                                    <Button
                                        appearance=ButtonAppearance::Primary
                                        on_click=move |_| answering.set(Some(for_answer.clone()))
                                    >
                                        "Ответить"
                                    </Button>
                                })}
                            </div>
                        }
                    }
                />
            </Show>

            {move || answering.get().map(|follow_up| view! {
                <AnswerFollowUpDialog
                    follow_up=follow_up
                    on_close=Callback::new(move |_| answering.set(None))
                    on_answered=Callback::new(move |_| {
                        answering.set(None);
                        on_changed.run(());
                    })
                />
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_section::aggregate::SectionId;
    use contracts::domain::a003_inquiry::aggregate::InquiryId;
    use contracts::domain::a004_follow_up::aggregate::FollowUp;

    fn user(role: Role, section_id: Option<String>) -> UserInfo {
        UserInfo {
            id: "u1".into(),
            username: "anna".into(),
            full_name: None,
            email: None,
            role,
            section_id,
        }
    }

    fn view_for(section_id: SectionId) -> FollowUpView {
        FollowUpView {
            follow_up: FollowUp::new(InquiryId::new_v4(), section_id, "t1".into(), "Нужна справка".into())
                .unwrap(),
            section_name: "Бухгалтерия".into(),
            author_name: "Тренер".into(),
            answered_by_name: None,
            inquiry_code: "INQ-000001".into(),
            inquiry_title: "Справка".into(),
        }
    }

    #[test]
    fn test_only_own_section_assistant_answers() {
        let section = SectionId::new_v4();
        let item = view_for(section);
        assert!(can_answer(&user(Role::Assistant, Some(section.as_string())), &item));
        assert!(!can_answer(&user(Role::Assistant, Some(SectionId::new_v4().as_string())), &item));
        assert!(can_answer(&user(Role::Admin, None), &item));
        assert!(!can_answer(&user(Role::Trainer, None), &item));
    }

    #[test]
    fn test_answered_follow_up_is_closed_for_answers() {
        let section = SectionId::new_v4();
        let mut item = view_for(section);
        item.follow_up
            .answer("a1", "Готово", chrono::Utc::now())
            .unwrap();
        assert!(!can_answer(&user(Role::Admin, None), &item));
    }
}
