use contracts::domain::a003_inquiry::list::InquiryDetail;
use contracts::domain::a003_inquiry::message::InquiryMessage;
use contracts::domain::a003_inquiry::status::InquiryAction;
use contracts::domain::a004_follow_up::aggregate::FollowUpView;
use leptos::prelude::*;
use thaw::*;

use super::view_model::{action_input, build_action_request, ActionInput, InquiryDetailsViewModel};
use crate::domain::a004_follow_up::ui::inquiry_panel::FollowUpPanel;
use crate::domain::a004_follow_up::ui::route_dialog::RouteDialog;
use crate::domain::a005_rating::ui::widget::RatingWidget;
use crate::shared::confirm::confirm;
use crate::shared::date_utils::{format_datetime, format_datetime_opt};
use crate::shared::icons::icon;
use crate::shared::modal_frame::ModalFrame;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toasts;

fn info_row(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="detail-grid__row">
            <span class="detail-grid__label">{label}</span>
            <span class="detail-grid__value">{value}</span>
        </div>
    }
}

fn render_header_info(d: &InquiryDetail) -> AnyView {
    let inquiry = &d.inquiry;
    view! {
        <div class="detail-grid">
            {info_row("Категория", d.category_name.clone())}
            {info_row("Автор", d.author_name.clone())}
            {info_row("Тренер", d.trainer_name.clone().unwrap_or_else(|| "Не назначен".to_string()))}
            {info_row("Создано", format_datetime(&inquiry.base.metadata.created_at))}
            {info_row("Последняя активность", format_datetime(&inquiry.last_activity_at))}
            {info_row("Закрыто", format_datetime_opt(inquiry.closed_at.as_ref()))}
            {info_row("Переоткрытий", inquiry.reopen_count.to_string())}
        </div>
    }
    .into_any()
}

fn render_message(m: InquiryMessage) -> impl IntoView {
    view! {
        <div class="message">
            <div class="message__header">
                <strong>{m.author_name}</strong>
                <span class="text-muted">{format_datetime(&m.created_at)}</span>
            </div>
            <div class="message__body">{m.body}</div>
        </div>
    }
}

/// Карточка обращения: статус, действия, переписка, запросы в отделы, оценка
#[component]
pub fn InquiryDetails(id: String, on_close: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let vm = InquiryDetailsViewModel::new(id.clone(), toasts);
    vm.load();

    // действие, для которого открыт диалог с текстом
    let pending_action: RwSignal<Option<InquiryAction>> = RwSignal::new(None);
    let action_text = RwSignal::new(String::new());
    let route_open = RwSignal::new(false);
    let new_message = RwSignal::new(String::new());

    let reload = Callback::new(move |_| vm.load());

    let start_action = move |action: InquiryAction| match action_input(action) {
        ActionInput::Immediate => {
            if let Ok(request) = build_action_request(action, "") {
                vm.run_action(request, Callback::new(|_| {}));
            }
        }
        ActionInput::Text { .. } => {
            if action == InquiryAction::Close && !confirm("Закрыть обращение?") {
                return;
            }
            action_text.set(String::new());
            pending_action.set(Some(action));
        }
        ActionInput::RouteDialog => route_open.set(true),
    };

    let submit_action = move |_| {
        let Some(action) = pending_action.get_untracked() else {
            return;
        };
        match build_action_request(action, &action_text.get_untracked()) {
            Ok(request) => vm.run_action(
                request,
                Callback::new(move |_| pending_action.set(None)),
            ),
            Err(msg) => toasts.error(msg),
        }
    };

    let follow_ups = Signal::derive(move || {
        vm.detail
            .with(|d| d.as_ref().map(|d| d.follow_ups.clone()))
            .unwrap_or_default()
    });

    view! {
        <PageFrame page_id="a003_inquiry--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || vm.detail.with(|d| d.as_ref().map(|d| {
                            format!("{} · {}", d.inquiry.base.code, d.inquiry.title())
                        }))}
                    </h1>
                    {move || vm.detail.with(|d| d.as_ref().map(|d| {
                        let status = d.inquiry.status;
                        view! { <span class=status.badge_class()>{status.label()}</span> }
                    }))}
                </div>
                <div class="page__header-right">
                    {move || {
                        let actions = vm
                            .detail
                            .with(|d| d.as_ref().map(|d| d.allowed_actions.clone()))
                            .unwrap_or_default();
                        actions
                            .into_iter()
                            .map(|action| {
                                let appearance = if action == InquiryAction::Answer {
                                    ButtonAppearance::Primary
                                } else {
                                    ButtonAppearance::Secondary
                                };
                                view! {
                                    <Button
                                        appearance=appearance
                                        on_click=move |_| start_action(action)
                                        disabled=Signal::derive(move || vm.busy.get())
                                    >
                                        {action.label()}
                                    </Button>
                                }
                            })
                            .collect_view()
                    }}
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| vm.load() attr:title="Обновить">
                        {icon("refresh")}
                    </Button>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(()) attr:title="Закрыть">
                        {icon("x")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                {move || vm.detail.get().map(|d| {
                    let inquiry_id = d.inquiry.to_string_id();
                    let show_rating = d.can_rate || d.rating.is_some();
                    view! {
                        {render_header_info(&d)}

                        <div class="detail-section">
                            <h3 class="detail-section__title">"Описание"</h3>
                            <div class="inquiry__body">{d.inquiry.body.clone()}</div>
                        </div>

                        {d.inquiry.answer.clone().map(|answer| view! {
                            <div class="detail-section inquiry__answer">
                                <h3 class="detail-section__title">"Ответ"</h3>
                                <div>{answer}</div>
                            </div>
                        })}

                        {show_rating.then(|| view! {
                            <RatingWidget
                                inquiry_id=inquiry_id
                                rating=d.rating.clone()
                                can_rate=d.can_rate
                                on_rated=Callback::new(move |_| vm.load())
                            />
                        })}
                    }
                })}

                <Show when=move || vm.detail.with(|d| d.is_some())>
                    <FollowUpPanel follow_ups=follow_ups on_changed=reload />
                </Show>

                <div class="detail-section">
                    <div class="detail-section__title-row">
                        <h3 class="detail-section__title">"Переписка"</h3>
                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| vm.reload_messages()>
                            {icon("refresh")}
                        </Button>
                    </div>
                    {move || {
                        let messages = vm
                            .detail
                            .with(|d| d.as_ref().map(|d| d.messages.clone()))
                            .unwrap_or_default();
                        if messages.is_empty() {
                            view! { <div class="text-muted">"Сообщений пока нет"</div> }.into_any()
                        } else {
                            messages.into_iter().map(render_message).collect_view().into_any()
                        }
                    }}

                    <Show when=move || vm.detail.with(|d| d.as_ref().is_some_and(|d| d.can_post_message))>
                        <div class="message-composer">
                            <Textarea value=new_message placeholder="Сообщение..." attr:rows=3 />
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| vm.post_message(new_message)
                                disabled=Signal::derive(move || vm.busy.get())
                            >
                                {icon("send")}
                                " Отправить"
                            </Button>
                        </div>
                    </Show>
                </div>
            </div>

            {move || pending_action.get().map(|action| {
                let (label, required) = match action_input(action) {
                    ActionInput::Text { label, required } => (label, required),
                    _ => ("Комментарий", false),
                };
                view! {
                    <ModalFrame title=action.label() on_close=Callback::new(move |_| pending_action.set(None))>
                        <div class="form__group">
                            <Label>{if required { format!("{} *", label) } else { label.to_string() }}</Label>
                            <Textarea value=action_text attr:rows=6 />
                        </div>
                        <div class="modal-footer">
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| pending_action.set(None)
                            >
                                "Отмена"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=submit_action
                                disabled=Signal::derive(move || vm.busy.get())
                            >
                                {action.label()}
                            </Button>
                        </div>
                    </ModalFrame>
                }
            })}

            <Show when=move || route_open.get()>
                <RouteDialog
                    inquiry_id=id.clone()
                    on_close=Callback::new(move |_| route_open.set(false))
                    on_routed=Callback::new(move |view: FollowUpView| {
                        route_open.set(false);
                        toasts.success(format!("Запрос отправлен: {}", view.section_name));
                        vm.load();
                    })
                />
            </Show>
        </PageFrame>
    }
}
