use contracts::domain::a004_follow_up::aggregate::{FollowUpListQuery, FollowUpStatus, FollowUpView};
use contracts::domain::common::AggregateId;
use contracts::system::users::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::answer_dialog::AnswerFollowUpDialog;
use super::inquiry_panel::status_badge_class;
use crate::domain::a001_section::ui::picker::SectionSelect;
use crate::domain::a004_follow_up::api;
use crate::layout::global_context::use_app_context;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;

/// Значение фильтра статуса из Select в параметры запроса
pub fn build_inbox_query(status: &str, section_id: &str) -> FollowUpListQuery {
    let section_id = section_id.trim();
    FollowUpListQuery {
        section_id: (!section_id.is_empty()).then(|| section_id.to_string()),
        status: status.parse::<FollowUpStatus>().ok(),
    }
}

/// Входящие запросы отдела (ассистент видит только свой отдел)
#[component]
pub fn FollowUpInbox() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let (auth_state, _) = use_auth();
    let is_admin = auth_state.get_untracked().role() == Some(Role::Admin);

    let items: RwSignal<Vec<FollowUpView>> = RwSignal::new(Vec::new());
    let status = RwSignal::new(FollowUpStatus::Pending.as_str().to_string());
    let section_id = RwSignal::new(String::new());
    let (loading, set_loading) = signal(false);
    let answering: RwSignal<Option<FollowUpView>> = RwSignal::new(None);

    let load_data = move || {
        let query = build_inbox_query(&status.get_untracked(), &section_id.get_untracked());
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_section_inbox(&query).await {
                Ok(list) => items.set(list),
                Err(e) => toasts.api_error(&e),
            }
            set_loading.set(false);
        });
    };

    // перечитываем при смене фильтров
    Effect::new(move |_| {
        status.track();
        section_id.track();
        load_data();
    });

    view! {
        <PageFrame page_id="a004_follow_up--inbox" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Запросы отделу"</h1>
                    <Badge>{move || items.get().len().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        " Обновить"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="filter-panel">
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="min-width: 180px;">
                                <Label>"Статус"</Label>
                                <Select value=status>
                                    <option value="">"Все"</option>
                                    <option value=FollowUpStatus::Pending.as_str()>{FollowUpStatus::Pending.label()}</option>
                                    <option value=FollowUpStatus::Answered.as_str()>{FollowUpStatus::Answered.label()}</option>
                                </Select>
                            </div>
                            {is_admin.then(|| view! {
                                <div style="min-width: 220px;">
                                    <Label>"Отдел"</Label>
                                    <SectionSelect value=section_id empty_label="Все отделы" />
                                </div>
                            })}
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Обращение"</TableHeaderCell>
                                <TableHeaderCell>"Отдел"</TableHeaderCell>
                                <TableHeaderCell>"Вопрос"</TableHeaderCell>
                                <TableHeaderCell>"Автор"</TableHeaderCell>
                                <TableHeaderCell>"Создан"</TableHeaderCell>
                                <TableHeaderCell>"Статус"</TableHeaderCell>
                                <TableHeaderCell></TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || items.get()
                                key=|f| (f.follow_up.id, f.follow_up.status)
                                children=move |item: FollowUpView| {
                                    let inquiry_id = item.follow_up.inquiry_id.as_string();
                                    let code = item.inquiry_code.clone();
                                    let for_answer = item.clone();
                                    let status = item.follow_up.status;
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <a href="#" class="table__link" on:click=move |ev| {
                                                        ev.prevent_default();
                                                        ctx.open_inquiry(&inquiry_id, &code);
                                                    }>
                                                        {format!("{} · {}", item.inquiry_code, item.inquiry_title)}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.section_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.follow_up.body.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{item.author_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_datetime(&item.follow_up.created_at)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <span class=status_badge_class(status)>{status.label()}</span>
                                            </TableCell>
                                            <TableCell>
                                                {(status == FollowUpStatus::Pending).then(|| view! {
                                                    <Button
                                                        appearance=ButtonAppearance::Primary
                                                        on_click=move |_| answering.set(Some(for_answer.clone()))
                                                    >
                                                        "Ответить"
                                                    </Button>
                                                })}
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || answering.get().map(|follow_up| view! {
                    <AnswerFollowUpDialog
                        follow_up=follow_up
                        on_close=Callback::new(move |_| answering.set(None))
                        on_answered=Callback::new(move |_| {
                            answering.set(None);
                            toasts.success("Ответ отправлен");
                            load_data();
                        })
                    />
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_inbox_query() {
        let query = build_inbox_query("pending", " ");
        assert_eq!(query.status, Some(FollowUpStatus::Pending));
        assert_eq!(query.section_id, None);

        let query = build_inbox_query("", "s-1");
        assert_eq!(query.status, None);
        assert_eq!(query.section_id.as_deref(), Some("s-1"));
    }
}
