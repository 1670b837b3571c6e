//! Tab content registry - единственный источник правды для маппинга tab.key → View

use crate::dashboards::{
    InquirySummaryDashboard, SectionFollowUpsDashboard, TrainerPerformanceDashboard,
};
use crate::domain::a001_section::ui::list::SectionList;
use crate::domain::a002_category::ui::list::CategoryList;
use crate::domain::a003_inquiry::ui::details::InquiryDetails;
use crate::domain::a003_inquiry::ui::list::InquiryList;
use crate::domain::a004_follow_up::ui::inbox::FollowUpInbox;
use crate::domain::a006_notification::ui::list::NotificationList;
use crate::domain::a007_trainer_task::ui::board::TrainerBoardPage;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::parse_inquiry_tab_key;
use crate::system::auth::guard::{RequireAdmin, RequireRole};
use crate::system::users::ui::change_password::ChangePasswordPage;
use crate::system::users::ui::list::UsersListPage;
use contracts::domain::a003_inquiry::list::InquiryListScope;
use contracts::system::users::Role;
use leptos::prelude::*;

/// Рендерит контент таба по его ключу.
///
/// `tabs_store` нужен detail-view, которые закрывают свой таб сами.
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let key_for_close = key.to_string();

    match key {
        // ═══════════════════════════════════════════════════════════════════
        // Inquiries
        // ═══════════════════════════════════════════════════════════════════
        "a003_inquiry_mine" => view! { <InquiryList scope=InquiryListScope::Mine /> }.into_any(),
        "a003_inquiry_assigned" => view! {
            <RequireRole roles=vec![Role::Trainer, Role::Admin]>
                <InquiryList scope=InquiryListScope::Assigned />
            </RequireRole>
        }
        .into_any(),
        "a003_inquiry_all" => view! {
            <RequireAdmin>
                <InquiryList scope=InquiryListScope::All />
            </RequireAdmin>
        }
        .into_any(),
        k if parse_inquiry_tab_key(k).is_some() => {
            let id = parse_inquiry_tab_key(k).unwrap_or_default().to_string();
            view! {
                <InquiryDetails
                    id=id
                    on_close=Callback::new(move |_| tabs_store.close_tab(&key_for_close))
                />
            }
            .into_any()
        }

        // ═══════════════════════════════════════════════════════════════════
        // Follow-ups, notifications
        // ═══════════════════════════════════════════════════════════════════
        "a004_follow_up_inbox" => view! {
            <RequireRole roles=vec![Role::Assistant, Role::Admin]>
                <FollowUpInbox />
            </RequireRole>
        }
        .into_any(),
        "a006_notification" => view! { <NotificationList /> }.into_any(),

        // ═══════════════════════════════════════════════════════════════════
        // Admin: references, board, reports, users
        // ═══════════════════════════════════════════════════════════════════
        "a001_section" => view! { <RequireAdmin><SectionList /></RequireAdmin> }.into_any(),
        "a002_category" => view! { <RequireAdmin><CategoryList /></RequireAdmin> }.into_any(),
        "a007_trainer_board" => {
            view! { <RequireAdmin><TrainerBoardPage /></RequireAdmin> }.into_any()
        }
        "d400_inquiry_summary" => {
            view! { <RequireAdmin><InquirySummaryDashboard /></RequireAdmin> }.into_any()
        }
        "d401_trainer_performance" => {
            view! { <RequireAdmin><TrainerPerformanceDashboard /></RequireAdmin> }.into_any()
        }
        "d402_section_follow_ups" => {
            view! { <RequireAdmin><SectionFollowUpsDashboard /></RequireAdmin> }.into_any()
        }
        "sys_users" => view! { <UsersListPage /> }.into_any(),
        "sys_change_password" => view! { <ChangePasswordPage /> }.into_any(),

        _ => {
            log::warn!("Unknown tab type: {}", key);
            view! { <div class="placeholder">{"Not implemented yet"}</div> }.into_any()
        }
    }
}
