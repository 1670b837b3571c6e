use contracts::domain::a003_inquiry::list::StatusCounts;
use contracts::domain::a003_inquiry::status::InquiryStatus;
use leptos::prelude::*;

/// Вкладки фильтра по статусу обращения со счётчиками.
/// `None` означает «Все».
#[component]
pub fn StatusTabs(
    selected: RwSignal<Option<InquiryStatus>>,
    #[prop(into)] counts: Signal<StatusCounts>,
    /// Вызывается после смены вкладки
    on_change: Callback<Option<InquiryStatus>>,
) -> impl IntoView {
    let tab = move |status: Option<InquiryStatus>| {
        let label = status.map(|s| s.label()).unwrap_or("Все");
        view! {
            <button
                class="status-tabs__tab"
                class:status-tabs__tab--active=move || selected.get() == status
                on:click=move |_| {
                    if selected.get_untracked() != status {
                        selected.set(status);
                        on_change.run(status);
                    }
                }
            >
                <span>{label}</span>
                <span class="status-tabs__count">
                    {move || {
                        let c = counts.get();
                        status.map(|s| c.get(s)).unwrap_or_else(|| c.total())
                    }}
                </span>
            </button>
        }
    };

    view! {
        <div class="status-tabs">
            {tab(None)}
            {InquiryStatus::ALL.into_iter().map(|s| tab(Some(s))).collect_view()}
        </div>
    }
}
