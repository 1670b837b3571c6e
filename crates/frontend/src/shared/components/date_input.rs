use leptos::prelude::*;

/// Native date picker; the value is "YYYY-MM-DD" or empty.
/// Browser displays dates in locale format (dd.mm.yyyy for RU locale)
#[component]
pub fn DateInput(
    #[prop(into)] label: String,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <label class="date-input">
            <span class="date-input__label">{label}</span>
            <input
                type="date"
                class="date-input__field"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}
