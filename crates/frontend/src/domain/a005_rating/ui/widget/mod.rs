use contracts::domain::a005_rating::aggregate::{RateInquiryDto, Rating, MAX_SCORE, MIN_SCORE};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a005_rating::api;
use crate::shared::toast::use_toasts;

/// "★★★☆☆" для score = 3
pub fn stars(score: i32) -> String {
    (MIN_SCORE..=MAX_SCORE)
        .map(|i| if i <= score { '★' } else { '☆' })
        .collect()
}

/// Оценка закрытого обращения автором (1..5 + комментарий).
/// Без `can_rate` показывает уже выставленную оценку только для чтения.
#[component]
pub fn RatingWidget(
    inquiry_id: String,
    rating: Option<Rating>,
    can_rate: bool,
    /// Новая оценка сохранена
    on_rated: Callback<Rating>,
) -> impl IntoView {
    let toasts = use_toasts();
    let score = RwSignal::new(rating.as_ref().map(|r| r.score).unwrap_or(0));
    let comment = RwSignal::new(
        rating
            .as_ref()
            .and_then(|r| r.comment.clone())
            .unwrap_or_default(),
    );
    let (saving, set_saving) = signal(false);

    let on_save = move |_| {
        let dto = RateInquiryDto {
            score: score.get(),
            comment: Some(comment.get()),
        };
        if let Err(msg) = dto.validate() {
            toasts.error(msg);
            return;
        }
        set_saving.set(true);
        let inquiry_id = inquiry_id.clone();
        spawn_local(async move {
            match api::rate_inquiry(&inquiry_id, &dto).await {
                Ok(saved) => {
                    toasts.success("Спасибо за оценку");
                    on_rated.run(saved);
                }
                Err(e) => toasts.api_error(&e),
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="detail-section rating">
            <h3 class="detail-section__title">"Оценка"</h3>
            {if can_rate {
                view! {
                    <div class="rating__stars">
                        {(MIN_SCORE..=MAX_SCORE)
                            .map(|i| view! {
                                <span
                                    class=move || if i <= score.get() { "rating__star rating__star--on" } else { "rating__star" }
                                    on:click=move |_| score.set(i)
                                    title=i.to_string()
                                >
                                    {move || if i <= score.get() { "★" } else { "☆" }}
                                </span>
                            })
                            .collect_view()}
                    </div>
                    <div class="form__group">
                        <Textarea value=comment placeholder="Комментарий (необязательно)" attr:rows=3 />
                    </div>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=on_save
                        disabled=Signal::derive(move || saving.get() || score.get() < MIN_SCORE)
                    >
                        {if rating.is_some() { "Изменить оценку" } else { "Оценить" }}
                    </Button>
                }
                .into_any()
            } else {
                match rating {
                    Some(r) => view! {
                        <div class="rating__stars">{stars(r.score)}</div>
                        {r.comment.map(|c| view! { <div class="rating__comment">{c}</div> })}
                    }
                    .into_any(),
                    None => view! { <div class="text-muted">"Оценки нет"</div> }.into_any(),
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(5), "★★★★★");
    }
}
