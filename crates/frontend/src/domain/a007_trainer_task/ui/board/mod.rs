use contracts::domain::a007_trainer_task::aggregate::{
    MoveCardRequest, SaveBoardRequest, SetWeightRequest, MAX_WEIGHT, MIN_WEIGHT,
};
use contracts::domain::a007_trainer_task::board::{BoardCard, BoardColumn, TrainerBoard};
use leptos::ev::DragEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a007_trainer_task::api;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toasts;

/// Перетаскиваемая карточка: категория и колонка, откуда её взяли
#[derive(Clone, Debug, PartialEq)]
struct DraggedCard {
    category_id: String,
    from_trainer_id: Option<String>,
}

/// Вес из поля ввода; пустое или нечисловое значение отбрасывается
pub fn parse_weight(value: &str) -> Option<i32> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|w| (MIN_WEIGHT..=MAX_WEIGHT).contains(w))
}

/// Распределение категорий по тренерам (канбан).
/// Первая колонка: категории, которые никто не ведёт.
#[component]
pub fn TrainerBoardPage() -> impl IntoView {
    let toasts = use_toasts();
    let board: RwSignal<Option<TrainerBoard>> = RwSignal::new(None);
    let dragged: RwSignal<Option<DraggedCard>> = RwSignal::new(None);
    let drop_target: RwSignal<Option<Option<String>>> = RwSignal::new(None);
    let (loading, set_loading) = signal(false);

    let load_board = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::get_board().await {
                Ok(b) => board.set(Some(b)),
                Err(e) => toasts.api_error(&e),
            }
            set_loading.set(false);
        });
    };
    load_board();

    // Применяем локально сразу, затем берём доску с сервера
    let move_card = move |card: DraggedCard, to_trainer_id: Option<String>| {
        let local = board.with_untracked(|b| {
            b.clone().map(|mut b| {
                b.move_card(
                    &card.category_id,
                    card.from_trainer_id.as_deref(),
                    to_trainer_id.as_deref(),
                )
                .map(|_| b)
            })
        });
        match local {
            Some(Ok(updated)) => board.set(Some(updated)),
            Some(Err(msg)) => {
                toasts.error(msg);
                return;
            }
            None => return,
        }
        let request = MoveCardRequest {
            category_id: card.category_id,
            from_trainer_id: card.from_trainer_id,
            to_trainer_id,
        };
        spawn_local(async move {
            match api::move_card(&request).await {
                Ok(b) => board.set(Some(b)),
                Err(e) => {
                    toasts.api_error(&e);
                    load_board();
                }
            }
        });
    };

    let set_weight = move |trainer_id: String, category_id: String, weight: i32| {
        let request = SetWeightRequest {
            trainer_id,
            category_id,
            weight,
        };
        spawn_local(async move {
            match api::set_weight(&request).await {
                Ok(b) => board.set(Some(b)),
                Err(e) => {
                    toasts.api_error(&e);
                    load_board();
                }
            }
        });
    };

    let save_board = move || {
        let Some(request) = board.with_untracked(|b| {
            b.as_ref().map(|b| SaveBoardRequest {
                assignments: b.to_assignments(),
            })
        }) else {
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            match api::save_board(&request).await {
                Ok(b) => {
                    board.set(Some(b));
                    toasts.success("Распределение сохранено");
                }
                Err(e) => toasts.api_error(&e),
            }
            set_loading.set(false);
        });
    };

    let render_card = move |card: BoardCard, trainer_id: Option<String>| {
        let drag_info = DraggedCard {
            category_id: card.category_id.clone(),
            from_trainer_id: trainer_id.clone(),
        };
        let on_drag_start = move |ev: DragEvent| {
            if let Some(dt) = ev.data_transfer() {
                let _ = dt.set_data("text/plain", &drag_info.category_id);
            }
            dragged.set(Some(drag_info.clone()));
        };
        let weight_editor = trainer_id.map(|trainer_id| {
            let category_id = card.category_id.clone();
            view! {
                <label class="board-card__weight" title="Вес при распределении">
                    "Вес "
                    <input
                        type="number"
                        min=MIN_WEIGHT
                        max=MAX_WEIGHT
                        prop:value=card.weight
                        on:change=move |ev| match parse_weight(&event_target_value(&ev)) {
                            Some(w) => set_weight(trainer_id.clone(), category_id.clone(), w),
                            None => toasts.error(format!(
                                "Вес должен быть от {} до {}",
                                MIN_WEIGHT, MAX_WEIGHT
                            )),
                        }
                    />
                </label>
            }
        });
        view! {
            <div
                class="board-card"
                draggable="true"
                on:dragstart=on_drag_start
                on:dragend=move |_| {
                    dragged.set(None);
                    drop_target.set(None);
                }
            >
                <div class="board-card__title">{card.category_name.clone()}</div>
                {weight_editor}
            </div>
        }
    };

    let render_column = move |column: BoardColumn| {
        let trainer_id = column.trainer_id.clone();
        let for_over = trainer_id.clone();
        let for_drop = trainer_id.clone();
        let for_class = trainer_id.clone();
        let count = column.cards.len();
        view! {
            <div
                class=move || {
                    if drop_target.get().as_ref() == Some(&for_class) {
                        "board-column board-column--over"
                    } else {
                        "board-column"
                    }
                }
                on:dragover=move |ev: DragEvent| {
                    ev.prevent_default();
                    drop_target.set(Some(for_over.clone()));
                }
                on:drop=move |ev: DragEvent| {
                    ev.prevent_default();
                    drop_target.set(None);
                    if let Some(card) = dragged.get_untracked() {
                        dragged.set(None);
                        move_card(card, for_drop.clone());
                    }
                }
            >
                <div class="board-column__header">
                    <span>{column.title.clone()}</span>
                    <Badge>{count.to_string()}</Badge>
                </div>
                <div class="board-column__cards">
                    {column
                        .cards
                        .into_iter()
                        .map(|card| render_card(card, trainer_id.clone()))
                        .collect_view()}
                </div>
            </div>
        }
    };

    view! {
        <PageFrame page_id="a007_trainer_task--board" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Распределение категорий"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_board()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        " Обновить"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| save_board()
                        disabled=Signal::derive(move || loading.get() || board.with(Option::is_none))
                    >
                        {icon("check")}
                        " Сохранить"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="text-muted" style="margin-bottom: 12px;">
                    "Перетащите категорию на тренера. Новые обращения распределяются между тренерами категории пропорционально весу."
                </div>
                {move || match board.get() {
                    Some(b) => view! {
                        <div class="board">
                            {b.columns.into_iter().map(render_column).collect_view()}
                        </div>
                    }
                    .into_any(),
                    None => view! { <div class="text-muted">"Загрузка..."</div> }.into_any(),
                }}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(" 3 "), Some(3));
        assert_eq!(parse_weight("0"), None);
        assert_eq!(parse_weight("abc"), None);
        assert_eq!(parse_weight(&(MAX_WEIGHT + 1).to_string()), None);
    }
}
