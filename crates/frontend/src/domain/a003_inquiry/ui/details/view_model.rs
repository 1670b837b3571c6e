use contracts::domain::a003_inquiry::aggregate::InquiryActionRequest;
use contracts::domain::a003_inquiry::list::InquiryDetail;
use contracts::domain::a003_inquiry::message::PostMessageDto;
use contracts::domain::a003_inquiry::status::InquiryAction;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a003_inquiry::api;
use crate::shared::toast::ToastService;

/// Что спросить у пользователя перед действием
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionInput {
    /// Выполняется сразу
    Immediate,
    /// Текстовое поле; `required` для ответа по существу
    Text {
        label: &'static str,
        required: bool,
    },
    /// Отдельный диалог выбора отдела
    RouteDialog,
}

pub fn action_input(action: InquiryAction) -> ActionInput {
    match action {
        InquiryAction::Take => ActionInput::Immediate,
        InquiryAction::Answer => ActionInput::Text {
            label: "Ответ",
            required: true,
        },
        InquiryAction::Close => ActionInput::Text {
            label: "Комментарий",
            required: false,
        },
        InquiryAction::Reopen => ActionInput::Text {
            label: "Причина переоткрытия",
            required: false,
        },
        InquiryAction::Route => ActionInput::RouteDialog,
    }
}

/// Текст из диалога: для Answer это ответ, для остальных комментарий в переписку
pub fn build_action_request(
    action: InquiryAction,
    text: &str,
) -> Result<InquiryActionRequest, &'static str> {
    let text = text.trim();
    let mut request = InquiryActionRequest::new(action);
    match action {
        InquiryAction::Answer => {
            if text.is_empty() {
                return Err("Текст ответа не может быть пустым");
            }
            request.answer = Some(text.to_string());
        }
        _ if !text.is_empty() => request.comment = Some(text.to_string()),
        _ => {}
    }
    Ok(request)
}

/// ViewModel карточки обращения
#[derive(Clone, Copy)]
pub struct InquiryDetailsViewModel {
    pub id: StoredValue<String>,
    pub detail: RwSignal<Option<InquiryDetail>>,
    pub error: RwSignal<Option<String>>,
    pub busy: RwSignal<bool>,
    toasts: ToastService,
}

impl InquiryDetailsViewModel {
    pub fn new(id: String, toasts: ToastService) -> Self {
        Self {
            id: StoredValue::new(id),
            detail: RwSignal::new(None),
            error: RwSignal::new(None),
            busy: RwSignal::new(false),
            toasts,
        }
    }

    pub fn load(&self) {
        let id = self.id.get_value();
        let detail = self.detail;
        let error = self.error;
        spawn_local(async move {
            match api::fetch_detail(&id).await {
                Ok(d) => {
                    error.set(None);
                    detail.set(Some(d));
                }
                Err(e) => error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    /// Выполняет действие; сервер возвращает карточку целиком
    pub fn run_action(&self, request: InquiryActionRequest, on_done: Callback<()>) {
        let id = self.id.get_value();
        let detail = self.detail;
        let busy = self.busy;
        let toasts = self.toasts;
        let action = request.action;
        busy.set(true);
        spawn_local(async move {
            match api::apply_action(&id, &request).await {
                Ok(d) => {
                    toasts.success(format!("{}: {}", action.label(), d.inquiry.status.label()));
                    detail.set(Some(d));
                    on_done.run(());
                }
                Err(e) => toasts.api_error(&e),
            }
            busy.set(false);
        });
    }

    pub fn post_message(&self, body: RwSignal<String>) {
        let dto = PostMessageDto {
            body: body.get_untracked(),
        };
        if let Err(msg) = dto.validate() {
            self.toasts.error(msg);
            return;
        }
        let id = self.id.get_value();
        let detail = self.detail;
        let busy = self.busy;
        let toasts = self.toasts;
        busy.set(true);
        spawn_local(async move {
            match api::post_message(&id, &dto).await {
                Ok(message) => {
                    body.set(String::new());
                    detail.update(|d| {
                        if let Some(d) = d {
                            d.messages.push(message);
                        }
                    });
                }
                Err(e) => toasts.api_error(&e),
            }
            busy.set(false);
        });
    }

    /// Перечитывает только переписку
    pub fn reload_messages(&self) {
        let id = self.id.get_value();
        let detail = self.detail;
        let toasts = self.toasts;
        spawn_local(async move {
            match api::fetch_messages(&id).await {
                Ok(messages) => detail.update(|d| {
                    if let Some(d) = d {
                        d.messages = messages;
                    }
                }),
                Err(e) => toasts.api_error(&e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_requires_text() {
        assert_eq!(
            build_action_request(InquiryAction::Answer, "  ").map(|r| r.action),
            Err("Текст ответа не может быть пустым")
        );
        let request = build_action_request(InquiryAction::Answer, " Готово ").unwrap();
        assert_eq!(request.answer.as_deref(), Some("Готово"));
        assert_eq!(request.comment, None);
    }

    #[test]
    fn test_optional_comment() {
        let request = build_action_request(InquiryAction::Reopen, "").unwrap();
        assert_eq!(request.comment, None);
        let request = build_action_request(InquiryAction::Close, "Решено").unwrap();
        assert_eq!(request.comment.as_deref(), Some("Решено"));
        assert_eq!(request.answer, None);
    }

    #[test]
    fn test_route_uses_dialog() {
        assert_eq!(action_input(InquiryAction::Route), ActionInput::RouteDialog);
        assert_eq!(action_input(InquiryAction::Take), ActionInput::Immediate);
    }
}
