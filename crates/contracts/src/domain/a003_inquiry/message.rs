use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MESSAGE_MAX_LEN: usize = 10_000;

/// Сообщение в переписке по обращению
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryMessage {
    pub id: String,
    pub inquiry_id: String,
    pub author_id: String,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMessageDto {
    pub body: String,
}

impl PostMessageDto {
    pub fn validate(&self) -> Result<String, String> {
        let body = self.body.trim();
        if body.is_empty() {
            return Err("Сообщение не может быть пустым".into());
        }
        if body.chars().count() > MESSAGE_MAX_LEN {
            return Err(format!("Сообщение длиннее {} символов", MESSAGE_MAX_LEN));
        }
        Ok(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_body_is_trimmed() {
        let dto = PostMessageDto {
            body: "  hello \n".into(),
        };
        assert_eq!(dto.validate().unwrap(), "hello");
    }

    #[test]
    fn test_blank_message_rejected() {
        let dto = PostMessageDto { body: " ".into() };
        assert!(dto.validate().is_err());
    }
}
