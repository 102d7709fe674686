use std::fmt;

#[derive(Debug)]
pub enum TelegramError {
    Telegram(String),
    Document(String),
}

impl fmt::Display for TelegramError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TelegramError::Telegram(e) => write!(f, "TelegramError::Telegram: {}", e),
            TelegramError::Document(e) => write!(f, "TelegramError::Document: {}", e),
        }
    }
}
impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        TelegramError::Telegram(e.to_string())
    }
}
impl From<serde_json::Error> for TelegramError {
    fn from(e: serde_json::Error) -> Self {
        TelegramError::Document(e.to_string())
    }
}
