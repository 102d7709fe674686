pub mod errors;
pub mod models;

use std::time::Duration;
use reqwest::Client;
use serde::de::DeserializeOwned;
use crate::manager_telegram::errors::TelegramError;
use crate::manager_telegram::models::{ApiResponse, SendMessage, Update, User};

/// Struct for long polling updates from and sending messages through the Telegram Bot API
pub struct Telegram {
    client: Client,
    base_url: String,
    poll_timeout: u64,
}

impl Telegram {
    /// Returns a Telegram struct for the given bot
    ///
    /// # Arguments
    ///
    /// * 'token' - bot token
    /// * 'poll_timeout' - long polling timeout in seconds
    pub fn new(token: &str, poll_timeout: u64) -> Result<Telegram, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout + 10))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("https://api.telegram.org/bot{}", token),
            poll_timeout,
        })
    }

    /// Returns the bot's own identity
    ///
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        let req = self.client
            .get(format!("{}/getMe", self.base_url))
            .send().await?;

        let json = req.text().await?;

        unwrap_response(&json)
    }

    /// Waits for and returns updates with an id from offset and up
    ///
    /// # Arguments
    ///
    /// * 'offset' - first update id to return, acknowledges all before it
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let req = self.client
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[("offset", offset as u64), ("timeout", self.poll_timeout)])
            .send().await?;

        let json = req.text().await?;

        unwrap_response(&json)
    }

    /// Sends a plain text message to a chat
    ///
    /// # Arguments
    ///
    /// * 'chat_id' - chat to send to
    /// * 'text' - message text
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let req = self.client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&SendMessage { chat_id, text })
            .send().await?;

        let json = req.text().await?;
        let _: serde_json::Value = unwrap_response(&json)?;

        Ok(())
    }
}

fn unwrap_response<T: DeserializeOwned>(json: &str) -> Result<T, TelegramError> {
    let response: ApiResponse<T> = serde_json::from_str(json)?;

    if !response.ok {
        let description = response.description.unwrap_or_else(|| "unknown error".to_string());
        return Err(TelegramError::Telegram(description));
    }

    response.result.ok_or_else(|| TelegramError::Document("response without result".to_string()))
}
