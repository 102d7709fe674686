use std::collections::HashMap;
use chrono::Utc;
use log::{error, info, warn};
use crate::manager_db::DB;
use crate::manager_db::errors::DBError;
use crate::manager_db::models::Location;
use crate::manager_llm::LLM;
use crate::manager_owm::OWM;
use crate::manager_telegram::Telegram;
use crate::manager_telegram::models::Update;
use crate::presenter::{summarize_current, summarize_forecast, FORECAST_UNAVAILABLE};

const SYSTEM_PROMPT: &str = "You are a friendly helper bot for cyclists. Your job is to give short, \
    informal advice based on a weather summary.";

const START_TEXT: &str = "Hi! I'm a bot for cyclists. 🚴‍♂️\n\n\
    I have *forgotten* your old location (if there was one).\n\n\
    /checkride - check the weather right now.\n\
    /forecast - get the forecast for the next 4 days.\n\n\
    Both commands use your saved location. If there is none, I will ask you to send it once.\n\n\
    /forgetlocation - delete your saved location.";

const POLL_ERROR_PAUSE_SECS: u64 = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    CheckRide,
    Forecast,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    CheckRide,
    Forecast,
    ForgetLocation,
    Unknown,
}

impl Command {
    pub fn parse(name: &str) -> Command {
        match name {
            "start" => Command::Start,
            "checkride" => Command::CheckRide,
            "forecast" => Command::Forecast,
            "forgetlocation" => Command::ForgetLocation,
            _ => Command::Unknown,
        }
    }
}

/// Conversation state, the request each chat is waiting to send a location for
///
#[derive(Default)]
pub struct Sessions {
    pending: HashMap<i64, PendingRequest>,
}

impl Sessions {
    pub fn wait_for_location(&mut self, chat_id: i64, request: PendingRequest) {
        self.pending.insert(chat_id, request);
    }

    /// Returns and clears whatever the chat was waiting for
    ///
    pub fn take(&mut self, chat_id: i64) -> Option<PendingRequest> {
        self.pending.remove(&chat_id)
    }
}

/// What to say and do after a location has been received and saved
///
/// # Arguments
///
/// * 'pending' - what the chat was waiting for, if anything
fn location_followup(pending: Option<PendingRequest>) -> (&'static str, PendingRequest) {
    match pending {
        Some(PendingRequest::CheckRide) =>
            ("Great, I have saved this location! Running /checkride...", PendingRequest::CheckRide),
        Some(PendingRequest::Forecast) =>
            ("Great, I have saved this location! Running /forecast...", PendingRequest::Forecast),
        None =>
            ("I have updated your location. Preparing the default forecast...", PendingRequest::Forecast),
    }
}

/// Whether a forecast summary is worth sending through the LLM, the unavailable
/// text is sent as-is
///
/// # Arguments
///
/// * 'summary' - the plain forecast summary
fn should_reword_forecast(summary: &str) -> bool {
    summary != FORECAST_UNAVAILABLE
}

fn today_prompt(summary: &str) -> String {
    format!(
        "Here is the weather summary:\n{}\n\n\
        Your task:\n\
        1. Write a VERY short, friendly and informal reply.\n\
        2. Say whether it is worth riding a bike TODAY.\n\
        3. If it is cold (below ~10C) or there is precipitation (not \"clear\" or \"cloudy\"), \
        advise not to ride or to dress very warmly.",
        summary
    )
}

fn forecast_prompt(summary: &str) -> String {
    format!(
        "Here is the weather summary:\n{}\n\n\
        Your task:\n\
        1. Write a VERY short, friendly and informal reply (2-3 sentences).\n\
        2. If the weather is good (warm and dry), recommend riding.\n\
        3. If it is cold (below ~10C) or there is precipitation, say it is a bad idea or that one \
        should dress very warmly.\n\
        4. Don't list the days one by one, give an overall assessment of \"the coming days\".",
        summary
    )
}

/// The chat bot, routes commands and locations and sends riding advice
pub struct Bot {
    telegram: Telegram,
    owm: OWM,
    llm: Option<LLM>,
    db: DB,
    sessions: Sessions,
    username: Option<String>,
}

impl Bot {
    /// Creates a new Bot
    ///
    /// # Arguments
    ///
    /// * 'telegram' - messaging front end
    /// * 'owm' - weather provider
    /// * 'llm' - optional rewriter of plain summaries
    /// * 'db' - location store
    pub fn new(telegram: Telegram, owm: OWM, llm: Option<LLM>, db: DB) -> Bot {
        Bot { telegram, owm, llm, db, sessions: Sessions::default(), username: None }
    }

    /// Update polling loop, updates are handled one at a time in arrival order
    ///
    pub async fn run(&mut self) {
        match self.telegram.get_me().await {
            Ok(me) => {
                info!("running as @{}", me.username.as_deref().unwrap_or("?"));
                self.username = me.username;
            }
            Err(e) => error!("failed to get bot identity, commands addressed by name are ignored: {}", e),
        }

        let mut offset: i64 = 0;

        loop {
            match self.telegram.get_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.handle_update(update).await;
                    }
                }
                Err(e) => {
                    error!("failed to get updates: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(POLL_ERROR_PAUSE_SECS)).await;
                }
            }
        }
    }

    async fn handle_update(&mut self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let chat_id = message.chat.id;

        if let Some(name) = message.command(self.username.as_deref()) {
            self.handle_command(chat_id, Command::parse(name)).await;
        } else if let Some(location) = message.location {
            self.handle_location(chat_id, location).await;
        }
    }

    async fn handle_command(&mut self, chat_id: i64, command: Command) {
        match command {
            Command::Start => {
                if let Err(e) = self.db.delete_location(chat_id) {
                    error!("failed to delete location on /start: {}", e);
                }
                info!("location for {} deleted by /start", chat_id);
                self.reply(chat_id, START_TEXT).await;
            }
            Command::CheckRide => match self.stored_location(chat_id) {
                Some(location) => {
                    info!("using stored location for /checkride ({})", chat_id);
                    self.send_today_analysis(chat_id, location).await;
                }
                None => {
                    self.sessions.wait_for_location(chat_id, PendingRequest::CheckRide);
                    self.reply(chat_id, "Send me your location (📎) and I will remember it (for /checkride).").await;
                }
            },
            Command::Forecast => match self.stored_location(chat_id) {
                Some(location) => {
                    info!("using stored location for /forecast ({})", chat_id);
                    self.send_forecast_analysis(chat_id, location).await;
                }
                None => {
                    self.sessions.wait_for_location(chat_id, PendingRequest::Forecast);
                    self.reply(chat_id, "Send me your location (📎) and I will remember it (for /forecast).").await;
                }
            },
            Command::ForgetLocation => {
                if let Err(e) = self.db.delete_location(chat_id) {
                    error!("failed to delete location: {}", e);
                    self.reply(chat_id, "Error while deleting your location.").await;
                } else {
                    self.reply(chat_id, "I have deleted your location.").await;
                }
            }
            Command::Unknown => self.reply(chat_id, "I don't know that command.").await,
        }
    }

    async fn handle_location(&mut self, chat_id: i64, location: Location) {
        let pending = match self.accept_location(chat_id, &location) {
            Ok(pending) => pending,
            Err(e) => {
                error!("failed to save location: {}", e);
                self.reply(chat_id, "Could not save your location, a database error occurred.").await;
                return;
            }
        };

        let (ack, request) = location_followup(pending);
        self.reply(chat_id, ack).await;

        match request {
            PendingRequest::CheckRide => self.send_today_analysis(chat_id, location).await,
            PendingRequest::Forecast => self.send_forecast_analysis(chat_id, location).await,
        }
    }

    /// Saves a received location and returns what the chat was waiting for.
    /// A failed save keeps the chat waiting so that it can simply resend.
    ///
    /// # Arguments
    ///
    /// * 'chat_id' - chat the location came from
    /// * 'location' - the received location
    fn accept_location(&mut self, chat_id: i64, location: &Location) -> Result<Option<PendingRequest>, DBError> {
        self.db.save_location(chat_id, location)?;

        Ok(self.sessions.take(chat_id))
    }

    fn stored_location(&self, chat_id: i64) -> Option<Location> {
        match self.db.get_location(chat_id) {
            Ok(location) => location,
            Err(e) => {
                error!("failed to read location for {}: {}", chat_id, e);
                None
            }
        }
    }

    async fn send_today_analysis(&self, chat_id: i64, location: Location) {
        let sample = match self.owm.fetch_current(location.latitude, location.longitude).await {
            Ok(sample) => sample,
            Err(e) => {
                error!("{}", e);
                self.reply(chat_id, "Could not get the *current* weather :(").await;
                return;
            }
        };

        let summary = summarize_current(&sample);
        let reply = self.reword(&summary, &today_prompt(&summary)).await;

        self.reply(chat_id, &reply).await;
    }

    async fn send_forecast_analysis(&self, chat_id: i64, location: Location) {
        let series = match self.owm.fetch_series(location.latitude, location.longitude).await {
            Ok(series) => series,
            Err(e) => {
                error!("{}", e);
                self.reply(chat_id, "Could not get the *forecast* :(").await;
                return;
            }
        };

        let summary = summarize_forecast(&series, Utc::now());
        if !should_reword_forecast(&summary) {
            self.reply(chat_id, &summary).await;
            return;
        }

        let reply = self.reword(&summary, &forecast_prompt(&summary)).await;

        self.reply(chat_id, &reply).await;
    }

    /// Rewords a plain summary through the LLM, falls back to the plain summary
    ///
    /// # Arguments
    ///
    /// * 'summary' - the plain text summary
    /// * 'user_prompt' - instruction including the summary
    async fn reword(&self, summary: &str, user_prompt: &str) -> String {
        let Some(llm) = &self.llm else {
            return summary.to_string();
        };

        match llm.rewrite(SYSTEM_PROMPT, user_prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("LLM rewrite failed, sending plain summary: {}", e);
                summary.to_string()
            }
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.telegram.send_message(chat_id, text).await {
            error!("failed to send message to {}: {}", chat_id, e);
        }
    }
}
