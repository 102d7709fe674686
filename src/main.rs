mod errors;
mod logging;
mod initialization;
mod models;
mod time_context;
mod daylight_filter;
mod day_aggregator;
mod decision_policy;
mod presenter;
mod manager_db;
mod manager_owm;
mod manager_llm;
mod manager_telegram;
mod handlers;
mod bot;

use actix_web::{App, HttpServer};
use log::{error, info};
use crate::bot::Bot;
use crate::errors::UnrecoverableError;
use crate::initialization::config;
use crate::manager_db::DB;
use crate::manager_llm::LLM;
use crate::manager_owm::OWM;
use crate::manager_telegram::Telegram;

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let db = DB::new(&config.db.db_path)?;
    let owm = OWM::new(&config.weather.base_url, &config.weather.api_key, &config.weather.language)?;
    let telegram = Telegram::new(&config.telegram.token, config.telegram.poll_timeout_secs)?;
    let llm = match &config.llm.api_key {
        Some(api_key) => Some(LLM::new(
            &config.llm.base_url,
            api_key,
            &config.llm.model,
            config.llm.proxy_url.as_deref(),
        )?),
        None => {
            info!("no LLM api key configured, plain summaries will be sent");
            None
        }
    };

    let mut bot = Bot::new(telegram, owm, llm, db);

    info!("starting health check server on {}:{}", config.web_server.bind_address, config.web_server.bind_port);
    let server = HttpServer::new(|| {
        App::new()
            .service(handlers::health)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run();

    tokio::select! {
        result = server => {
            if let Err(e) = &result {
                error!("health check server stopped: {}", e);
            }
            result?;
        }
        _ = bot.run() => {}
    }

    Ok(())
}
