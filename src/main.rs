mod commands;
mod config;
mod display;
mod error;
mod handlers;
mod listing;
mod models;
mod pagination;
mod render;
mod services;
mod session;
mod source;
mod tags;
mod tasks;
mod voting;

use config::Config;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use services::Services;
use std::sync::Arc;

struct Bot {
    services: Arc<Services>,
}

#[async_trait]
impl EventHandler for Bot {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let services = Arc::clone(&self.services);

        // Spawn a task to handle the interaction concurrently
        tokio::spawn(async move {
            handlers::handle_interaction(&services, &ctx, interaction).await;
        });
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        if let Err(why) = commands::register_commands(&ctx).await {
            error!("Failed to register slash commands: {:?}", why);
        } else {
            info!("Successfully registered global slash commands.");
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let services = match Services::new(config) {
        Ok(services) => Arc::new(services),
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            return;
        }
    };

    // Started here rather than in `ready`, which fires again on every reconnect
    tokio::spawn(tasks::tag_refresh::refresh_tags_task(Arc::clone(&services)));

    let token = services.config.discord_token.clone();
    let mut client = Client::builder(&token, GatewayIntents::GUILDS)
        .event_handler(Bot { services })
        .await
        .expect("Err creating client");

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
