use crate::handlers::target::CommandTarget;
use crate::listing::Listing;
use crate::services::Services;
use crate::session::{self, PageRequest};
use chrono::Utc;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::*;

pub fn create_execs_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("execs")
        .description("Show the vote breakdown of active executive votes")
}

pub fn create_votes_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("votes")
        .description("Show the vote breakdown of every active executive vote and poll")
}

pub async fn handle_execs_command(
    services: &Services,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    open_listing(services, ctx, command, Listing::Executives).await
}

pub async fn handle_votes_command(
    services: &Services,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    open_listing(services, ctx, command, Listing::Active).await
}

// Posts the first page of `listing`; the target defers before anything is fetched
pub(crate) async fn open_listing(
    services: &Services,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    listing: Listing,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let target = CommandTarget { ctx, command };
    session::show_page(
        &services.aggregator,
        &services.renderer,
        &target,
        PageRequest::open(listing),
        Utc::now(),
    )
    .await
}
