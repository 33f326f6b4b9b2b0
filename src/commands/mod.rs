pub mod listings;
pub mod polls;

use crate::services::Services;
use log::info;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::prelude::*;

pub async fn register_commands(ctx: &Context) -> Result<(), serenity::Error> {
    Command::set_global_application_commands(&ctx.http, |commands| {
        commands
            .create_application_command(|command| polls::create_polls_command(command))
            .create_application_command(|command| listings::create_execs_command(command))
            .create_application_command(|command| listings::create_votes_command(command))
    })
    .await?;

    Ok(())
}

pub async fn handle_command(
    services: &Services,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Received command: {}", command.data.name);
    match command.data.name.as_str() {
        "polls" => polls::handle_polls_command(services, ctx, command).await?,
        "execs" => listings::handle_execs_command(services, ctx, command).await?,
        "votes" => listings::handle_votes_command(services, ctx, command).await?,
        _ => send_error_response(ctx, command, "Unknown command").await?,
    }

    Ok(())
}

pub async fn handle_autocomplete(
    ctx: &Context,
    autocomplete: &AutocompleteInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match autocomplete.data.name.as_str() {
        "polls" => polls::handle_tag_autocomplete(ctx, autocomplete).await,
        _ => Ok(()),
    }
}

pub(crate) async fn send_error_response(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    error_message: &str,
) -> Result<(), serenity::Error> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(error_message).ephemeral(true))
        })
        .await
}

// Discord allows three seconds before the first response; listings take longer than that
pub(crate) async fn defer(ctx: &Context, command: &ApplicationCommandInteraction) -> Result<(), serenity::Error> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
        })
        .await
}

pub(crate) fn string_option<'o>(options: &'o [CommandDataOption], name: &str) -> Option<&'o str> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_ref())
        .and_then(|value| value.as_str())
}

pub(crate) fn bool_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_ref())
        .and_then(|value| value.as_bool())
}
