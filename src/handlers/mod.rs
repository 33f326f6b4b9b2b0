pub mod navigation;
pub mod target;

use crate::services::Services;
use crate::session;
use chrono::Utc;
use log::{error, info, warn};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::prelude::*;
use target::ComponentTarget;

// Navigation buttons and the vote dropdown on a listing message
pub async fn handle_component(
    services: &Services,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let custom_id = &component.data.custom_id;
    info!("Received component interaction: {}", custom_id);

    match navigation::parse(custom_id, &component.data.values) {
        Some(request) => {
            let target = ComponentTarget { ctx, component };
            session::show_page(&services.aggregator, &services.renderer, &target, request, Utc::now()).await
        }
        None => {
            warn!("Unhandled component custom_id: {}", custom_id);
            component
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| message.content("Unknown button action.").ephemeral(true))
                })
                .await?;
            Ok(())
        }
    }
}

pub async fn handle_interaction(services: &Services, ctx: &Context, interaction: Interaction) {
    let result = match interaction {
        Interaction::ApplicationCommand(command) => crate::commands::handle_command(services, ctx, &command).await,
        Interaction::MessageComponent(component) => handle_component(services, ctx, &component).await,
        Interaction::Autocomplete(autocomplete) => crate::commands::handle_autocomplete(ctx, &autocomplete).await,
        _ => {
            warn!("Unhandled interaction type: {:?}", interaction.kind());
            Ok(())
        }
    };

    if let Err(why) = result {
        error!("Interaction handler error: {:?}", why);
    }
}
