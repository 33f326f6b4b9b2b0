use super::navigation::{self, NavAction};
use crate::commands::defer;
use crate::display::{Controls, RenderTarget, VoteDisplay};
use async_trait::async_trait;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::channel::AttachmentType;
use serenity::model::Timestamp;
use serenity::prelude::*;
use std::borrow::Cow;

fn fill_embed<'e>(embed: &'e mut CreateEmbed, display: &VoteDisplay) -> &'e mut CreateEmbed {
    embed
        .title(&display.title)
        .description(&display.description)
        .color(display.color)
        .image(format!("attachment://{}", display.image.filename))
        .footer(|footer| footer.text(&display.footer))
        .timestamp(Timestamp::now());
    for field in &display.fields {
        embed.field(&field.name, &field.value, field.inline);
    }
    embed
}

fn fill_components<'c>(components: &'c mut CreateComponents, controls: &Controls) -> &'c mut CreateComponents {
    if !controls.choices.is_empty() {
        components.create_action_row(|row| {
            row.create_select_menu(|menu| {
                menu.custom_id(navigation::custom_id(NavAction::Pick, controls))
                    .placeholder("Select a vote to see it on its own")
                    .options(|opts| {
                        for choice in &controls.choices {
                            opts.create_option(|opt| {
                                opt.label(&choice.label)
                                    .value(&choice.value)
                                    .description(&choice.description)
                                    .default_selection(choice.selected)
                            });
                        }
                        opts
                    })
            })
        });
    }

    components.create_action_row(|row| {
        row.create_button(|btn| {
            btn.custom_id(navigation::custom_id(NavAction::Previous, controls))
                .label("◀ Previous")
                .style(ButtonStyle::Secondary)
                .disabled(!controls.previous_enabled)
        });
        row.create_button(|btn| {
            btn.custom_id(navigation::custom_id(NavAction::Next, controls))
                .label("Next ▶")
                .style(ButtonStyle::Secondary)
                .disabled(!controls.next_enabled)
        });
        row
    });
    components
}

fn attachment(display: &VoteDisplay) -> AttachmentType<'static> {
    AttachmentType::Bytes {
        data: Cow::Owned(display.image.bytes.clone()),
        filename: display.image.filename.clone(),
    }
}

// Posts listing pages as follow-ups to a slash command
pub struct CommandTarget<'a> {
    pub ctx: &'a Context,
    pub command: &'a ApplicationCommandInteraction,
}

#[async_trait]
impl RenderTarget for CommandTarget<'_> {
    async fn acknowledge(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        defer(self.ctx, self.command).await?;
        Ok(())
    }

    async fn show(&self, display: VoteDisplay) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let file = attachment(&display);
        self.command
            .create_followup_message(&self.ctx.http, |message| {
                message
                    .embed(|e| fill_embed(e, &display))
                    .add_file(file)
                    .components(|c| fill_components(c, &display.controls))
            })
            .await?;
        Ok(())
    }

    async fn notify(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.command
            .create_followup_message(&self.ctx.http, |followup| followup.content(message))
            .await?;
        Ok(())
    }
}

// Rewrites the message a navigation button or dropdown belongs to
pub struct ComponentTarget<'a> {
    pub ctx: &'a Context,
    pub component: &'a MessageComponentInteraction,
}

#[async_trait]
impl RenderTarget for ComponentTarget<'_> {
    async fn acknowledge(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.component
            .create_interaction_response(&self.ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredUpdateMessage)
            })
            .await?;
        Ok(())
    }

    // Interaction response edits cannot carry files, so the message itself is edited
    async fn show(&self, display: VoteDisplay) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let file = attachment(&display);
        self.component
            .channel_id
            .edit_message(&self.ctx.http, self.component.message.id, |message| {
                message
                    .embed(|e| fill_embed(e, &display))
                    .components(|c| fill_components(c, &display.controls))
                    .remove_all_attachments()
                    .attachment(file)
            })
            .await?;
        Ok(())
    }

    // The original message stays as it was; only the clicking user sees the notice
    async fn notify(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.component
            .create_followup_message(&self.ctx.http, |followup| followup.content(message).ephemeral(true))
            .await?;
        Ok(())
    }
}
