use super::listings::open_listing;
use super::{bool_option, defer, send_error_response, string_option};
use crate::display::EMBED_COLOR;
use crate::listing::Listing;
use crate::models::NewPoll;
use crate::services::Services;
use crate::source::VoteSource;
use crate::tags::{self, TagCheck};
use chrono::{Duration, Utc};
use log::{error, info};
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::Timestamp;
use serenity::prelude::*;

pub const UNKNOWN_TAG_MESSAGE: &str =
    "The tag you specified was not found in the list of available tags, please try again.";
const NO_NEW_POLLS_MESSAGE: &str = "There are no new polls right now. Please, try again later.";
const MAX_DESCRIPTION: usize = 4096;

pub fn create_polls_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("polls")
        .description("Show on-chain governance polls")
        .create_option(|option| {
            option
                .name("active")
                .description("Vote breakdown of active polls")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("tag")
                        .description("Only show polls with this tag")
                        .kind(CommandOptionType::String)
                        .set_autocomplete(true)
                        .required(false)
                })
        })
        .create_option(|option| {
            option
                .name("finished")
                .description("Vote breakdown of the most recently finished polls")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("tag")
                        .description("Only show polls with this tag")
                        .kind(CommandOptionType::String)
                        .set_autocomplete(true)
                        .required(false)
                })
        })
        .create_option(|option| {
            option
                .name("new")
                .description("List polls that started recently")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("links")
                        .description("Include links to the poll source documents")
                        .kind(CommandOptionType::Boolean)
                        .required(false)
                })
        })
}

pub async fn handle_polls_command(
    services: &Services,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subcommand = match command.data.options.first() {
        Some(option) => option,
        None => {
            send_error_response(ctx, command, "No subcommand provided").await?;
            return Ok(());
        }
    };

    match subcommand.name.as_str() {
        "active" | "finished" => {
            let finished = subcommand.name == "finished";
            let tag = string_option(&subcommand.options, "tag").map(|tag| tag.trim().to_lowercase());

            if let Some(tag) = &tag {
                if tags::check(&tags::snapshot(), tag) == TagCheck::Unknown {
                    info!("Rejecting unknown poll tag '{}'", tag);
                    send_error_response(ctx, command, UNKNOWN_TAG_MESSAGE).await?;
                    return Ok(());
                }
            }

            open_listing(services, ctx, command, Listing::Polls { finished, tag }).await?;
        }
        "new" => {
            let links = bool_option(&subcommand.options, "links").unwrap_or(false);
            handle_new_polls(services, ctx, command, links).await?;
        }
        _ => send_error_response(ctx, command, "Unknown subcommand").await?,
    }

    Ok(())
}

async fn handle_new_polls(
    services: &Services,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    links: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    defer(ctx, command).await?;

    let window = Duration::hours(services.config.new_polls_window_hours);
    let polls = match services.aggregator.new_polls_since(Utc::now(), window).await {
        Ok(polls) => polls,
        Err(e) => {
            error!("Failed to fetch new polls: {}", e);
            command
                .create_followup_message(&ctx.http, |message| {
                    message.content(crate::session::SOURCE_UNAVAILABLE_MESSAGE)
                })
                .await?;
            return Ok(());
        }
    };

    if polls.is_empty() {
        command
            .create_followup_message(&ctx.http, |message| message.content(NO_NEW_POLLS_MESSAGE))
            .await?;
        return Ok(());
    }

    let portal = services.aggregator.source().portal_url();
    let description = new_polls_description(&polls, portal, links);
    command
        .create_followup_message(&ctx.http, |message| {
            message.embed(|embed| {
                embed
                    .title("New polls")
                    .description(description)
                    .color(EMBED_COLOR)
                    .footer(|footer| {
                        footer.text(format!(
                            "{} poll{} started in the last {} hours",
                            polls.len(),
                            if polls.len() == 1 { "" } else { "s" },
                            services.config.new_polls_window_hours
                        ))
                    })
                    .timestamp(Timestamp::now())
            })
        })
        .await?;

    Ok(())
}

// One line per poll; stops early rather than exceed the embed description limit
fn new_polls_description(polls: &[NewPoll], portal: &str, links: bool) -> String {
    let mut description = String::new();

    for (shown, poll) in polls.iter().enumerate() {
        let mut line = format!("[{}]({}/polling/{}) - {}", poll.id, portal, poll.id, poll.title);
        if links {
            line.push_str(&format!(" ([source]({}))", poll.source_link));
        }

        let remaining = polls.len() - shown;
        let overflow = format!("\n...and {} more", remaining);
        if description.chars().count() + line.chars().count() + overflow.chars().count() + 1 > MAX_DESCRIPTION {
            description.push_str(&overflow);
            break;
        }

        if !description.is_empty() {
            description.push('\n');
        }
        description.push_str(&line);
    }

    description
}

pub async fn handle_tag_autocomplete(
    ctx: &Context,
    autocomplete: &AutocompleteInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let typed = autocomplete
        .data
        .options
        .first()
        .and_then(|subcommand| subcommand.options.iter().find(|option| option.focused))
        .and_then(|option| option.value.as_ref())
        .and_then(|value| value.as_str())
        .unwrap_or("");

    let choices = tags::suggestions(&tags::snapshot(), typed);
    autocomplete
        .create_autocomplete_response(&ctx.http, |response| {
            for tag in &choices {
                response.add_string_choice(tag, tag);
            }
            response
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_poll(id: u64) -> NewPoll {
        NewPoll {
            id,
            title: format!("Poll number {}", id),
            source_link: format!("https://github.example/poll-{}.md", id),
        }
    }

    #[test]
    fn new_polls_link_to_the_portal() {
        let polls = vec![new_poll(3), new_poll(4)];

        assert_eq!(
            new_polls_description(&polls, "https://vote.example", false),
            "[3](https://vote.example/polling/3) - Poll number 3\n[4](https://vote.example/polling/4) - Poll number 4"
        );
        assert!(
            new_polls_description(&polls, "https://vote.example", true)
                .ends_with("Poll number 4 ([source](https://github.example/poll-4.md))")
        );
    }

    #[test]
    fn long_new_poll_lists_stay_within_the_embed_limit() {
        let polls: Vec<NewPoll> = (1..=200).map(new_poll).collect();
        let description = new_polls_description(&polls, "https://vote.example", true);

        assert!(description.chars().count() <= MAX_DESCRIPTION);
        assert!(description.contains("more"));
        assert!(description.starts_with("[1]("));
    }
}
