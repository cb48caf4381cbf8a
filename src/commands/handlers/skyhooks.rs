//! Skyhook timer command handlers
//!
//! Handles: skyhook, skyhooks, delete-skyhook
//!
//! - **Version**: 1.0.0
//! - **Since**: 3.40.0

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;

use super::{reply, require_guild};
use crate::commands::context::CommandContext;
use crate::commands::slash::{get_integer_option, get_string_option};
use crate::core::embeds::{discord_timestamp, error_embed, success_embed, with_footer};
use crate::core::truncate_for_embed;
use crate::features::skyhooks::{
    normalize_system, parse_time_until, MoonType, NewSkyhook, Skyhook, SkyhookError,
    SKYHOOK_COLOR,
};

pub const COMMANDS: &[&str] = &["skyhook", "skyhooks", "delete-skyhook"];

const DEFAULT_LIST_LIMIT: i64 = 10;
const MAX_LIST_LIMIT: i64 = 50;

pub async fn handle(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let Some(guild_id) = require_guild(serenity_ctx, command).await? else {
        return Ok(());
    };
    let guild_id = guild_id.to_string();
    let options = &command.data.options;

    let embed = match command.data.name.as_str() {
        "skyhook" => {
            let new = timer_from_input(
                &guild_id,
                &get_string_option(options, "system").unwrap_or_default(),
                &get_string_option(options, "moon_type").unwrap_or_default(),
                &get_string_option(options, "time_until").unwrap_or_default(),
                Utc::now(),
            );
            let stored = match new {
                Ok(new) => ctx.database.insert_skyhook(&new).await,
                Err(e) => Err(e),
            };
            match stored {
                Ok(skyhook) => {
                    info!("Skyhook timer {} added for {}", skyhook.id, skyhook.system);
                    timer_embed(&skyhook)
                }
                Err(e) => skyhook_rejection(&e),
            }
        }
        "skyhooks" => {
            let limit = get_integer_option(options, "limit")
                .unwrap_or(DEFAULT_LIST_LIMIT)
                .clamp(1, MAX_LIST_LIMIT);
            match ctx
                .database
                .upcoming_skyhooks(&guild_id, Utc::now(), limit as usize)
                .await
            {
                Ok(timers) => listing_embed(&timers),
                Err(e) => skyhook_rejection(&e),
            }
        }
        "delete-skyhook" => {
            let id = get_integer_option(options, "skyhook_id")
                .ok_or_else(|| anyhow::anyhow!("Missing skyhook_id parameter"))?;
            match ctx.database.delete_skyhook(&guild_id, id).await {
                Ok(()) => success_embed("Skyhook timer deleted", &format!("Skyhook timer {id} deleted.")),
                Err(e) => skyhook_rejection(&e),
            }
        }
        _ => return Ok(()),
    };

    reply(serenity_ctx, command, with_footer(embed, ctx.footer()), false).await
}

/// Validate /skyhook input into a timer due `time_until` after `now`
pub fn timer_from_input(
    guild_id: &str,
    system: &str,
    moon_type: &str,
    time_until: &str,
    now: DateTime<Utc>,
) -> Result<NewSkyhook, SkyhookError> {
    let system = normalize_system(system)?;
    let moon_type = moon_type.parse::<MoonType>()?;
    let lead = parse_time_until(time_until)?;

    Ok(NewSkyhook {
        guild_id: guild_id.to_string(),
        system,
        moon_type,
        due_at: now + lead,
    })
}

pub fn skyhook_rejection(err: &SkyhookError) -> CreateEmbed {
    match err {
        SkyhookError::StoreUnavailable(_) => error!("Skyhook operation failed: {err}"),
        _ => debug!("Skyhook operation rejected: {err}"),
    }
    error_embed(&err.user_message())
}

/// Confirmation for a stored timer
pub fn timer_embed(skyhook: &Skyhook) -> CreateEmbed {
    let unix = skyhook.due_at.timestamp();
    let mut embed = CreateEmbed::default();
    embed.title(format!("Skyhook timer: {}", skyhook.system));
    embed.color(SKYHOOK_COLOR);
    embed.field("System", &skyhook.system, true);
    embed.field("Moon", skyhook.moon_type, true);
    embed.field("ID", skyhook.id, true);
    embed.field(
        "Vulnerable (UTC)",
        skyhook.due_at.format("%Y-%m-%d %H:%M UTC"),
        false,
    );
    embed.field("Local time", discord_timestamp(unix, 'F'), true);
    embed.field("Countdown", discord_timestamp(unix, 'R'), true);
    embed
}

/// Upcoming timers, soonest first
pub fn listing_embed(timers: &[Skyhook]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("Upcoming skyhook timers");
    embed.color(SKYHOOK_COLOR);
    if timers.is_empty() {
        embed.description("No upcoming skyhook timers. Add one with /skyhook.");
        return embed;
    }

    let lines: Vec<String> = timers
        .iter()
        .map(|timer| {
            let unix = timer.due_at.timestamp();
            format!(
                "**{}** ({}) {} ({}) • ID {}",
                timer.system,
                timer.moon_type,
                discord_timestamp(unix, 'F'),
                discord_timestamp(unix, 'R'),
                timer.id
            )
        })
        .collect();
    embed.description(truncate_for_embed(&lines.join("\n")));
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_timer_from_pasted_status() {
        let new = timer_from_input("G1", "j115405", "I", "Secure (vulnerable in 2d 4h 33m)", now())
            .unwrap();
        assert_eq!(new.system, "J115405");
        assert_eq!(new.moon_type, MoonType::Ice);
        assert_eq!(
            new.due_at,
            now() + Duration::days(2) + Duration::hours(4) + Duration::minutes(33)
        );
    }

    #[test]
    fn test_first_invalid_field_is_reported() {
        assert!(matches!(
            timer_from_input("G1", "bad!", "gas", "soon", now()),
            Err(SkyhookError::InvalidSystem(_))
        ));
        assert!(matches!(
            timer_from_input("G1", "J115405", "gas", "soon", now()),
            Err(SkyhookError::InvalidMoonType(_))
        ));
        assert!(matches!(
            timer_from_input("G1", "J115405", "Lava", "5d", now()),
            Err(SkyhookError::TooFarAhead(_))
        ));
    }

    #[test]
    fn test_listing_embed() {
        let timer = Skyhook {
            id: 4,
            guild_id: "G1".to_string(),
            system: "J115405".to_string(),
            moon_type: MoonType::Lava,
            due_at: Utc.timestamp_opt(1900000000, 0).unwrap(),
        };
        let embed = listing_embed(&[timer]);
        let description = embed.0.get("description").and_then(|v| v.as_str()).unwrap();
        assert_eq!(
            description,
            "**J115405** (Lava) <t:1900000000:F> (<t:1900000000:R>) • ID 4"
        );
        assert_eq!(
            embed.0.get("color").and_then(|v| v.as_u64()),
            Some(SKYHOOK_COLOR as u64)
        );

        let empty = listing_embed(&[]);
        let description = empty.0.get("description").and_then(|v| v.as_str()).unwrap();
        assert!(description.contains("/skyhook"));
    }
}
