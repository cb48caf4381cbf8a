//! Vote tally for reminder notifications
//!
//! Reminder messages carry one button per reaction emoji. Clicking a button
//! records the user under that emoji in the embed description, one line per
//! emoji: `Reacted with 👍: alice, bob`.

use regex::Regex;
use std::sync::OnceLock;

/// Custom id prefix for vote buttons on reminder notifications
pub const VOTE_BUTTON_PREFIX: &str = "reminders:vote:";

/// Discord allows at most five buttons per action row
pub const MAX_VOTE_BUTTONS: usize = 5;

static TALLY_LINE: OnceLock<Regex> = OnceLock::new();

fn tally_line() -> &'static Regex {
    TALLY_LINE.get_or_init(|| {
        Regex::new(r"^Reacted with (.+?): (.*)$").expect("tally line pattern is valid")
    })
}

/// A parsed vote button click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub index: usize,
    pub emoji: String,
}

/// Build the custom id for the vote button at `index`
pub fn vote_custom_id(index: usize, emoji: &str) -> String {
    format!("{VOTE_BUTTON_PREFIX}{index}:{emoji}")
}

/// Parse a vote button custom id. Custom emoji contain colons, so only the
/// first three separators split.
pub fn parse_vote_id(custom_id: &str) -> Option<Vote> {
    let rest = custom_id.strip_prefix(VOTE_BUTTON_PREFIX)?;
    let (index, emoji) = rest.split_once(':')?;
    let index = index.parse().ok()?;
    if emoji.is_empty() {
        return None;
    }
    Some(Vote {
        index,
        emoji: emoji.to_string(),
    })
}

/// Record `user` under `emoji`, removing them from any other emoji line.
///
/// Lines that are not tally lines are kept as-is. Tally lines left without
/// users are dropped, and a new line is appended when `emoji` had none.
pub fn apply_vote(description: &str, emoji: &str, user: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut emoji_found = false;

    for line in description.lines() {
        let Some(captures) = tally_line().captures(line) else {
            lines.push(line.to_string());
            continue;
        };

        let line_emoji = &captures[1];
        let mut users: Vec<&str> = captures[2]
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty() && *u != user)
            .collect();

        if line_emoji == emoji {
            users.push(user);
            emoji_found = true;
        }

        if !users.is_empty() {
            lines.push(format!("Reacted with {line_emoji}: {}", users.join(", ")));
        }
    }

    if !emoji_found && !emoji.is_empty() {
        lines.push(format!("Reacted with {emoji}: {user}"));
    }

    lines.join("\n")
}
