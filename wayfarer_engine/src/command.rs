//! Command module
//!
//! Describes possible commands used during gameplay.

/// Commands that can be executed by the player.
#[derive(Debug, Clone, PartialEq, Eq, variantly::Variantly)]
pub enum Command {
    Drop(String),
    Go(String),
    Help,
    Hunt(String),
    Inventory,
    ListSaves,
    Load(String),
    Look,
    Quests,
    Quit,
    Save(String),
    Take(String),
    TalkTo(String),
    Unknown,
}

/// Parses an input string and returns a corresponding `Command` if recognized.
///
/// Name arguments may span several words ("talk to Elder Fedot").
pub fn parse_command(input: &str) -> Command {
    let words: Vec<&str> = input.split_whitespace().collect();
    match words.as_slice() {
        ["look"] | ["l"] => Command::Look,
        ["go" | "walk" | "travel", "to", rest @ ..] if !rest.is_empty() => Command::Go(rest.join(" ")),
        ["go" | "walk" | "travel", rest @ ..] if !rest.is_empty() => Command::Go(rest.join(" ")),
        ["pick", "up", rest @ ..] if !rest.is_empty() => Command::Take(rest.join(" ")),
        ["take" | "get", rest @ ..] if !rest.is_empty() => Command::Take(rest.join(" ")),
        ["drop", rest @ ..] if !rest.is_empty() => Command::Drop(rest.join(" ")),
        ["talk" | "speak", "to" | "with", rest @ ..] if !rest.is_empty() => Command::TalkTo(rest.join(" ")),
        ["talk" | "speak", rest @ ..] if !rest.is_empty() => Command::TalkTo(rest.join(" ")),
        ["hunt" | "fight" | "kill", rest @ ..] if !rest.is_empty() => Command::Hunt(rest.join(" ")),
        ["inventory" | "inv" | "i"] => Command::Inventory,
        ["quests" | "journal" | "log"] => Command::Quests,
        ["save", slot] => Command::Save((*slot).to_string()),
        ["load", slot] => Command::Load((*slot).to_string()),
        ["saves"] => Command::ListSaves,
        ["help" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        _ => Command::Unknown,
    }
}
