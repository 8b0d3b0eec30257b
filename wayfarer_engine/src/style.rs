//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides a set of convenience methods for applying
//! ANSI styling via the `colored` crate. Implementations for `&str` and
//! `String` are provided so string literals can be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn location_style(&self) -> ColoredString;
    fn location_titlebar_style(&self) -> ColoredString;
    fn description_style(&self) -> ColoredString;
    fn npc_style(&self) -> ColoredString;
    fn dialogue_style(&self) -> ColoredString;
    fn item_style(&self) -> ColoredString;
    fn monster_style(&self) -> ColoredString;
    fn quest_style(&self) -> ColoredString;
    fn quest_done_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn subheading_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn event_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn location_style(&self) -> ColoredString {
        self.truecolor(223, 120, 30)
    }
    fn location_titlebar_style(&self) -> ColoredString {
        self.truecolor(223, 120, 30).underline()
    }
    fn description_style(&self) -> ColoredString {
        self.italic().truecolor(150, 200, 240)
    }
    fn npc_style(&self) -> ColoredString {
        self.truecolor(60, 180, 90).underline()
    }
    fn dialogue_style(&self) -> ColoredString {
        self.truecolor(220, 220, 160)
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn monster_style(&self) -> ColoredString {
        self.truecolor(210, 70, 70)
    }
    fn quest_style(&self) -> ColoredString {
        self.truecolor(200, 80, 220)
    }
    fn quest_done_style(&self) -> ColoredString {
        self.truecolor(200, 80, 220).strikethrough()
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 80, 80)
    }
    fn subheading_style(&self) -> ColoredString {
        self.underline()
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(120, 120, 120)
    }
    fn event_style(&self) -> ColoredString {
        self.italic().truecolor(230, 230, 90)
    }
}

impl GameStyle for String {
    fn location_style(&self) -> ColoredString {
        self.as_str().location_style()
    }
    fn location_titlebar_style(&self) -> ColoredString {
        self.as_str().location_titlebar_style()
    }
    fn description_style(&self) -> ColoredString {
        self.as_str().description_style()
    }
    fn npc_style(&self) -> ColoredString {
        self.as_str().npc_style()
    }
    fn dialogue_style(&self) -> ColoredString {
        self.as_str().dialogue_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn monster_style(&self) -> ColoredString {
        self.as_str().monster_style()
    }
    fn quest_style(&self) -> ColoredString {
        self.as_str().quest_style()
    }
    fn quest_done_style(&self) -> ColoredString {
        self.as_str().quest_done_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn subheading_style(&self) -> ColoredString {
        self.as_str().subheading_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn event_style(&self) -> ColoredString {
        self.as_str().event_style()
    }
}
