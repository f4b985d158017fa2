//! Player-facing strings for the supported languages.
//!
//! The engine itself never produces text; front ends look up the messages
//! for its events here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::event::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Ru,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Texts {
    pub title: &'static str,
    pub win_message: &'static str,
    pub lose_message: &'static str,
    pub score_label: &'static str,
}

const EN: Texts = Texts {
    title: "2048",
    win_message: "Congratulations! You've reached 2048!",
    lose_message: "Game Over! No more moves.",
    score_label: "Score: ",
};

const RU: Texts = Texts {
    title: "2048",
    win_message: "Поздравляем! Вы достигли 2048!",
    lose_message: "Игра окончена! У вас не осталось ходов.",
    score_label: "Счет: ",
};

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ru];

    pub fn texts(self) -> &'static Texts {
        match self {
            Language::En => &EN,
            Language::Ru => &RU,
        }
    }

    /// The message announcing `event`.
    pub fn message(self, event: &GameEvent) -> &'static str {
        match event {
            GameEvent::Won { .. } => self.texts().win_message,
            GameEvent::Lost { .. } => self.texts().lose_message,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            other => Err(EngineError::InvalidConfig(format!(
                "unsupported language {other:?}"
            ))),
        }
    }
}
