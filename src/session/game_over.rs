//! Game-over screen and in-game score label.

use serde::{Deserialize, Serialize};

use super::scene::{NavAction, Session};
use crate::context::ScoreDisplay;

/// Buttons on the game-over screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverAction {
    Retry,
    MainMenu,
    Quit,
}

impl From<GameOverAction> for NavAction {
    fn from(action: GameOverAction) -> Self {
        match action {
            GameOverAction::Retry => NavAction::PlayGame,
            GameOverAction::MainMenu => NavAction::MainMenu,
            GameOverAction::Quit => NavAction::Quit,
        }
    }
}

/// What the game-over scene shows, read from the session on entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverScreen {
    final_score: u32,
}

impl GameOverScreen {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            final_score: session.final_score(),
        }
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    #[must_use]
    pub fn final_score_text(&self) -> String {
        format!("Final Score: {}", self.final_score)
    }

    pub fn choose(&self, action: GameOverAction, session: &mut Session) {
        session.navigate(action.into());
    }
}

/// In-game score text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreLabel {
    score: u32,
    text: String,
}

impl Default for ScoreLabel {
    fn default() -> Self {
        Self {
            score: 0,
            text: "Score: 0".to_string(),
        }
    }
}

impl ScoreLabel {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl ScoreDisplay for ScoreLabel {
    fn set_score(&mut self, score: u32) {
        self.score = score;
        self.text = format!("Score: {}", score);
    }
}
