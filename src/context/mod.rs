//! Collaborator interfaces consumed by the arbiter.
//!
//! The arbiter never reaches for a global. Everything it talks to outside the
//! board is injected through a [`GameContext`], and every slot in it is
//! optional: an unbound collaborator turns the corresponding call into a
//! no-op so the flip/compare protocol can never stall on one.
//!
//! Collaborators shared with other owners (a session that outlives one
//! board, a score label the UI also reads) are passed as `Rc<RefCell<T>>`;
//! blanket impls forward every trait through the cell.

use std::cell::RefCell;
use std::rc::Rc;

use crate::session::Scene;

/// Arranges and sizes card slots.
pub trait BoardLayout {
    /// Set the grid shape. Called before cards are dealt.
    fn configure(&mut self, columns: u16, rows: u16);

    /// Recompute the layout once cards are in place.
    fn refresh(&mut self) {}
}

/// Fire-and-forget sound cues.
pub trait AudioCues {
    fn play_flip(&mut self);
    fn play_match(&mut self);
    fn play_mismatch(&mut self);
    fn play_game_over(&mut self);
}

/// Receives the score after every change.
pub trait ScoreDisplay {
    fn set_score(&mut self, score: u32);
}

/// End-of-game hand-off.
pub trait SessionSink {
    /// Store the final score so it survives the scene change.
    fn set_final_score(&mut self, score: u32);

    fn request_scene_transition(&mut self, target: Scene);
}

impl<T: BoardLayout + ?Sized> BoardLayout for Rc<RefCell<T>> {
    fn configure(&mut self, columns: u16, rows: u16) {
        self.borrow_mut().configure(columns, rows);
    }

    fn refresh(&mut self) {
        self.borrow_mut().refresh();
    }
}

impl<T: AudioCues + ?Sized> AudioCues for Rc<RefCell<T>> {
    fn play_flip(&mut self) {
        self.borrow_mut().play_flip();
    }

    fn play_match(&mut self) {
        self.borrow_mut().play_match();
    }

    fn play_mismatch(&mut self) {
        self.borrow_mut().play_mismatch();
    }

    fn play_game_over(&mut self) {
        self.borrow_mut().play_game_over();
    }
}

impl<T: ScoreDisplay + ?Sized> ScoreDisplay for Rc<RefCell<T>> {
    fn set_score(&mut self, score: u32) {
        self.borrow_mut().set_score(score);
    }
}

impl<T: SessionSink + ?Sized> SessionSink for Rc<RefCell<T>> {
    fn set_final_score(&mut self, score: u32) {
        self.borrow_mut().set_final_score(score);
    }

    fn request_scene_transition(&mut self, target: Scene) {
        self.borrow_mut().request_scene_transition(target);
    }
}

/// Bundle of optional collaborators.
#[derive(Default)]
pub struct GameContext {
    layout: Option<Box<dyn BoardLayout>>,
    audio: Option<Box<dyn AudioCues>>,
    score: Option<Box<dyn ScoreDisplay>>,
    session: Option<Box<dyn SessionSink>>,
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("layout", &self.layout.is_some())
            .field("audio", &self.audio.is_some())
            .field("score", &self.score.is_some())
            .field("session", &self.session.is_some())
            .finish()
    }
}

impl GameContext {
    /// A context with nothing bound.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl BoardLayout + 'static) -> Self {
        self.layout = Some(Box::new(layout));
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioCues + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    #[must_use]
    pub fn with_score_display(mut self, score: impl ScoreDisplay + 'static) -> Self {
        self.score = Some(Box::new(score));
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: impl SessionSink + 'static) -> Self {
        self.session = Some(Box::new(session));
        self
    }

    // === Dispatch (no-op when unbound) ===

    pub(crate) fn configure_layout(&mut self, columns: u16, rows: u16) {
        if let Some(layout) = self.layout.as_mut() {
            layout.configure(columns, rows);
        }
    }

    pub(crate) fn refresh_layout(&mut self) {
        if let Some(layout) = self.layout.as_mut() {
            layout.refresh();
        }
    }

    pub(crate) fn cue(&mut self, cue: Cue) {
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        match cue {
            Cue::Flip => audio.play_flip(),
            Cue::Match => audio.play_match(),
            Cue::Mismatch => audio.play_mismatch(),
            Cue::GameOver => audio.play_game_over(),
        }
    }

    pub(crate) fn report_score(&mut self, score: u32) {
        if let Some(display) = self.score.as_mut() {
            display.set_score(score);
        }
    }

    pub(crate) fn hand_off(&mut self, final_score: u32) {
        if let Some(session) = self.session.as_mut() {
            session.set_final_score(final_score);
            session.request_scene_transition(Scene::GameOver);
        }
    }
}

/// Audio cue kinds, for dispatch and for recording in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Flip,
    Match,
    Mismatch,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Cues(Vec<Cue>);

    impl AudioCues for Cues {
        fn play_flip(&mut self) {
            self.0.push(Cue::Flip);
        }
        fn play_match(&mut self) {
            self.0.push(Cue::Match);
        }
        fn play_mismatch(&mut self) {
            self.0.push(Cue::Mismatch);
        }
        fn play_game_over(&mut self) {
            self.0.push(Cue::GameOver);
        }
    }

    #[test]
    fn test_unbound_context_is_noop() {
        let mut ctx = GameContext::new();
        ctx.configure_layout(2, 2);
        ctx.refresh_layout();
        ctx.cue(Cue::Match);
        ctx.report_score(10);
        ctx.hand_off(10);
    }

    #[test]
    fn test_shared_collaborator_receives_calls() {
        let cues = Rc::new(RefCell::new(Cues::default()));
        let mut ctx = GameContext::new().with_audio(Rc::clone(&cues));

        ctx.cue(Cue::Flip);
        ctx.cue(Cue::Mismatch);
        ctx.cue(Cue::GameOver);

        assert_eq!(cues.borrow().0, vec![Cue::Flip, Cue::Mismatch, Cue::GameOver]);
    }

    #[test]
    fn test_debug_shows_bindings() {
        let ctx = GameContext::new().with_audio(Cues::default());
        let dbg = format!("{:?}", ctx);
        assert!(dbg.contains("audio: true"));
        assert!(dbg.contains("session: false"));
    }
}
