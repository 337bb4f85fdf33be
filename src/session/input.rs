use crate::session::typing::{SessionError, TypingSession};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordOutcome {
    /// Word matched; the session moved on to the next word.
    Advanced,
    /// Last word matched; the session is finished and has been reset.
    Completed,
    /// Typed text is a correct prefix of the current word.
    Partial,
    Mistyped,
    /// Session is done or has no words.
    Inactive,
}

/// Check a typed attempt against the current word and update the session.
pub fn check_word(session: &mut TypingSession, typed: &str) -> WordOutcome {
    if session.is_done() {
        return WordOutcome::Inactive;
    }
    let Some(target) = session.current_word() else {
        return WordOutcome::Inactive;
    };

    let typed = typed.trim();
    if typed == target {
        session.set_mistyped(false);
        match session.advance() {
            Ok(()) => WordOutcome::Advanced,
            Err(SessionError::AtLastWord) => {
                session.reset();
                WordOutcome::Completed
            }
            Err(SessionError::NoWords) => WordOutcome::Inactive,
        }
    } else if target.starts_with(typed) {
        session.set_mistyped(false);
        WordOutcome::Partial
    } else {
        session.set_mistyped(true);
        WordOutcome::Mistyped
    }
}
