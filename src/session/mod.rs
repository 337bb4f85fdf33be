pub mod input;
pub mod tokenize;
pub mod typing;

pub use input::{WordOutcome, check_word};
pub use tokenize::{Span, fields, fields_by};
pub use typing::{SessionError, TypingSession};
