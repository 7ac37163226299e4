//! Errors that can stop a song from being played.

use std::fmt::Display;

/// Every way a `play` call can be rejected.
/// Validation errors are raised before any tone reaches the audio backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid note `{token}` (expected a letter A-G, an optional # or b and an octave, like C4 or Bb3)")]
    InvalidNote { token: String },

    #[error("Malformed song: found {tokens} tokens, but a song must be made of `NOTE DURATION` pairs (like `C4 0.5 D4 0.5`)")]
    MalformedSong { tokens: usize },

    #[error("Invalid duration `{duration}` for note `{note}` (expected a non-negative number of seconds)")]
    InvalidDuration { note: String, duration: String },

    #[error("Song is {length:.2}s long, which is over the {limit:.2}s limit")]
    SongTooLong { length: f64, limit: f64 },

    #[error("Audio backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl Error {
    pub fn backend(err: impl Display) -> Self {
        Self::BackendUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::Error;

    #[test]
    fn test_messages_name_the_offender() {
        let err = Error::InvalidNote {
            token: "H4".to_owned(),
        };
        assert!(err.to_string().contains("`H4`"));

        let err = Error::InvalidDuration {
            note: "C4".to_owned(),
            duration: "-1".to_owned(),
        };
        assert!(err.to_string().contains("`-1`"));
        assert!(err.to_string().contains("`C4`"));

        let err = Error::MalformedSong { tokens: 3 };
        assert!(err.to_string().contains("NOTE DURATION"));
    }
}
