//! Song text to timed events.
//!
//! The format is whitespace separated `NOTE DURATION` pairs, durations in seconds:
//! ```text
//! C4 0.5 D4 0.5 E4 1
//! ```

use serde::Serialize;

use super::note;
use crate::error::Error;

/// One tone of a song.
/// Times are in seconds, `start_offset` is relative to the start of playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SongEvent {
    pub frequency: f64,
    pub duration: f64,
    pub start_offset: f64,
}

impl SongEvent {
    pub fn end(&self) -> f64 {
        self.start_offset + self.duration
    }
}

/// Parses a whole song into its events.
/// Nothing is returned unless every pair in the song is valid.
pub fn schedule(song: &str) -> Result<Vec<SongEvent>, Error> {
    let tokens = song.split_whitespace().collect::<Vec<_>>();
    if tokens.len() % 2 != 0 {
        return Err(Error::MalformedSong {
            tokens: tokens.len(),
        });
    }

    let mut events = Vec::with_capacity(tokens.len() / 2);
    let mut cursor = 0.0;
    for pair in tokens.chunks_exact(2) {
        let frequency = note::resolve(pair[0])?;
        let duration = parse_duration(pair[0], pair[1])?;

        events.push(SongEvent {
            frequency,
            duration,
            start_offset: cursor,
        });
        cursor += duration;

        // Every duration is finite, but their sum can still overflow
        if !cursor.is_finite() {
            return Err(Error::InvalidDuration {
                note: pair[0].to_owned(),
                duration: pair[1].to_owned(),
            });
        }
    }

    Ok(events)
}

/// The time at which the last event of a song stops.
pub fn total_length(events: &[SongEvent]) -> f64 {
    events.last().map_or(0.0, SongEvent::end)
}

fn parse_duration(note: &str, duration: &str) -> Result<f64, Error> {
    let invalid = || Error::InvalidDuration {
        note: note.to_owned(),
        duration: duration.to_owned(),
    };

    let value = duration.parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }

    // Folds -0 into 0
    Ok(value + 0.0)
}

#[cfg(test)]
mod test {
    use super::{schedule, total_length, SongEvent};
    use crate::{coding::note::resolve, error::Error};

    #[test]
    fn test_two_notes() {
        let events = schedule("C4 0.5 D4 0.5").unwrap();

        assert_eq!(events.len(), 2);
        assert!((events[0].frequency - 261.6256).abs() < 1e-3);
        assert_eq!(events[0].duration, 0.5);
        assert_eq!(events[0].start_offset, 0.0);
        assert!((events[1].frequency - 293.6648).abs() < 1e-3);
        assert_eq!(events[1].duration, 0.5);
        assert_eq!(events[1].start_offset, 0.5);
    }

    #[test]
    fn test_offsets_accumulate() {
        let events = schedule("  A4 1\n B4 0.25\tC5 0 D5 2.5  ").unwrap();
        let offsets = events.iter().map(|x| x.start_offset).collect::<Vec<_>>();

        assert_eq!(offsets, [0.0, 1.0, 1.25, 1.25]);
        assert_eq!(total_length(&events), 3.75);
        for pair in events.windows(2) {
            assert_eq!(pair[1].start_offset, pair[0].end());
        }
    }

    #[test]
    fn test_empty_song() {
        assert_eq!(schedule(""), Ok(Vec::new()));
        assert_eq!(schedule(" \n\t "), Ok(Vec::new()));
        assert_eq!(total_length(&[]), 0.0);
    }

    #[test]
    fn test_zero_duration_is_silent_slot() {
        let events = schedule("E4 0 E4 -0").unwrap();
        assert_eq!(
            events[1],
            SongEvent {
                frequency: resolve("E4").unwrap(),
                duration: 0.0,
                start_offset: 0.0,
            }
        );
        assert!(events[1].duration.is_sign_positive());
    }

    #[test]
    fn test_odd_token_count() {
        assert_eq!(
            schedule("C4 0.5 D4"),
            Err(Error::MalformedSong { tokens: 3 })
        );
    }

    #[test]
    fn test_invalid_durations() {
        for duration in ["-1", "abc", "NaN", "inf", "-inf", "1e400", "0.5s"] {
            let song = format!("C4 1 D4 {duration}");
            assert_eq!(
                schedule(&song),
                Err(Error::InvalidDuration {
                    note: "D4".to_owned(),
                    duration: duration.to_owned(),
                }),
                "{duration:?} should be rejected"
            );
        }

        assert!(matches!(
            schedule("C4 -1 D4 0.5"),
            Err(Error::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_overflowing_song_length() {
        assert_eq!(
            schedule("C4 1e308 D4 1e308 E4 1"),
            Err(Error::InvalidDuration {
                note: "D4".to_owned(),
                duration: "1e308".to_owned(),
            })
        );

        let events = schedule("C4 1e308 D4 1e307").unwrap();
        assert!(total_length(&events).is_finite());
    }

    #[test]
    fn test_invalid_note_is_not_wrapped() {
        assert_eq!(
            schedule("C4 1 H2 1 D4 1"),
            Err(Error::InvalidNote {
                token: "H2".to_owned()
            })
        );
    }

    #[test]
    fn test_idempotent() {
        let song = "G3 0.3 A3 0.3 B3 0.6 C#4 1.2";
        assert_eq!(schedule(song).unwrap(), schedule(song).unwrap());
    }

    #[test]
    fn test_number_formats() {
        let events = schedule("C4 1e-1 C4 .5 C4 2. C4 +3").unwrap();
        let durations = events.iter().map(|x| x.duration).collect::<Vec<_>>();
        assert_eq!(durations, [0.1, 0.5, 2.0, 3.0]);
    }
}
