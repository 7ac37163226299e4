//! Turns song text into tones on a [`ToneBackend`].
//!
//! A song is checked completely before anything is sent to the backend,
//! so a song with a mistake anywhere in it never makes a sound.

use crate::{
    audio::backend::{ScheduledTone, ToneBackend},
    coding::song::{self, SongEvent},
    config::Config,
    error::Error,
};

pub const DEFAULT_AMPLITUDE: f32 = 0.25;

pub struct Player {
    amplitude: f32,
    max_song_length: Option<f64>,
}

/// What a successful `play` handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    /// Backend time the song started at
    pub origin: f64,
    /// Number of tones issued, zero length notes are not issued
    pub tones: usize,
    /// Length of the song in seconds
    pub length: f64,
}

impl Player {
    pub fn new(amplitude: f32) -> Self {
        Self {
            amplitude,
            max_song_length: None,
        }
    }

    /// Reject songs longer than `limit` seconds.
    pub fn max_song_length(mut self, limit: Option<f64>) -> Self {
        self.max_song_length = limit;
        self
    }

    /// Parses and validates a song without playing it.
    pub fn schedule(&self, song: &str) -> Result<Vec<SongEvent>, Error> {
        let events = song::schedule(song)?;

        if let Some(limit) = self.max_song_length {
            let length = song::total_length(&events);
            if length > limit {
                return Err(Error::SongTooLong { length, limit });
            }
        }

        Ok(events)
    }

    /// Sends already validated events to the backend, starting now.
    pub fn realize(&self, events: &[SongEvent], backend: &dyn ToneBackend) -> Playback {
        let origin = backend.now();
        let tones = events
            .iter()
            .filter(|x| x.duration > 0.0)
            .map(|x| ScheduledTone {
                frequency: x.frequency,
                start: origin + x.start_offset,
                duration: x.duration,
                amplitude: self.amplitude,
            })
            .collect::<Vec<_>>();

        let playback = Playback {
            origin,
            tones: tones.len(),
            length: song::total_length(events),
        };
        backend.issue(tones);
        playback
    }

    pub fn play(&self, song: &str, backend: &dyn ToneBackend) -> Result<Playback, Error> {
        let events = self.schedule(song)?;
        Ok(self.realize(&events, backend))
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_AMPLITUDE)
    }
}

impl From<&Config> for Player {
    fn from(config: &Config) -> Self {
        Self::new(config.amplitude).max_song_length(config.max_song_length)
    }
}
