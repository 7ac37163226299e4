//! Tone timeline.
//! Holds every tone that has been issued and mixes the ones that are sounding into the output.

use super::{backend::ScheduledTone, tone::SmoothTone};

/// A sample clock and the tones scheduled against it.
/// Tones are queued with absolute start times and start on their own once the clock reaches them,
/// so a whole song can be handed over in one go.
pub struct Timeline {
    sample_rate: u32,
    fade: usize,
    clock: u64,
    voices: Vec<Voice>,
}

struct Voice {
    start: u64,
    tone: SmoothTone,
}

impl Timeline {
    /// Create a new empty timeline.
    /// `fade` is the fade in / out time of each tone in seconds.
    pub fn new(sample_rate: u32, fade: f64) -> Self {
        Self {
            sample_rate,
            fade: (fade * sample_rate as f64).round() as usize,
            clock: 0,
            voices: Vec::new(),
        }
    }

    /// Seconds since the timeline started.
    pub fn now(&self) -> f64 {
        self.clock as f64 / self.sample_rate as f64
    }

    pub fn is_idle(&self) -> bool {
        self.voices.is_empty()
    }

    /// Queue a tone.
    /// A tone whose start has already passed plays whatever is left of it right away.
    pub fn push(&mut self, tone: &ScheduledTone) {
        let sample_rate = self.sample_rate as f64;
        let mut start = (tone.start.max(0.0) * sample_rate).round() as u64;
        let mut length = (tone.duration * sample_rate).round() as u64;

        if start < self.clock {
            let late = self.clock - start;
            if late >= length {
                return;
            }

            start = self.clock;
            length -= late;
        }

        if length == 0 {
            return;
        }

        self.voices.push(Voice {
            start,
            tone: SmoothTone::new(tone.frequency, self.sample_rate, length as usize)
                .amplitude(tone.amplitude)
                .fade(self.fade),
        });
    }

    /// Fill an interleaved buffer, writing the same sample to every channel.
    pub fn render(&mut self, output: &mut [f32], channels: usize) {
        for frame in output.chunks_mut(channels.max(1)) {
            let clock = self.clock;
            let sample = self
                .voices
                .iter_mut()
                .filter(|x| x.start <= clock)
                .filter_map(|x| x.tone.next())
                .sum::<f32>();

            frame.fill(sample);
            self.clock += 1;
        }

        self.voices.retain(|x| !x.tone.finished());
    }
}
