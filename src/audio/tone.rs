use std::f64::consts::TAU;

/// A plain sine wave.
#[derive(Clone, Copy, Debug)]
pub struct Tone {
    i: usize,
    tone: f64,
    sample_rate: f64,
    duration: Option<usize>,
}

/// A sine wave with a fixed length, a fixed amplitude and short linear fades at both ends.
/// The fades keep the start and end of each note from clicking.
#[derive(Clone, Copy, Debug)]
pub struct SmoothTone {
    inner: Tone,
    amplitude: f32,
    duration: usize,
    fade: usize,
}

impl Tone {
    pub fn new(tone: f64, sample_rate: u32) -> Self {
        Self {
            i: 0,
            sample_rate: sample_rate as f64,
            tone,
            duration: None,
        }
    }

    /// Limits the tone to `duration` samples.
    pub fn duration(mut self, duration: usize) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        match self.duration {
            Some(i) if self.i >= i => return None,
            _ => {}
        }

        // Keep the phase in [0, 1) so long tones don't lose precision
        let phase = (self.i as f64 * self.tone / self.sample_rate).fract();
        self.i += 1;
        Some((phase * TAU).sin() as f32)
    }
}

impl SmoothTone {
    pub fn new(tone: f64, sample_rate: u32, duration: usize) -> Self {
        Self {
            inner: Tone::new(tone, sample_rate).duration(duration),
            amplitude: 1.0,
            duration,
            fade: 0,
        }
    }

    pub fn amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Sets the fade in and fade out length in samples.
    /// Capped at half the tone so the two never overlap.
    pub fn fade(mut self, fade: usize) -> Self {
        self.fade = fade.min(self.duration / 2);
        self
    }

    pub fn finished(&self) -> bool {
        self.inner.i >= self.duration
    }
}

impl Iterator for SmoothTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.inner.next()?;
        let played = self.inner.i;
        let remaining = self.duration - played;

        let mut gain = self.amplitude;
        if played < self.fade {
            gain *= played as f32 / self.fade as f32;
        }

        if remaining < self.fade {
            gain *= remaining as f32 / self.fade as f32;
        }

        Some(raw * gain)
    }
}

#[cfg(test)]
mod test {
    use super::{SmoothTone, Tone};

    #[test]
    fn test_tone_length() {
        assert_eq!(Tone::new(440.0, 44100).duration(100).count(), 100);
        assert_eq!(SmoothTone::new(440.0, 44100, 250).count(), 250);
        assert_eq!(SmoothTone::new(440.0, 44100, 0).count(), 0);
    }

    #[test]
    fn test_tone_shape() {
        // A quarter of the sample rate gives 0, 1, 0, -1
        let samples = Tone::new(11025.0, 44100).duration(4).collect::<Vec<_>>();
        let expected = [0.0, 1.0, 0.0, -1.0];
        for (sample, expected) in samples.iter().zip(expected) {
            assert!((sample - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_smooth_tone_amplitude() {
        let samples = SmoothTone::new(440.0, 44100, 44100)
            .amplitude(0.25)
            .fade(441)
            .collect::<Vec<_>>();

        let peak = samples.iter().fold(0_f32, |a, b| a.max(b.abs()));
        assert!(peak <= 0.25 + 1e-6);
        assert!(peak > 0.24);

        // Faded at both ends
        assert_eq!(samples[0], 0.0);
        assert_eq!(*samples.last().unwrap(), 0.0);
    }

    #[test]
    fn test_smooth_tone_finishes() {
        let mut tone = SmoothTone::new(440.0, 44100, 3).fade(10);
        assert!(!tone.finished());
        tone.by_ref().for_each(drop);
        assert!(tone.finished());
        assert_eq!(tone.next(), None);
    }
}
