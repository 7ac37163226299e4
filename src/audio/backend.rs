//! Real-time tone output.
//!
//! [`ToneBackend`] is the scheduling primitive songs are played against: it has a clock and accepts tones
//! that start at a given time on that clock.
//! [`CpalBackend`] implements it on top of a cpal output stream.
//! One backend is shared by the whole process, see [`shared`] and [`shutdown`].

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam::channel::{bounded, Sender};
use log::{debug, error, info};
use parking_lot::Mutex;

use super::{devices, sequence::Timeline};
use crate::{config::Config, error::Error};

static SHARED: Mutex<Option<Arc<CpalBackend>>> = parking_lot::const_mutex(None);

/// A tone at an absolute time on a backend's clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    /// Hz
    pub frequency: f64,
    /// Seconds on the backend clock
    pub start: f64,
    /// Seconds
    pub duration: f64,
    pub amplitude: f32,
}

pub trait ToneBackend {
    /// The current time of the backend clock in seconds.
    fn now(&self) -> f64;

    /// Hands tones over to the backend.
    /// Returns right away, the tones play when their start time comes.
    fn issue(&self, tones: Vec<ScheduledTone>);
}

/// Plays tones on an audio output device.
/// The cpal stream lives on its own thread until the backend is closed.
pub struct CpalBackend {
    timeline: Arc<Mutex<Timeline>>,
    device_name: String,
    sample_rate: u32,
    shutdown: Sender<()>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

struct Opened {
    timeline: Arc<Mutex<Timeline>>,
    device_name: String,
    sample_rate: u32,
}

impl CpalBackend {
    pub fn open(config: &Config) -> Result<Self, Error> {
        let (ready_tx, ready_rx) = bounded(1);
        let (shutdown, shutdown_rx) = bounded::<()>(1);
        let config = config.clone();

        let thread = thread::Builder::new()
            .name("song-tones::audio".to_owned())
            .spawn(move || {
                let stream = match build_stream(&config) {
                    Ok((stream, opened)) => {
                        let _ = ready_tx.send(Ok(opened));
                        stream
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                // Blocks until a shutdown is requested or the backend is dropped
                let _ = shutdown_rx.recv();
                drop(stream);
                debug!("Audio stream closed");
            })
            .map_err(Error::backend)?;

        let opened = ready_rx
            .recv()
            .map_err(|_| Error::backend("audio thread exited during startup"))??;

        info!(
            "Output hooked into `{}` ({}Hz)",
            opened.device_name, opened.sample_rate
        );

        Ok(Self {
            timeline: opened.timeline,
            device_name: opened.device_name,
            sample_rate: opened.sample_rate,
            shutdown,
            thread: Mutex::new(Some(thread)),
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// True when no tones are waiting or playing.
    pub fn is_idle(&self) -> bool {
        self.timeline.lock().is_idle()
    }

    /// Stops the output stream.
    /// Tones that have not finished yet are cut off.
    pub fn close(&self) {
        let Some(thread) = self.thread.lock().take() else {
            return;
        };

        let _ = self.shutdown.send(());
        if thread.join().is_err() {
            error!("Audio thread panicked");
        }
    }
}

impl ToneBackend for CpalBackend {
    fn now(&self) -> f64 {
        self.timeline.lock().now()
    }

    fn issue(&self, tones: Vec<ScheduledTone>) {
        let mut timeline = self.timeline.lock();
        for tone in &tones {
            timeline.push(tone);
        }
    }
}

impl Drop for CpalBackend {
    fn drop(&mut self) {
        self.close();
    }
}

fn build_stream(config: &Config) -> Result<(cpal::Stream, Opened), Error> {
    let host = cpal::default_host();
    let device = devices::output_device(&host, &config.output_device)?;
    let supported_config = device.default_output_config().map_err(Error::backend)?;
    let device_name = device.name().map_err(Error::backend)?;

    let sample_rate = supported_config.sample_rate().0;
    let channels = supported_config.channels() as usize;
    let gain = config.output_gain;
    let timeline = Arc::new(Mutex::new(Timeline::new(sample_rate, config.fade)));

    let stream = {
        let timeline = timeline.clone();
        device
            .build_output_stream(
                &supported_config.into(),
                move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                    timeline.lock().render(data, channels);
                    for sample in data.iter_mut() {
                        *sample = (*sample * gain).clamp(-1.0, 1.0);
                    }
                },
                move |err| error!("Stream error: {err}"),
                None,
            )
            .map_err(Error::backend)?
    };
    stream.play().map_err(Error::backend)?;

    Ok((
        stream,
        Opened {
            timeline,
            device_name,
            sample_rate,
        },
    ))
}

/// The process-wide backend.
/// Opened on first use with the given config, later calls get the same backend.
pub fn shared(config: &Config) -> Result<Arc<CpalBackend>, Error> {
    let mut shared = SHARED.lock();
    if let Some(backend) = shared.as_ref() {
        return Ok(backend.clone());
    }

    let backend = Arc::new(CpalBackend::open(config)?);
    *shared = Some(backend.clone());
    Ok(backend)
}

/// Closes the process-wide backend if it was ever opened.
pub fn shutdown() {
    let backend = SHARED.lock().take();
    if let Some(backend) = backend {
        backend.close();
    }
}
