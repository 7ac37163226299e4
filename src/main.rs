use std::{path::PathBuf, process, thread, time::Duration};

use anyhow::Result;
use clap::ArgMatches;
use log::{debug, info};

mod args;
mod audio;
mod coding;
mod config;
mod error;
mod logger;
mod misc;
mod player;

use audio::backend;
use coding::{note::Note, song::SongEvent};
use config::Config;
use player::Player;

/// Extra time to let the last tone ring out before closing the stream.
const TAIL: Duration = Duration::from_millis(250);
const IDLE_POLL: Duration = Duration::from_millis(20);

fn main() {
    let args = args::parse_args();
    let Some((command, sub)) = args.subcommand() else {
        unreachable!("a subcommand is required");
    };

    let config = match load_config(sub) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", error_line(&err));
            process::exit(1);
        }
    };

    // The level was checked when the config was loaded
    if let Err(err) = logger::init(config.level().unwrap_or(log::LevelFilter::Info)) {
        eprintln!("{}", error_line(&err));
    }

    let result = match command {
        "play" => play(sub, &config),
        "schedule" => schedule(sub, &config),
        "resolve" => resolve(sub),
        "devices" => devices(),
        _ => unreachable!("unknown subcommand `{command}`"),
    };

    backend::shutdown();
    if let Err(err) = result {
        // Shown even when logging is off
        eprintln!("{}", error_line(&err));
        process::exit(1);
    }
}

fn error_line(err: &anyhow::Error) -> String {
    format!("[-] Error: {err:#}")
}

fn load_config(args: &ArgMatches) -> Result<Config> {
    let path = args.get_one::<PathBuf>("config");
    let mut config = Config::load(path.map(PathBuf::as_path))?;
    config.apply_args(args)?;
    Ok(config)
}

fn play(args: &ArgMatches, config: &Config) -> Result<()> {
    let song = args::song_text(args)?;
    let player = Player::from(config);

    // Validate before touching the audio device
    let events = player.schedule(&song)?;
    let backend = backend::shared(config)?;
    debug!(
        "Playing on `{}` at {}Hz",
        backend.device_name(),
        backend.sample_rate()
    );

    let playback = player.realize(&events, backend.as_ref());
    info!(
        "Scheduled {} tones ({:.2}s)",
        playback.tones, playback.length
    );
    debug!("Song starts at {:.3}s on the output clock", playback.origin);

    while !backend.is_idle() {
        thread::sleep(IDLE_POLL);
    }
    thread::sleep(TAIL);

    Ok(())
}

fn schedule(args: &ArgMatches, config: &Config) -> Result<()> {
    let song = args::song_text(args)?;
    let events = Player::from(config).schedule(&song)?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    print_events(&events);
    Ok(())
}

fn print_events(events: &[SongEvent]) {
    println!("{:>8} {:>12} {:>10}", "start", "frequency", "duration");
    for event in events {
        println!(
            "{:>7.3}s {:>9.3} Hz {:>9.3}s",
            event.start_offset, event.frequency, event.duration
        );
    }
}

fn resolve(args: &ArgMatches) -> Result<()> {
    for token in args.get_many::<String>("note").into_iter().flatten() {
        let note = token.parse::<Note>()?;
        println!("{note}\t{:.3} Hz\t(pitch {})", note.frequency(), note.pitch());
    }

    Ok(())
}

fn devices() -> Result<()> {
    for (name, default) in audio::devices::list_output_devices()? {
        let marker = if default { "*" } else { " " };
        println!("{marker} {name}");
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use anyhow::Context;

    use super::{error_line, Player};

    #[test]
    fn test_error_line_names_the_problem() {
        let err = Player::default()
            .schedule("C4 0.5 D4")
            .context("Error in song")
            .unwrap_err();
        let line = error_line(&err);

        assert!(line.starts_with("[-] Error: Error in song: Malformed song"));
        assert!(line.contains("NOTE DURATION"));
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_error_line_for_bad_note() {
        let err = anyhow::Error::from(Player::default().schedule("H4 1").unwrap_err());
        assert!(error_line(&err).contains("`H4`"));
    }
}
