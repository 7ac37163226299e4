use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

pub fn parse_args() -> ArgMatches {
    command().get_matches()
}

fn command() -> Command {
    Command::new("song-tones")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plays songs written as `NOTE DURATION` pairs, like `C4 0.5 D4 0.5`.")
        .subcommand_required(true)
        .args([
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON config file"),
            Arg::new("output-device")
                .short('o')
                .long("output-device")
                .global(true)
                .help("Output device, picked by name similarity (`default` for the system default)"),
            Arg::new("output-gain")
                .short('g')
                .long("output-gain")
                .global(true)
                .value_parser(value_parser!(f32))
                .help("Gain applied to the output"),
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("One of off, error, warn, info, debug or trace"),
        ])
        .subcommands([
            Command::new("play")
                .alias("p")
                .about("Plays a song on the output device and waits for it to finish.")
                .args(song_args()),
            Command::new("schedule")
                .alias("s")
                .about("Prints the tones a song is made of without playing it.")
                .args(song_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the events as JSON"),
                ),
            Command::new("resolve")
                .alias("r")
                .about("Prints the frequency of notes.")
                .arg(Arg::new("note").required(true).num_args(1..)),
            Command::new("devices")
                .alias("d")
                .about("Lists the output devices."),
        ])
}

fn song_args() -> [Arg; 2] {
    [
        Arg::new("song")
            .num_args(0..)
            .allow_negative_numbers(true)
            .conflicts_with("file")
            .help("The song, quoted or as separate arguments"),
        Arg::new("file")
            .short('f')
            .long("file")
            .value_parser(value_parser!(PathBuf))
            .help("Read the song from a file"),
    ]
}

/// Gets the song text of a `play` or `schedule` command, from the file or the arguments.
pub fn song_text(args: &ArgMatches) -> Result<String> {
    if let Some(path) = args.get_one::<PathBuf>("file") {
        return fs::read_to_string(path)
            .with_context(|| format!("Error reading song `{}`", path.display()));
    }

    Ok(args
        .get_many::<String>("song")
        .map(|x| x.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default())
}
