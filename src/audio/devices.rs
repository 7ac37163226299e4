//! Output device lookup.

use cpal::{
    traits::{DeviceTrait, HostTrait},
    Device, Host,
};

use crate::{error::Error, misc::Similarity};

/// Picks the output device to play on.
/// `default` (any case) uses the host's default device, anything else picks the device whose name is
/// the most similar to the given name (dice coefficient).
pub fn output_device(host: &Host, wanted: &str) -> Result<Device, Error> {
    let wanted = wanted.to_lowercase();
    if wanted == "default" {
        return host
            .default_output_device()
            .ok_or_else(|| Error::backend("no default output device"));
    }

    host.output_devices()
        .map_err(Error::backend)?
        .filter_map(|x| Some((x.name().ok()?.to_lowercase().similarity(&wanted), x)))
        .reduce(|a, b| if a.0 >= b.0 { a } else { b })
        .map(|x| x.1)
        .ok_or_else(|| Error::backend(format!("no output device matching `{wanted}`")))
}

/// Names of all the output devices on the default host.
/// The default device is flagged with `true`.
pub fn list_output_devices() -> Result<Vec<(String, bool)>, Error> {
    let host = cpal::default_host();
    let default = host.default_output_device().and_then(|x| x.name().ok());

    Ok(host
        .output_devices()
        .map_err(Error::backend)?
        .filter_map(|x| x.name().ok())
        .map(|name| {
            let is_default = default.as_ref() == Some(&name);
            (name, is_default)
        })
        .collect())
}
