//! Picks the device a capture is replayed against.

use crate::rpc::{CaptureRef, DeviceInfo, DeviceRef, Gapis};
use crate::utils::{Context, DeviceError};
use log::{debug, info};

/// Resolve a single replay device for `capture`.
///
/// With a hint, exactly one offered device must match it by serial, name,
/// or id. Without one, the service's most preferred device is used.
pub fn resolve_device<G: Gapis + ?Sized>(
    ctx: &Context,
    gapis: &G,
    capture: &CaptureRef,
    hint: Option<&str>,
) -> Result<DeviceRef, DeviceError> {
    let devices = gapis.devices_for_replay(ctx, capture)?;
    let device = select_device(&devices, hint)?;

    info!(
        "Replay device: {} ({})",
        display_name(device),
        device.id
    );
    Ok(device.id.clone())
}

/// Apply the selection policy to an already fetched device list
pub fn select_device<'a>(
    devices: &'a [DeviceInfo],
    hint: Option<&str>,
) -> Result<&'a DeviceInfo, DeviceError> {
    if devices.is_empty() {
        return Err(DeviceError::NoCompatibleDevice);
    }

    let Some(hint) = hint.filter(|h| !h.is_empty()) else {
        debug!("No device hint, using first of {} device(s)", devices.len());
        return Ok(&devices[0]);
    };

    let mut matches = devices.iter().filter(|d| d.matches(hint));
    match (matches.next(), matches.next()) {
        (Some(device), None) => Ok(device),
        (None, _) => Err(DeviceError::NoMatchingDevice {
            hint: hint.to_string(),
            available: devices
                .iter()
                .map(display_name)
                .collect::<Vec<_>>()
                .join(", "),
        }),
        (Some(_), Some(_)) => Err(DeviceError::AmbiguousDevice {
            hint: hint.to_string(),
            count: devices.iter().filter(|d| d.matches(hint)).count(),
        }),
    }
}

fn display_name(device: &DeviceInfo) -> &str {
    if !device.serial.is_empty() {
        &device.serial
    } else if !device.name.is_empty() {
        &device.name
    } else {
        &device.id.0
    }
}
