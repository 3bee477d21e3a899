//! Hardware sampler implementations

#[cfg(target_os = "linux")]
pub mod sysfs;

pub mod simulated;

#[cfg(target_os = "linux")]
pub use sysfs::{SysfsGpio, DEFAULT_SYSFS_ROOT};

pub use simulated::SimulatedPins;

use pinlog_core::{Error, LineSet, Sampler};

/// Configure every line of `lines` as an input, in declared order
pub fn configure_inputs<S>(sampler: &mut S, lines: &LineSet) -> Result<(), Error>
where
    S: Sampler + ?Sized,
{
    for line in lines.iter() {
        sampler
            .configure_input(line)
            .map_err(|source| Error::Configure { line, source })?;
    }
    Ok(())
}
