//! One-shot hardware initialization.
//!
//! Requests every output line from the GPIO character device, driven low,
//! and provides the modem power-key pulse.  Called once from `main()`
//! before any worker starts.

use std::thread;
use std::time::Duration;

use embedded_hal::digital::OutputPin;
use log::info;

use crate::error::Error;

/// Toggle the SIM800 power state: PWRKEY high for `hold`, then low.
pub fn pulse_power_key<P: OutputPin>(pin: &mut P, hold: Duration) -> Result<(), Error> {
    pin.set_high()
        .map_err(|e| Error::Gpio(format!("power key assert: {e:?}")))?;
    thread::sleep(hold);
    pin.set_low()
        .map_err(|e| Error::Gpio(format!("power key release: {e:?}")))?;
    info!("modem power key pulsed ({} ms)", hold.as_millis());
    Ok(())
}

#[cfg(feature = "rpi")]
pub use cdev::{Outputs, init_outputs};

#[cfg(feature = "rpi")]
mod cdev {
    use gpio_cdev::{Chip, LineRequestFlags};
    use linux_embedded_hal::CdevPin;
    use log::info;

    use crate::config::GatekeeperConfig;
    use crate::error::Error;

    const CONSUMER: &str = "gatekeeper";

    /// Every output line the daemon drives.
    pub struct Outputs {
        pub system_ok: CdevPin,
        pub modem_ok: CdevPin,
        pub opener: CdevPin,
        pub modem_power: CdevPin,
    }

    pub fn init_outputs(config: &GatekeeperConfig) -> Result<Outputs, Error> {
        let mut chip = Chip::new(&config.gpio_chip)
            .map_err(|e| Error::Gpio(format!("{}: {e}", config.gpio_chip)))?;
        let pins = config.pins;
        let outputs = Outputs {
            system_ok: request(&mut chip, pins.system_ok)?,
            modem_ok: request(&mut chip, pins.modem_ok)?,
            opener: request(&mut chip, pins.opener)?,
            modem_power: request(&mut chip, pins.modem_power)?,
        };
        info!(
            "hw_init: outputs on {} (system_ok={} modem_ok={} opener={} power={})",
            config.gpio_chip, pins.system_ok, pins.modem_ok, pins.opener, pins.modem_power
        );
        Ok(outputs)
    }

    fn request(chip: &mut Chip, offset: u32) -> Result<CdevPin, Error> {
        let line = chip
            .get_line(offset)
            .map_err(|e| Error::Gpio(format!("line {offset}: {e}")))?;
        let handle = line
            .request(LineRequestFlags::OUTPUT, 0, CONSUMER)
            .map_err(|e| Error::Gpio(format!("request line {offset}: {e}")))?;
        CdevPin::new(handle).map_err(|e| Error::Gpio(format!("line {offset}: {e}")))
    }
}
