//! The main API to the panel driver: power and reset sequencing, controller configuration,
//! image streaming and refresh.
//!
//! A typical session is `power_on` (or `init` on boards with the panel always powered), one or
//! more images streamed with `compose` or `begin_frame`, and `sleep` or `power_off` at the end.

pub mod frame;

use log::{debug, info, trace, warn};

use crate::color::Color;
use crate::command::consts::*;
use crate::command::{Command, INIT_SEQUENCE};
use crate::compositor::{HalfRow, Panel, RowSource};
use crate::config::Config;
use crate::error::Error;
use crate::interface::{ChipSelect, DisplayInterface};
use crate::splash::BootSplash;

pub use self::frame::Frame;

/// Where the driver is in the panel lifecycle. Informational only; operations do not check it.
///
/// When an operation fails the state stays at the step that failed, e.g. `Refreshing` after a
/// busy timeout, until the next operation sets it. A frame abandoned by an error is the exception:
/// dropping it releases the chip select and returns the state to `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Resetting,
    Configuring,
    Ready,
    Streaming,
    Refreshing,
    Sleeping,
    PoweredOff,
}

/// A driver for the dual-controller panel.
pub struct Display<DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    config: Config,
    state: State,
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Construct a driver talking through `iface`. Nothing is sent until the first operation.
    pub fn new(iface: DI, config: Config) -> Self {
        Display {
            iface,
            config,
            state: State::Uninitialized,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }

    /// Pulse the shared reset line: high, low, high, low, high, holding each level for the
    /// configured pulse time.
    pub fn reset(&mut self) -> Result<(), Error<DI::Error>> {
        self.state = State::Resetting;
        debug!("reset");
        for &level in [true, false, true, false, true].iter() {
            self.iface.set_reset(level)?;
            self.iface.delay_ms(self.config.reset_pulse_ms);
        }
        Ok(())
    }

    /// Reset both controllers and load the panel configuration.
    pub fn init(&mut self) -> Result<(), Error<DI::Error>> {
        info!("init");
        self.reset()?;
        self.state = State::Configuring;
        for &(cmd, chips) in INIT_SEQUENCE.iter() {
            cmd.send(&mut self.iface, chips)?;
        }
        self.state = State::Ready;
        Ok(())
    }

    /// Fill the whole panel with `color` and show it.
    pub fn clear(&mut self, color: Color) -> Result<(), Error<DI::Error>> {
        info!("clear to {:?}", color);
        let row = HalfRow::new(color);
        for panel in Panel::ALL.iter().cloned() {
            let yield_ms = self.config.row_yield_ms;
            let mut frame = self.begin_frame(panel)?;
            for _ in 0..HEIGHT {
                frame.write_line(row.as_bytes())?;
                frame.delay_ms(yield_ms);
            }
            frame.end()?;
        }
        self.refresh()
    }

    /// Start streaming an image to one half. Both chip selects are released first, then only
    /// `panel` is selected and the data start command sent. Rows written to the returned `Frame`
    /// go straight to that controller.
    pub fn begin_frame(&mut self, panel: Panel) -> Result<Frame<'_, DI>, Error<DI::Error>> {
        debug!("begin frame on {:?}", panel);
        self.iface.select(ChipSelect::Neither)?;
        self.iface.select(panel.into())?;
        Command::DataStart.write(&mut self.iface)?;
        self.state = State::Streaming;
        Ok(Frame::new(self, panel))
    }

    /// Stream a whole image from `source`, all of the Master half then all of the Slave half, and
    /// show it. Only one half-row is held in memory.
    pub fn compose<S>(&mut self, source: &S) -> Result<(), Error<DI::Error>>
    where
        S: RowSource + ?Sized,
    {
        let mut row = HalfRow::default();
        for panel in Panel::ALL.iter().cloned() {
            info!("streaming {:?} half", panel);
            let mut frame = self.begin_frame(panel)?;
            for y in 0..HEIGHT as u16 {
                source.fill_row(panel, y, &mut row);
                frame.write_line(row.as_bytes())?;
                if y % 100 == 0 {
                    debug!("{:?} row {}/{}", panel, y, HEIGHT);
                }
            }
            frame.end()?;
        }
        self.refresh()
    }

    /// Configure the panel and show the boot splash with the two status lines in bands 1 and 2.
    pub fn show_boot_splash(
        &mut self,
        status_line1: &str,
        status_line2: &str,
    ) -> Result<(), Error<DI::Error>> {
        info!("boot splash");
        self.init()?;
        self.compose(&BootSplash::new(status_line1, status_line2))
    }

    /// Drive the image in controller RAM onto the panel: power on, refresh, power off. Blocks
    /// while the controllers are busy.
    pub fn refresh(&mut self) -> Result<(), Error<DI::Error>> {
        self.state = State::Refreshing;
        info!("PON");
        Command::PowerOn.send(&mut self.iface, ChipSelect::Both)?;
        self.wait_ready()?;
        self.iface.delay_ms(self.config.refresh_gap_ms);

        info!("DRF");
        Command::DisplayRefresh.send(&mut self.iface, ChipSelect::Both)?;
        self.wait_ready()?;

        info!("POF");
        Command::PowerOff.send(&mut self.iface, ChipSelect::Both)?;
        self.state = State::Ready;
        Ok(())
    }

    /// Put both controllers into deep sleep. Only `init` (which resets) wakes them.
    pub fn sleep(&mut self) -> Result<(), Error<DI::Error>> {
        info!("deep sleep");
        Command::DeepSleep.send(&mut self.iface, ChipSelect::Both)?;
        self.iface.delay_ms(self.config.sleep_settle_ms);
        self.state = State::Sleeping;
        Ok(())
    }

    /// Enable the panel supply and configure the controllers.
    pub fn power_on(&mut self) -> Result<(), Error<DI::Error>> {
        info!("power on");
        self.iface.set_power(true)?;
        self.iface.delay_ms(self.config.power_on_delay_ms);
        self.init()
    }

    /// Put the controllers to sleep and cut the panel supply.
    pub fn power_off(&mut self) -> Result<(), Error<DI::Error>> {
        self.sleep()?;
        info!("power off");
        self.iface.set_power(false)?;
        self.state = State::PoweredOff;
        Ok(())
    }

    /// Sample the busy line once. `WouldBlock` while either controller is still working.
    pub fn poll_ready(&mut self) -> nb::Result<(), DI::Error> {
        if self.iface.is_busy().map_err(nb::Error::Other)? {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Block until the busy line releases, then let the controllers settle. Without a configured
    /// timeout this waits indefinitely.
    fn wait_ready(&mut self) -> Result<(), Error<DI::Error>> {
        let mut waited: u32 = 0;
        loop {
            match self.poll_ready() {
                Ok(()) => break,
                Err(nb::Error::Other(e)) => return Err(Error::Interface(e)),
                Err(nb::Error::WouldBlock) => {
                    if let Some(limit) = self.config.busy_timeout_ms {
                        if waited >= limit {
                            warn!("busy line still asserted after {} ms", waited);
                            return Err(Error::BusyTimeout);
                        }
                    }
                    trace!("busy, {} ms", waited);
                    self.iface.delay_ms(self.config.busy_poll_ms);
                    // A zero poll interval still has to make progress towards the timeout.
                    waited = waited.saturating_add(self.config.busy_poll_ms.max(1));
                }
            }
        }
        debug!("busy released after {} ms", waited);
        self.iface.delay_ms(self.config.busy_settle_ms);
        Ok(())
    }
}
