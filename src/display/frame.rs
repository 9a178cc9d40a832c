//! Streaming image rows to one half of the panel.

use log::warn;

use crate::compositor::Panel;
use crate::display::{Display, State};
use crate::error::Error;
use crate::interface::{ChipSelect, DisplayInterface};

/// A handle to one controller that has been sent the data start command. Rows written here go
/// to that controller, top to bottom, in the order they are written.
///
/// Frames mutably borrow the display, so nothing else can be sent until the frame is ended.
/// A frame dropped without `end`, for instance when a write fails part way, still releases the
/// chip select, but any error from that release is lost.
pub struct Frame<'d, DI>
where
    DI: DisplayInterface,
{
    display: &'d mut Display<DI>,
    panel: Panel,
    open: bool,
}

impl<'d, DI> Frame<'d, DI>
where
    DI: DisplayInterface,
{
    /// Only called by `Display::begin_frame`, after the half has been selected and sent the data
    /// start command.
    pub(super) fn new(display: &'d mut Display<DI>, panel: Panel) -> Self {
        Frame {
            display,
            panel,
            open: true,
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Send packed pixel bytes as they are. A row is normally `HALF_ROW_BYTES` long, but the
    /// length is not checked, and an empty slice sends nothing.
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), Error<DI::Error>> {
        self.display.iface.send_data(line)?;
        Ok(())
    }

    pub(super) fn delay_ms(&mut self, ms: u32) {
        self.display.iface.delay_ms(ms)
    }

    /// Release the controller. The image is not shown until `Display::refresh`.
    pub fn end(mut self) -> Result<(), Error<DI::Error>> {
        self.open = false;
        self.display.iface.select(ChipSelect::Neither)?;
        self.display.state = State::Ready;
        Ok(())
    }
}

impl<DI> Drop for Frame<'_, DI>
where
    DI: DisplayInterface,
{
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        warn!("frame on {:?} dropped without end", self.panel);
        if self.display.iface.select(ChipSelect::Neither).is_ok() {
            self.display.state = State::Ready;
        }
    }
}
