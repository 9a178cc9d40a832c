//! The bus and pin contract the driver talks through, plus the SPI implementation of it.
//!
//! The two controllers share one SPI bus (clock and data lines), one reset line and one busy
//! line. Each controller has its own chip select, and a controller only listens while its chip
//! select is asserted. The first byte clocked after selection is the command byte, every byte
//! after it is payload, so there is no D/C line.

/// One physical half-controller of the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    /// Left half, logical columns 0 to 599.
    Master,
    /// Right half, logical columns 600 to 1199.
    Slave,
}

impl Panel {
    /// Both halves, in the order frames are streamed to them.
    pub const ALL: [Panel; 2] = [Panel::Master, Panel::Slave];

    /// The logical column of this half's first pixel.
    pub fn origin(self) -> u16 {
        match self {
            Panel::Master => 0,
            Panel::Slave => crate::consts::HALF_WIDTH as u16,
        }
    }

    /// Convert logical column `x` to a column of this half, if this half owns it.
    pub fn local_column(self, x: u16) -> Option<u16> {
        let local = x.checked_sub(self.origin())?;
        if (local as usize) < crate::consts::HALF_WIDTH {
            Some(local)
        } else {
            None
        }
    }
}

/// The set of chip select lines asserted for a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipSelect {
    /// Both lines released; the state between transfers.
    Neither,
    Master,
    Slave,
    /// Broadcast to both controllers. Only used for command framing, never for image data.
    Both,
}

impl ChipSelect {
    /// Whether this selection asserts the chip select of `panel`.
    pub fn includes(self, panel: Panel) -> bool {
        match (self, panel) {
            (ChipSelect::Both, _) => true,
            (ChipSelect::Master, Panel::Master) => true,
            (ChipSelect::Slave, Panel::Slave) => true,
            _ => false,
        }
    }
}

impl From<Panel> for ChipSelect {
    fn from(panel: Panel) -> Self {
        match panel {
            Panel::Master => ChipSelect::Master,
            Panel::Slave => ChipSelect::Slave,
        }
    }
}

/// Primitive operations the panel driver is built on. Implementations are expected to be
/// synchronous: when a method returns, the bytes are on the wire and the pin is driven.
pub trait DisplayInterface {
    type Error;

    /// Drive the chip select lines to exactly `chips`. Lines that are being released must be
    /// released before any line is asserted.
    fn select(&mut self, chips: ChipSelect) -> Result<(), Self::Error>;
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;
    /// Send payload bytes. An empty buffer sends nothing.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error>;
    /// Switch the panel supply, if the board has a power enable line. Boards without one treat
    /// this as a no-op.
    fn set_power(&mut self, on: bool) -> Result<(), Self::Error>;
    /// Whether the controllers report that they are mid-operation.
    fn is_busy(&mut self) -> Result<bool, Self::Error>;
    fn delay_ms(&mut self, ms: u32);
}

pub mod spi {
    //! Four-wire SPI (clock, data, and the two chip selects) with GPIO reset, busy and optional
    //! power enable lines.

    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{InputPin, OutputPin};
    use embedded_hal::spi::SpiBus;

    use super::{ChipSelect, DisplayInterface, Panel};

    /// Failure reported by the SPI bus or one of the GPIO lines.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum InterfaceError<SpiE, PinE> {
        Spi(SpiE),
        Pin(PinE),
    }

    pub struct SpiInterface<SPI, CS, RST, BUSY, PWR, D> {
        /// The SPI bus shared by both controllers. Chip select is driven by this interface, so
        /// this must be the bare bus, not a device wrapper that manages CS itself.
        spi: SPI,
        /// Active-low chip select of the left controller.
        cs_master: CS,
        /// Active-low chip select of the right controller.
        cs_slave: CS,
        rst: RST,
        /// Reads low while the controllers are busy.
        busy: BUSY,
        power: Option<PWR>,
        delay: D,
    }

    impl<SPI, CS, RST, BUSY, PWR, D> SpiInterface<SPI, CS, RST, BUSY, PWR, D>
    where
        SPI: SpiBus<u8>,
        CS: OutputPin,
        RST: OutputPin<Error = CS::Error>,
        BUSY: InputPin<Error = CS::Error>,
        PWR: OutputPin<Error = CS::Error>,
        D: DelayNs,
    {
        /// Create a new interface. Boards without a power enable line pass `None` for `power`.
        pub fn new(
            spi: SPI,
            cs_master: CS,
            cs_slave: CS,
            rst: RST,
            busy: BUSY,
            power: Option<PWR>,
            delay: D,
        ) -> Self {
            Self {
                spi,
                cs_master,
                cs_slave,
                rst,
                busy,
                power,
                delay,
            }
        }

        /// Give back the bus, pins and delay.
        pub fn release(self) -> (SPI, CS, CS, RST, BUSY, Option<PWR>, D) {
            (
                self.spi,
                self.cs_master,
                self.cs_slave,
                self.rst,
                self.busy,
                self.power,
                self.delay,
            )
        }
    }

    impl<SPI, CS, RST, BUSY, PWR, D> DisplayInterface for SpiInterface<SPI, CS, RST, BUSY, PWR, D>
    where
        SPI: SpiBus<u8>,
        CS: OutputPin,
        RST: OutputPin<Error = CS::Error>,
        BUSY: InputPin<Error = CS::Error>,
        PWR: OutputPin<Error = CS::Error>,
        D: DelayNs,
    {
        type Error = InterfaceError<SPI::Error, CS::Error>;

        fn select(&mut self, chips: ChipSelect) -> Result<(), Self::Error> {
            // The last bytes must leave the shift register before any CS edge.
            self.spi.flush().map_err(InterfaceError::Spi)?;
            if !chips.includes(Panel::Master) {
                self.cs_master.set_high().map_err(InterfaceError::Pin)?;
            }
            if !chips.includes(Panel::Slave) {
                self.cs_slave.set_high().map_err(InterfaceError::Pin)?;
            }
            if chips.includes(Panel::Master) {
                self.cs_master.set_low().map_err(InterfaceError::Pin)?;
            }
            if chips.includes(Panel::Slave) {
                self.cs_slave.set_low().map_err(InterfaceError::Pin)?;
            }
            Ok(())
        }

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.spi.write(&[cmd]).map_err(InterfaceError::Spi)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            if buf.is_empty() {
                return Ok(());
            }
            self.spi.write(buf).map_err(InterfaceError::Spi)
        }

        fn set_reset(&mut self, high: bool) -> Result<(), Self::Error> {
            let res = if high {
                self.rst.set_high()
            } else {
                self.rst.set_low()
            };
            res.map_err(InterfaceError::Pin)
        }

        fn set_power(&mut self, on: bool) -> Result<(), Self::Error> {
            match self.power.as_mut() {
                Some(pin) if on => pin.set_high().map_err(InterfaceError::Pin),
                Some(pin) => pin.set_low().map_err(InterfaceError::Pin),
                None => Ok(()),
            }
        }

        fn is_busy(&mut self) -> Result<bool, Self::Error> {
            self.busy.is_low().map_err(InterfaceError::Pin)
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delay.delay_ms(ms)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use core::convert::Infallible;
        use std::cell::RefCell;
        use std::rc::Rc;
        use std::vec::Vec;

        #[derive(Clone, Debug, PartialEq)]
        enum Wire {
            Pin(&'static str, bool),
            Bytes(Vec<u8>),
            Flush,
            DelayNs(u32),
        }

        type Trace = Rc<RefCell<Vec<Wire>>>;

        struct FakeBus(Trace);
        struct FakePin(&'static str, Trace, bool);
        struct FakeDelay(Trace);

        impl embedded_hal::spi::ErrorType for FakeBus {
            type Error = Infallible;
        }
        impl SpiBus<u8> for FakeBus {
            fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
                Ok(())
            }
            fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
                self.0.borrow_mut().push(Wire::Bytes(words.to_vec()));
                Ok(())
            }
            fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Infallible> {
                Ok(())
            }
            fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
                Ok(())
            }
            fn flush(&mut self) -> Result<(), Infallible> {
                self.0.borrow_mut().push(Wire::Flush);
                Ok(())
            }
        }

        impl embedded_hal::digital::ErrorType for FakePin {
            type Error = Infallible;
        }
        impl OutputPin for FakePin {
            fn set_low(&mut self) -> Result<(), Infallible> {
                self.1.borrow_mut().push(Wire::Pin(self.0, false));
                Ok(())
            }
            fn set_high(&mut self) -> Result<(), Infallible> {
                self.1.borrow_mut().push(Wire::Pin(self.0, true));
                Ok(())
            }
        }
        impl InputPin for FakePin {
            fn is_high(&mut self) -> Result<bool, Infallible> {
                Ok(self.2)
            }
            fn is_low(&mut self) -> Result<bool, Infallible> {
                Ok(!self.2)
            }
        }

        impl DelayNs for FakeDelay {
            fn delay_ns(&mut self, ns: u32) {
                self.0.borrow_mut().push(Wire::DelayNs(ns));
            }
        }

        fn fixture(
            busy_level: bool,
            with_power: bool,
        ) -> (
            SpiInterface<FakeBus, FakePin, FakePin, FakePin, FakePin, FakeDelay>,
            Trace,
        ) {
            let t: Trace = Rc::new(RefCell::new(Vec::new()));
            let iface = SpiInterface::new(
                FakeBus(t.clone()),
                FakePin("csm", t.clone(), true),
                FakePin("css", t.clone(), true),
                FakePin("rst", t.clone(), true),
                FakePin("busy", t.clone(), busy_level),
                if with_power {
                    Some(FakePin("pwr", t.clone(), false))
                } else {
                    None
                },
                FakeDelay(t.clone()),
            );
            (iface, t)
        }

        #[test]
        fn switching_halves_releases_before_asserting() {
            let (mut iface, t) = fixture(true, false);
            iface.select(ChipSelect::Master).unwrap();
            t.borrow_mut().clear();
            iface.select(ChipSelect::Slave).unwrap();
            assert_eq!(
                *t.borrow(),
                vec![
                    Wire::Flush,
                    Wire::Pin("csm", true),
                    Wire::Pin("css", false),
                ]
            );
            t.borrow_mut().clear();
            iface.select(ChipSelect::Master).unwrap();
            assert_eq!(
                *t.borrow(),
                vec![
                    Wire::Flush,
                    Wire::Pin("css", true),
                    Wire::Pin("csm", false),
                ]
            );
        }

        #[test]
        fn select_both_and_neither() {
            let (mut iface, t) = fixture(true, false);
            iface.select(ChipSelect::Both).unwrap();
            iface.select(ChipSelect::Neither).unwrap();
            assert_eq!(
                *t.borrow(),
                vec![
                    Wire::Flush,
                    Wire::Pin("csm", false),
                    Wire::Pin("css", false),
                    Wire::Flush,
                    Wire::Pin("csm", true),
                    Wire::Pin("css", true),
                ]
            );
        }

        #[test]
        fn empty_data_is_not_sent() {
            let (mut iface, t) = fixture(true, false);
            iface.send_data(&[]).unwrap();
            assert!(t.borrow().is_empty());
            iface.send_command(0x10).unwrap();
            iface.send_data(&[0x11, 0x22]).unwrap();
            assert_eq!(
                *t.borrow(),
                vec![Wire::Bytes(vec![0x10]), Wire::Bytes(vec![0x11, 0x22])]
            );
        }

        #[test]
        fn busy_is_active_low() {
            let (mut iface, _) = fixture(false, false);
            assert_eq!(iface.is_busy(), Ok(true));
            let (mut iface, _) = fixture(true, false);
            assert_eq!(iface.is_busy(), Ok(false));
        }

        #[test]
        fn power_without_pin_is_noop() {
            let (mut iface, t) = fixture(true, false);
            iface.set_power(true).unwrap();
            assert!(t.borrow().is_empty());

            let (mut iface, t) = fixture(true, true);
            iface.set_power(true).unwrap();
            iface.set_power(false).unwrap();
            assert_eq!(
                *t.borrow(),
                vec![Wire::Pin("pwr", true), Wire::Pin("pwr", false)]
            );
        }

        #[test]
        fn delay_is_forwarded_in_milliseconds() {
            let (mut iface, t) = fixture(true, false);
            iface.delay_ms(30);
            let total: u64 = t
                .borrow()
                .iter()
                .map(|w| match w {
                    Wire::DelayNs(ns) => *ns as u64,
                    _ => 0,
                })
                .sum();
            assert_eq!(total, 30_000_000);
        }
    }
}
