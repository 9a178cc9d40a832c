//! The command set of the panel controllers.
//!
//! Every command is one command byte followed by a fixed payload. The payloads are the factory
//! register values for this panel and never change at runtime; a different controller revision
//! gets new named commands rather than edited tables.

use log::debug;

use crate::interface::{ChipSelect, DisplayInterface};

pub mod consts {
    //! Panel geometry.

    /// Logical width of the whole panel in pixels.
    pub const WIDTH: usize = 1200;
    /// Height of the panel in pixels, shared by both halves.
    pub const HEIGHT: usize = 1600;
    /// Width in pixels of the region driven by one controller.
    pub const HALF_WIDTH: usize = WIDTH / 2;
    /// Bytes in one packed half-row, at two pixels per byte.
    pub const HALF_ROW_BYTES: usize = HALF_WIDTH / 2;
    /// Bytes in one packed logical row spanning both halves.
    pub const ROW_BYTES: usize = WIDTH / 2;
    /// Bytes in one controller's full frame.
    pub const HALF_FRAME_BYTES: usize = HALF_ROW_BYTES * HEIGHT;
}

const PSR_DATA: [u8; 2] = [0xDF, 0x69];
const PWR_DATA: [u8; 6] = [0x0F, 0x00, 0x28, 0x2C, 0x28, 0x38];
const POF_DATA: [u8; 1] = [0x00];
const DRF_DATA: [u8; 1] = [0x00];
const CDI_DATA: [u8; 1] = [0xF7];
const TCON_DATA: [u8; 2] = [0x03, 0x03];
const TRES_DATA: [u8; 4] = [0x04, 0xB0, 0x03, 0x20];
const CMD66_DATA: [u8; 6] = [0x49, 0x55, 0x13, 0x5D, 0x05, 0x10];
const EN_BUF_DATA: [u8; 1] = [0x07];
const CCSET_DATA: [u8; 1] = [0x01];
const PWS_DATA: [u8; 1] = [0x22];
const AN_TM_DATA: [u8; 9] = [0xC0, 0x1C, 0x1C, 0xCC, 0xCC, 0xCC, 0x15, 0x15, 0x55];
const AGID_DATA: [u8; 1] = [0x10];
const BTST_P_DATA: [u8; 2] = [0xE8, 0x28];
const BOOST_VDDP_EN_DATA: [u8; 1] = [0x01];
const BTST_N_DATA: [u8; 2] = [0xE8, 0x28];
const BUCK_BOOST_VDDN_DATA: [u8; 1] = [0x01];
const TFT_VCOM_POWER_DATA: [u8; 1] = [0x02];
const DEEP_SLEEP_DATA: [u8; 1] = [0xA5];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// PSR: panel setting.
    PanelSetting,
    /// PWR: power setting. Master only.
    PowerSetting,
    /// POF: turn the drive voltages off.
    PowerOff,
    /// PON: turn the drive voltages on. Sets busy until the supplies are up.
    PowerOn,
    /// BTST_N: negative booster soft start. Master only.
    BoosterSoftStartN,
    /// BTST_P: positive booster soft start. Master only.
    BoosterSoftStartP,
    /// DSLP: deep sleep. The payload is a check code; only a reset wakes the controller.
    DeepSleep,
    /// DTM: start of image data. Everything after it until deselect is packed pixels.
    DataStart,
    /// DRF: drive the image in RAM onto the panel. Sets busy for the whole refresh.
    DisplayRefresh,
    /// CDI: VCOM and data interval.
    VcomDataInterval,
    /// TCON: gate/source non-overlap timing.
    Tcon,
    /// TRES: resolution.
    Resolution,
    /// AN_TM: analog timing. Master only.
    AnalogTiming,
    /// AGID.
    Agid,
    /// Buck-boost VDDN enable. Master only.
    BuckBoostVddn,
    /// TFT VCOM power. Master only.
    TftVcomPower,
    /// EN_BUF: enable buffers. Master only.
    EnableBuffer,
    /// Booster VDDP enable. Master only.
    BoostVddpEnable,
    /// CCSET: color count (six-color mode).
    ColorSet,
    /// PWS: power saving.
    PowerSaving,
    /// Undocumented register 0xF0, required before panel setting.
    Cmd66,
}

/// The configuration issued by `Display::init`, in order, with the controllers each command is
/// addressed to. Later entries depend on registers set by earlier ones.
pub const INIT_SEQUENCE: [(Command, ChipSelect); 16] = [
    (Command::AnalogTiming, ChipSelect::Master),
    (Command::Cmd66, ChipSelect::Both),
    (Command::PanelSetting, ChipSelect::Both),
    (Command::VcomDataInterval, ChipSelect::Both),
    (Command::Tcon, ChipSelect::Both),
    (Command::Agid, ChipSelect::Both),
    (Command::PowerSaving, ChipSelect::Both),
    (Command::ColorSet, ChipSelect::Both),
    (Command::Resolution, ChipSelect::Both),
    (Command::PowerSetting, ChipSelect::Master),
    (Command::EnableBuffer, ChipSelect::Master),
    (Command::BoosterSoftStartP, ChipSelect::Master),
    (Command::BoostVddpEnable, ChipSelect::Master),
    (Command::BoosterSoftStartN, ChipSelect::Master),
    (Command::BuckBoostVddn, ChipSelect::Master),
    (Command::TftVcomPower, ChipSelect::Master),
];

impl Command {
    pub fn code(self) -> u8 {
        match self {
            Command::PanelSetting => 0x00,
            Command::PowerSetting => 0x01,
            Command::PowerOff => 0x02,
            Command::PowerOn => 0x04,
            Command::BoosterSoftStartN => 0x05,
            Command::BoosterSoftStartP => 0x06,
            Command::DeepSleep => 0x07,
            Command::DataStart => 0x10,
            Command::DisplayRefresh => 0x12,
            Command::VcomDataInterval => 0x50,
            Command::Tcon => 0x60,
            Command::Resolution => 0x61,
            Command::AnalogTiming => 0x74,
            Command::Agid => 0x86,
            Command::BuckBoostVddn => 0xB0,
            Command::TftVcomPower => 0xB1,
            Command::EnableBuffer => 0xB6,
            Command::BoostVddpEnable => 0xB7,
            Command::ColorSet => 0xE0,
            Command::PowerSaving => 0xE3,
            Command::Cmd66 => 0xF0,
        }
    }

    /// The fixed payload following the command byte. `DataStart` has none of its own; the image
    /// bytes are streamed after it.
    pub fn payload(self) -> &'static [u8] {
        match self {
            Command::PanelSetting => &PSR_DATA,
            Command::PowerSetting => &PWR_DATA,
            Command::PowerOff => &POF_DATA,
            Command::PowerOn => &[],
            Command::BoosterSoftStartN => &BTST_N_DATA,
            Command::BoosterSoftStartP => &BTST_P_DATA,
            Command::DeepSleep => &DEEP_SLEEP_DATA,
            Command::DataStart => &[],
            Command::DisplayRefresh => &DRF_DATA,
            Command::VcomDataInterval => &CDI_DATA,
            Command::Tcon => &TCON_DATA,
            Command::Resolution => &TRES_DATA,
            Command::AnalogTiming => &AN_TM_DATA,
            Command::Agid => &AGID_DATA,
            Command::BuckBoostVddn => &BUCK_BOOST_VDDN_DATA,
            Command::TftVcomPower => &TFT_VCOM_POWER_DATA,
            Command::EnableBuffer => &EN_BUF_DATA,
            Command::BoostVddpEnable => &BOOST_VDDP_EN_DATA,
            Command::ColorSet => &CCSET_DATA,
            Command::PowerSaving => &PWS_DATA,
            Command::Cmd66 => &CMD66_DATA,
        }
    }

    /// Clock out the command byte and its payload to whatever is currently selected.
    pub fn write<DI>(self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        iface.send_command(self.code())?;
        iface.send_data(self.payload())
    }

    /// Send the command as one complete transfer: select `chips`, write, deselect.
    pub fn send<DI>(self, iface: &mut DI, chips: ChipSelect) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        debug!("cmd {:#04x} {:?} -> {:?}", self.code(), self, chips);
        iface.select(chips)?;
        self.write(iface)?;
        iface.select(ChipSelect::Neither)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    #[test]
    fn send_frames_with_selection() {
        let mut di = TestSpyInterface::new();
        Command::PanelSetting
            .send(&mut di, ChipSelect::Both)
            .unwrap();
        assert_eq!(
            di.events(),
            vec![
                Sent::Select(ChipSelect::Both),
                Sent::Cmd(0x00),
                Sent::Data(vec![0xDF, 0x69]),
                Sent::Select(ChipSelect::Neither),
            ]
        );
    }

    #[test]
    fn power_on_has_no_payload() {
        let mut di = TestSpyInterface::new();
        Command::PowerOn.send(&mut di, ChipSelect::Both).unwrap();
        di.check_multi(sends!(0x04));
    }

    #[test]
    fn deep_sleep_check_code() {
        let mut di = TestSpyInterface::new();
        Command::DeepSleep.send(&mut di, ChipSelect::Both).unwrap();
        di.check_multi(sends!(0x07, [0xA5]));
    }

    #[test]
    fn write_leaves_selection_alone() {
        let mut di = TestSpyInterface::new();
        Command::DataStart.write(&mut di).unwrap();
        assert_eq!(di.events(), vec![Sent::Cmd(0x10)]);
    }

    #[test]
    fn refresh_and_power_off_payloads() {
        let mut di = TestSpyInterface::new();
        Command::DisplayRefresh
            .send(&mut di, ChipSelect::Both)
            .unwrap();
        Command::PowerOff.send(&mut di, ChipSelect::Both).unwrap();
        di.check_multi(sends!(0x12, [0x00], 0x02, [0x00]));
    }

    #[test]
    fn resolution_payload() {
        let mut di = TestSpyInterface::new();
        Command::Resolution.send(&mut di, ChipSelect::Both).unwrap();
        di.check_multi(sends!(0x61, [0x04, 0xB0, 0x03, 0x20]));
    }

    #[test]
    fn init_sequence_payload_lengths() {
        let lens: Vec<usize> = INIT_SEQUENCE
            .iter()
            .map(|(c, _)| c.payload().len())
            .collect();
        assert_eq!(lens, vec![9, 6, 2, 1, 2, 1, 1, 1, 4, 6, 1, 2, 1, 2, 1, 1]);
    }

    #[test]
    fn init_sequence_never_addresses_slave_alone() {
        assert!(INIT_SEQUENCE
            .iter()
            .all(|(_, chips)| *chips == ChipSelect::Master || *chips == ChipSelect::Both));
    }
}
