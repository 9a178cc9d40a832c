//! Timing configuration for the panel driver.

/// Delays and polling parameters used by `Display`. `Config::default()` carries the values the
/// panel vendor's reference sequence uses; builder methods override individual settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) reset_pulse_ms: u32,
    pub(crate) busy_poll_ms: u32,
    pub(crate) busy_settle_ms: u32,
    pub(crate) busy_timeout_ms: Option<u32>,
    pub(crate) refresh_gap_ms: u32,
    pub(crate) sleep_settle_ms: u32,
    pub(crate) power_on_delay_ms: u32,
    pub(crate) row_yield_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reset_pulse_ms: 30,
            busy_poll_ms: 10,
            busy_settle_ms: 20,
            busy_timeout_ms: None,
            refresh_gap_ms: 50,
            sleep_settle_ms: 100,
            power_on_delay_ms: 100,
            row_yield_ms: 1,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend this `Config` to hold each level of the reset pulse train for `ms`.
    pub fn reset_pulse_ms(self, ms: u32) -> Self {
        Self {
            reset_pulse_ms: ms,
            ..self
        }
    }

    /// Extend this `Config` to sample the busy line every `ms` while it is asserted. With `0` the
    /// line is polled back to back, and each poll counts as 1 ms towards `busy_timeout_ms`.
    pub fn busy_poll_ms(self, ms: u32) -> Self {
        Self {
            busy_poll_ms: ms,
            ..self
        }
    }

    /// Extend this `Config` to wait `ms` after the busy line releases before continuing.
    pub fn busy_settle_ms(self, ms: u32) -> Self {
        Self {
            busy_settle_ms: ms,
            ..self
        }
    }

    /// Extend this `Config` to give up on a busy line that is still asserted after roughly `ms`
    /// of polling, returning `Error::BusyTimeout`. Without this the driver waits forever, which
    /// is what the controller protocol itself specifies.
    pub fn busy_timeout_ms(self, ms: u32) -> Self {
        Self {
            busy_timeout_ms: Some(ms),
            ..self
        }
    }

    /// Extend this `Config` to pause `ms` between power on and the refresh command.
    pub fn refresh_gap_ms(self, ms: u32) -> Self {
        Self {
            refresh_gap_ms: ms,
            ..self
        }
    }

    /// Extend this `Config` to wait `ms` after the deep sleep command.
    pub fn sleep_settle_ms(self, ms: u32) -> Self {
        Self {
            sleep_settle_ms: ms,
            ..self
        }
    }

    /// Extend this `Config` to wait `ms` between enabling panel power and the reset pulse. The
    /// panel needs at least 100 ms.
    pub fn power_on_delay_ms(self, ms: u32) -> Self {
        Self {
            power_on_delay_ms: ms,
            ..self
        }
    }

    /// Extend this `Config` to yield `ms` after every row written by `Display::clear`.
    pub fn row_yield_ms(self, ms: u32) -> Self {
        Self {
            row_yield_ms: ms,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::new();
        assert_eq!(c.reset_pulse_ms, 30);
        assert_eq!(c.busy_poll_ms, 10);
        assert_eq!(c.busy_settle_ms, 20);
        assert_eq!(c.busy_timeout_ms, None);
        assert_eq!(c.refresh_gap_ms, 50);
        assert_eq!(c.sleep_settle_ms, 100);
        assert_eq!(c.power_on_delay_ms, 100);
        assert_eq!(c.row_yield_ms, 1);
    }

    #[test]
    fn builder_overrides_only_named_field() {
        let c = Config::new().busy_poll_ms(5).busy_timeout_ms(4000);
        assert_eq!(c.busy_poll_ms, 5);
        assert_eq!(c.busy_timeout_ms, Some(4000));
        assert_eq!(c.busy_settle_ms, 20);
        assert_eq!(c.reset_pulse_ms, 30);
    }
}
