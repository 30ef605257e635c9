//! Bounded wait on the controller's BUSY line
//!
//! The controller holds BUSY while it processes power and refresh commands.
//! [`BusyGate`] polls it with a fixed budget so a disconnected or wedged panel
//! surfaces as [`Error::HardwareTimeout`] instead of hanging the caller.

use embedded_hal::delay::DelayNs;
use log::{trace, warn};

use crate::config::Config;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// Poll budget for the BUSY line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusyGate {
    max_polls: u32,
    poll_interval_ms: u32,
}

impl BusyGate {
    /// Create a gate that gives up after `max_polls` busy observations
    ///
    /// A budget of zero is raised to one poll.
    pub fn new(max_polls: u32, poll_interval_ms: u32) -> Self {
        Self {
            max_polls: max_polls.max(1),
            poll_interval_ms,
        }
    }

    /// Gate using the budget from a [`Config`]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.busy_max_polls, config.busy_poll_interval_ms)
    }

    /// Maximum number of polls that may observe BUSY
    pub fn max_polls(&self) -> u32 {
        self.max_polls
    }

    /// Block until the controller reports idle
    ///
    /// Returns how many polls observed BUSY before the line cleared.
    ///
    /// # Errors
    ///
    /// [`Error::HardwareTimeout`] once `max_polls` polls have all seen BUSY,
    /// [`Error::Interface`] if the line cannot be read.
    pub fn wait<I, D>(&self, interface: &mut I, delay: &mut D) -> Result<u32, Error<I>>
    where
        I: DisplayInterface,
        D: DelayNs,
    {
        let mut busy_polls = 0u32;
        loop {
            if !interface.is_busy().map_err(Error::Interface)? {
                trace!("busy cleared after {busy_polls} polls");
                return Ok(busy_polls);
            }
            busy_polls += 1;
            if busy_polls >= self.max_polls {
                warn!("busy still asserted after {busy_polls} polls");
                return Err(Error::HardwareTimeout { polls: busy_polls });
            }
            delay.delay_ms(self.poll_interval_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockInterface};

    #[test]
    fn test_idle_line_returns_immediately() {
        let mut iface = MockInterface::new();
        let gate = BusyGate::new(10, 1);
        assert_eq!(gate.wait(&mut iface, &mut MockDelay::default()).unwrap(), 0);
        assert_eq!(iface.busy_polls, 1);
    }

    #[test]
    fn test_waits_until_line_clears() {
        let mut iface = MockInterface::new();
        iface.busy_script.extend([true, true, true]);
        let mut delay = MockDelay::default();
        let gate = BusyGate::new(10, 2);

        assert_eq!(gate.wait(&mut iface, &mut delay).unwrap(), 3);
        assert_eq!(iface.busy_polls, 4);
        assert_eq!(delay.total_ns, 3 * 2_000_000);
    }

    #[test]
    fn test_times_out_after_exactly_max_polls() {
        let mut iface = MockInterface::new();
        iface.stuck_busy = true;
        let gate = BusyGate::new(25, 1);

        let result = gate.wait(&mut iface, &mut MockDelay::default());
        assert!(matches!(result, Err(Error::HardwareTimeout { polls: 25 })));
        assert_eq!(iface.busy_polls, 25);
    }

    #[test]
    fn test_zero_budget_still_polls_once() {
        let mut iface = MockInterface::new();
        iface.stuck_busy = true;
        let gate = BusyGate::new(0, 1);
        assert_eq!(gate.max_polls(), 1);

        let result = gate.wait(&mut iface, &mut MockDelay::default());
        assert!(matches!(result, Err(Error::HardwareTimeout { polls: 1 })));
        assert_eq!(iface.busy_polls, 1);
    }
}
