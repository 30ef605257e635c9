//! Recording interface shared by the driver tests

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::config::{Builder, Config, Dimensions};
use crate::interface::DisplayInterface;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Reset,
    Command(u8),
    Data(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct MockInterface {
    pub events: Vec<Event>,
    /// Busy levels returned by successive polls; idle once exhausted
    pub busy_script: VecDeque<bool>,
    /// Report busy forever
    pub stuck_busy: bool,
    pub busy_polls: u32,
    /// Fail the next `send_data` call
    pub fail_data: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Command(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Data bytes sent after the `nth` occurrence of `command`, up to the next command
    pub fn data_after(&self, command: u8, nth: usize) -> Vec<u8> {
        let mut seen = 0;
        let mut collecting = false;
        let mut out = Vec::new();
        for event in &self.events {
            match event {
                Event::Command(_) if collecting => break,
                Event::Command(cmd) if *cmd == command => {
                    if seen == nth {
                        collecting = true;
                    }
                    seen += 1;
                }
                Event::Data(bytes) if collecting => out.extend_from_slice(bytes),
                _ => {}
            }
        }
        out
    }

    /// Flatten the event log into `(command, payload)` pairs
    pub fn script(&self) -> Vec<(u8, Vec<u8>)> {
        let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
        for event in &self.events {
            match event {
                Event::Command(cmd) => out.push((*cmd, Vec::new())),
                Event::Data(bytes) => {
                    if let Some((_, payload)) = out.last_mut() {
                        payload.extend_from_slice(bytes);
                    }
                }
                Event::Reset => {}
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[derive(Debug)]
pub struct MockError;

impl DisplayInterface for MockInterface {
    type Error = MockError;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.events.push(Event::Command(command));
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_data {
            self.fail_data = false;
            return Err(MockError);
        }
        self.events.push(Event::Data(data.to_vec()));
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        self.events.push(Event::Reset);
        Ok(())
    }

    fn is_busy(&mut self) -> Result<bool, Self::Error> {
        self.busy_polls += 1;
        if self.stuck_busy {
            return Ok(true);
        }
        Ok(self.busy_script.pop_front().unwrap_or(false))
    }
}

/// Delay that records the total requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

pub fn test_config(width: u16, height: u16) -> Config {
    Builder::new()
        .dimensions(Dimensions::new(width, height).unwrap())
        .build()
        .unwrap()
}
