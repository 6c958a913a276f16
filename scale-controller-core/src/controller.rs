// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::calibration::{Calibration, CalibrationContext, CalibrationOutcome, CalibrationStep};
use crate::clock::Clock;
use crate::command::{parse_number, Command, WEIGHT_PREFIX};
use crate::config::ControllerConfig;
use crate::driver::ScaleDriver;
use crate::frame::{CommandFrame, FrameParser};
use crate::io::{ByteSource, ResponseSink};
use crate::measurement::emit_measurement;
use crate::response::Response;
use strum::{EnumIter, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum DeviceMode {
    Idle,
    Measuring,
    Calibrating,
}

/// Device mode with the calibration attempt carried inside the calibrating variant, so a
/// calibration step cannot outlive the mode it belongs to.
#[derive(Debug, Clone, PartialEq)]
enum DeviceState {
    Idle,
    Measuring,
    Calibrating(Calibration),
}

/// What the dispatcher did with a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// A `weight:` frame belonging to the calibration sequence, passed on untouched
    Deferred(CommandFrame),
}

pub struct Controller<D, C> {
    driver: D,
    clock: C,
    config: ControllerConfig,
    parser: FrameParser,
    state: DeviceState,
}

impl<D, C> Controller<D, C>
where
    D: ScaleDriver,
    C: Clock,
{
    pub fn new(driver: D, clock: C) -> Self {
        Self::with_config(driver, clock, ControllerConfig::default())
    }

    pub fn with_config(driver: D, clock: C, config: ControllerConfig) -> Self {
        Self {
            driver,
            clock,
            config,
            parser: FrameParser::new(),
            state: DeviceState::Idle,
        }
    }

    /// Tell the host the controller is up. Sent once before the first tick.
    pub fn announce_ready<S: ResponseSink>(&mut self, sink: &mut S) {
        sink.send(&Response::Ready);
    }

    pub fn mode(&self) -> DeviceMode {
        match self.state {
            DeviceState::Idle => DeviceMode::Idle,
            DeviceState::Measuring => DeviceMode::Measuring,
            DeviceState::Calibrating(_) => DeviceMode::Calibrating,
        }
    }

    pub fn calibration_step(&self) -> Option<CalibrationStep> {
        match &self.state {
            DeviceState::Calibrating(calibration) => Some(calibration.current_step()),
            _ => None,
        }
    }

    pub fn calibration_context(&self) -> Option<&CalibrationContext> {
        match &self.state {
            DeviceState::Calibrating(calibration) => Some(calibration.context()),
            _ => None,
        }
    }

    pub fn parser(&self) -> &FrameParser {
        &self.parser
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// One pass of the control loop: take input until a frame is complete, dispatch it, then
    /// run the action for the current mode.
    pub fn tick<I, S>(&mut self, input: &mut I, sink: &mut S)
    where
        I: ByteSource,
        S: ResponseSink,
    {
        self.parser.drain(input);

        let deferred = match self.parser.take_frame() {
            Some(frame) => match self.dispatch(frame, sink) {
                Dispatch::Handled => None,
                Dispatch::Deferred(frame) => Some(frame),
            },
            None => None,
        };

        self.run_mode_action(deferred, sink);
    }

    fn awaiting_weight_input(&self) -> bool {
        matches!(&self.state, DeviceState::Calibrating(calibration) if calibration.accepts_weight_input())
    }

    /// Act on one complete frame.
    pub fn dispatch<S: ResponseSink>(&mut self, frame: CommandFrame, sink: &mut S) -> Dispatch {
        let Some(text) = frame.as_str() else {
            log::debug!("Ignoring frame that is not valid text");
            return Dispatch::Handled;
        };

        if text.starts_with(WEIGHT_PREFIX) && self.awaiting_weight_input() {
            return Dispatch::Deferred(frame);
        }

        match Command::parse(text) {
            Command::Tare => {
                self.driver.tare();
                sink.send(&Response::Tared);
            }
            Command::Start => {
                self.state = DeviceState::Measuring;
                sink.send(&Response::Measuring);
            }
            Command::Stop => {
                self.state = DeviceState::Idle;
                sink.send(&Response::Stopped);
            }
            Command::Calibrate => {
                self.state = DeviceState::Calibrating(Calibration::new());
                sink.send(&Response::CalibrationStarted);
            }
            Command::Cancel => {
                if let DeviceState::Calibrating(_) = self.state {
                    self.state = DeviceState::Idle;
                    sink.send(&Response::CalibrationCancelled);
                } else {
                    log::debug!("Ignoring cancel outside calibration");
                }
            }
            Command::GetScale => {
                sink.send(&Response::ScaleFactor(self.driver.scale_factor()));
            }
            Command::SetScale(payload) => match parse_number(payload) {
                Ok(factor) if factor != 0.0 => {
                    self.driver.set_scale_factor(factor);
                    sink.send(&Response::ScaleSet(factor));
                }
                result => {
                    log::debug!("Rejected scale factor {:?}: {:?}", payload, result);
                    sink.send(&Response::InvalidScaleFactor);
                }
            },
            Command::Weight(_) | Command::Unrecognized => {
                log::debug!("Ignoring unrecognized command {:?}", text);
            }
        }

        log::trace!("Dispatched {:?}, mode now {:?}", text, self.mode());
        Dispatch::Handled
    }

    fn run_mode_action<S: ResponseSink>(&mut self, deferred: Option<CommandFrame>, sink: &mut S) {
        match &mut self.state {
            DeviceState::Idle => {}
            DeviceState::Measuring => {
                emit_measurement(&mut self.driver, sink);
            }
            DeviceState::Calibrating(calibration) => {
                let outcome =
                    calibration.advance(deferred, &self.config, &mut self.driver, &self.clock, sink);
                if outcome == CalibrationOutcome::Finished {
                    self.state = DeviceState::Idle;
                }
            }
        }
    }
}
