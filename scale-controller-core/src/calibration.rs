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

//! Calibration sequence: clear the scale, tare, take a reference weight from the host, let it
//! settle, derive the scale factor from the raw reading and check it with one test reading.
//!
//! Every wait is a deadline against the injected [`Clock`], checked once per tick, so the
//! control loop keeps handling `cancel` while a window is open.

use crate::clock::{window_elapsed, Clock};
use crate::command::{parse_number, WEIGHT_PREFIX};
use crate::config::ControllerConfig;
use crate::driver::ScaleDriver;
use crate::frame::CommandFrame;
use crate::io::ResponseSink;
use crate::response::Response;
use strum::{EnumIter, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum CalibrationStep {
    Init,
    AwaitReadyDelay,
    Tare,
    AwaitWeightInput,
    Settle,
    Done,
}

/// State carried through a single calibration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationContext {
    pub reference_weight: f32,
    /// Start of the window the current step is waiting on
    pub timer_start_ms: u64,
    pub last_raw: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    InProgress,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    step: CalibrationStep,
    context: CalibrationContext,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibration {
    pub fn new() -> Self {
        Self {
            step: CalibrationStep::Init,
            context: CalibrationContext::default(),
        }
    }

    pub fn current_step(&self) -> CalibrationStep {
        self.step
    }

    pub fn context(&self) -> &CalibrationContext {
        &self.context
    }

    /// Whether a `weight:` frame should be routed here rather than to the dispatcher.
    pub fn accepts_weight_input(&self) -> bool {
        self.step == CalibrationStep::AwaitWeightInput
    }

    fn enter(&mut self, step: CalibrationStep) {
        log::debug!(
            "Calibration {} -> {}",
            <&'static str>::from(self.step),
            <&'static str>::from(step)
        );
        self.step = step;
    }

    /// Run one step of the sequence. `frame` is a `weight:` frame deferred by the dispatcher and
    /// is consumed here.
    pub fn advance<D, C, S>(
        &mut self,
        frame: Option<CommandFrame>,
        config: &ControllerConfig,
        driver: &mut D,
        clock: &C,
        sink: &mut S,
    ) -> CalibrationOutcome
    where
        D: ScaleDriver,
        C: Clock,
        S: ResponseSink,
    {
        let now = clock.now_ms();

        if frame.is_some() && self.step != CalibrationStep::AwaitWeightInput {
            log::trace!("Dropping frame received outside weight input");
        }

        match self.step {
            CalibrationStep::Init => {
                self.context.timer_start_ms = now;
                self.enter(CalibrationStep::AwaitReadyDelay);
            }
            CalibrationStep::AwaitReadyDelay => {
                if window_elapsed(self.context.timer_start_ms, now, config.ready_delay_ms) {
                    sink.send(&Response::CalibrationClearScale);
                    self.context.timer_start_ms = now;
                    self.enter(CalibrationStep::Tare);
                }
            }
            CalibrationStep::Tare => {
                if window_elapsed(self.context.timer_start_ms, now, config.tare_settle_ms)
                    && driver.is_ready()
                {
                    driver.tare();
                    sink.send(&Response::CalibrationTared);
                    self.enter(CalibrationStep::AwaitWeightInput);
                }
            }
            CalibrationStep::AwaitWeightInput => {
                if let Some(frame) = frame {
                    self.accept_reference_weight(&frame, now, sink);
                }
            }
            CalibrationStep::Settle => {
                if window_elapsed(self.context.timer_start_ms, now, config.weight_settle_ms)
                    && driver.is_ready()
                {
                    self.derive_scale_factor(config, driver, sink);
                }
            }
            CalibrationStep::Done => {
                if driver.is_ready() {
                    let test_weight = driver.weight_units();
                    sink.send(&Response::CalibrationTest(test_weight));
                    log::debug!("Calibration finished, test reading {}", test_weight);
                    return CalibrationOutcome::Finished;
                }
            }
        }

        CalibrationOutcome::InProgress
    }

    fn accept_reference_weight<S: ResponseSink>(
        &mut self,
        frame: &CommandFrame,
        now: u64,
        sink: &mut S,
    ) {
        let weight = frame
            .as_str()
            .and_then(|text| text.strip_prefix(WEIGHT_PREFIX))
            .and_then(|payload| parse_number(payload).ok())
            .filter(|weight| *weight > 0.0);

        match weight {
            Some(weight) => {
                self.context.reference_weight = weight;
                self.context.timer_start_ms = now;
                sink.send(&Response::CalibrationWeight(weight));
                self.enter(CalibrationStep::Settle);
            }
            None => {
                log::debug!("Rejected reference weight frame {:?}", frame.as_str());
                sink.send(&Response::CalibrationInvalidWeight);
            }
        }
    }

    fn derive_scale_factor<D: ScaleDriver, S: ResponseSink>(
        &mut self,
        config: &ControllerConfig,
        driver: &mut D,
        sink: &mut S,
    ) {
        let raw = driver.raw_value();
        self.context.last_raw = raw;
        sink.send(&Response::CalibrationRaw(raw));

        if raw.unsigned_abs() < config.min_detectable_raw.unsigned_abs() {
            sink.send(&Response::CalibrationNoWeight);
            self.enter(CalibrationStep::AwaitWeightInput);
            return;
        }

        let factor = raw as f32 / self.context.reference_weight;
        if !factor.is_finite() || factor == 0.0 {
            log::debug!(
                "Reference weight {} gives unusable factor {}",
                self.context.reference_weight,
                factor
            );
            sink.send(&Response::CalibrationInvalidWeight);
            self.enter(CalibrationStep::AwaitWeightInput);
            return;
        }

        driver.set_scale_factor(factor);
        sink.send(&Response::CalibrationFactor(factor));
        self.enter(CalibrationStep::Done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClock, FakeDriver, RecordingSink};

    struct Bench {
        calibration: Calibration,
        config: ControllerConfig,
        driver: FakeDriver,
        clock: FakeClock,
        sink: RecordingSink,
    }

    impl Bench {
        fn new() -> Self {
            Self {
                calibration: Calibration::new(),
                config: ControllerConfig::default(),
                driver: FakeDriver::new(),
                clock: FakeClock::new(),
                sink: RecordingSink::new(),
            }
        }

        fn advance(&mut self, frame: Option<&str>) -> CalibrationOutcome {
            self.calibration.advance(
                frame.map(CommandFrame::from_text),
                &self.config,
                &mut self.driver,
                &self.clock,
                &mut self.sink,
            )
        }

        fn run_to_weight_input(&mut self) {
            self.advance(None);
            self.clock.advance_ms(500);
            self.advance(None);
            self.clock.advance_ms(2000);
            self.advance(None);
            assert_eq!(self.calibration.current_step(), CalibrationStep::AwaitWeightInput);
            self.sink.clear();
        }
    }

    #[test]
    fn init_moves_straight_to_ready_delay() {
        let mut bench = Bench::new();
        bench.clock.set_ms(42);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::AwaitReadyDelay);
        assert_eq!(bench.calibration.context().timer_start_ms, 42);
        assert!(bench.sink.lines().is_empty());
    }

    #[test]
    fn ready_delay_holds_until_window_passes() {
        let mut bench = Bench::new();
        bench.advance(None);
        bench.clock.advance_ms(499);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::AwaitReadyDelay);

        bench.clock.advance_ms(1);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Tare);
        assert_eq!(bench.sink.lines(), ["CAL_CLEAR_SCALE"]);
    }

    #[test]
    fn tare_waits_for_window_and_driver() {
        let mut bench = Bench::new();
        bench.advance(None);
        bench.clock.advance_ms(500);
        bench.advance(None);
        bench.sink.clear();

        bench.clock.advance_ms(1999);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Tare);

        bench.driver.ready = false;
        bench.clock.advance_ms(1);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Tare);
        assert_eq!(bench.driver.tare_count, 0);

        bench.driver.ready = true;
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::AwaitWeightInput);
        assert_eq!(bench.driver.tare_count, 1);
        assert_eq!(bench.sink.lines(), ["CAL_TARED"]);
    }

    #[test]
    fn weight_input_waits_for_frame() {
        let mut bench = Bench::new();
        bench.run_to_weight_input();
        bench.clock.advance_ms(60_000);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::AwaitWeightInput);
        assert!(bench.sink.lines().is_empty());
    }

    #[test]
    fn non_positive_or_malformed_weight_is_rejected() {
        let mut bench = Bench::new();
        bench.run_to_weight_input();

        for frame in ["weight:0", "weight:-5", "weight:abc", "weight:"] {
            bench.advance(Some(frame));
            assert_eq!(bench.calibration.current_step(), CalibrationStep::AwaitWeightInput);
            assert_eq!(bench.sink.lines(), ["CAL_ERROR:Invalid weight"]);
            bench.sink.clear();
        }
    }

    #[test]
    fn settle_without_load_returns_to_weight_input() {
        let mut bench = Bench::new();
        bench.run_to_weight_input();
        bench.advance(Some("weight:200"));
        assert_eq!(bench.sink.lines(), ["CAL_WEIGHT:200.00"]);
        bench.sink.clear();

        bench.driver.raw = -999;
        bench.clock.advance_ms(3000);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::AwaitWeightInput);
        assert_eq!(bench.sink.lines(), ["CAL_RAW:-999", "CAL_ERROR:No weight detected"]);
        assert_eq!(bench.driver.scale_factor, 1.0);
        assert_eq!(bench.calibration.context().last_raw, -999);
    }

    #[test]
    fn negative_raw_reading_still_counts_as_load() {
        let mut bench = Bench::new();
        bench.run_to_weight_input();
        bench.advance(Some("weight:100"));
        bench.driver.raw = -5000;
        bench.clock.advance_ms(3000);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Done);
        assert_eq!(bench.driver.scale_factor, -50.0);
    }

    #[test]
    fn tiny_reference_weight_cannot_store_infinite_factor() {
        let mut bench = Bench::new();
        bench.driver.scale_factor = 3.0;
        bench.run_to_weight_input();
        bench.advance(Some("weight:1e-40"));
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Settle);
        bench.sink.clear();

        bench.driver.raw = 750_000;
        bench.clock.advance_ms(3000);
        bench.advance(None);

        assert_eq!(bench.calibration.current_step(), CalibrationStep::AwaitWeightInput);
        assert_eq!(bench.sink.lines(), ["CAL_RAW:750000", "CAL_ERROR:Invalid weight"]);
        assert_eq!(bench.driver.scale_factor, 3.0);

        bench.sink.clear();
        bench.advance(Some("weight:500"));
        bench.clock.advance_ms(3000);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Done);
        assert_eq!(bench.driver.scale_factor, 1500.0);
    }

    #[test]
    fn full_sequence_sets_factor_and_finishes() {
        let mut bench = Bench::new();
        bench.run_to_weight_input();
        bench.advance(Some("weight:500.0"));

        bench.driver.raw = 750_000;
        bench.clock.advance_ms(2999);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Settle);

        bench.clock.advance_ms(1);
        bench.advance(None);
        assert_eq!(bench.calibration.current_step(), CalibrationStep::Done);
        assert_eq!(bench.driver.scale_factor, 1500.0);
        assert_eq!(bench.calibration.context().reference_weight, 500.0);

        bench.driver.ready = false;
        assert_eq!(bench.advance(None), CalibrationOutcome::InProgress);
        bench.driver.ready = true;
        assert_eq!(bench.advance(None), CalibrationOutcome::Finished);

        assert_eq!(
            bench.sink.lines(),
            [
                "CAL_WEIGHT:500.00",
                "CAL_RAW:750000",
                "CAL_FACTOR:1500.00",
                "CAL_TEST:500.00"
            ]
        );
    }
}
