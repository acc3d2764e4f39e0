use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use log::{debug, error, info};

use crate::animation::AnimationPhase;
use crate::color::Rgb;
use crate::config::EngineConfig;
use crate::sink::{PixelSink, PixelSinkError};
use crate::state::{ControlSnapshot, ControlState, Mode};

/// Outcome of a single engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// Mode the frame was rendered in
    pub mode: Mode,
    /// Pixel sent to the sink
    pub pixel: Rgb,
    /// How long to wait before the next step
    pub sleep: Duration,
}

/// Periodic renderer of the control state.
///
/// Reads the shared state once per step, renders either the static color or
/// the next color wheel frame and then waits. The wait is the only point at
/// which the engine yields.
pub struct AnimationEngine<'a, S: PixelSink> {
    state: &'a ControlState,
    sink: S,
    config: EngineConfig,
    phase: AnimationPhase,
    last_mode: Option<Mode>,
    failures: u8,
}

impl<'a, S: PixelSink> AnimationEngine<'a, S> {
    pub fn new(state: &'a ControlState, sink: S, config: EngineConfig) -> Self {
        Self {
            state,
            sink,
            phase: AnimationPhase::new(config.max_intensity),
            config,
            last_mode: None,
            failures: 0,
        }
    }

    pub const fn phase(&self) -> &AnimationPhase {
        &self.phase
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Render one frame without waiting
    ///
    /// The caller is responsible for waiting `sleep` before the next call.
    pub fn tick(&mut self) -> Result<TickResult, PixelSinkError> {
        let frame = self.next_frame();
        self.render(frame.pixel)?;
        Ok(frame)
    }

    /// Run the render loop.
    ///
    /// Turns the output off, then renders forever. A frame the sink rejects is
    /// logged and skipped. After `max_sink_failures` consecutive rejected frames,
    /// or if the initial clear fails, the loop logs and returns.
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D) {
        if let Err(err) = self.sink.clear() {
            error!("animation: failed to clear output: {}", err);
            return;
        }
        info!("animation: started");

        loop {
            let frame = self.next_frame();
            match self.render(frame.pixel) {
                Ok(()) => self.failures = 0,
                Err(err) => {
                    self.failures = self.failures.saturating_add(1);
                    error!(
                        "animation: frame dropped ({}/{}): {}",
                        self.failures, self.config.max_sink_failures, err
                    );
                    if self.failures >= self.config.max_sink_failures {
                        error!("animation: output keeps failing, halting");
                        return;
                    }
                }
            }

            let sleep_ms = u32::try_from(frame.sleep.as_millis()).unwrap_or(u32::MAX);
            delay.delay_ms(sleep_ms).await;
        }
    }

    /// Compute the next frame from the current control state
    fn next_frame(&mut self) -> TickResult {
        let values = self.state.snapshot();
        let mode = values.mode();
        if self.last_mode != Some(mode) {
            info!("animation: {:?} mode", mode);
            self.last_mode = Some(mode);
        }

        match mode {
            Mode::Static => TickResult {
                mode,
                pixel: values.color,
                sleep: self.config.idle_period,
            },
            Mode::Cycling => {
                self.phase.advance();
                TickResult {
                    mode,
                    pixel: self.phase.pixel(),
                    sleep: step_period(&values),
                }
            }
        }
    }

    fn render(&mut self, pixel: Rgb) -> Result<(), PixelSinkError> {
        debug!(
            "animation: pixel {} <- ({}, {}, {})",
            self.config.pixel_index, pixel.r, pixel.g, pixel.b
        );
        self.sink.set_pixel(self.config.pixel_index, pixel)?;
        self.sink.refresh()
    }
}

fn step_period(values: &ControlSnapshot) -> Duration {
    Duration::from_millis(u64::from(values.delay_ms))
}
