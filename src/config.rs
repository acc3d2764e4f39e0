use embassy_time::Duration;

/// Number of steps in one crossfade between two primaries.
pub const DEFAULT_MAX_INTENSITY: u8 = 20;

/// How often the static color is re-read and re-rendered.
pub const DEFAULT_IDLE_PERIOD: Duration = Duration::from_millis(100);

/// Consecutive failed ticks after which the engine stops.
pub const DEFAULT_MAX_SINK_FAILURES: u8 = 3;

/// Configuration for the animation engine
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Peak channel value of the color wheel, also the number of ticks per crossfade
    pub max_intensity: u8,
    /// Sleep between ticks in static mode
    pub idle_period: Duration,
    /// Index of the driven pixel on the sink
    pub pixel_index: usize,
    /// Consecutive pixel sink failures tolerated before halting
    pub max_sink_failures: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_intensity: DEFAULT_MAX_INTENSITY,
            idle_period: DEFAULT_IDLE_PERIOD,
            pixel_index: 0,
            max_sink_failures: DEFAULT_MAX_SINK_FAILURES,
        }
    }
}
