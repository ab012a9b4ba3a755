/// Quality used when none is given.
pub const DEFAULT_QUALITY: u8 = 75;

/// Encoder settings for [`hide`](crate::hide) and [`capacity`](crate::capacity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// JPEG quality 1..=100; values outside are clamped.
    pub quality: u8,
    /// MCUs between restart markers, 0 disables restarts.
    pub restart_interval: u16,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            quality: DEFAULT_QUALITY,
            restart_interval: 0,
        }
    }
}

impl Options {
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn with_restart_interval(mut self, restart_interval: u16) -> Self {
        self.restart_interval = restart_interval;
        self
    }
}
