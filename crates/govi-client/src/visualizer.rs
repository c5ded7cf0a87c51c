//! Audio-level bars for the assistant's voice.
//!
//! The UI draws `bars` columns whose heights come from [`BarVisualizer`].
//! Levels are RMS per slice of the frame on a square-root curve, so quiet
//! speech still moves the bars, and are smoothed with a fast attack and a
//! slower release to avoid flicker.

use govi_types::AgentState;

/// Default number of bars.
pub const DEFAULT_BAR_COUNT: usize = 5;

/// Per-frame retention of the previous level while it falls.
const RELEASE: f32 = 0.6;

/// Raw per-bar levels in `0.0..=1.0` for one frame of 16-bit PCM.
///
/// Samples are spread over the bars as evenly as possible, so every bar
/// gets at least one sample once the frame is as long as the bar count.
/// A shorter frame fills one bar per sample and leaves the rest at zero.
pub fn bar_levels(samples: &[i16], bars: usize) -> Vec<f32> {
    let mut levels = vec![0.0; bars];
    let len = samples.len();

    for (i, level) in levels.iter_mut().enumerate() {
        let (start, end) = if len >= bars {
            (i * len / bars, (i + 1) * len / bars)
        } else {
            (i.min(len), (i + 1).min(len))
        };
        let slice = &samples[start..end];
        if slice.is_empty() {
            continue;
        }

        let sum_sq: f64 = slice
            .iter()
            .map(|&s| {
                let v = f64::from(s) / f64::from(i16::MAX);
                v * v
            })
            .sum();
        let rms = (sum_sq / slice.len() as f64).sqrt();
        *level = (rms.sqrt() as f32).clamp(0.0, 1.0);
    }
    levels
}

/// Smoothed bar levels tied to the assistant state.
#[derive(Debug, Clone)]
pub struct BarVisualizer {
    levels: Vec<f32>,
}

impl BarVisualizer {
    pub fn new(bars: usize) -> Self {
        Self {
            levels: vec![0.0; bars],
        }
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    /// Feeds one frame of the assistant's audio.
    ///
    /// Outside a connected session the bars drop flat immediately.
    pub fn update(&mut self, state: AgentState, samples: &[i16]) -> &[f32] {
        if !state.is_connected() {
            self.levels.iter_mut().for_each(|l| *l = 0.0);
            return &self.levels;
        }

        let target = bar_levels(samples, self.levels.len());
        for (current, target) in self.levels.iter_mut().zip(target) {
            *current = if target >= *current {
                target
            } else {
                *current * RELEASE + target * (1.0 - RELEASE)
            };
        }
        &self.levels
    }
}

impl Default for BarVisualizer {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_COUNT)
    }
}
