//! Sliding-window segmentation of multichannel recordings

use eqi_core::{EqiError, EqiResult, Recording};
use serde::{Deserialize, Serialize};

/// A recording cut into overlapping fixed-length segments
///
/// Logically a rank-3 tensor (channels × window-length × window-count),
/// stored flat so every window is one contiguous slice. Layout:
/// channel-major, then window-major, so the window `w` of channel `ch`
/// starts at `(ch * window_count + w) * window_len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedSignal {
    data: Vec<f64>,
    channel_count: usize,
    window_len: usize,
    window_count: usize,
}

impl WindowedSignal {
    /// Get number of channels
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Get window length in samples
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Get number of windows per channel
    pub fn window_count(&self) -> usize {
        self.window_count
    }

    /// Tensor shape as (channels, window-length, window-count)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.channel_count, self.window_len, self.window_count)
    }

    /// Borrow one window of one channel
    pub fn window(&self, channel: usize, window: usize) -> &[f64] {
        debug_assert!(channel < self.channel_count && window < self.window_count);
        let start = (channel * self.window_count + window) * self.window_len;
        &self.data[start..start + self.window_len]
    }
}

/// Slice a recording into overlapping fixed-length windows
///
/// Window start offsets are `0, stride, 2·stride, …` up to the last
/// offset with `offset + window ≤ samples`, giving
/// `floor((samples − window) / stride) + 1` windows per channel. Each
/// window is copied, never aliased; the input is untouched.
///
/// Fails with [`EqiError::InvalidWindow`] when `window` or `stride` is
/// zero, or `window` exceeds the per-channel sample count.
pub fn sliding_window(
    recording: &Recording,
    window: usize,
    stride: usize,
) -> EqiResult<WindowedSignal> {
    let samples = recording.samples_per_channel();

    if window == 0 || stride == 0 || window > samples {
        return Err(EqiError::InvalidWindow {
            window,
            stride,
            samples,
        });
    }

    let window_count = (samples - window) / stride + 1;
    let channel_count = recording.channel_count();

    let mut data = Vec::with_capacity(channel_count * window_count * window);
    for ch in 0..channel_count {
        let channel = recording.channel_data(ch)?;
        for w in 0..window_count {
            let offset = w * stride;
            data.extend_from_slice(&channel[offset..offset + window]);
        }
    }

    Ok(WindowedSignal {
        data,
        channel_count,
        window_len: window,
        window_count,
    })
}
