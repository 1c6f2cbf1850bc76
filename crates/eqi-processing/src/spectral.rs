//! Single-sided amplitude spectrum estimation

use crate::config::FrequencyBand;
use crate::window::WindowedSignal;
use eqi_core::{EqiError, EqiResult};
use num_complex::Complex64;
use num_traits::Zero;
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};

/// Per-window single-sided amplitude spectra for a windowed recording
///
/// One magnitude vector of `floor(fft_len / 2) + 1` non-negative
/// frequency bins per channel per window, plus the shared frequency
/// vector `f[i] = sample_rate · i / fft_len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeSpectrum {
    data: Vec<f64>,
    channel_count: usize,
    bin_count: usize,
    window_count: usize,
    frequencies: Vec<f64>,
    resolution_hz: f64,
}

impl AmplitudeSpectrum {
    /// Get number of channels
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Get number of frequency bins per window
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Get number of windows per channel
    pub fn window_count(&self) -> usize {
        self.window_count
    }

    /// Get the frequency vector in Hz
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Get the spectral resolution in Hz
    pub fn resolution_hz(&self) -> f64 {
        self.resolution_hz
    }

    /// Borrow the magnitude bins for one window of one channel
    pub fn bins(&self, channel: usize, window: usize) -> &[f64] {
        debug_assert!(channel < self.channel_count && window < self.window_count);
        let start = (channel * self.window_count + window) * self.bin_count;
        &self.data[start..start + self.bin_count]
    }

    /// Compute the inclusive bin range covering a frequency band
    ///
    /// The range is resolved once per band and reused for every window
    /// reduction. Fails with [`EqiError::BandEmpty`] when no bin falls
    /// inside `[low_hz, high_hz]` — the resolution is too coarse, or the
    /// band lies beyond Nyquist.
    pub fn band_range(&self, band: &FrequencyBand) -> EqiResult<(usize, usize)> {
        let lo = (band.low_hz / self.resolution_hz).ceil() as isize;
        let hi = (band.high_hz / self.resolution_hz).floor() as isize;

        let lo = lo.max(0) as usize;
        if hi < 0 || lo > hi as usize || lo >= self.bin_count {
            return Err(EqiError::BandEmpty {
                low_hz: band.low_hz,
                high_hz: band.high_hz,
                resolution_hz: self.resolution_hz,
            });
        }
        let hi = (hi as usize).min(self.bin_count - 1);

        Ok((lo, hi))
    }

    /// Mean magnitude over a frequency band for one window
    pub fn band_mean(&self, channel: usize, window: usize, band: &FrequencyBand) -> EqiResult<f64> {
        let (lo, hi) = self.band_range(band)?;
        Ok(self.range_mean(channel, window, (lo, hi)))
    }

    /// Mean magnitude over a precomputed bin range for one window
    pub fn range_mean(&self, channel: usize, window: usize, range: (usize, usize)) -> f64 {
        let bins = &self.bins(channel, window)[range.0..=range.1];
        bins.iter().sum::<f64>() / bins.len() as f64
    }
}

/// Spectral estimator with cached real-input FFT plans
///
/// The planner cache is a performance detail only: every window of every
/// channel is transformed independently, and results do not depend on
/// call order.
pub struct SpectralEstimator {
    planner: RealFftPlanner<f64>,
}

impl SpectralEstimator {
    /// Create new spectral estimator
    pub fn new() -> Self {
        SpectralEstimator {
            planner: RealFftPlanner::new(),
        }
    }

    /// Compute single-sided amplitude spectra for every window
    ///
    /// Windows shorter than `fft_len` are zero-padded; longer windows are
    /// truncated to their first `fft_len` samples. Magnitudes are
    /// non-negative reals; non-finite input samples propagate as NaN.
    pub fn amplitude_spectrum(
        &mut self,
        windows: &WindowedSignal,
        sample_rate: f64,
        fft_len: usize,
    ) -> EqiResult<AmplitudeSpectrum> {
        if fft_len == 0 {
            return Err(EqiError::ConfigurationError {
                message: "FFT length must be positive".to_string(),
            });
        }

        let fft = self.planner.plan_fft_forward(fft_len);
        let bin_count = fft_len / 2 + 1;
        let copy_len = windows.window_len().min(fft_len);

        let (channel_count, _, window_count) = windows.shape();
        let mut data = Vec::with_capacity(channel_count * window_count * bin_count);
        let mut input = fft.make_input_vec();
        let mut output = vec![Complex64::zero(); bin_count];

        for ch in 0..channel_count {
            for w in 0..window_count {
                input.fill(0.0);
                input[..copy_len].copy_from_slice(&windows.window(ch, w)[..copy_len]);

                fft.process(&mut input, &mut output)
                    .map_err(|e| EqiError::InvalidSignalData {
                        reason: format!("FFT failed: {}", e),
                    })?;

                data.extend(output.iter().map(|c| c.norm()));
            }
        }

        let frequencies = (0..bin_count)
            .map(|i| sample_rate * i as f64 / fft_len as f64)
            .collect();

        Ok(AmplitudeSpectrum {
            data,
            channel_count,
            bin_count,
            window_count,
            frequencies,
            resolution_hz: sample_rate / fft_len as f64,
        })
    }
}

impl Default for SpectralEstimator {
    fn default() -> Self {
        Self::new()
    }
}
