// MIT/Apache2 License

use crate::{Error, NSOpType, Result};
use num_traits::{clamp, One};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// Number of entries per channel in a device-independent gamma ramp.
pub const GAMMA_RAMP_SIZE: usize = 256;

/// A gamma exponent. Always finite and positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gamma(NotNan<f32>);

impl Gamma {
    #[inline]
    pub fn new(value: f32) -> Result<Gamma> {
        match NotNan::new(value) {
            Ok(value) if value.into_inner() > 0.0 && value.into_inner().is_finite() => Ok(Gamma(value)),
            _ => Err(Error::BadParameter("gamma must be a positive number")),
        }
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0.into_inner()
    }
}

impl Default for Gamma {
    #[inline]
    fn default() -> Self {
        Gamma(NotNan::one())
    }
}

/// A tone curve for each of the red, green and blue channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GammaRamp {
    pub red: [u16; GAMMA_RAMP_SIZE],
    pub green: [u16; GAMMA_RAMP_SIZE],
    pub blue: [u16; GAMMA_RAMP_SIZE],
}

/// A gamma ramp in whatever size the host device uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostGammaRamp {
    pub red: Vec<u16>,
    pub green: Vec<u16>,
    pub blue: Vec<u16>,
}

impl HostGammaRamp {
    #[inline]
    pub fn len(&self) -> usize {
        self.red.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }
}

impl Default for GammaRamp {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl GammaRamp {
    /// The ramp that leaves colors alone.
    #[inline]
    pub fn identity() -> Self {
        let mut channel = [0u16; GAMMA_RAMP_SIZE];
        for (i, entry) in channel.iter_mut().enumerate() {
            *entry = i as u16 * 257;
        }
        Self {
            red: channel,
            green: channel,
            blue: channel,
        }
    }

    /// The ramp for the given per-channel gamma.
    #[inline]
    pub fn from_gamma(red: Gamma, green: Gamma, blue: Gamma) -> Self {
        Self {
            red: channel_from_gamma(red),
            green: channel_from_gamma(green),
            blue: channel_from_gamma(blue),
        }
    }

    /// Estimate the gamma each channel was generated with.
    ///
    /// Returns `None` for ramps that are not a plain power curve: inverted or flat ramps, ramps
    /// with a visible bias at the low end, and ramps whose gamma varies too much along the curve.
    #[inline]
    pub fn estimate_gamma(&self) -> Option<[Gamma; 3]> {
        Some([
            estimate_channel(&self.red)?,
            estimate_channel(&self.green)?,
            estimate_channel(&self.blue)?,
        ])
    }

    /// Does every channel never decrease?
    #[inline]
    pub fn is_monotonic(&self) -> bool {
        [&self.red, &self.green, &self.blue]
            .iter()
            .all(|channel| channel.windows(2).all(|w| w[0] <= w[1]))
    }

    /// Linearly interpolate the ramp to `size` entries per channel.
    #[inline]
    pub fn resample(&self, size: usize) -> HostGammaRamp {
        HostGammaRamp {
            red: interpolate(&self.red, size),
            green: interpolate(&self.green, size),
            blue: interpolate(&self.blue, size),
        }
    }

    /// Build a ramp from a host ramp of any size.
    pub fn from_samples(host: &HostGammaRamp) -> Result<Self> {
        if host.red.len() < 2 || host.green.len() != host.red.len() || host.blue.len() != host.red.len()
        {
            return Err(Error::BadParameter("host gamma ramp is malformed"));
        }

        let mut ramp = Self::identity();
        ramp.red.copy_from_slice(&interpolate(&host.red, GAMMA_RAMP_SIZE));
        ramp.green.copy_from_slice(&interpolate(&host.green, GAMMA_RAMP_SIZE));
        ramp.blue.copy_from_slice(&interpolate(&host.blue, GAMMA_RAMP_SIZE));
        Ok(ramp)
    }
}

fn channel_from_gamma(gamma: Gamma) -> [u16; GAMMA_RAMP_SIZE] {
    let exponent = 1.0 / gamma.value() as f64;
    let mut channel = [0u16; GAMMA_RAMP_SIZE];
    for (i, entry) in channel.iter_mut().enumerate() {
        let value = (i as f64 / 255.0).powf(exponent) * 65535.0 + 0.5;
        *entry = clamp(value, 0.0, 65535.0) as u16;
    }
    channel
}

fn interpolate(src: &[u16], size: usize) -> Vec<u16> {
    if src.is_empty() {
        return vec![0; size];
    }
    if size < 2 {
        return src.iter().take(size).copied().collect();
    }

    (0..size)
        .map(|i| {
            let position = i as f64 * (src.len() - 1) as f64 / (size - 1) as f64;
            let index = position as usize;
            match src.get(index + 1) {
                Some(&next) => {
                    let distance = position - index as f64;
                    let base = src[index] as f64;
                    clamp(base + (next as f64 - base) * distance + 0.5, 0.0, 65535.0) as u16
                }
                None => src[index],
            }
        })
        .collect()
}

fn estimate_channel(ramp: &[u16; GAMMA_RAMP_SIZE]) -> Option<Gamma> {
    let (first, last) = (ramp[0] as f64, ramp[GAMMA_RAMP_SIZE - 1] as f64);
    if first >= last {
        log::warn!("Inverted or flat gamma ramp ({} -> {}) rejected", first, last);
        return None;
    }
    let range = last - first;

    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut sum = 0.0;
    let mut count = 0;

    for (i, &entry) in ramp.iter().enumerate().take(GAMMA_RAMP_SIZE - 1).skip(1) {
        let entry = entry as f64;
        if entry < first || entry > last {
            log::warn!("Gamma ramp entry {} is outside of {} -> {}", i, first, last);
            return None;
        }

        let c = entry - first;
        if c == 0.0 {
            continue;
        }

        let lx = (i as f64 / 255.0).ln();
        let ly = (c / range).ln();
        let gamma = ly / lx;
        // error bound of a coarse logarithm table
        let error = -128.0 / (c * lx);

        min = Some(min.map_or(gamma + error, |m| m.min(gamma + error)));
        max = Some(max.map_or(gamma - error, |m| m.max(gamma - error)));
        sum += gamma;
        count += 1;
    }

    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        _ => return None,
    };
    let average = sum / count as f64;

    if first > 0.0 && first > (1.0f64 / 255.0).powf(average) * 65536.0 {
        log::warn!("Low-biased gamma ramp ({}) rejected", first);
        return None;
    }
    if max - min > 12.8 {
        log::warn!("Gamma ramp is not uniform (min {}, max {})", min, max);
        return None;
    }
    if average.partial_cmp(&0.2) != Some(Ordering::Greater) {
        log::warn!("Gamma ramp is too bright ({})", average);
        return None;
    }

    Gamma::new((1.0 / average) as f32).ok()
}

/// A display with an adjustable hardware gamma ramp.
pub trait GammaDevice {
    /// Entries per channel of the hardware ramp, or zero if there is none.
    fn gamma_ramp_size(&self) -> usize;

    fn read_gamma_ramp(&self) -> Result<HostGammaRamp>;

    fn write_gamma_ramp(&mut self, ramp: &HostGammaRamp) -> Result;
}

/// Read the device's gamma ramp, resampled to 256 entries.
#[inline]
pub fn get_gamma_ramp<D: GammaDevice + ?Sized>(device: &D) -> Result<GammaRamp> {
    if device.gamma_ramp_size() == 0 {
        return Err(Error::NotSupported(NSOpType::GammaRamp));
    }
    GammaRamp::from_samples(&device.read_gamma_ramp()?)
}

/// Load a gamma ramp into the device, resampled to its size.
#[inline]
pub fn set_gamma_ramp<D: GammaDevice + ?Sized>(device: &mut D, ramp: &GammaRamp) -> Result {
    let size = device.gamma_ramp_size();
    if size == 0 {
        return Err(Error::NotSupported(NSOpType::GammaRamp));
    }
    if !ramp.is_monotonic() {
        return Err(Error::BadParameter("gamma ramp is not monotonic"));
    }

    log::debug!("Loading gamma ramp with {} entries per channel", size);
    device.write_gamma_ramp(&ramp.resample(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Monitor {
        ramp: HostGammaRamp,
    }

    impl GammaDevice for Monitor {
        fn gamma_ramp_size(&self) -> usize {
            self.ramp.len()
        }

        fn read_gamma_ramp(&self) -> Result<HostGammaRamp> {
            Ok(self.ramp.clone())
        }

        fn write_gamma_ramp(&mut self, ramp: &HostGammaRamp) -> Result {
            self.ramp = ramp.clone();
            Ok(())
        }
    }

    #[test]
    fn test_gamma_must_be_positive() {
        assert!(Gamma::new(0.0).is_err());
        assert!(Gamma::new(f32::NAN).is_err());
        assert!(Gamma::new(-1.0).is_err());
        assert_relative_eq!(Gamma::default().value(), 1.0);
    }

    #[test]
    fn test_identity_is_unit_gamma() {
        let gamma = Gamma::new(1.0).unwrap();
        assert_eq!(GammaRamp::from_gamma(gamma, gamma, gamma), GammaRamp::identity());
    }

    #[test]
    fn test_estimate_gamma() {
        let ramp = GammaRamp::from_gamma(
            Gamma::new(2.2).unwrap(),
            Gamma::new(1.0).unwrap(),
            Gamma::new(0.8).unwrap(),
        );
        let [r, g, b] = ramp.estimate_gamma().unwrap();
        assert_relative_eq!(r.value(), 2.2, epsilon = 0.02);
        assert_relative_eq!(g.value(), 1.0, epsilon = 0.02);
        assert_relative_eq!(b.value(), 0.8, epsilon = 0.02);
    }

    #[test]
    fn test_flat_ramp_has_no_gamma() {
        let mut ramp = GammaRamp::identity();
        ramp.green = [0x8000; GAMMA_RAMP_SIZE];
        assert!(ramp.estimate_gamma().is_none());
        assert!(ramp.is_monotonic());

        ramp.red[10] = 0;
        assert!(!ramp.is_monotonic());
    }

    #[test]
    fn test_resample_keeps_endpoints() {
        let host = GammaRamp::identity().resample(1024);
        assert_eq!(host.len(), 1024);
        assert_eq!(host.red[0], 0);
        assert_eq!(host.red[1023], 65535);
        assert!(host.red.windows(2).all(|w| w[0] <= w[1]));

        let back = GammaRamp::from_samples(&host).unwrap();
        for (a, b) in back.red.iter().zip(GammaRamp::identity().red.iter()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_device_round_trip() {
        let mut monitor = Monitor {
            ramp: GammaRamp::identity().resample(16),
        };
        let two = Gamma::new(2.0).unwrap();
        let ramp = GammaRamp::from_gamma(two, two, two);
        set_gamma_ramp(&mut monitor, &ramp).unwrap();
        assert_eq!(monitor.ramp.len(), 16);

        let read = get_gamma_ramp(&monitor).unwrap();
        assert_eq!(read.red[0], 0);
        assert_eq!(read.red[255], 65535);

        let mut none = Monitor {
            ramp: HostGammaRamp {
                red: vec![],
                green: vec![],
                blue: vec![],
            },
        };
        assert_eq!(
            set_gamma_ramp(&mut none, &ramp),
            Err(Error::NotSupported(NSOpType::GammaRamp))
        );
    }
}
