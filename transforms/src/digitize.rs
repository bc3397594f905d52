use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    SensorTransform, TransformErrors, TransformKind,
    signal::{Components, Signal},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantization {
    /// Round to the nearest multiple of the resolution
    Range,
    /// Round, then clip to the configured [min, max]
    Clamped,
}

/// Analog to digital conversion, y = resolution * round(x / resolution)
/// with resolution = range / 2^bits per component.
///
/// Quaternions are quantized on their vector part and renormalized.
/// A component whose resolution is zero passes through unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DigitizeTransform<S: Signal> {
    bits: f64,
    range: S::Components,
    bounds: Option<(S::Components, S::Components)>,
    resolution: S::Components,
}

impl<S: Signal> DigitizeTransform<S> {
    pub fn new(bits: f64, range: S::Components) -> Result<Self, TransformErrors> {
        validate_bits(bits)?;
        validate_range(&range)?;
        Ok(Self {
            bits,
            range,
            bounds: None,
            resolution: resolution(bits, &range),
        })
    }

    /// Digitizer over [min, max], clipping anything outside
    pub fn bounded(
        bits: f64,
        min: S::Components,
        max: S::Components,
    ) -> Result<Self, TransformErrors> {
        let mut transform = Self::new(bits, S::Components::splat(0.0))?;
        transform.set_bounds(min, max)?;
        Ok(transform)
    }

    /// Zero range, so every component passes through
    pub fn passthrough() -> Self {
        let range = S::Components::splat(0.0);
        Self {
            bits: 0.0,
            range,
            bounds: None,
            resolution: range,
        }
    }

    pub fn bits(&self) -> f64 {
        self.bits
    }

    pub fn range(&self) -> S::Components {
        self.range
    }

    pub fn resolution(&self) -> S::Components {
        self.resolution
    }

    pub fn bounds(&self) -> Option<(S::Components, S::Components)> {
        self.bounds
    }

    pub fn quantization(&self) -> Quantization {
        match self.bounds {
            Some(_) => Quantization::Clamped,
            None => Quantization::Range,
        }
    }

    pub fn set_bits(&mut self, bits: f64) -> Result<(), TransformErrors> {
        self.set_parameters(bits, self.range)
    }

    /// Changes the full scale range. Bounds, if any, are kept.
    pub fn set_range(&mut self, range: S::Components) -> Result<(), TransformErrors> {
        self.set_parameters(self.bits, range)
    }

    /// Validates both parameters before changing either
    pub fn set_parameters(
        &mut self,
        bits: f64,
        range: S::Components,
    ) -> Result<(), TransformErrors> {
        validate_bits(bits)?;
        validate_range(&range)?;
        self.bits = bits;
        self.range = range;
        self.resolution = resolution(bits, &range);
        debug!("digitizer set to {bits} bits, resolution {:?}", self.resolution);
        Ok(())
    }

    /// Switches to the clamped policy with range = max - min
    pub fn set_bounds(
        &mut self,
        min: S::Components,
        max: S::Components,
    ) -> Result<(), TransformErrors> {
        validate_bounds(&min, &max)?;
        let range = max.map(|i, max| max - min.component(i));
        self.set_range(range)?;
        self.bounds = Some((min, max));
        Ok(())
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }
}

fn resolution<C: Components>(bits: f64, range: &C) -> C {
    let levels = 2f64.powf(bits);
    range.map(|_, range| range / levels)
}

fn validate_bits(bits: f64) -> Result<(), TransformErrors> {
    if !bits.is_finite() || bits < 0.0 {
        return Err(TransformErrors::InvalidBits(bits));
    }
    Ok(())
}

fn validate_range<C: Components>(range: &C) -> Result<(), TransformErrors> {
    match range.values().find(|r| !r.is_finite() || *r < 0.0) {
        Some(r) => Err(TransformErrors::InvalidRange(r)),
        None => Ok(()),
    }
}

fn validate_bounds<C: Components>(min: &C, max: &C) -> Result<(), TransformErrors> {
    for (min, max) in min.values().zip(max.values()) {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(TransformErrors::InvalidBounds { min, max });
        }
    }
    Ok(())
}

impl<S: Signal> SensorTransform<S> for DigitizeTransform<S> {
    fn evaluate(&mut self, x: &S) -> S {
        let resolution = self.resolution;
        let bounds = self.bounds;
        x.map_components(|i, value| {
            let res = resolution.component(i);
            if res == 0.0 {
                return value;
            }
            let steps = value / res;
            // resolution finer than the value can express
            let quantized = if steps.is_finite() {
                res * steps.round()
            } else {
                value
            };
            match bounds {
                Some((min, max)) => quantized.clamp(min.component(i), max.component(i)),
                None => quantized,
            }
        })
    }

    fn kind(&self) -> TransformKind {
        TransformKind::Digitize
    }
}
