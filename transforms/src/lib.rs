pub mod bias;
pub mod builder;
pub mod chain;
pub mod digitize;
pub mod noise;
pub mod signal;

use crate::{
    bias::BiasTransform, digitize::DigitizeTransform, noise::NoiseTransform, signal::Signal,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod prelude {
    pub use crate::bias::*;
    pub use crate::builder::*;
    pub use crate::chain::*;
    pub use crate::digitize::*;
    pub use crate::noise::*;
    pub use crate::signal::*;
    pub use crate::{SensorTransform, TransformErrors, TransformKind, Transforms};
}

/// Step used by the default finite difference derivatives
pub const FINITE_DIFFERENCE_STEP: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformErrors {
    #[error("{0}")]
    Noise(#[from] ::noise::NoiseErrors),
    #[error("bit depth must be finite and non-negative, got {0}")]
    InvalidBits(f64),
    #[error("range must be finite and non-negative, got {0}")]
    InvalidRange(f64),
    #[error("bounds must be finite with min <= max, got [{min}, {max}]")]
    InvalidBounds { min: f64, max: f64 },
    #[error("expected {expected} components, got {got}")]
    ComponentMismatch { expected: usize, got: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    Custom,
    Noise,
    Bias,
    Digitize,
}

/// A signal degradation function applied to a raw measurement.
pub trait SensorTransform<S: Signal> {
    fn evaluate(&mut self, x: &S) -> S;

    fn kind(&self) -> TransformKind {
        TransformKind::Custom
    }

    /// Forward difference dy/dx. Override when the analytic derivative is known.
    fn first_derivative(&mut self, x: &S) -> S {
        let h = FINITE_DIFFERENCE_STEP;
        let after = self.evaluate(&x.step_forward(h));
        let before = self.evaluate(x);
        S::difference(&after, &before, h)
    }

    /// Forward difference of the first derivative
    fn second_derivative(&mut self, x: &S) -> S {
        let h = FINITE_DIFFERENCE_STEP;
        let after = self.first_derivative(&x.step_forward(h));
        let before = self.first_derivative(x);
        S::difference(&after, &before, h)
    }

    /// Derivative by order. Order 0 and any order above 2 evaluate the function.
    fn derivative(&mut self, x: &S, order: usize) -> S {
        match order {
            1 => self.first_derivative(x),
            2 => self.second_derivative(x),
            _ => self.evaluate(x),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transforms<S: Signal> {
    Noise(NoiseTransform<S>),
    Bias(BiasTransform<S>),
    Digitize(DigitizeTransform<S>),
}

impl<S: Signal> Transforms<S> {
    pub fn as_noise(&self) -> Option<&NoiseTransform<S>> {
        match self {
            Transforms::Noise(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn as_noise_mut(&mut self) -> Option<&mut NoiseTransform<S>> {
        match self {
            Transforms::Noise(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn as_bias(&self) -> Option<&BiasTransform<S>> {
        match self {
            Transforms::Bias(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn as_bias_mut(&mut self) -> Option<&mut BiasTransform<S>> {
        match self {
            Transforms::Bias(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn as_digitize(&self) -> Option<&DigitizeTransform<S>> {
        match self {
            Transforms::Digitize(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn as_digitize_mut(&mut self) -> Option<&mut DigitizeTransform<S>> {
        match self {
            Transforms::Digitize(transform) => Some(transform),
            _ => None,
        }
    }
}

impl<S: Signal> SensorTransform<S> for Transforms<S> {
    fn evaluate(&mut self, x: &S) -> S {
        match self {
            Transforms::Noise(transform) => transform.evaluate(x),
            Transforms::Bias(transform) => transform.evaluate(x),
            Transforms::Digitize(transform) => transform.evaluate(x),
        }
    }

    fn kind(&self) -> TransformKind {
        match self {
            Transforms::Noise(transform) => transform.kind(),
            Transforms::Bias(transform) => transform.kind(),
            Transforms::Digitize(transform) => transform.kind(),
        }
    }

    fn first_derivative(&mut self, x: &S) -> S {
        match self {
            Transforms::Noise(transform) => transform.first_derivative(x),
            Transforms::Bias(transform) => transform.first_derivative(x),
            Transforms::Digitize(transform) => transform.first_derivative(x),
        }
    }

    fn second_derivative(&mut self, x: &S) -> S {
        match self {
            Transforms::Noise(transform) => transform.second_derivative(x),
            Transforms::Bias(transform) => transform.second_derivative(x),
            Transforms::Digitize(transform) => transform.second_derivative(x),
        }
    }
}

impl<S: Signal> From<NoiseTransform<S>> for Transforms<S> {
    fn from(transform: NoiseTransform<S>) -> Self {
        Transforms::Noise(transform)
    }
}

impl<S: Signal> From<BiasTransform<S>> for Transforms<S> {
    fn from(transform: BiasTransform<S>) -> Self {
        Transforms::Bias(transform)
    }
}

impl<S: Signal> From<DigitizeTransform<S>> for Transforms<S> {
    fn from(transform: DigitizeTransform<S>) -> Self {
        Transforms::Digitize(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    /// y = gain * x + offset, with no derivative overrides
    struct Affine {
        gain: f64,
        offset: f64,
    }

    impl SensorTransform<f64> for Affine {
        fn evaluate(&mut self, x: &f64) -> f64 {
            self.gain * x + self.offset
        }
    }

    struct Square;

    impl SensorTransform<Vector3<f64>> for Square {
        fn evaluate(&mut self, x: &Vector3<f64>) -> Vector3<f64> {
            x.component_mul(x)
        }
    }

    #[test]
    fn test_custom_kind_is_default() {
        let affine = Affine { gain: 2.0, offset: 1.0 };
        assert_eq!(affine.kind(), TransformKind::Custom);
    }

    #[test]
    fn test_default_first_derivative_scalar() {
        let mut affine = Affine { gain: 2.5, offset: -4.0 };
        assert_abs_diff_eq!(affine.first_derivative(&3.0), 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_default_first_derivative_vector() {
        let mut square = Square;
        let x = Vector3::new(1.0, -2.0, 0.5);
        let dy = square.first_derivative(&x);
        assert_abs_diff_eq!(dy.x, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(dy.y, -4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(dy.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_default_second_derivative_of_affine_is_zero() {
        // doubling is exact in floating point, so the nested difference is too
        let mut affine = Affine { gain: 2.0, offset: 0.0 };
        assert_abs_diff_eq!(affine.first_derivative(&0.0), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(affine.second_derivative(&0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_by_order() {
        let mut affine = Affine { gain: 2.0, offset: 0.0 };
        assert_eq!(affine.derivative(&1.5, 0), 3.0);
        assert_abs_diff_eq!(affine.derivative(&0.0, 1), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(affine.derivative(&0.0, 2), 0.0, epsilon = 1e-12);
        assert_eq!(affine.derivative(&1.5, 5), affine.evaluate(&1.5));

        let mut bias = Transforms::from(BiasTransform::new(0.5));
        assert_eq!(bias.derivative(&1.0, 0), 1.5);
        assert_abs_diff_eq!(bias.derivative(&1.0, 1), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quaternion_derivative_is_unit() {
        let mut bias = Transforms::from(BiasTransform::new(UnitQuaternion::from_euler_angles(
            0.1, 0.2, 0.3,
        )));
        let x = UnitQuaternion::from_euler_angles(-0.4, 0.0, 0.9);
        let dy = bias.first_derivative(&x);
        assert_abs_diff_eq!(dy.norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_enum_dispatch_kind() {
        let noise: Transforms<f64> = NoiseTransform::<f64>::disabled().into();
        let bias: Transforms<f64> = BiasTransform::new(1.0).into();
        let digitize: Transforms<f64> = DigitizeTransform::<f64>::passthrough().into();
        assert_eq!(noise.kind(), TransformKind::Noise);
        assert_eq!(bias.kind(), TransformKind::Bias);
        assert_eq!(digitize.kind(), TransformKind::Digitize);
        assert!(noise.as_noise().is_some());
        assert!(noise.as_bias().is_none());
        assert!(bias.as_bias().is_some());
        assert!(digitize.as_digitize().is_some());
    }

    #[test]
    fn test_enum_evaluate_matches_variant() {
        let mut bias: Transforms<Vector3<f64>> = BiasTransform::new(Vector3::repeat(0.5)).into();
        let y = bias.evaluate(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(y, Vector3::new(1.5, 2.5, 3.5));

        if let Some(bias) = bias.as_bias_mut() {
            bias.set_bias(Vector3::zeros());
        }
        let y = bias.evaluate(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(y, Vector3::new(1.0, 2.0, 3.0));
    }
}
