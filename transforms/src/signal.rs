use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

use crate::TransformErrors;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Scalar,
    Vector,
    Quaternion,
}

/// Per component storage for transform parameters (noise mean/stddev, digitizer range).
pub trait Components: Copy + Debug + PartialEq + Serialize + DeserializeOwned {
    const COUNT: usize;

    fn from_fn<F: FnMut(usize) -> f64>(f: F) -> Self;

    fn component(&self, index: usize) -> f64;

    fn splat(value: f64) -> Self {
        Self::from_fn(|_| value)
    }

    fn map<F: FnMut(usize, f64) -> f64>(&self, mut f: F) -> Self {
        Self::from_fn(|i| f(i, self.component(i)))
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..Self::COUNT).map(|i| self.component(i))
    }

    fn from_slice(values: &[f64]) -> Result<Self, TransformErrors> {
        if values.len() != Self::COUNT {
            return Err(TransformErrors::ComponentMismatch {
                expected: Self::COUNT,
                got: values.len(),
            });
        }
        Ok(Self::from_fn(|i| values[i]))
    }
}

impl Components for f64 {
    const COUNT: usize = 1;

    fn from_fn<F: FnMut(usize) -> f64>(mut f: F) -> Self {
        f(0)
    }

    fn component(&self, _index: usize) -> f64 {
        *self
    }
}

impl Components for Vector3<f64> {
    const COUNT: usize = 3;

    fn from_fn<F: FnMut(usize) -> f64>(mut f: F) -> Self {
        Vector3::new(f(0), f(1), f(2))
    }

    fn component(&self, index: usize) -> f64 {
        self[index]
    }
}

/// A value a sensor can measure.
/// Each kind carries its own rule for how noise, bias and quantization
/// are applied, so transforms never branch on the signal type themselves.
pub trait Signal:
    Copy + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Parameter storage for the components noise and digitization act on.
    /// Quaternions are parameterized by their vector part.
    type Components: Components;

    const KIND: SignalKind;

    /// Output of a sensor that has not released a measurement yet
    fn initial() -> Self;

    /// Applies one noise draw per component
    fn perturb(&self, noise: &Self::Components) -> Self;

    /// Applies a constant bias of the same kind
    fn compose(&self, bias: &Self) -> Self;

    /// Maps each quantizable component, rebuilding a valid signal
    fn map_components<F: FnMut(usize, f64) -> f64>(&self, f: F) -> Self;

    /// Moves the signal by a small step `h`, used for finite differencing
    fn step_forward(&self, h: f64) -> Self;

    /// Finite difference quotient between two evaluations one step `h` apart
    fn difference(after: &Self, before: &Self, h: f64) -> Self;

    /// Renders the value as a single text field, components separated by spaces
    fn to_field(&self) -> String;
}

impl Signal for f64 {
    type Components = f64;
    const KIND: SignalKind = SignalKind::Scalar;

    fn initial() -> Self {
        0.0
    }

    fn perturb(&self, noise: &f64) -> Self {
        self + noise
    }

    fn compose(&self, bias: &Self) -> Self {
        self + bias
    }

    fn map_components<F: FnMut(usize, f64) -> f64>(&self, mut f: F) -> Self {
        f(0, *self)
    }

    fn step_forward(&self, h: f64) -> Self {
        self + h
    }

    fn difference(after: &Self, before: &Self, h: f64) -> Self {
        (after - before) / h
    }

    fn to_field(&self) -> String {
        self.to_string()
    }
}

impl Signal for Vector3<f64> {
    type Components = Vector3<f64>;
    const KIND: SignalKind = SignalKind::Vector;

    fn initial() -> Self {
        Vector3::zeros()
    }

    fn perturb(&self, noise: &Vector3<f64>) -> Self {
        self + noise
    }

    fn compose(&self, bias: &Self) -> Self {
        self + bias
    }

    fn map_components<F: FnMut(usize, f64) -> f64>(&self, mut f: F) -> Self {
        Vector3::new(f(0, self.x), f(1, self.y), f(2, self.z))
    }

    fn step_forward(&self, h: f64) -> Self {
        self.add_scalar(h)
    }

    fn difference(after: &Self, before: &Self, h: f64) -> Self {
        (after - before) / h
    }

    fn to_field(&self) -> String {
        format!("{} {} {}", self.x, self.y, self.z)
    }
}

impl Signal for UnitQuaternion<f64> {
    type Components = Vector3<f64>;
    const KIND: SignalKind = SignalKind::Quaternion;

    fn initial() -> Self {
        UnitQuaternion::identity()
    }

    /// Noise is a small rotation (identity scalar part, noise vector part)
    /// composed on the right, never an additive offset.
    fn perturb(&self, noise: &Vector3<f64>) -> Self {
        let rotation = Quaternion::new(1.0, noise.x, noise.y, noise.z);
        UnitQuaternion::new_normalize(*self.quaternion() * rotation)
    }

    fn compose(&self, bias: &Self) -> Self {
        UnitQuaternion::new_normalize(*self.quaternion() * *bias.quaternion())
    }

    /// Maps the vector part and keeps the scalar part.
    /// If the rebuilt quaternion has no magnitude left the input is returned.
    fn map_components<F: FnMut(usize, f64) -> f64>(&self, mut f: F) -> Self {
        let v = self.imag();
        let mapped = Vector3::new(f(0, v.x), f(1, v.y), f(2, v.z));
        let q = Quaternion::from_parts(self.scalar(), mapped);
        UnitQuaternion::try_new(q, f64::EPSILON).unwrap_or(*self)
    }

    fn step_forward(&self, h: f64) -> Self {
        UnitQuaternion::new_normalize(*self.quaternion() * Quaternion::new(1.0, h, h, h))
    }

    fn difference(after: &Self, before: &Self, h: f64) -> Self {
        let dq = (*after.quaternion() - *before.quaternion()) * (1.0 / h);
        UnitQuaternion::try_new(dq, f64::EPSILON).unwrap_or_else(UnitQuaternion::identity)
    }

    fn to_field(&self) -> String {
        let v = self.imag();
        format!("{} {} {} {}", self.scalar(), v.x, v.y, v.z)
    }
}
