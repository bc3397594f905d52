use crate::{
    SensorTransform, TransformKind, Transforms, bias::BiasTransform, digitize::DigitizeTransform,
    noise::NoiseTransform, signal::Signal,
};

/// Transforms applied left to right to every measurement.
/// The order is fixed once the chain is built, only parameters change afterwards.
/// Mutable access goes through the typed accessors so a transform cannot be
/// swapped for another kind in place.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformChain<S: Signal> {
    transforms: Vec<Transforms<S>>,
}

impl<S: Signal> Default for TransformChain<S> {
    fn default() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }
}

impl<S: Signal> TransformChain<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, transform: impl Into<Transforms<S>>) -> Self {
        self.transforms.push(transform.into());
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transforms<S>> {
        self.transforms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transforms<S>> {
        self.transforms.iter()
    }

    pub fn kinds(&self) -> Vec<TransformKind> {
        self.transforms.iter().map(|t| t.kind()).collect()
    }

    /// First noise transform in the chain
    pub fn noise(&self) -> Option<&NoiseTransform<S>> {
        self.transforms.iter().find_map(Transforms::as_noise)
    }

    pub fn noise_mut(&mut self) -> Option<&mut NoiseTransform<S>> {
        self.transforms.iter_mut().find_map(Transforms::as_noise_mut)
    }

    /// First bias transform in the chain
    pub fn bias(&self) -> Option<&BiasTransform<S>> {
        self.transforms.iter().find_map(Transforms::as_bias)
    }

    pub fn bias_mut(&mut self) -> Option<&mut BiasTransform<S>> {
        self.transforms.iter_mut().find_map(Transforms::as_bias_mut)
    }

    /// First digitize transform in the chain
    pub fn digitize(&self) -> Option<&DigitizeTransform<S>> {
        self.transforms.iter().find_map(Transforms::as_digitize)
    }

    pub fn digitize_mut(&mut self) -> Option<&mut DigitizeTransform<S>> {
        self.transforms
            .iter_mut()
            .find_map(Transforms::as_digitize_mut)
    }
}

impl<S: Signal> From<Vec<Transforms<S>>> for TransformChain<S> {
    fn from(transforms: Vec<Transforms<S>>) -> Self {
        Self { transforms }
    }
}

impl<S: Signal> FromIterator<Transforms<S>> for TransformChain<S> {
    fn from_iter<I: IntoIterator<Item = Transforms<S>>>(iter: I) -> Self {
        Self {
            transforms: iter.into_iter().collect(),
        }
    }
}

impl<S: Signal> SensorTransform<S> for TransformChain<S> {
    fn evaluate(&mut self, x: &S) -> S {
        self.transforms
            .iter_mut()
            .fold(*x, |acc, transform| transform.evaluate(&acc))
    }
}
