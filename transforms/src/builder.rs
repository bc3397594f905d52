use serde::{Deserialize, Serialize};

use crate::{
    TransformErrors, Transforms, bias::BiasTransform, digitize::DigitizeTransform,
    noise::NoiseTransform, signal::Signal,
};

/// Serializable description of a transform, validated by `build`.
///
/// In RON:
/// ```text
/// Noise(mean: 0.0, stddev: 0.1, seed: Some(42))
/// Bias(bias: 0.5)
/// Digitize(bits: 12.0, range: 50.0)
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum TransformBuilder<S: Signal> {
    Noise {
        mean: S::Components,
        stddev: S::Components,
        /// clock seeded when absent
        #[serde(default)]
        seed: Option<u64>,
    },
    Bias {
        bias: S,
    },
    Digitize {
        bits: f64,
        range: S::Components,
        /// replaces `range` with max - min when present
        #[serde(default)]
        bounds: Option<(S::Components, S::Components)>,
    },
}

impl<S: Signal> TransformBuilder<S> {
    pub fn build(&self) -> Result<Transforms<S>, TransformErrors> {
        let transform: Transforms<S> = match self {
            TransformBuilder::Noise { mean, stddev, seed } => match seed {
                Some(seed) => NoiseTransform::<S>::with_seed(*mean, *stddev, *seed)?.into(),
                None => NoiseTransform::<S>::new(*mean, *stddev)?.into(),
            },
            TransformBuilder::Bias { bias } => BiasTransform::<S>::new(*bias).into(),
            TransformBuilder::Digitize {
                bits,
                range,
                bounds,
            } => match bounds {
                Some((min, max)) => DigitizeTransform::<S>::bounded(*bits, *min, *max)?.into(),
                None => DigitizeTransform::<S>::new(*bits, *range)?.into(),
            },
        };
        Ok(transform)
    }
}

impl<S: Signal> From<&Transforms<S>> for TransformBuilder<S> {
    fn from(transform: &Transforms<S>) -> Self {
        match transform {
            Transforms::Noise(noise) => TransformBuilder::Noise {
                mean: noise.mean(),
                stddev: noise.stddev(),
                seed: Some(noise.seed()),
            },
            Transforms::Bias(bias) => TransformBuilder::Bias { bias: bias.bias() },
            Transforms::Digitize(digitize) => TransformBuilder::Digitize {
                bits: digitize.bits(),
                range: digitize.range(),
                bounds: digitize.bounds(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SensorTransform, TransformKind};
    use nalgebra::Vector3;

    #[test]
    fn test_builder_from_ron() {
        let text = "[
            Noise(mean: 0.0, stddev: 0.0, seed: Some(3)),
            Bias(bias: 1.0),
            Digitize(bits: 4.0, range: 50.0),
        ]";
        let builders: Vec<TransformBuilder<f64>> = ron::from_str(text).unwrap();
        let mut transforms = builders
            .iter()
            .map(TransformBuilder::build)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let kinds: Vec<_> = transforms.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![TransformKind::Noise, TransformKind::Bias, TransformKind::Digitize]
        );
        assert_eq!(transforms[0].as_noise().map(|n| n.seed()), Some(3));

        let y = transforms
            .iter_mut()
            .fold(3.45, |acc, transform| transform.evaluate(&acc));
        // 3.45 + 1 = 4.45 -> 3.125
        assert_eq!(y, 3.125);
    }

    #[test]
    fn test_builder_defaults_optional_fields() {
        let builder: TransformBuilder<f64> =
            ron::from_str("Digitize(bits: 8.0, range: 20.0)").unwrap();
        assert_eq!(
            builder,
            TransformBuilder::Digitize {
                bits: 8.0,
                range: 20.0,
                bounds: None
            }
        );

        let builder: TransformBuilder<f64> =
            ron::from_str("Digitize(bits: 8.0, range: 0.0, bounds: Some((-10.0, 10.0)))")
                .unwrap();
        let transform = builder.build().unwrap();
        let digitize = transform.as_digitize().unwrap();
        assert_eq!(digitize.range(), 20.0);
        assert_eq!(digitize.bounds(), Some((-10.0, 10.0)));
    }

    #[test]
    fn test_builder_rejects_invalid_parameters() {
        let builder = TransformBuilder::<f64>::Noise {
            mean: 0.0,
            stddev: -1.0,
            seed: None,
        };
        assert!(matches!(builder.build(), Err(TransformErrors::Noise(_))));

        let builder = TransformBuilder::<Vector3<f64>>::Digitize {
            bits: -2.0,
            range: Vector3::repeat(1.0),
            bounds: None,
        };
        assert_eq!(builder.build(), Err(TransformErrors::InvalidBits(-2.0)));
    }

    #[test]
    fn test_builder_from_transform_rebuilds_equal() {
        let transform: Transforms<Vector3<f64>> = DigitizeTransform::<Vector3<f64>>::new(
            10.0,
            Vector3::new(1.0, 2.0, 3.0),
        )
        .unwrap()
        .into();
        let builder = TransformBuilder::from(&transform);
        let text = ron::to_string(&builder).unwrap();
        let parsed: TransformBuilder<Vector3<f64>> = ron::from_str(&text).unwrap();
        assert_eq!(parsed.build().unwrap(), transform);
    }
}
