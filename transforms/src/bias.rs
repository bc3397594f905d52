use crate::{SensorTransform, TransformKind, signal::Signal};

/// Constant offset, y = x + bias.
/// Quaternion biases are composed as a rotation, y = normalize(x * bias).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiasTransform<S: Signal> {
    bias: S,
}

impl<S: Signal> BiasTransform<S> {
    pub fn new(bias: S) -> Self {
        Self { bias }
    }

    pub fn bias(&self) -> S {
        self.bias
    }

    pub fn set_bias(&mut self, bias: S) {
        self.bias = bias;
    }
}

impl<S: Signal> SensorTransform<S> for BiasTransform<S> {
    fn evaluate(&mut self, x: &S) -> S {
        x.compose(&self.bias)
    }

    fn kind(&self) -> TransformKind {
        TransformKind::Bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn test_bias_single_value() {
        let mut bias = BiasTransform::new(5.0);
        assert_eq!(bias.evaluate(&1.0), 6.0);
    }

    #[test]
    fn test_bias_vector() {
        let b = Vector3::new(5.0, 4.0, 3.0);
        let x = Vector3::new(2.0, 4.0, 8.0);
        let mut bias = BiasTransform::new(b);
        assert_eq!(bias.evaluate(&x), x + b);
    }

    #[test]
    fn test_bias_is_linear() {
        let mut bias = BiasTransform::new(Vector3::new(0.3, -1.2, 7.0));
        let pairs = [
            (Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 0.5, 9.0)),
            (Vector3::new(0.0, 0.0, 0.0), Vector3::new(1e3, -1e3, 0.25)),
        ];
        for (a, b) in pairs {
            let difference = bias.evaluate(&a) - bias.evaluate(&b);
            let expected = a - b;
            for axis in 0..3 {
                assert_abs_diff_eq!(difference[axis], expected[axis], epsilon = 1e-9);
            }
        }

        let mut scalar = BiasTransform::new(-2.5);
        assert_abs_diff_eq!(
            scalar.evaluate(&10.0) - scalar.evaluate(&4.0),
            6.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bias_quaternion_is_rotation() {
        let b = UnitQuaternion::from_euler_angles(0.0, 0.0, 0.1);
        let x = UnitQuaternion::from_euler_angles(0.0, 0.0, 0.2);
        let mut bias = BiasTransform::new(b);
        let y = bias.evaluate(&x);

        assert_abs_diff_eq!(y.norm(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y.angle(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_bias_quaternion_unit_norm() {
        let mut bias = BiasTransform::new(UnitQuaternion::from_euler_angles(1.3, -0.7, 2.9));
        for i in 0..100 {
            let t = i as f64 * 0.1;
            let x = UnitQuaternion::from_euler_angles(-t, 0.3 * t, 2.0 * t);
            assert_abs_diff_eq!(bias.evaluate(&x).norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bias_clone() {
        let bias = BiasTransform::new(5.0);
        let mut clone = bias;
        assert_eq!(bias, clone);

        clone.set_bias(1.0);
        assert_eq!(bias.bias(), 5.0);
        assert_ne!(bias, clone);
    }
}
