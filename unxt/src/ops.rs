//! Quantity arithmetic
//!
//! Element-wise work is delegated to the array library. Addition and
//! subtraction express the right operand in the left operand's unit;
//! multiplication and division compose units.

use crate::quantity::{AbstractQuantity, Quantity, UncheckedQuantity};
use unxt_core::{Array, UnxtError, Value};

fn binary<Q: AbstractQuantity>(
    a: &Q,
    b: &Q,
    op: impl Fn(&Array, &Array) -> Result<Array, UnxtError>,
) -> Result<Array, UnxtError> {
    op(&a.value().materialize()?, &b.value().materialize()?)
}

pub fn add<Q: AbstractQuantity>(a: &Q, b: &Q) -> Result<Q, UnxtError> {
    let b = b.uconvert(a.unit())?;
    Q::from_parts(Value::Array(binary(a, &b, Array::add)?), a.unit().clone())
}

pub fn sub<Q: AbstractQuantity>(a: &Q, b: &Q) -> Result<Q, UnxtError> {
    let b = b.uconvert(a.unit())?;
    Q::from_parts(Value::Array(binary(a, &b, Array::sub)?), a.unit().clone())
}

pub fn mul<Q: AbstractQuantity>(a: &Q, b: &Q) -> Result<Q, UnxtError> {
    Q::from_parts(Value::Array(binary(a, b, Array::mul)?), a.unit().multiply(b.unit()))
}

pub fn div<Q: AbstractQuantity>(a: &Q, b: &Q) -> Result<Q, UnxtError> {
    Q::from_parts(Value::Array(binary(a, b, Array::div)?), a.unit().divide(b.unit()))
}

macro_rules! arithmetic_methods {
    ($($t:ty),*) => {
        $(
            impl $t {
                pub fn add(&self, other: &Self) -> Result<Self, UnxtError> {
                    add(self, other)
                }

                pub fn sub(&self, other: &Self) -> Result<Self, UnxtError> {
                    sub(self, other)
                }

                pub fn mul(&self, other: &Self) -> Result<Self, UnxtError> {
                    mul(self, other)
                }

                pub fn div(&self, other: &Self) -> Result<Self, UnxtError> {
                    div(self, other)
                }
            }
        )*
    };
}

arithmetic_methods!(Quantity, UncheckedQuantity);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use unxt_units::Dimension;

    fn values(q: &impl AbstractQuantity) -> Vec<f64> {
        q.value().as_array().unwrap().to_vec()
    }

    #[test]
    fn test_add_converts_rhs() {
        let a = Quantity::new(vec![1.0, 2.0], "km").unwrap();
        let b = Quantity::new(500.0, "m").unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.unit().symbol(), "km");
        assert_eq!(values(&sum), vec![1.5, 2.5]);
    }

    #[test]
    fn test_sub_dimension_mismatch() {
        let a = Quantity::new(1.0, "km").unwrap();
        let b = Quantity::new(1.0, "s").unwrap();
        assert!(matches!(a.sub(&b), Err(UnxtError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_mul_div_compose_units() {
        let d = Quantity::new(10.0, "kpc").unwrap();
        let t = Quantity::new(2.0, "Myr").unwrap();
        let v = d.div(&t).unwrap();
        assert_eq!(v.dimension(), Dimension::SPEED);
        assert_eq!(v.unit().symbol(), "kpc / Myr");
        assert_relative_eq!(values(&v)[0], 5.0);

        let back = v.mul(&t).unwrap();
        assert_eq!(back.unit().symbol(), "kpc");
    }

    #[test]
    fn test_integer_addition_keeps_dtype() {
        let a = UncheckedQuantity::new(vec![1i64, 2], "m").unwrap();
        let sum = a.add(&a).unwrap();
        assert_eq!(sum.value().as_array().unwrap().dtype(), unxt_core::DType::Int);
    }

    #[test]
    fn test_broadcast_failure() {
        let a = Quantity::new(vec![1.0, 2.0], "m").unwrap();
        let b = Quantity::new(vec![1.0, 2.0, 3.0], "m").unwrap();
        assert!(matches!(a.add(&b), Err(UnxtError::Shape(_))));
    }
}
