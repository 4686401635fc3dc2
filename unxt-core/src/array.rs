//! Canonical array representation
//!
//! Every accepted numeric input is normalised into an [`Array`]: an
//! n-dimensional `ndarray` buffer of `f64` together with the dtype the input
//! promoted to. Integer and boolean data is stored exactly (|n| <= 2^53).
//! Element-wise math is delegated to `ndarray`; this module only shapes the
//! data and keeps the dtype bookkeeping honest.

use crate::UnxtError;
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element kind of an [`Array`], ordered by promotion (bool < int < float)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int,
    Float,
}

impl DType {
    /// Common dtype of two operands
    pub fn promote(self, other: DType) -> DType {
        self.max(other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int => "int64",
            DType::Float => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Largest integer magnitude stored exactly in an `f64`
pub const MAX_EXACT_INT: i64 = 1 << 53;

/// Plain scalar element accepted by [`asarray`]
pub trait Scalar: Copy {
    const DTYPE: DType;
    /// Exact `f64` value, or an error if the element cannot be stored
    /// without rounding
    fn to_f64(self) -> Result<f64, UnxtError>;
}

impl Scalar for f64 {
    const DTYPE: DType = DType::Float;
    fn to_f64(self) -> Result<f64, UnxtError> {
        Ok(self)
    }
}

impl Scalar for f32 {
    const DTYPE: DType = DType::Float;
    fn to_f64(self) -> Result<f64, UnxtError> {
        Ok(self as f64)
    }
}

impl Scalar for i64 {
    const DTYPE: DType = DType::Int;
    fn to_f64(self) -> Result<f64, UnxtError> {
        if self.unsigned_abs() > MAX_EXACT_INT as u64 {
            return Err(UnxtError::Type {
                type_name: "i64".to_string(),
                message: format!("integer {} cannot be stored exactly (limit is 2^53)", self),
            });
        }
        Ok(self as f64)
    }
}

impl Scalar for i32 {
    const DTYPE: DType = DType::Int;
    fn to_f64(self) -> Result<f64, UnxtError> {
        Ok(self as f64)
    }
}

impl Scalar for u32 {
    const DTYPE: DType = DType::Int;
    fn to_f64(self) -> Result<f64, UnxtError> {
        Ok(self as f64)
    }
}

impl Scalar for bool {
    const DTYPE: DType = DType::Bool;
    fn to_f64(self) -> Result<f64, UnxtError> {
        Ok(if self { 1.0 } else { 0.0 })
    }
}

/// N-dimensional numeric array with a dtype tag
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    data: ArrayD<f64>,
    dtype: DType,
}

impl Array {
    // ========== Construction ==========

    /// Wrap `data` with an explicit dtype. Callers tagging `Int` or `Bool`
    /// are responsible for the data being integral.
    pub fn new(data: ArrayD<f64>, dtype: DType) -> Self {
        Array { data, dtype }
    }

    /// Float array from raw `ndarray` data
    pub fn from_f64(data: ArrayD<f64>) -> Self {
        Array { data, dtype: DType::Float }
    }

    /// Zero-dimensional array
    pub fn scalar<T: Scalar>(value: T) -> Result<Self, UnxtError> {
        Ok(Array {
            data: ndarray::arr0(value.to_f64()?).into_dyn(),
            dtype: T::DTYPE,
        })
    }

    /// Build from a flat row-major buffer and a shape
    pub fn from_shape_vec(shape: &[usize], values: Vec<f64>, dtype: DType) -> Result<Self, UnxtError> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)
            .map_err(|e| UnxtError::Shape(e.to_string()))?;
        Ok(Array { data, dtype })
    }

    // ========== Accessors ==========

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements in logical (row-major) order
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// The single element of a size-1 array
    pub fn item(&self) -> Option<f64> {
        if self.data.len() == 1 {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    // ========== Element-wise math ==========

    /// Multiply every element by `factor`; the result is always float.
    pub fn scale(&self, factor: f64) -> Array {
        Array::from_f64(self.data.mapv(|x| x * factor))
    }

    pub fn add(&self, other: &Array) -> Result<Array, UnxtError> {
        self.zip_with(other, self.dtype.promote(other.dtype).max(DType::Int), |a, b| a + b)
    }

    pub fn sub(&self, other: &Array) -> Result<Array, UnxtError> {
        self.zip_with(other, self.dtype.promote(other.dtype).max(DType::Int), |a, b| a - b)
    }

    pub fn mul(&self, other: &Array) -> Result<Array, UnxtError> {
        self.zip_with(other, self.dtype.promote(other.dtype).max(DType::Int), |a, b| a * b)
    }

    /// True division; always float
    pub fn div(&self, other: &Array) -> Result<Array, UnxtError> {
        self.zip_with(other, DType::Float, |a, b| a / b)
    }

    /// Element-wise closeness with a relative tolerance
    pub fn approx_eq(&self, other: &Array, rel_tol: f64) -> bool {
        self.shape() == other.shape()
            && self.data.iter().zip(other.data.iter()).all(|(a, b)| {
                a == b || (a - b).abs() <= rel_tol * a.abs().max(b.abs())
            })
    }

    fn zip_with(&self, other: &Array, dtype: DType, op: impl Fn(f64, f64) -> f64) -> Result<Array, UnxtError> {
        let shape = broadcast_shape(self.shape(), other.shape()).ok_or_else(|| {
            UnxtError::Shape(format!(
                "operands could not be broadcast together with shapes {:?} {:?}",
                self.shape(),
                other.shape()
            ))
        })?;
        let lhs = self.data.broadcast(IxDyn(&shape));
        let rhs = other.data.broadcast(IxDyn(&shape));
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => {
                let data = Zip::from(&lhs).and(&rhs).map_collect(|&a, &b| op(a, b));
                Ok(Array::new(data, dtype))
            }
            _ => Err(UnxtError::Shape(format!("cannot broadcast to {:?}", shape))),
        }
    }
}

/// NumPy broadcasting: align trailing axes; sizes must match or be 1.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut shape = vec![0; ndim];
    for i in 0..ndim {
        let da = if i < ndim - a.len() { 1 } else { a[i - (ndim - a.len())] };
        let db = if i < ndim - b.len() { 1 } else { b[i - (ndim - b.len())] };
        shape[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(shape)
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array(")?;
        let values = self.to_vec();
        write_nested(f, self.shape(), &values, self.dtype)?;
        write!(f, ", dtype={})", self.dtype)
    }
}

fn write_nested(f: &mut fmt::Formatter<'_>, shape: &[usize], values: &[f64], dtype: DType) -> fmt::Result {
    match shape.split_first() {
        None => match values.first() {
            Some(&x) => write_element(f, x, dtype),
            None => write!(f, "[]"),
        },
        Some((&n, rest)) => {
            let stride: usize = rest.iter().product();
            write!(f, "[")?;
            for i in 0..n {
                if i > 0 {
                    write!(f, ", ")?;
                }
                let chunk = &values[i * stride..(i + 1) * stride];
                write_nested(f, rest, chunk, dtype)?;
            }
            write!(f, "]")
        }
    }
}

fn write_element(f: &mut fmt::Formatter<'_>, x: f64, dtype: DType) -> fmt::Result {
    match dtype {
        DType::Bool => write!(f, "{}", x != 0.0),
        DType::Int => write!(f, "{}", x as i64),
        DType::Float => write!(f, "{:?}", x),
    }
}

// ========== asarray ==========

/// Coercion of plain Rust numeric data into an [`Array`]
pub trait AsArray {
    fn as_array(&self) -> Result<Array, UnxtError>;
}

/// Coerce an array-like into the canonical representation, inferring shape
/// and dtype by the usual promotion rules.
pub fn asarray<T: AsArray + ?Sized>(obj: &T) -> Result<Array, UnxtError> {
    obj.as_array()
}

impl<T: Scalar> AsArray for T {
    fn as_array(&self) -> Result<Array, UnxtError> {
        Array::scalar(*self)
    }
}

impl<T: Scalar> AsArray for [T] {
    fn as_array(&self) -> Result<Array, UnxtError> {
        let values = self.iter().map(|x| x.to_f64()).collect::<Result<Vec<f64>, _>>()?;
        Array::from_shape_vec(&[values.len()], values, T::DTYPE)
    }
}

impl<T: Scalar> AsArray for Vec<T> {
    fn as_array(&self) -> Result<Array, UnxtError> {
        AsArray::as_array(self.as_slice())
    }
}

impl<T: Scalar, const N: usize> AsArray for [T; N] {
    fn as_array(&self) -> Result<Array, UnxtError> {
        AsArray::as_array(self.as_slice())
    }
}

impl<T: Scalar> AsArray for Vec<Vec<T>> {
    fn as_array(&self) -> Result<Array, UnxtError> {
        let cols = self.first().map_or(0, |row| row.len());
        if self.iter().any(|row| row.len() != cols) {
            return Err(UnxtError::Shape(
                "setting an array element with a sequence: rows have different lengths".to_string(),
            ));
        }
        let values = self.iter().flatten().map(|x| x.to_f64()).collect::<Result<Vec<f64>, _>>()?;
        Array::from_shape_vec(&[self.len(), cols], values, T::DTYPE)
    }
}

impl<S, D> AsArray for ArrayBase<S, D>
where
    S: Data,
    S::Elem: Scalar,
    D: Dimension,
{
    fn as_array(&self) -> Result<Array, UnxtError> {
        let values = self.iter().map(|x| x.to_f64()).collect::<Result<Vec<f64>, _>>()?;
        Array::from_shape_vec(self.shape(), values, <S::Elem as Scalar>::DTYPE)
    }
}

impl AsArray for Array {
    fn as_array(&self) -> Result<Array, UnxtError> {
        Ok(self.clone())
    }
}
