//! Runtime object model for open dispatch
//!
//! Dispatch tables key their handlers by [`TypeKey`]. A runtime value
//! describes itself through its [`Lineage`]: the concrete type at rank 0,
//! then progressively more abstract capabilities (`ArrayLike`,
//! `AbstractQuantity`, ...) at higher ranks. Lookups walk the lineage from
//! the most specific rank outwards.

use crate::{Array, UnxtError};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Plain numbers, sequences and arrays the array library can coerce
pub const ARRAY_LIKE: TypeKey = TypeKey::Abstract("ArrayLike");

/// Foreign array-convertible values produced by other array layers
pub const ARRAY_VALUE: TypeKey = TypeKey::Abstract("ArrayValue");

/// Type-erasure helper implemented for every `'static + Send + Sync` type
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Key a dispatch handler is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// Exactly one Rust type
    Concrete(TypeId),
    /// A named capability shared by many types
    Abstract(&'static str),
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey::Concrete(TypeId::of::<T>())
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeKey::Abstract(_))
    }
}

/// Ranked type keys of a runtime value, most specific first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    entries: Vec<(usize, TypeKey)>,
}

impl Lineage {
    /// Lineage rooted at the concrete type (rank 0)
    pub fn new(concrete: TypeKey) -> Self {
        Lineage { entries: vec![(0, concrete)] }
    }

    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>())
    }

    /// Append `key` one rank above the last entry
    pub fn then(mut self, key: TypeKey) -> Self {
        let rank = self.entries.last().map_or(0, |(r, _)| r + 1);
        self.entries.push((rank, key));
        self
    }

    /// Append `key` at the same rank as the last entry
    pub fn also(mut self, key: TypeKey) -> Self {
        let rank = self.entries.last().map_or(0, |(r, _)| *r);
        self.entries.push((rank, key));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, TypeKey)> + '_ {
        self.entries.iter().copied()
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.entries.iter().any(|(_, k)| *k == key)
    }

    pub fn rank_of(&self, key: TypeKey) -> Option<usize> {
        self.entries.iter().find(|(_, k)| *k == key).map(|(r, _)| *r)
    }
}

/// A value that can flow through the dispatch tables
pub trait Dispatchable: AsAny + fmt::Debug {
    /// Concrete type name used in error messages
    fn type_name(&self) -> &'static str;

    fn lineage(&self) -> Lineage {
        Lineage::new(TypeKey::Concrete(self.as_any().type_id()))
    }

    /// View as a foreign array value, if this type is one
    fn as_array_value(&self) -> Option<&dyn ArrayValue> {
        None
    }
}

/// Foreign array-convertible value (lazy, structured or device arrays from
/// another layer). Such values may be stored in a quantity unchanged and are
/// materialised only when numbers are needed.
pub trait ArrayValue: Dispatchable {
    fn shape(&self) -> Vec<usize>;
    fn materialize(&self) -> Array;
}

/// Implement [`Dispatchable`] for a foreign [`ArrayValue`] type.
///
/// ```ignore
/// #[derive(Debug)]
/// struct LazyZeros(usize);
/// impl ArrayValue for LazyZeros { ... }
/// unxt_core::array_value!(LazyZeros);
/// ```
#[macro_export]
macro_rules! array_value {
    ($t:ty) => {
        impl $crate::Dispatchable for $t {
            fn type_name(&self) -> &'static str {
                stringify!($t)
            }

            fn lineage(&self) -> $crate::Lineage {
                $crate::Lineage::of::<$t>().then($crate::ARRAY_VALUE)
            }

            fn as_array_value(&self) -> Option<&dyn $crate::ArrayValue> {
                Some(self)
            }
        }
    };
}

macro_rules! array_like {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl Dispatchable for $t {
                fn type_name(&self) -> &'static str {
                    $name
                }

                fn lineage(&self) -> Lineage {
                    Lineage::of::<$t>().then(ARRAY_LIKE)
                }
            }
        )*
    };
}

array_like!(
    f64 => "f64",
    f32 => "f32",
    i64 => "i64",
    i32 => "i32",
    u32 => "u32",
    bool => "bool",
    Vec<f64> => "Vec<f64>",
    Vec<f32> => "Vec<f32>",
    Vec<i64> => "Vec<i64>",
    Vec<i32> => "Vec<i32>",
    Vec<bool> => "Vec<bool>",
    Vec<Vec<f64>> => "Vec<Vec<f64>>",
    Vec<Vec<i64>> => "Vec<Vec<i64>>",
    ndarray::ArrayD<f64> => "ArrayD<f64>",
    ndarray::ArrayD<i64> => "ArrayD<i64>",
    ndarray::Array1<f64> => "Array1<f64>",
    ndarray::Array2<f64> => "Array2<f64>",
    Array => "Array",
);

/// Shared, type-erased runtime value
#[derive(Clone)]
pub struct Object(Arc<dyn Dispatchable>);

impl Object {
    pub fn new<T: Dispatchable>(value: T) -> Self {
        Object(Arc::new(value))
    }

    /// Wrap an existing allocation without copying it
    pub fn from_arc<T: Dispatchable>(value: Arc<T>) -> Self {
        Object(value)
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn lineage(&self) -> Lineage {
        self.0.lineage()
    }

    /// `TypeId` of the wrapped value (not of the `Arc`)
    pub fn concrete_type_id(&self) -> TypeId {
        <dyn Dispatchable as AsAny>::as_any(&*self.0).type_id()
    }

    pub fn is<T: Dispatchable>(&self) -> bool {
        self.concrete_type_id() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Dispatchable>(&self) -> Option<&T> {
        <dyn Dispatchable as AsAny>::as_any(&*self.0).downcast_ref::<T>()
    }

    /// Typed handle to the same allocation
    pub fn downcast_arc<T: Dispatchable>(&self) -> Option<Arc<T>> {
        <dyn Dispatchable as AsAny>::into_any_arc(Arc::clone(&self.0))
            .downcast::<T>()
            .ok()
    }

    /// Like [`Object::downcast_ref`], failing with an internal error
    pub fn try_downcast_ref<T: Dispatchable>(&self) -> Result<&T, UnxtError> {
        self.downcast_ref::<T>().ok_or_else(|| {
            UnxtError::Internal(format!(
                "handler expected '{}', got '{}'",
                std::any::type_name::<T>(),
                self.type_name()
            ))
        })
    }

    pub fn as_array_value(&self) -> Option<&dyn ArrayValue> {
        self.0.as_array_value()
    }

    pub fn inner(&self) -> &dyn Dispatchable {
        &*self.0
    }

    /// Whether both handles point at the same allocation
    pub fn ptr_eq(&self, other: &Object) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Whether `other` is a typed handle to this allocation
    pub fn is_same<T: Dispatchable>(&self, other: &Arc<T>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(other))
    }
}

impl<T: Dispatchable> From<T> for Object {
    fn from(value: T) -> Self {
        Object::new(value)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
