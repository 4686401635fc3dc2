//! Conversion-method registry

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use unxt_core::{Dispatchable, Object, TypeKey, UnxtError};

/// Type-erased conversion returning a boxed `Arc<T>`
pub type ConversionFn = Arc<dyn Fn(&Object) -> Result<Box<dyn Any + Send + Sync>, UnxtError> + Send + Sync>;

/// Registry of `(source, target)` conversion methods
pub struct ConversionRegistry {
    entries: RwLock<HashMap<(TypeKey, TypeId), ConversionFn>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a conversion from any object whose lineage contains `source`
    pub fn register<T, F>(&self, source: TypeKey, f: F)
    where
        T: Dispatchable,
        F: Fn(&Object) -> Result<T, UnxtError> + Send + Sync + 'static,
    {
        tracing::debug!(?source, target = std::any::type_name::<T>(), "registering conversion");
        let erased: ConversionFn = Arc::new(move |obj: &Object| {
            let converted = f(obj)?;
            Ok(Box::new(Arc::new(converted)) as Box<dyn Any + Send + Sync>)
        });
        self.entries.write().insert((source, TypeId::of::<T>()), erased);
    }

    /// Register a conversion between two concrete types
    pub fn register_concrete<S, T, F>(&self, f: F)
    where
        S: Dispatchable,
        T: Dispatchable,
        F: Fn(&S) -> Result<T, UnxtError> + Send + Sync + 'static,
    {
        self.register::<T, _>(TypeKey::of::<S>(), move |obj: &Object| f(obj.try_downcast_ref::<S>()?));
    }

    /// Convert `obj` to `T`.
    ///
    /// An object that already is a `T` is returned as the same allocation.
    pub fn convert<T: Dispatchable>(&self, obj: &Object) -> Result<Arc<T>, UnxtError> {
        if let Some(same) = obj.downcast_arc::<T>() {
            return Ok(same);
        }

        let f = self.resolve(obj, TypeId::of::<T>()).ok_or_else(|| UnxtError::NotImplemented {
            function: format!("convert::<{}>", std::any::type_name::<T>()),
            type_name: obj.type_name().to_string(),
        })?;

        f(obj)?
            .downcast::<Arc<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| UnxtError::Internal(format!("conversion to '{}' returned the wrong type", std::any::type_name::<T>())))
    }

    pub fn can_convert<T: Dispatchable>(&self, obj: &Object) -> bool {
        obj.is::<T>() || self.resolve(obj, TypeId::of::<T>()).is_some()
    }

    fn resolve(&self, obj: &Object, target: TypeId) -> Option<ConversionFn> {
        let entries = self.entries.read();
        obj.lineage()
            .iter()
            .find_map(|(_, key)| entries.get(&(key, target)).cloned())
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
