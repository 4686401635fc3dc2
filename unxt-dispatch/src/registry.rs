//! Single-argument dispatch registry

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use unxt_core::{Dispatchable, Object, TypeKey, UnxtError};

/// Registered implementation of a dispatched function
pub type Handler<R> = Arc<dyn Fn(Object) -> Result<R, UnxtError> + Send + Sync>;

/// Open function table keyed by [`TypeKey`]
///
/// A call walks the argument's lineage from rank 0 upwards and runs the first
/// handler it finds. Two handlers matching at the same rank are an error.
pub struct Dispatcher<R> {
    name: &'static str,
    handlers: RwLock<HashMap<TypeKey, Handler<R>>>,
}

impl<R> Dispatcher<R> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a handler, replacing any previous one for `key`
    pub fn register<F>(&self, key: TypeKey, f: F)
    where
        F: Fn(Object) -> Result<R, UnxtError> + Send + Sync + 'static,
    {
        tracing::debug!(function = self.name, ?key, "registering handler");
        self.handlers.write().insert(key, Arc::new(f));
    }

    /// Register a handler for exactly one concrete type
    pub fn register_concrete<T, F>(&self, f: F)
    where
        T: Dispatchable,
        F: Fn(&T) -> Result<R, UnxtError> + Send + Sync + 'static,
    {
        let name = self.name;
        self.register(TypeKey::of::<T>(), move |obj: Object| {
            let value = obj.downcast_ref::<T>().ok_or_else(|| {
                UnxtError::Internal(format!("{}() handler received '{}'", name, obj.type_name()))
            })?;
            f(value)
        });
    }

    pub fn is_registered(&self, key: TypeKey) -> bool {
        self.handlers.read().contains_key(&key)
    }

    /// Find the handler for `obj` without calling it
    pub fn resolve(&self, obj: &Object) -> Result<Handler<R>, UnxtError> {
        let handlers = self.handlers.read();
        let lineage = obj.lineage();

        let mut best: Option<(usize, TypeKey, Handler<R>)> = None;
        let mut tied: Vec<TypeKey> = Vec::new();

        for (rank, key) in lineage.iter() {
            if let Some((best_rank, _, _)) = &best {
                if rank > *best_rank {
                    break;
                }
            }
            let Some(handler) = handlers.get(&key) else {
                continue;
            };
            match &best {
                None => best = Some((rank, key, Arc::clone(handler))),
                Some(_) => tied.push(key),
            }
        }

        match best {
            Some((rank, key, handler)) if tied.is_empty() => {
                tracing::trace!(function = self.name, type_name = obj.type_name(), rank, ?key, "resolved");
                Ok(handler)
            }
            Some((_, key, _)) => {
                let mut candidates = vec![format!("{:?}", key)];
                candidates.extend(tied.iter().map(|k| format!("{:?}", k)));
                Err(UnxtError::AmbiguousDispatch {
                    function: self.name.to_string(),
                    type_name: obj.type_name().to_string(),
                    candidates,
                })
            }
            None => Err(UnxtError::not_implemented(self.name, obj.type_name())),
        }
    }

    pub fn call(&self, obj: Object) -> Result<R, UnxtError> {
        let handler = self.resolve(&obj)?;
        handler(obj)
    }
}

impl<R> std::fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unxt_core::{Lineage, ARRAY_LIKE};

    #[derive(Debug)]
    struct Both;

    impl Dispatchable for Both {
        fn type_name(&self) -> &'static str {
            "Both"
        }

        fn lineage(&self) -> Lineage {
            Lineage::of::<Both>()
                .then(TypeKey::Abstract("Left"))
                .also(TypeKey::Abstract("Right"))
        }
    }

    fn describe() -> Dispatcher<String> {
        let d = Dispatcher::new("describe");
        d.register(ARRAY_LIKE, |obj: Object| Ok(format!("array-like {}", obj.type_name())));
        d
    }

    #[test]
    fn test_abstract_handler() {
        let d = describe();
        assert_eq!(d.call(Object::new(1.0f64)).unwrap(), "array-like f64");
    }

    #[test]
    fn test_concrete_beats_abstract() {
        let d = describe();
        d.register_concrete::<i64, _>(|v| Ok(format!("int {}", v)));
        assert_eq!(d.call(Object::new(7i64)).unwrap(), "int 7");
        assert_eq!(d.call(Object::new(7i32)).unwrap(), "array-like i32");
    }

    #[test]
    fn test_not_implemented() {
        let d = describe();
        let err = d.call(Object::new(Both)).unwrap_err();
        assert_eq!(
            err,
            UnxtError::NotImplemented {
                function: "describe".to_string(),
                type_name: "Both".to_string(),
            }
        );
    }

    #[test]
    fn test_same_rank_is_ambiguous() {
        let d: Dispatcher<()> = Dispatcher::new("f");
        d.register(TypeKey::Abstract("Left"), |_| Ok(()));
        d.register(TypeKey::Abstract("Right"), |_| Ok(()));
        let err = d.call(Object::new(Both)).unwrap_err();
        assert!(matches!(err, UnxtError::AmbiguousDispatch { ref candidates, .. } if candidates.len() == 2));

        // A concrete handler breaks the tie
        d.register(TypeKey::of::<Both>(), |_| Ok(()));
        assert!(d.call(Object::new(Both)).is_ok());
    }

    #[test]
    fn test_registration_replaces() {
        let d = describe();
        d.register(ARRAY_LIKE, |_| Ok("replaced".to_string()));
        assert!(d.is_registered(ARRAY_LIKE));
        assert_eq!(d.call(Object::new(true)).unwrap(), "replaced");
    }
}
