//! unxt Dispatch - Open runtime dispatch
//!
//! Provides the extension points of the quantity machinery:
//! - `Dispatcher`: single-argument function registry resolved by lineage
//! - `ConversionRegistry`: `(source, target)` conversion methods
//! - `DispatchConfig`: process-wide runtime configuration

mod config;
mod conversion;
mod registry;

pub use config::{report_unregistered, set_config, DispatchConfig, WarningPolicy, UNREGISTERED_CONVERTER_ENV};
pub use conversion::{ConversionFn, ConversionRegistry};
pub use registry::{Dispatcher, Handler};

pub use unxt_core::{Object, TypeKey, UnxtError};
