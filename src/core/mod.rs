//! Reference data and the calculation engine

pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod reference;
pub mod source;

// Re-export main types for cleaner imports
pub use engine::{InputCurrency, Outcome, Query, ValuePoint, calculate};
pub use error::{CalcError, ComputationError, DatasetError, InvalidQuery};
pub use reference::{Instrument, PricePoint, ReferenceData, Year};
pub use source::{BuiltinSource, DatasetSource, FileSource, load_reference_data};
