//! Cache Module
//!
//! The instrumented value cache and its payload type.

mod store;
mod values;


// Re-export public types
pub use store::{Cache, STORE_OP};
pub use values::Value;
