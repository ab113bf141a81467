/// Generator-facing schema types

pub mod layout;
pub mod reconciled_schema;

pub use layout::*;
pub use reconciled_schema::*;
