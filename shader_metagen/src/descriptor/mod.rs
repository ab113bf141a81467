/// Descriptor module - reflected bindings, descriptor sets and their merging

pub mod binding;
pub mod comparator;
pub mod descriptor_set;
pub mod union;

pub use binding::*;
pub use comparator::*;
pub use descriptor_set::*;
pub use union::*;
