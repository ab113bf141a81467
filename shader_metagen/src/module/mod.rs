/// Module module - reflected shader modules and the cache that owns them

pub mod shader_module;
pub mod module_cache;
#[cfg(test)]
pub mod mock_loader;

pub use shader_module::*;
pub use module_cache::*;
