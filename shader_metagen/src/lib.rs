/*!
# Shader Metagen

Descriptor-set reconciliation for shader metadata generation.

Shaders are compiled per stage, and every stage reflects its own sparse view
of the descriptor sets it uses. This crate combines those views into one
consistent schema per pipeline and one canonical set per shared global set
id, and it rejects incompatible declarations on the way.

## Architecture

- **ModuleCache**: loads each shader file once through a `ShaderLoader` backend
- **bindings_equal**: structural equality of two bindings on the same slot
- **union**: slot-by-slot merge of two descriptor sets
- **aggregate_pipeline**: folds every stage of a pipeline into 4 merged sets
- **populate_globals**: folds the set-0 partials of all pipelines per global id
- **Reconciler**: runs the whole batch and returns a `ReconciledSchema`

Module-owned sets (`ReflectedSet`) and merge-owned sets (`MergedSet`) are
distinct types. A merged set borrows its bindings from the cached modules, so
it cannot outlive them.
*/

// Internal modules (error and log are public for the exported macros)
pub mod error;
pub mod log;
pub mod descriptor;
pub mod module;
pub mod pipeline;
pub mod schema;
mod reconciler;

// Main metagen namespace module
pub mod metagen {
    // Error types
    pub use crate::error::{BindingConflict, Error, Result};

    // Driver
    pub use crate::reconciler::{ReconcileOutput, Reconciler};

    // Data model and set algorithms
    pub use crate::descriptor::*;

    // Shader modules and the loader seam
    pub use crate::module::{
        AttributeFormat, InterfaceVariable, ModuleCache, ShaderLoader, ShaderModule, ShaderStage,
    };

    // Pipeline input and aggregation
    pub use crate::pipeline::*;

    // Generator hand-off
    pub use crate::schema::*;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            reset_logger, set_logger, DefaultLogger, LogEntry, LogSeverity, Logger,
        };
    }
}
