//! Layered configuration: load, resolve, merge.
//!
//! Configuration for a component is assembled from several partial sources:
//! 1. **Read** - a JSON or YAML file decoded into the target type
//! 2. **Bind** - string fields carrying indirection tokens are resolved
//! 3. **Merge** - layers are folded together, highest priority last
//!
//! ## Indirection Tokens
//! - `_NAME_` / `$NAME` - environment variable `NAME`
//! - `file://PATH` - trimmed contents of the file at `PATH`
//!
//! ## Merge Strategy
//! - Structs and maps: merged key by key
//! - Sequences: replaced by a non-empty overlay
//! - Scalars: replaced by a non-zero overlay
//! - Enums: replaced when the overlay picks another variant

mod bind;
mod global;
mod loader;
mod merge;
mod reader;
mod resolve;
mod tree;

pub use bind::Bind;
pub use global::{GlobalConfig, Logging};
pub use loader::{ConfigLoader, Layer};
pub use merge::{MergeContext, deep_merge, merge, merge_values};
pub use reader::{Format, decode, read, read_as};
pub use resolve::{
    EnvSource, FILE_VALUE_PREFIX, FnEnv, ProcessEnv, Resolver, check_prefix_and_suffix,
    get_actual_value, get_actual_values,
};
