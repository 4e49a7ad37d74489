//! Translation of X-CUBE-AI model headers into RT-AK runtime model headers.
//!
//! The converter leaves `<model>.h` and `<model>_data.h` behind. From them
//! this crate builds a [`ModelDescriptor`] (tensor counts, buffer and tensor
//! sizes, relayed as text), then renders `rt_ai_<model>_model.h` under the
//! `RT_AI_<MODEL>` naming scheme.

use std::path::PathBuf;

pub mod aggregate;
pub mod assemble;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod expand;
pub mod format;
pub mod model;
pub mod parse;
pub mod report;
pub mod source;

pub use assemble::{HeaderAssembler, header_file_name, write_header};
pub use catalog::MacroCatalog;
pub use config::GenerateOptions;
pub use errors::{HeaderError, HeaderResult};
pub use model::{MacroValue, ModelDescriptor, TensorEntry};
pub use parse::{parse_model, read_model};

pub mod prelude {
    pub use crate::GenerateOptions;
    pub use crate::errors::{HeaderError, HeaderResult};
    pub use crate::expand::Direction;
    pub use crate::format::ModelFormat;
    pub use crate::model::{MacroValue, ModelDescriptor, TensorEntry};
    pub use crate::report::ConversionMode;
}

/// Reads the vendor headers and writes the runtime header for one model.
///
/// Nothing is written unless both reading and rendering succeed; a stale
/// output file is then replaced as a whole.
pub fn generate_header(options: &GenerateOptions) -> HeaderResult<PathBuf> {
    options.validate()?;
    let descriptor = read_model(&options.source_dir, &options.model_name)?;
    write_header(&descriptor, &options.destination_dir)
}
