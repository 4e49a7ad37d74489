use std::fmt;
use std::path::{Path, PathBuf};

use log::info;

use crate::catalog::{MacroCatalog, TargetGroup};
use crate::errors::HeaderResult;
use crate::expand::Direction;
use crate::model::{MacroValue, ModelDescriptor, TensorEntry};

pub fn header_file_name(model_name: &str) -> String {
    format!("rt_ai_{model_name}_model.h")
}

/// Renders `rt_ai_<model>_model.h` for a descriptor.
///
/// Line order is fixed: banner, buffer sizes, the input group, the output
/// group, closing banner. A field whose value is unknown gets no line.
pub struct HeaderAssembler<'d> {
    descriptor: &'d ModelDescriptor,
    catalog: MacroCatalog,
}

fn define(w: &mut impl fmt::Write, name: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(w, "#define {name} {value}")
}

fn define_opt(w: &mut impl fmt::Write, name: &str, value: Option<&MacroValue>) -> fmt::Result {
    match value {
        Some(value) => define(w, name, value),
        None => Ok(()),
    }
}

impl<'d> HeaderAssembler<'d> {
    pub fn new(descriptor: &'d ModelDescriptor) -> HeaderAssembler<'d> {
        HeaderAssembler { descriptor, catalog: MacroCatalog::new(descriptor.model_name()) }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn head(&self, w: &mut impl fmt::Write) -> fmt::Result {
        let target = self.catalog.target();
        let model_name = self.descriptor.model_name();
        writeln!(w, "#ifndef {}", target.include_guard)?;
        writeln!(w, "#define {}", target.include_guard)?;
        writeln!(
            w,
            "\n/* {}: generated from the X-CUBE-AI headers of model \"{model_name}\", do not edit */\n",
            header_file_name(model_name),
        )?;
        define(w, &target.model_name, format_args!("\"{model_name}\""))?;
        writeln!(w)
    }

    fn buffers(&self, w: &mut impl fmt::Write) -> fmt::Result {
        let target = self.catalog.target();
        define_opt(w, &target.work_buffer, self.descriptor.activation_size())?;
        define_opt(w, &target.weights_size, self.descriptor.weights_size())?;
        define_opt(w, &target.alignment, self.descriptor.alignment())?;
        writeln!(w)
    }

    fn group(&self, w: &mut impl fmt::Write, direction: Direction) -> fmt::Result {
        let names: &TargetGroup = self.catalog.target().group(direction);
        let entries: &[TensorEntry] = self.descriptor.tensors(direction);
        define(w, &names.count, format_args!("({})", entries.len()))?;
        let expanded = names.tensors.expand(entries.len());
        for (tensor, entry) in expanded.iter().zip(entries) {
            define_opt(w, &tensor.size, entry.size.as_ref())?;
            define_opt(w, &tensor.size_bytes, entry.size_bytes.as_ref())?;
        }
        // the list and the total both need every tensor's byte size
        if let Some(total) = self.descriptor.total_size_bytes(direction) {
            writeln!(w, "#define {} {{ \\", names.sizes_bytes)?;
            for tensor in &expanded {
                writeln!(w, "    {}, \\", tensor.size_bytes)?;
            }
            writeln!(w, "}}")?;
            if entries.len() > 1 {
                define(w, &names.total_size_bytes, format_args!("({total})"))?;
            } else {
                define(w, &names.total_size_bytes, total)?;
            }
        }
        writeln!(w)
    }

    fn tail(&self, w: &mut impl fmt::Write) -> fmt::Result {
        let target = self.catalog.target();
        writeln!(w, "#define {} //unused", target.total_buffer)?;
        writeln!(w, "\n#endif //{}", target.include_guard)
    }
}

impl fmt::Display for HeaderAssembler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.head(f)?;
        self.buffers(f)?;
        self.group(f, Direction::In)?;
        self.group(f, Direction::Out)?;
        self.tail(f)
    }
}

/// Overwrites `path` with `contents`: any existing file is removed first,
/// and nothing is merged.
pub(crate) fn replace_file(path: &Path, contents: &str) -> HeaderResult<()> {
    if path.exists() {
        fs_err::remove_file(path)?;
    }
    fs_err::write(path, contents)?;
    Ok(())
}

/// Renders the header in memory, then writes it into `destination_dir`.
pub fn write_header(
    descriptor: &ModelDescriptor,
    destination_dir: impl AsRef<Path>,
) -> HeaderResult<PathBuf> {
    let text = HeaderAssembler::new(descriptor).render();
    let path = destination_dir.as_ref().join(header_file_name(descriptor.model_name()));
    replace_file(&path, &text)?;
    info!("Generated {path:?}");
    Ok(path)
}
