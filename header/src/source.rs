//! The runtime model source, `rt_ai_<model>_model.c`.
//!
//! The bundled template registers a network called `mnist` with the
//! runtime; rendering renames it after the actual model.

use std::path::{Path, PathBuf};

use log::info;
use regex::{Captures, Regex};

use crate::assemble::replace_file;
use crate::errors::HeaderResult;

/// Network name the bundled template is written for.
pub const TEMPLATE_NETWORK: &str = "mnist";

pub const TEMPLATE: &str = include_str!("../templates/rt_ai_template_model.c");

lazy_static::lazy_static! {
    static ref SEGMENT: Regex = Regex::new("[A-Za-z0-9]+").unwrap();
}

pub fn source_file_name(model_name: &str) -> String {
    format!("rt_ai_{model_name}_model.c")
}

/// Replaces `template_name` by `model_name` in `template`.
///
/// Only whole segments are renamed: a segment is a maximal run of ASCII
/// letters and digits, so `ai_mnist_create` and `RT_AI_MNIST_INFO` are
/// renamed but `mnist2` is not. Both the lower and the upper case spelling
/// are handled.
pub fn render_source(template: &str, template_name: &str, model_name: &str) -> String {
    if template_name == model_name {
        return template.to_string();
    }
    let template_upper = template_name.to_uppercase();
    let model_upper = model_name.to_uppercase();
    SEGMENT
        .replace_all(template, |caps: &Captures| {
            let segment = &caps[0];
            if segment == template_name {
                model_name.to_string()
            } else if segment == template_upper {
                model_upper.clone()
            } else {
                segment.to_string()
            }
        })
        .into_owned()
}

/// Renders `template` for `model_name` and writes it into `destination_dir`.
pub fn write_source(
    template: &str,
    template_name: &str,
    model_name: &str,
    destination_dir: impl AsRef<Path>,
) -> HeaderResult<PathBuf> {
    let text = render_source(template, template_name, model_name);
    let path = destination_dir.as_ref().join(source_file_name(model_name));
    replace_file(&path, &text)?;
    info!("Generated {path:?}");
    Ok(path)
}
