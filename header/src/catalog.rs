//! Macro names of the vendor headers and of the runtime header.
//!
//! A catalog is a pure function of the model name. Build one per model and
//! per run; nothing here is meant to be cached or shared.

use crate::expand::{Direction, TensorTemplate};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroCatalog {
    model_name: String,
    model_name_upper: String,
    source: SourceScheme,
    target: TargetScheme,
}

/// Names defined by the converter in `<model>.h` and `<model>_data.h`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceScheme {
    pub activations_size: String,
    pub weights_size: String,
    pub alignment: String,
    pub inputs: SourceGroup,
    pub outputs: SourceGroup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceGroup {
    pub count: String,
    pub tensors: TensorTemplate,
}

/// Names emitted in `rt_ai_<model>_model.h`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetScheme {
    pub include_guard: String,
    pub model_name: String,
    pub work_buffer: String,
    pub weights_size: String,
    pub alignment: String,
    pub inputs: TargetGroup,
    pub outputs: TargetGroup,
    pub total_buffer: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetGroup {
    pub count: String,
    pub tensors: TensorTemplate,
    pub sizes_bytes: String,
    pub total_size_bytes: String,
}

impl SourceGroup {
    fn new(prefix: &str, direction: Direction) -> SourceGroup {
        SourceGroup {
            count: format!("{prefix}_{direction}_NUM"),
            tensors: TensorTemplate::new(prefix, direction),
        }
    }
}

impl TargetGroup {
    fn new(prefix: &str, direction: Direction) -> TargetGroup {
        TargetGroup {
            count: format!("{prefix}_{direction}_NUM"),
            tensors: TensorTemplate::new(prefix, direction),
            sizes_bytes: format!("{prefix}_{direction}_SIZE_BYTES"),
            total_size_bytes: format!("{prefix}_{direction}_TOTAL_SIZE_BYTES"),
        }
    }
}

impl MacroCatalog {
    pub fn new(model_name: &str) -> MacroCatalog {
        let upper = model_name.to_uppercase();
        let src = format!("AI_{upper}");
        let dst = format!("RT_AI_{upper}");
        let source = SourceScheme {
            activations_size: format!("{src}_DATA_ACTIVATIONS_SIZE"),
            weights_size: format!("{src}_DATA_WEIGHTS_SIZE"),
            alignment: format!("{src}_ACTIVATIONS_ALIGNMENT"),
            inputs: SourceGroup::new(&src, Direction::In),
            outputs: SourceGroup::new(&src, Direction::Out),
        };
        let target = TargetScheme {
            include_guard: format!("__{dst}_MODEL_H"),
            model_name: format!("{dst}_MODEL_NAME"),
            work_buffer: format!("{dst}_WORK_BUFFER_BYTES"),
            weights_size: format!("{dst}_DATA_WEIGHTS_SIZE"),
            alignment: format!("{dst}_BUFFER_ALIGNMENT"),
            inputs: TargetGroup::new(&dst, Direction::In),
            outputs: TargetGroup::new(&dst, Direction::Out),
            total_buffer: format!("{dst}_TOTAL_BUFFER_SIZE"),
        };
        MacroCatalog { model_name: model_name.to_string(), model_name_upper: upper, source, target }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_name_upper(&self) -> &str {
        &self.model_name_upper
    }

    pub fn source(&self) -> &SourceScheme {
        &self.source
    }

    pub fn target(&self) -> &TargetScheme {
        &self.target
    }
}

impl SourceScheme {
    pub fn group(&self, direction: Direction) -> &SourceGroup {
        match direction {
            Direction::In => &self.inputs,
            Direction::Out => &self.outputs,
        }
    }
}

impl TargetScheme {
    pub fn group(&self, direction: Direction) -> &TargetGroup {
        match direction {
            Direction::In => &self.inputs,
            Direction::Out => &self.outputs,
        }
    }
}
