use std::fmt;

use crate::aggregate;
use crate::expand::Direction;

/// Right-hand side of a macro definition, relayed verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MacroValue(String);

impl MacroValue {
    pub fn new(text: impl Into<String>) -> MacroValue {
        MacroValue(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacroValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MacroValue {
    fn from(s: &str) -> MacroValue {
        MacroValue::new(s)
    }
}

impl From<String> for MacroValue {
    fn from(s: String) -> MacroValue {
        MacroValue(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorEntry {
    pub index: usize,
    pub size: Option<MacroValue>,
    pub size_bytes: Option<MacroValue>,
}

impl TensorEntry {
    pub fn empty(index: usize) -> TensorEntry {
        TensorEntry { index, size: None, size_bytes: None }
    }
}

/// Everything the runtime header needs to know about one model.
///
/// Built once by the parser from a vendor header pair. Tensor lists always
/// hold exactly `count` entries indexed `1..=count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub(crate) model_name: String,
    pub(crate) model_name_upper: String,
    pub(crate) activation_size: Option<MacroValue>,
    pub(crate) weights_size: Option<MacroValue>,
    pub(crate) alignment: Option<MacroValue>,
    pub(crate) inputs: Vec<TensorEntry>,
    pub(crate) outputs: Vec<TensorEntry>,
}

impl ModelDescriptor {
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_name_upper(&self) -> &str {
        &self.model_name_upper
    }

    pub fn activation_size(&self) -> Option<&MacroValue> {
        self.activation_size.as_ref()
    }

    pub fn weights_size(&self) -> Option<&MacroValue> {
        self.weights_size.as_ref()
    }

    pub fn alignment(&self) -> Option<&MacroValue> {
        self.alignment.as_ref()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn inputs(&self) -> &[TensorEntry] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TensorEntry] {
        &self.outputs
    }

    pub fn tensors(&self, direction: Direction) -> &[TensorEntry] {
        match direction {
            Direction::In => &self.inputs,
            Direction::Out => &self.outputs,
        }
    }

    /// Sum expression over every tensor's byte size, `None` if any is missing.
    pub fn total_size_bytes(&self, direction: Direction) -> Option<MacroValue> {
        aggregate::total_size_bytes(self.tensors(direction))
    }
}
