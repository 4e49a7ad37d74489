use std::path::PathBuf;

use crate::errors::{HeaderError, HeaderResult};

/// What one header generation run works on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// C name given to the model by the converter.
    pub model_name: String,
    /// Directory holding `<model>.h` and `<model>_data.h`.
    pub source_dir: PathBuf,
    /// Directory receiving `rt_ai_<model>_model.h`.
    pub destination_dir: PathBuf,
}

impl GenerateOptions {
    pub fn new(
        model_name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
    ) -> GenerateOptions {
        GenerateOptions {
            model_name: model_name.into(),
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
        }
    }

    /// The source directory itself is not checked here: a missing vendor
    /// header is reported when it is read.
    pub fn validate(&self) -> HeaderResult<()> {
        validate_model_name(&self.model_name)?;
        if !self.destination_dir.is_dir() {
            return Err(HeaderError::InvalidConfig(format!(
                "destination {:?} is not a directory",
                self.destination_dir
            )));
        }
        Ok(())
    }
}

/// The model name ends up in C identifiers and file names.
pub fn validate_model_name(name: &str) -> HeaderResult<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(HeaderError::InvalidConfig(format!("model name {name:?} is not a C identifier")))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn model_names() {
        assert!(validate_model_name("mnist").is_ok());
        assert!(validate_model_name("net_1").is_ok());
        assert!(validate_model_name("_x").is_ok());
        assert!(validate_model_name("").is_err());
        assert!(validate_model_name("1net").is_err());
        assert!(validate_model_name("my-net").is_err());
        assert!(validate_model_name("../net").is_err());
    }

    #[test]
    fn destination_must_exist() {
        let opts = GenerateOptions::new("mnist", ".", "/definitely/not/here");
        assert!(matches!(opts.validate(), Err(HeaderError::InvalidConfig(_))));
    }
}
