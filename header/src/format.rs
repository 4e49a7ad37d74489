use std::fmt;
use std::path::Path;

use crate::errors::{HeaderError, HeaderResult};

/// Trained model frameworks the converter accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    Keras,
    Tflite,
    Lasagne,
    Caffe,
    Onnx,
}

impl ModelFormat {
    // `.json` is both a keras and a convnetjs extension, keras comes first
    const EXTENSIONS: &'static [(ModelFormat, &'static [&'static str])] = &[
        (ModelFormat::Keras, &["h5", "hdf5", "json", "yml", "yaml"]),
        (ModelFormat::Tflite, &["tflite"]),
        (ModelFormat::Lasagne, &["npz"]),
        (ModelFormat::Caffe, &["prototxt", "caffemodel"]),
        (ModelFormat::Onnx, &["onnx"]),
    ];

    pub fn from_path(path: impl AsRef<Path>) -> HeaderResult<ModelFormat> {
        let path = path.as_ref();
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .and_then(|ext| {
                Self::EXTENSIONS
                    .iter()
                    .find(|(_, exts)| exts.contains(&ext.as_str()))
                    .map(|(format, _)| *format)
            })
            .ok_or_else(|| HeaderError::UnsupportedModel(path.to_path_buf()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelFormat::Keras => "keras",
            ModelFormat::Tflite => "tflite",
            ModelFormat::Lasagne => "lasagne",
            ModelFormat::Caffe => "caffe",
            ModelFormat::Onnx => "onnx",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(ModelFormat::from_path("models/keras_mnist.h5").unwrap(), ModelFormat::Keras);
        assert_eq!(ModelFormat::from_path("mnist.tflite").unwrap(), ModelFormat::Tflite);
        assert_eq!(ModelFormat::from_path("net.caffemodel").unwrap(), ModelFormat::Caffe);
        assert_eq!(ModelFormat::from_path("NET.ONNX").unwrap(), ModelFormat::Onnx);
        assert_eq!(ModelFormat::from_path("model.json").unwrap(), ModelFormat::Keras);
    }

    #[test]
    fn unknown_extensions() {
        assert!(matches!(
            ModelFormat::from_path("model.pb"),
            Err(HeaderError::UnsupportedModel(_))
        ));
        assert!(ModelFormat::from_path("model").is_err());
    }
}
