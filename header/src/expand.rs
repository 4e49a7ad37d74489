use std::fmt;

/// Which side of the network a tensor sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Per-tensor macro name template: `<prefix>_<IN|OUT>_<index>_SIZE[_BYTES]`.
///
/// The index is always a formatting argument, so a prefix carrying digits
/// (as in a model called `net1`) is never rewritten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorTemplate {
    prefix: String,
    direction: Direction,
}

/// Size and size-in-bytes macro names of one tensor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorNames {
    pub index: usize,
    pub size: String,
    pub size_bytes: String,
}

impl TensorTemplate {
    pub fn new(prefix: impl Into<String>, direction: Direction) -> TensorTemplate {
        TensorTemplate { prefix: prefix.into(), direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Names of the tensor at `index`, counting from 1.
    pub(crate) fn names(&self, index: usize) -> TensorNames {
        debug_assert!(index >= 1, "tensor indices start at 1");
        let size = format!("{}_{}_{}_SIZE", self.prefix, self.direction, index);
        let size_bytes = format!("{size}_BYTES");
        TensorNames { index, size, size_bytes }
    }

    /// Name pairs for indices `1..=count`, in index order.
    pub fn expand(&self, count: usize) -> Vec<TensorNames> {
        (1..=count).map(|ix| self.names(ix)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_index_is_the_template() {
        let t = TensorTemplate::new("AI_MNIST", Direction::In);
        assert_eq!(
            t.names(1),
            TensorNames {
                index: 1,
                size: "AI_MNIST_IN_1_SIZE".into(),
                size_bytes: "AI_MNIST_IN_1_SIZE_BYTES".into()
            }
        );
    }

    #[test]
    fn digits_in_model_name_are_left_alone() {
        let t = TensorTemplate::new("AI_NET1", Direction::Out);
        let names = t.expand(3);
        assert_eq!(names[1].size, "AI_NET1_OUT_2_SIZE");
        assert_eq!(names[2].size_bytes, "AI_NET1_OUT_3_SIZE_BYTES");
    }

    #[test]
    fn two_digit_indices() {
        let t = TensorTemplate::new("RT_AI_X", Direction::In);
        assert_eq!(t.names(12).size, "RT_AI_X_IN_12_SIZE");
    }

    #[test]
    fn no_tensor_no_names() {
        let t = TensorTemplate::new("AI_M", Direction::Out);
        assert!(t.expand(0).is_empty());
        assert_eq!(t.expand(1)[0].size, "AI_M_OUT_1_SIZE");
    }

    proptest! {
        #[test]
        fn expansion_is_indexed(count in 1usize..64, prefix in "AI_[A-Z0-9]{1,8}") {
            let t = TensorTemplate::new(prefix.clone(), Direction::In);
            let names = t.expand(count);
            prop_assert_eq!(names.len(), count);
            for (ix, n) in names.iter().enumerate() {
                prop_assert_eq!(n.index, ix + 1);
                prop_assert_eq!(&n.size, &format!("{}_IN_{}_SIZE", prefix, ix + 1));
                prop_assert_eq!(&n.size_bytes, &format!("{}_BYTES", n.size));
            }
        }
    }
}
