use itertools::Itertools;

use crate::model::{MacroValue, TensorEntry};

/// Additive expression over `values`, kept as text for the C compiler.
///
/// `(10)`, `(20)`, `(30)` gives `(10) + (20) + (30)`. Nothing is evaluated.
pub fn sum_expression<'a, I>(values: I) -> Option<MacroValue>
where
    I: IntoIterator<Item = &'a MacroValue>,
{
    let mut values = values.into_iter().peekable();
    values.peek()?;
    Some(MacroValue::new(values.map(|v| v.as_str()).join(" + ")))
}

/// Total byte size of a tensor set, in index order.
///
/// The total depends on every term: one missing `size_bytes` and there is
/// no total at all.
pub fn total_size_bytes(entries: &[TensorEntry]) -> Option<MacroValue> {
    let terms = entries.iter().map(|e| e.size_bytes.as_ref()).collect::<Option<Vec<_>>>()?;
    sum_expression(terms)
}
