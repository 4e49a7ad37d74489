use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_till, take_until};
use nom::character::complete::{alpha1, alphanumeric1, anychar, char, satisfy, space0, space1};
use nom::combinator::{eof, map, recognize, rest, value};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};
use nom_language::error::VerboseError;

use crate::catalog::MacroCatalog;
use crate::errors::{HeaderError, HeaderResult};
use crate::expand::Direction;
use crate::model::{MacroValue, ModelDescriptor, TensorEntry};

type R<'i, O> = IResult<&'i str, O, VerboseError<&'i str>>;

/// Largest tensor count accepted from an `_IN_NUM`/`_OUT_NUM` macro.
pub const MAX_TENSORS: usize = u16::MAX as usize;

/// One object-like `#define NAME VALUE` found in a header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub value: MacroValue,
}

/// Tokenizes header text into macro definitions, in file order.
///
/// Backslash continuations are joined first, then comments are dropped.
/// Function-like macros, valueless defines and anything that is not a
/// `#define` are skipped.
pub fn parse_definitions(text: &str) -> Vec<Definition> {
    strip_comments(&logical_lines(text).join("\n"))
        .lines()
        .filter_map(|line| definition(line).ok())
        .filter_map(|(_, (name, raw))| {
            let value = macro_value(raw);
            (!value.is_empty())
                .then(|| Definition { name: name.to_string(), value: MacroValue::new(value) })
        })
        .collect()
}

fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = vec![];
    let mut current = String::new();
    for line in text.lines() {
        let line = line.trim_end();
        if let Some(head) = line.strip_suffix('\\') {
            current.push_str(head);
            current.push(' ');
        } else {
            current.push_str(line);
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Removes `/* ... */` and `// ...` comments. A block comment becomes a
/// single space; string and character literals are kept whole.
fn strip_comments(text: &str) -> String {
    let chunk = alt((
        value(" ", block_comment),
        value("", line_comment),
        literal('"'),
        literal('\''),
        is_not("/\"'"),
        recognize(anychar),
    ));
    match many0(chunk).parse(text) {
        Ok((rest, chunks)) => chunks.concat() + rest,
        Err(_) => text.to_string(),
    }
}

fn block_comment(i: &str) -> R<'_, &str> {
    recognize((tag("/*"), take_until("*/"), tag("*/"))).parse(i)
}

fn line_comment(i: &str) -> R<'_, &str> {
    recognize((tag("//"), take_till(|c: char| c == '\n' || c == '\r'))).parse(i)
}

fn literal<'s>(quote: char) -> impl Parser<&'s str, Output = &'s str, Error = VerboseError<&'s str>> {
    let plain = satisfy(move |c| c != '\\' && c != quote && c != '\n');
    let body = many0(alt((preceded(char('\\'), anychar), plain)));
    recognize((char(quote), body, char(quote)))
}

// <definition> ::= "#" "define" <identifier> (<space> <anything> | <eof>)
fn definition(i: &str) -> R<'_, (&str, &str)> {
    map(
        (stag("#"), tag("define"), space1, identifier, alt((space1, eof)), rest),
        |(_, _, _, name, _, value)| (name, value),
    )
    .parse(i)
}

fn identifier(i: &str) -> R<'_, &str> {
    recognize(pair(alt((alpha1, tag("_"))), many0(alt((alphanumeric1, tag("_")))))).parse(i)
}

fn spaced<'s, O, P>(it: P) -> impl Parser<&'s str, Output = O, Error = VerboseError<&'s str>>
where
    P: Parser<&'s str, Output = O, Error = VerboseError<&'s str>>,
{
    delimited(space0, it, space0)
}

fn stag<'s>(t: &'static str) -> impl Parser<&'s str, Output = &'s str, Error = VerboseError<&'s str>> {
    spaced(tag(t))
}

/// `(128)` out of ` (128)`: the value starts at its first parenthesis.
fn macro_value(raw: &str) -> &str {
    let raw = raw.trim();
    raw.find('(').map(|ix| &raw[ix..]).unwrap_or(raw)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    ActivationSize,
    WeightsSize,
    Alignment,
    Size(Direction, usize),
    SizeBytes(Direction, usize),
}

impl ModelDescriptor {
    fn slot(&mut self, field: Field) -> &mut Option<MacroValue> {
        match field {
            Field::ActivationSize => &mut self.activation_size,
            Field::WeightsSize => &mut self.weights_size,
            Field::Alignment => &mut self.alignment,
            Field::Size(dir, ix) => &mut self.tensors_mut(dir)[ix - 1].size,
            Field::SizeBytes(dir, ix) => &mut self.tensors_mut(dir)[ix - 1].size_bytes,
        }
    }

    fn tensors_mut(&mut self, direction: Direction) -> &mut Vec<TensorEntry> {
        match direction {
            Direction::In => &mut self.inputs,
            Direction::Out => &mut self.outputs,
        }
    }
}

/// Tensor count announced by `name`, 1 when the macro is absent.
fn cardinality(definitions: &[Definition], name: &str) -> HeaderResult<usize> {
    let Some(def) = definitions.iter().find(|d| d.name == name) else {
        debug!("{name} not defined, assuming a single tensor");
        return Ok(1);
    };
    let digits = def.value.as_str().trim_start_matches('(').trim_end_matches(')').trim();
    match digits.parse::<usize>() {
        Ok(n) if (1..=MAX_TENSORS).contains(&n) => Ok(n),
        _ => Err(HeaderError::MalformedMacro {
            name: name.to_string(),
            value: def.value.to_string(),
        }),
    }
}

/// Builds the descriptor of `model_name` from its vendor headers' text.
///
/// When a name is defined more than once, the first definition wins, and
/// the data header is read before the model header.
pub fn parse_model(
    model_name: &str,
    model_header: &str,
    data_header: Option<&str>,
) -> HeaderResult<ModelDescriptor> {
    let catalog = MacroCatalog::new(model_name);
    let source = catalog.source();

    let mut definitions = data_header.map(parse_definitions).unwrap_or_default();
    definitions.extend(parse_definitions(model_header));

    let input_count = cardinality(&definitions, &source.inputs.count)?;
    let output_count = cardinality(&definitions, &source.outputs.count)?;
    debug!("{model_name}: {input_count} input(s), {output_count} output(s)");

    let mut table = vec![
        (source.activations_size.clone(), Field::ActivationSize),
        (source.weights_size.clone(), Field::WeightsSize),
        (source.alignment.clone(), Field::Alignment),
    ];
    for (direction, count) in [(Direction::In, input_count), (Direction::Out, output_count)] {
        for names in source.group(direction).tensors.expand(count) {
            table.push((names.size, Field::Size(direction, names.index)));
            table.push((names.size_bytes, Field::SizeBytes(direction, names.index)));
        }
    }
    let lookup: HashMap<&str, Field> = table.iter().map(|(n, f)| (n.as_str(), *f)).collect();

    let mut descriptor = ModelDescriptor {
        model_name: catalog.model_name().to_string(),
        model_name_upper: catalog.model_name_upper().to_string(),
        activation_size: None,
        weights_size: None,
        alignment: None,
        inputs: (1..=input_count).map(TensorEntry::empty).collect(),
        outputs: (1..=output_count).map(TensorEntry::empty).collect(),
    };
    for def in definitions {
        let Some(&field) = lookup.get(def.name.as_str()) else { continue };
        let slot = descriptor.slot(field);
        if slot.is_none() {
            *slot = Some(def.value);
        } else {
            debug!("{} defined twice, keeping the first definition", def.name);
        }
    }

    for (name, field) in &table {
        if descriptor.slot(*field).is_none() {
            warn!("Macro {name} not found, the generated header will lack it");
        }
    }
    Ok(descriptor)
}

pub fn model_header_path(source_dir: impl AsRef<Path>, model_name: &str) -> PathBuf {
    source_dir.as_ref().join(format!("{model_name}.h"))
}

pub fn data_header_path(source_dir: impl AsRef<Path>, model_name: &str) -> PathBuf {
    source_dir.as_ref().join(format!("{model_name}_data.h"))
}

/// Reads `<model>.h` (required) and `<model>_data.h` (optional) from
/// `source_dir` and parses them.
pub fn read_model(source_dir: impl AsRef<Path>, model_name: &str) -> HeaderResult<ModelDescriptor> {
    let source_dir = source_dir.as_ref();
    let model_h = model_header_path(source_dir, model_name);
    if !model_h.is_file() {
        return Err(HeaderError::MissingInput(model_h));
    }
    let model_text = fs_err::read_to_string(&model_h)?;
    let data_h = data_header_path(source_dir, model_name);
    let data_text = if data_h.is_file() {
        Some(fs_err::read_to_string(&data_h)?)
    } else {
        warn!("No {data_h:?}, looking for buffer sizes in {model_h:?} only");
        None
    };
    parse_model(model_name, &model_text, data_text.as_deref())
}

#[cfg(test)]
mod test {
    use super::*;

    const MNIST_H: &str = r#"
#ifndef AI_MNIST_H
#define AI_MNIST_H

#include "ai_platform.h"

#define AI_MNIST_MODEL_NAME          "mnist"
#define AI_MNIST_IN_NUM        (1)
#define AI_MNIST_IN { \
  AI_BUFFER_OBJ_INIT(AI_BUFFER_FORMAT_FLOAT, 28, 28, 1, 1, NULL), \
}
#define AI_MNIST_IN_SIZE { \
  (28 * 28 * 1), \
}
#define AI_MNIST_IN_1_SIZE  \
  (28 * 28 * 1)
#define AI_MNIST_IN_1_SIZE_BYTES  \
  ((28 * 28 * 1) * 4)
#define AI_MNIST_OUT_NUM       (1)
#define AI_MNIST_OUT_1_SIZE  \
  (1 * 1 * 10)
#define AI_MNIST_OUT_1_SIZE_BYTES  \
  ((1 * 1 * 10) * 4)
#define AI_MNIST_ACTIVATIONS_ALIGNMENT (4)

AI_API_ENTRY
ai_handle ai_mnist_create(ai_handle* network, const ai_buffer* network_config);

#endif /*AI_MNIST_H*/
"#;

    const MNIST_DATA_H: &str = r#"
#define AI_MNIST_DATA_ACTIVATIONS_SIZE     (3536)
#define AI_MNIST_DATA_WEIGHTS_SIZE         (26000)
#define AI_MNIST_DATA_ACTIVATIONS(ptr_)  \
  AI_BUFFER_OBJ_INIT(AI_BUFFER_FORMAT_U8, 1, 1, AI_MNIST_DATA_ACTIVATIONS_SIZE, 1, AI_HANDLE_PTR(ptr_))
"#;

    #[test]
    fn tokenize_simple() {
        assert_eq!(
            parse_definitions("#define X (128)\n"),
            vec![Definition { name: "X".into(), value: "(128)".into() }]
        );
    }

    #[test]
    fn tokenize_spacing() {
        let defs = parse_definitions("  #  define   AI_M_IN_NUM\t(2)  \n");
        assert_eq!(defs[0].name, "AI_M_IN_NUM");
        assert_eq!(defs[0].value.as_str(), "(2)");
    }

    #[test]
    fn tokenize_continuations() {
        let defs = parse_definitions("#define AI_M_IN_1_SIZE \\\n  (28 * 28)\n");
        assert_eq!(defs[0].value.as_str(), "(28 * 28)");
    }

    #[test]
    fn tokenize_skips_noise() {
        let defs = parse_definitions(
            "#ifndef G\n#define G\n#define F(ptr_) (ptr_)\n#include <x.h>\nint a = 1;\n#define V 12\n",
        );
        assert_eq!(defs, vec![Definition { name: "V".into(), value: "12".into() }]);
    }

    #[test]
    fn tokenize_longer_names_do_not_match_shorter() {
        let defs = parse_definitions("#define AI_M_IN_SIZE_BYTES (1)\n#define AI_M_IN_TOTAL_SIZE_BYTES (2)\n");
        assert_eq!(defs[0].name, "AI_M_IN_SIZE_BYTES");
        assert_eq!(defs[1].name, "AI_M_IN_TOTAL_SIZE_BYTES");
    }

    #[test]
    fn mnist_descriptor() {
        let d = parse_model("mnist", MNIST_H, Some(MNIST_DATA_H)).unwrap();
        assert_eq!(d.model_name_upper(), "MNIST");
        assert_eq!(d.activation_size().unwrap().as_str(), "(3536)");
        assert_eq!(d.weights_size().unwrap().as_str(), "(26000)");
        assert_eq!(d.alignment().unwrap().as_str(), "(4)");
        assert_eq!(d.input_count(), 1);
        assert_eq!(d.inputs()[0].size.as_ref().unwrap().as_str(), "(28 * 28 * 1)");
        assert_eq!(d.inputs()[0].size_bytes.as_ref().unwrap().as_str(), "((28 * 28 * 1) * 4)");
        assert_eq!(d.outputs()[0].size_bytes.as_ref().unwrap().as_str(), "((1 * 1 * 10) * 4)");
    }

    #[test]
    fn default_cardinality() {
        let d = parse_model("m", "#define AI_M_IN_1_SIZE (3)\n", None).unwrap();
        assert_eq!(d.input_count(), 1);
        assert_eq!(d.output_count(), 1);
        assert_eq!(d.inputs()[0].index, 1);
    }

    #[test]
    fn multi_input() {
        let h = "#define AI_M_IN_NUM (2)\n\
                 #define AI_M_IN_2_SIZE_BYTES (200)\n\
                 #define AI_M_IN_1_SIZE_BYTES (100)\n\
                 #define AI_M_IN_3_SIZE_BYTES (300)\n";
        let d = parse_model("m", h, None).unwrap();
        assert_eq!(d.input_count(), 2);
        assert_eq!(d.inputs()[0].size_bytes, Some("(100)".into()));
        assert_eq!(d.inputs()[1].size_bytes, Some("(200)".into()));
        assert_eq!(d.total_size_bytes(Direction::In).unwrap().as_str(), "(100) + (200)");
    }

    #[test]
    fn digit_in_model_name() {
        let h = "#define AI_NET1_IN_NUM (2)\n\
                 #define AI_NET1_IN_1_SIZE (1)\n\
                 #define AI_NET1_IN_2_SIZE (2)\n";
        let d = parse_model("net1", h, None).unwrap();
        assert_eq!(d.inputs()[1].size, Some("(2)".into()));
    }

    #[test]
    fn malformed_count() {
        let err = parse_model("m", "#define AI_M_OUT_NUM (two)\n", None).unwrap_err();
        assert!(matches!(err, HeaderError::MalformedMacro { ref name, .. } if name == "AI_M_OUT_NUM"));
    }

    #[test]
    fn zero_count_is_malformed() {
        assert!(parse_model("m", "#define AI_M_IN_NUM (0)\n", None).is_err());
    }

    #[test]
    fn oversized_count_is_malformed() {
        for count in ["(18446744073709551615)", "(100000000)", "(65536)"] {
            let h = format!("#define AI_M_IN_NUM {count}\n");
            let err = parse_model("m", &h, None).unwrap_err();
            assert!(matches!(err, HeaderError::MalformedMacro { ref value, .. } if value.as_str() == count));
        }
    }

    #[test]
    fn comments_are_not_values() {
        let defs = parse_definitions(
            "#define A (100) // first\n\
             #define B /* two */ (2) /* inputs */\n\
             #define C \"a//b\" /* multi\n line */\n\
             /* #define D (4) */\n\
             #define E \\\n  (5) // tail\n",
        );
        let pairs: Vec<(&str, &str)> =
            defs.iter().map(|d| (d.name.as_str(), d.value.as_str())).collect();
        assert_eq!(pairs, vec![("A", "(100)"), ("B", "(2)"), ("C", "\"a//b\""), ("E", "(5)")]);
    }

    #[test]
    fn commented_sizes_and_counts() {
        let h = "#define AI_M_IN_NUM (2) /* two inputs */\n\
                 #define AI_M_IN_1_SIZE_BYTES (100) // first\n\
                 #define AI_M_IN_2_SIZE_BYTES (200)\n";
        let d = parse_model("m", h, None).unwrap();
        assert_eq!(d.input_count(), 2);
        assert_eq!(d.total_size_bytes(Direction::In).unwrap().as_str(), "(100) + (200)");
    }

    #[test]
    fn missing_macro_is_omitted() {
        let d = parse_model("m", "#define AI_M_IN_NUM (1)\n", None).unwrap();
        assert!(d.activation_size().is_none());
        assert!(d.inputs()[0].size.is_none());
    }

    #[test]
    fn data_header_wins_over_model_header() {
        let d = parse_model(
            "m",
            "#define AI_M_DATA_WEIGHTS_SIZE (1)\n",
            Some("#define AI_M_DATA_WEIGHTS_SIZE (2)\n"),
        )
        .unwrap();
        assert_eq!(d.weights_size().unwrap().as_str(), "(2)");
    }
}
