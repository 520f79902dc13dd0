//! Label file text format.
//!
//! ```text
//! 2
//! POLY 10 10 40 10 25 30
//! CIRC 20 10 10
//! ```
//!
//! The first line is the shape count, followed by one line per shape. Decoding
//! is all-or-nothing: any bad line rejects the whole file.

use crate::annotations::AnnotationSet;
use crate::error::{AnnotationError, ParseError, Result};
use crate::shapes::Shape;

/// Encode a set as label file text.
pub fn encode(set: &AnnotationSet) -> String {
    let mut out = format!("{}\n", set.len());
    for shape in set.shapes() {
        out.push_str(&shape.to_parsable());
        out.push('\n');
    }
    out
}

/// Decode label file text into shapes.
///
/// Blank lines are ignored and an empty file holds no shapes.
pub fn decode(text: &str) -> Result<Vec<Shape>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let declared: usize = header.parse().map_err(|_| AnnotationError::Parse {
        line: header_line,
        source: if header.split_whitespace().count() > 1 {
            ParseError::MissingCount
        } else {
            ParseError::MalformedField(header.to_string())
        },
    })?;

    let mut shapes = Vec::with_capacity(declared.min(1024));
    let mut last_line = header_line;
    for (line, token) in lines {
        let shape = Shape::parse(token).map_err(|source| AnnotationError::Parse { line, source })?;
        shapes.push(shape);
        last_line = line;
    }

    if shapes.len() != declared {
        return Err(AnnotationError::Parse {
            line: last_line,
            source: ParseError::CountMismatch {
                declared,
                found: shapes.len(),
            },
        });
    }
    Ok(shapes)
}

/// Decode label file text straight into a set.
pub fn decode_set(text: &str) -> Result<AnnotationSet> {
    AnnotationSet::from_shapes(decode(text)?)
}
