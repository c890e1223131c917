//! Puzzle text parsing into shape definitions and grid queries
//!
//! The input is a sequence of shape blocks followed by query lines:
//!
//! ```text
//! 0:
//! ###
//! ##.
//!
//! 4x4: 0 2
//! ```
//!
//! A line `N:` opens shape `N`, rows of `#` and `.` extend the open shape, and
//! `WxH: c0 c1 ...` asks for `c_i` copies of shape `i` in a `W` by `H` grid.
//! Blank lines are ignored.

use std::collections::BTreeMap;

use crate::algorithm::canonical::{RawShape, ShapeId};
use crate::algorithm::executor::Query;
use crate::io::configuration::{EMPTY_CELL, OCCUPIED_CELL};
use crate::io::error::{PackingError, Result, WithLine, parse_error};

/// Parsed puzzle input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// Shape definitions sorted by identifier
    pub shapes: Vec<RawShape>,
    /// Queries in input order
    pub queries: Vec<Query>,
}

enum Line<'a> {
    Blank,
    Header(ShapeId),
    Row(&'a str),
    Query(Query),
}

fn parse_number(text: &str, what: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|error| parse_error(&format!("invalid {what} '{}': {error}", text.trim())))
}

fn parse_query(dimensions: &str, counts: &str) -> Result<Query> {
    let (width, height) = dimensions
        .split_once('x')
        .ok_or_else(|| parse_error(&format!("expected 'WxH', got '{dimensions}'")))?;

    let counts = counts
        .split_whitespace()
        .map(|count| parse_number(count, "count"))
        .collect::<Result<Vec<_>>>()?;

    Ok(Query::new(
        parse_number(width, "width")?,
        parse_number(height, "height")?,
        counts,
    ))
}

fn classify(line: &str) -> Result<Line<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Blank);
    }

    if let Some((head, tail)) = line.split_once(':') {
        return if head.contains('x') {
            parse_query(head, tail).map(Line::Query)
        } else if tail.trim().is_empty() {
            parse_number(head, "shape id").map(Line::Header)
        } else {
            Err(parse_error(&format!("unexpected text after shape header '{head}:'")))
        };
    }

    if let Some(symbol) = line
        .chars()
        .find(|&c| c != OCCUPIED_CELL && c != EMPTY_CELL)
    {
        return Err(parse_error(&format!("unexpected cell symbol '{symbol}'")));
    }
    Ok(Line::Row(line))
}

/// Parse puzzle text
///
/// # Errors
///
/// Returns [`PackingError::Parse`] with the offending line if:
/// - A line is neither a header, a shape row nor a query
/// - A shape row appears before any header or after the first query
/// - A shape id is declared twice or has no rows
/// - A number does not parse
pub fn parse_puzzle(input: &str) -> Result<Puzzle> {
    let mut shapes: BTreeMap<ShapeId, (usize, Vec<Vec<bool>>)> = BTreeMap::new();
    let mut queries = Vec::new();
    let mut current: Option<ShapeId> = None;

    for (index, text) in input.lines().enumerate() {
        let number = index + 1;

        match classify(text).at_line(number)? {
            Line::Blank => {}
            Line::Header(id) => {
                if shapes.insert(id, (number, Vec::new())).is_some() {
                    return Err(parse_error(&format!("shape {id} is defined twice")))
                        .at_line(number);
                }
                current = Some(id);
            }
            Line::Row(row) => {
                let (_, rows) = current
                    .filter(|_| queries.is_empty())
                    .and_then(|id| shapes.get_mut(&id))
                    .ok_or_else(|| parse_error(&"shape row outside a shape block".to_owned()))
                    .at_line(number)?;
                rows.push(row.chars().map(|c| c == OCCUPIED_CELL).collect());
            }
            Line::Query(query) => queries.push(query),
        }
    }

    let shapes = shapes
        .into_iter()
        .map(|(id, (header, rows))| {
            if rows.is_empty() {
                Err(parse_error(&format!("shape {id} has no rows"))).at_line(header)
            } else {
                Ok(RawShape { id, rows })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Puzzle { shapes, queries })
}

impl std::str::FromStr for Puzzle {
    type Err = PackingError;

    fn from_str(input: &str) -> Result<Self> {
        parse_puzzle(input)
    }
}
