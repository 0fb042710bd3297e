/// parse task documents with structure like
/// ```text
/// integral1
///   expression: "3*x^2 + 2*x"
///   lower: 0
///   upper: 1
/// settings
///   loglevel: info
/// ```
/// i.e. titles followed by pairs key - list of values. Sections keep the order they
/// have in the document.
///
/*
 a title is a word on its own; every following `key: value, value` pair belongs to it
 until the next title. Values are typed on the fly (integer, float, bool, string);
 a value in double quotes is always a string and may contain spaces and commas.
 Lines starting with //, #, % or ; are comments.
*/
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, map_res, recognize},
    error::{Error, ErrorKind},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Vec<Value>>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// integers are accepted where a float is expected
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
    // the text form, used for expressions and bounds
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// One titled block of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub entries: SectionMap,
}

impl Section {
    /// first value under `key`
    pub fn first(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(|values| values.first())
    }
}

fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// Parses a title (word characters without spaces)
pub fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = identifier(input)?;
    // Ignore trailing whitespace and newline characters
    let input = input.trim();
    Ok((input, result))
}

/// Parses a key (word characters without spaces)
pub fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let mut parser = map(
        delimited(char('"'), take_while(|c: char| c != '"' && c != '\n'), char('"')),
        |s: &str| Value::String(s.to_string()),
    );
    parser.parse(input)
}

fn parse_bare(input: &str) -> IResult<&str, Value> {
    // a single value - excluding commas, whitespace, newlines, and semicolons
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | ';'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

pub fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare)).parse(input)
}

pub fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    // comma separated, spaces around the comma dropped
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// Parses a key-value pair where value is a list
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

/// Parses a section with a title and multiple key-value pairs. A key given twice is a
/// `Failure` pointing at the second occurrence.
pub fn parse_section(input: &str) -> IResult<&str, Section> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (mut input, _) = multispace0(input)?;

    let mut entries = HashMap::new();
    loop {
        let at_key = input;
        let (rest, (key, values)) = match terminated(parse_key_value_pair, space0).parse(input) {
            Ok(parsed) => parsed,
            // the next title or the end of the document
            Err(nom::Err::Error(e)) => {
                if entries.is_empty() {
                    return Err(nom::Err::Error(e));
                }
                break;
            }
            Err(e) => return Err(e),
        };
        if entries.contains_key(&key) {
            return Err(nom::Err::Failure(Error::new(at_key, ErrorKind::Verify)));
        }
        entries.insert(key, values);
        input = rest;
    }
    Ok((input, Section { title, entries }))
}

/// Filters out comment lines (starting with //, #, %, or ;) and empty lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses all sections, in document order
pub fn parse_document(input: &str) -> IResult<&str, Vec<Section>> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    parser.parse(input)
}

/// Parses a whole task document: comments removed, nothing may be left over.
pub fn parse_task_document(input: &str) -> Result<Vec<Section>, String> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Err("document has no sections".to_string());
    }
    match parse_document(filtered.trim_start()) {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining.lines().next().unwrap_or(remaining)
                ));
            }
            Ok(sections)
        }
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::Verify => Err(format!(
            "duplicate key at '{}'",
            e.input.lines().next().unwrap_or(e.input)
        )),
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}
