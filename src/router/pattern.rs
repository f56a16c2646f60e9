//! Path patterns like `books/{id}` or `files/{path+}`.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must equal the request segment.
    Literal(String),
    /// Binds exactly one segment.
    Var(String),
    /// Binds all remaining segments (at least one), joined with `/`.
    Rest(String),
}

/// Segment-wise path pattern.
///
/// `{name}` binds one segment, `{name+}` binds the rest of the path and may
/// only appear last. Leading and trailing slashes are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

/// Variables bound by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn bind(&mut self, name: &str, value: String) {
        self.values.insert(name.to_string(), value);
    }
}

impl Pattern {
    /// Parse a pattern.
    ///
    /// # Panics
    ///
    /// If a `{name+}` segment is not last, or a variable name is empty.
    /// Patterns are fixed at endpoint registration, so a bad one is a
    /// programming error.
    pub fn parse(source: &str) -> Self {
        let parts: Vec<&str> = source.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(var) => match var.strip_suffix('+') {
                    Some(rest) => {
                        assert!(
                            i == parts.len() - 1,
                            "pattern {:?}: {{{}+}} must be the last segment",
                            source,
                            rest
                        );
                        Segment::Rest(Self::var_name(source, rest))
                    }
                    None => Segment::Var(Self::var_name(source, var)),
                },
                None => Segment::Literal(part.to_string()),
            };
            segments.push(segment);
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    fn var_name(source: &str, name: &str) -> String {
        assert!(!name.is_empty(), "pattern {:?}: empty variable name", source);
        name.to_string()
    }

    /// Match request segments, returning the bound variables.
    pub fn matches(&self, path: &[&str]) -> Option<Params> {
        let mut params = Params::default();
        let mut rest = path;

        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => {
                    let (head, tail) = rest.split_first()?;
                    if *head != lit.as_str() {
                        return None;
                    }
                    rest = tail;
                }
                Segment::Var(name) => {
                    let (head, tail) = rest.split_first()?;
                    params.bind(name, head.to_string());
                    rest = tail;
                }
                Segment::Rest(name) => {
                    if rest.is_empty() {
                        return None;
                    }
                    params.bind(name, rest.join("/"));
                    rest = &[];
                }
            }
        }

        rest.is_empty().then_some(params)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
