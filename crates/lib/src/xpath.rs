//! # Path Queries
//!
//! Evaluates XPath 1.0 expressions against parsed metadata documents and
//! normalizes the number of matches into an [`Extraction`].

use crate::errors::HarvestError;
use std::collections::BTreeMap;
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};

/// Prefix to namespace URI bindings available to a path query.
pub type Namespaces = BTreeMap<String, String>;

/// The outcome of a path query, shaped by how many nodes matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    /// Nothing matched.
    Absent,
    /// Exactly one match, and list output was not forced.
    Single(T),
    /// Every match, in document order.
    Many(Vec<T>),
}

impl<T> Extraction<T> {
    /// Shapes a list of matches. The shape depends only on the match count and
    /// `force_list`; the matches themselves are never reordered or dropped.
    pub fn from_matches(mut matches: Vec<T>, force_list: bool) -> Self {
        match matches.len() {
            0 => Extraction::Absent,
            1 if !force_list => match matches.pop() {
                Some(only) => Extraction::Single(only),
                None => Extraction::Absent,
            },
            _ => Extraction::Many(matches),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Extraction::Absent)
    }

    pub fn len(&self) -> usize {
        match self {
            Extraction::Absent => 0,
            Extraction::Single(_) => 1,
            Extraction::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            Extraction::Absent => None,
            Extraction::Single(item) => Some(item),
            Extraction::Many(items) => items.first(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Extraction::Absent => Vec::new(),
            Extraction::Single(item) => vec![item],
            Extraction::Many(items) => items,
        }
    }

    /// Applies `f` to every match, keeping the shape.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Extraction<U> {
        match self {
            Extraction::Absent => Extraction::Absent,
            Extraction::Single(item) => Extraction::Single(f(item)),
            Extraction::Many(items) => Extraction::Many(items.into_iter().map(f).collect()),
        }
    }
}

impl<T: AsRef<str>> Extraction<T> {
    /// True if any matched value contains `needle` (case-sensitive).
    pub fn contains_substring(&self, needle: &str) -> bool {
        match self {
            Extraction::Absent => false,
            Extraction::Single(value) => value.as_ref().contains(needle),
            Extraction::Many(values) => values.iter().any(|v| v.as_ref().contains(needle)),
        }
    }
}

impl<'d> Extraction<Node<'d>> {
    /// The string value of every matched node.
    pub fn texts(self) -> Extraction<String> {
        self.map(|node| node.string_value())
    }
}

/// Evaluates `path` with `root` as the context node.
///
/// Returns [`Extraction::Absent`] for zero matches, [`Extraction::Single`] for
/// exactly one match unless `force_list` is set, and [`Extraction::Many`] in
/// document order otherwise.
///
/// A path that is empty or fails to compile is reported as
/// [`HarvestError::Query`]. So is a path using a prefix missing from
/// `namespaces`, or one that evaluates to something other than a node-set.
pub fn safe_xpath<'d, N>(
    root: N,
    path: &str,
    namespaces: &Namespaces,
    force_list: bool,
) -> Result<Extraction<Node<'d>>, HarvestError>
where
    N: Into<Node<'d>>,
{
    let query_error = |message: String| HarvestError::Query {
        path: path.to_string(),
        message,
    };

    let xpath = Factory::new()
        .build(path)
        .map_err(|e| query_error(e.to_string()))?
        .ok_or_else(|| query_error("empty expression".to_string()))?;

    // sxd-xpath panics on a name test whose prefix has no binding.
    if let Some(prefix) = qname_prefixes(path)
        .into_iter()
        .find(|prefix| !namespaces.contains_key(*prefix))
    {
        return Err(query_error(format!("unbound namespace prefix `{prefix}`")));
    }

    let mut context = Context::new();
    for (prefix, uri) in namespaces {
        context.set_namespace(prefix, uri);
    }

    match xpath
        .evaluate(&context, root)
        .map_err(|e| query_error(e.to_string()))?
    {
        Value::Nodeset(nodes) => Ok(Extraction::from_matches(nodes.document_order(), force_list)),
        other => Err(query_error(format!(
            "expression does not select nodes (evaluated to {other:?})"
        ))),
    }
}

/// The prefixes of every `prefix:local` name in `path`.
///
/// String literals and `axis::` separators are skipped.
fn qname_prefixes(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let is_name_start = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b >= 0x80;
    let is_name_char = |b: u8| is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.';

    let mut prefixes = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\'' || b == b'"' {
            i = match path[i + 1..].find(b as char) {
                Some(len) => i + len + 2,
                None => bytes.len(),
            };
        } else if is_name_start(b) {
            let start = i;
            while i < bytes.len() && is_name_char(bytes[i]) {
                i += 1;
            }
            if bytes.get(i) == Some(&b':') && bytes.get(i + 1) != Some(&b':') {
                prefixes.push(&path[start..i]);
            }
        } else {
            i += 1;
        }
    }
    prefixes
}
