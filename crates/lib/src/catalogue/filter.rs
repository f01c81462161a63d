//! OGC Filter Encoding predicates used to constrain a catalogue search.

/// A filter expression over catalogue queryables such as `csw:AnyText`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    PropertyIsLike {
        property: String,
        pattern: String,
        wildcard: char,
        single_char: char,
        escape_char: char,
    },
    PropertyIsEqualTo {
        property: String,
        literal: String,
    },
    PropertyIsNotEqualTo {
        property: String,
        literal: String,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// A `PropertyIsLike` predicate with the usual `%`, `_` and `\` wildcards.
    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::PropertyIsLike {
            property: property.into(),
            pattern: pattern.into(),
            wildcard: '%',
            single_char: '_',
            escape_char: '\\',
        }
    }

    /// Matches records whose full text contains the given pattern.
    pub fn any_text_like(pattern: impl Into<String>) -> Self {
        Self::like("csw:AnyText", pattern)
    }

    pub fn equal_to(property: impl Into<String>, literal: impl Into<String>) -> Self {
        Filter::PropertyIsEqualTo {
            property: property.into(),
            literal: literal.into(),
        }
    }

    pub fn not_equal_to(property: impl Into<String>, literal: impl Into<String>) -> Self {
        Filter::PropertyIsNotEqualTo {
            property: property.into(),
            literal: literal.into(),
        }
    }

    /// Combines a list of alternatives the way a CSW constraint list does: a
    /// single entry stands alone, several are joined with `Or`.
    pub fn any_of(mut filters: Vec<Filter>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Filter::Or(filters)),
        }
    }
}

impl std::ops::Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }
}
