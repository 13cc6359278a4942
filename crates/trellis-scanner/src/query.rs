//! Node query expressions
//!
//! A small path language for selecting component nodes in a deployment
//! descriptor:
//!
//! - `/components/component` selects children step by step from the root
//! - `//component` selects matching descendants at any depth
//! - `*` matches any element name
//! - `a:component` matches on the local name, the prefix is ignored
//!
//! Predicates, attributes and other axes are rejected.

use roxmltree::{Document, Node};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("query must start with '/'")]
    NotAbsolute,

    #[error("step {index} is empty")]
    EmptyStep { index: usize },

    #[error("unsupported step {step:?}")]
    Unsupported { step: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Local(String),
}

impl NameTest {
    fn matches(&self, node: &Node<'_, '_>) -> bool {
        if !node.is_element() {
            return false;
        }
        match self {
            NameTest::Any => true,
            NameTest::Local(name) => node.tag_name().name() == name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NameTest,
}

/// A parsed node query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeQuery {
    expression: String,
    steps: Vec<Step>,
}

impl NodeQuery {
    pub fn parse(expression: &str) -> Result<Self, QueryError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        let Some(mut rest) = trimmed.strip_prefix('/') else {
            return Err(QueryError::NotAbsolute);
        };

        let mut steps = Vec::new();
        let mut axis = Axis::Child;
        loop {
            if let Some(after) = rest.strip_prefix('/') {
                axis = Axis::Descendant;
                rest = after;
            }

            let (raw, remainder) = match rest.find('/') {
                Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
                None => (rest, None),
            };

            if raw.is_empty() {
                return Err(QueryError::EmptyStep { index: steps.len() });
            }
            steps.push(Step {
                axis,
                test: parse_name_test(raw)?,
            });

            match remainder {
                Some(next) => {
                    rest = next;
                    axis = Axis::Child;
                }
                None => break,
            }
        }

        Ok(Self {
            expression: trimmed.to_string(),
            steps,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Select matching element nodes in document order of discovery
    pub fn select<'a, 'input>(&self, document: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
        let mut context = vec![document.root()];

        for step in &self.steps {
            let mut next: Vec<Node<'a, 'input>> = Vec::new();
            for node in &context {
                let candidates: Box<dyn Iterator<Item = Node<'a, 'input>> + 'a> = match step.axis {
                    Axis::Child => Box::new(node.children()),
                    Axis::Descendant => Box::new(node.descendants().skip(1)),
                };
                for candidate in candidates.filter(|n| step.test.matches(n)) {
                    if !next.contains(&candidate) {
                        next.push(candidate);
                    }
                }
            }
            context = next;
        }

        context
    }
}

impl fmt::Display for NodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

fn parse_name_test(raw: &str) -> Result<NameTest, QueryError> {
    if raw == "*" {
        return Ok(NameTest::Any);
    }

    let local = match raw.split_once(':') {
        Some((_prefix, local)) => local,
        None => raw,
    };

    let valid = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(QueryError::Unsupported {
            step: raw.to_string(),
        });
    }

    Ok(NameTest::Local(local.to_string()))
}
