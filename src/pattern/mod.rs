//! Graph-pattern chains.
//!
//! A pattern is a singly-linked alternation of node elements and relationship
//! elements, built left to right: `node(&a).related(&r).to(&b)`. `related`
//! yields a relationship-in-progress that only `to` can complete, so a
//! half-built relationship can never be rendered as a pattern. Rendering
//! recurses backward through the chain and emits text left to right.

use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::references::{NodeRef, RelationshipRef};
use crate::scope::Environment;
use crate::tree::ToCypher;
use crate::utils::{escape_identifier, escape_label};

/// Direction of a relationship element.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    Left,
    Right,
    Undirected,
}

/// Variable-length bounds on a relationship element.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LengthBound {
    /// `*n`
    Exact(u32),
    /// `*`
    Any,
    /// `*n..`
    Min(u32),
    /// `*..n`
    Max(u32),
    /// `*n..m`
    Range(u32, u32),
}

impl LengthBound {
    fn render(&self) -> String {
        match self {
            LengthBound::Exact(n) => format!("*{}", n),
            LengthBound::Any => "*".to_string(),
            LengthBound::Min(n) => format!("*{}..", n),
            LengthBound::Max(n) => format!("*..{}", n),
            LengthBound::Range(min, max) => format!("*{}..{}", min, max),
        }
    }
}

/// Start a pattern chain at a node.
pub fn node(node_ref: &NodeRef) -> PatternNode {
    PatternNode {
        previous: None,
        node: node_ref.clone(),
        properties: Vec::new(),
        show_labels: true,
        show_variable: true,
    }
}

/// A node element terminating (or starting) a chain. A complete pattern is
/// always held by its last node element.
#[derive(Debug, Clone)]
pub struct PatternNode {
    previous: Option<Box<PatternRel>>,
    node: NodeRef,
    properties: Vec<(String, Expr)>,
    show_labels: bool,
    show_variable: bool,
}

/// A completed relationship element linking back to the chain before it.
#[derive(Debug, Clone)]
struct PatternRel {
    previous: PatternNode,
    rel: RelationshipRef,
    direction: Direction,
    length: Option<LengthBound>,
    properties: Vec<(String, Expr)>,
    show_type: bool,
    show_variable: bool,
}

/// A relationship-in-progress produced by `related`. It cannot be rendered;
/// call `to` with the target node to extend the chain.
#[derive(Debug, Clone)]
pub struct PartialPattern {
    previous: PatternNode,
    rel: RelationshipRef,
    direction: Direction,
    length: Option<LengthBound>,
    properties: Vec<(String, Expr)>,
    show_type: bool,
    show_variable: bool,
}

impl PatternNode {
    /// Attach inline properties rendered inside the node element.
    pub fn with_properties<I, S, E>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<Expr>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn without_labels(mut self) -> Self {
        self.show_labels = false;
        self
    }

    pub fn without_variable(mut self) -> Self {
        self.show_variable = false;
        self
    }

    /// Open a relationship element toward the next node. Defaults to an
    /// outgoing (right-pointing) arrow.
    pub fn related(self, rel: &RelationshipRef) -> PartialPattern {
        PartialPattern {
            previous: self,
            rel: rel.clone(),
            direction: Direction::Right,
            length: None,
            properties: Vec::new(),
            show_type: true,
            show_variable: true,
        }
    }
}

impl PartialPattern {
    pub fn left(mut self) -> Self {
        self.direction = Direction::Left;
        self
    }

    pub fn right(mut self) -> Self {
        self.direction = Direction::Right;
        self
    }

    pub fn undirected(mut self) -> Self {
        self.direction = Direction::Undirected;
        self
    }

    pub fn with_length(mut self, length: LengthBound) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_properties<I, S, E>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<Expr>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn without_type(mut self) -> Self {
        self.show_type = false;
        self
    }

    pub fn without_variable(mut self) -> Self {
        self.show_variable = false;
        self
    }

    /// Complete the relationship with its target node, returning the new
    /// chain end so further `related` calls can extend it.
    pub fn to(self, target: &NodeRef) -> PatternNode {
        PatternNode {
            previous: Some(Box::new(PatternRel {
                previous: self.previous,
                rel: self.rel,
                direction: self.direction,
                length: self.length,
                properties: self.properties,
                show_type: self.show_type,
                show_variable: self.show_variable,
            })),
            node: target.clone(),
            properties: Vec::new(),
            show_labels: true,
            show_variable: true,
        }
    }
}

fn render_properties(
    properties: &[(String, Expr)],
    env: &mut Environment,
) -> Result<String, CypherBuildError> {
    let rendered = properties
        .iter()
        .map(|(key, value)| {
            Ok(format!(
                "{}: {}",
                escape_identifier(key),
                value.to_cypher(env)?
            ))
        })
        .collect::<Result<Vec<String>, CypherBuildError>>()?;
    Ok(format!("{{ {} }}", rendered.join(", ")))
}

impl ToCypher for PatternNode {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut out = String::new();
        if let Some(previous) = &self.previous {
            out.push_str(&previous.to_cypher(env)?);
        }
        out.push('(');
        if self.show_variable {
            out.push_str(&env.resolve(&self.node));
        }
        if self.show_labels {
            for label in self.node.labels() {
                out.push(':');
                out.push_str(&escape_label(label));
            }
        }
        if !self.properties.is_empty() {
            out.push(' ');
            out.push_str(&render_properties(&self.properties, env)?);
        }
        out.push(')');
        Ok(out)
    }
}

impl ToCypher for PatternRel {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut out = self.previous.to_cypher(env)?;
        out.push_str(match self.direction {
            Direction::Left => "<-[",
            Direction::Right | Direction::Undirected => "-[",
        });
        if self.show_variable {
            out.push_str(&env.resolve(&self.rel));
        }
        if self.show_type {
            if let Some(rel_type) = self.rel.rel_type() {
                out.push(':');
                out.push_str(&escape_label(rel_type));
            }
        }
        if let Some(length) = &self.length {
            out.push_str(&length.render());
        }
        if !self.properties.is_empty() {
            out.push(' ');
            out.push_str(&render_properties(&self.properties, env)?);
        }
        out.push_str(match self.direction {
            Direction::Right => "]->",
            Direction::Left | Direction::Undirected => "]-",
        });
        Ok(out)
    }
}
