//! Expression tree: literals, reference uses, combinators, and function
//! calls, each rendering itself against the compile-time environment.

pub mod case;
pub mod functions;
pub mod literal;
pub mod operators;

use crate::errors::CypherBuildError;
use crate::pattern::PatternNode;
use crate::references::{NodeRef, Param, PathRef, PropertyAccess, RelationshipRef, Variable};
use crate::scope::Environment;
use crate::tree::ToCypher;
use crate::utils::{escape_identifier, escape_label};

pub use case::{Case, CaseWhen};
pub use functions::FunctionCall;
pub use literal::Literal;
pub use operators::{BooleanOp, BooleanOperator, Comparison, ComparisonOperator, MathOp, MathOperator};

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Variable(Variable),
    Node(NodeRef),
    Relationship(RelationshipRef),
    Path(PathRef),
    Param(Param),
    Property(PropertyAccess),
    Boolean(BooleanOp),
    Not(Box<Expr>),
    Comparison(Box<Comparison>),
    Math(MathOp),
    List(Vec<Expr>),
    Map(Vec<(String, Expr)>),
    Function(FunctionCall),
    Case(Case),
    HasLabel(HasLabel),
    Exists(Box<PatternNode>),
    /// Raw query text spliced in verbatim. Escape hatch; no escaping applied.
    Raw(String),
}

impl Expr {
    pub fn raw(text: impl Into<String>) -> Self {
        Expr::Raw(text.into())
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        Expr::List(items.into_iter().collect())
    }

    pub fn map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Expr)>,
        S: Into<String>,
    {
        Expr::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Binary AND, rendered as one flat parenthesized group.
    pub fn and(self, other: Expr) -> Expr {
        Expr::Boolean(BooleanOp {
            operator: BooleanOperator::And,
            operands: vec![self, other],
        })
    }

    /// Binary OR, rendered as one flat parenthesized group.
    pub fn or(self, other: Expr) -> Expr {
        Expr::Boolean(BooleanOp {
            operator: BooleanOperator::Or,
            operands: vec![self, other],
        })
    }
}

/// Label-membership check, e.g. `this0:`Actor`:`Director``. Requires at
/// least one label.
#[derive(Debug, Clone)]
pub struct HasLabel {
    subject: Box<Expr>,
    labels: Vec<String>,
}

pub fn has_label<I, S>(subject: impl Into<Expr>, labels: I) -> Result<Expr, CypherBuildError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    if labels.is_empty() {
        return Err(CypherBuildError::EmptyLabelList);
    }
    Ok(Expr::HasLabel(HasLabel {
        subject: Box::new(subject.into()),
        labels,
    }))
}

impl ToCypher for HasLabel {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut out = self.subject.to_cypher(env)?;
        for label in &self.labels {
            out.push(':');
            out.push_str(&escape_label(label));
        }
        Ok(out)
    }
}

impl ToCypher for PropertyAccess {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut out = self.subject().to_cypher(env)?;
        for segment in self.path() {
            out.push('.');
            out.push_str(&escape_identifier(segment));
        }
        Ok(out)
    }
}

impl ToCypher for Expr {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        match self {
            Expr::Literal(lit) => lit.to_cypher(env),
            Expr::Variable(v) => Ok(env.resolve(v)),
            Expr::Node(n) => Ok(env.resolve(n)),
            Expr::Relationship(r) => Ok(env.resolve(r)),
            Expr::Path(p) => Ok(env.resolve(p)),
            Expr::Param(p) => Ok(format!("${}", env.resolve(p))),
            Expr::Property(prop) => prop.to_cypher(env),
            Expr::Boolean(op) => op.to_cypher(env),
            Expr::Not(inner) => operators::render_not(inner, env),
            Expr::Comparison(cmp) => cmp.to_cypher(env),
            Expr::Math(op) => op.to_cypher(env),
            Expr::List(items) => {
                let rendered = items
                    .iter()
                    .map(|item| item.to_cypher(env))
                    .collect::<Result<Vec<String>, CypherBuildError>>()?;
                Ok(format!("[{}]", rendered.join(", ")))
            }
            Expr::Map(entries) => {
                let rendered = entries
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
            Expr::Function(call) => call.to_cypher(env),
            Expr::Case(case) => case.to_cypher(env),
            Expr::HasLabel(check) => check.to_cypher(env),
            Expr::Exists(pattern) => Ok(format!("EXISTS {{ {} }}", pattern.to_cypher(env)?)),
            Expr::Raw(text) => Ok(text.clone()),
        }
    }
}

impl From<Literal> for Expr {
    fn from(value: Literal) -> Self {
        Expr::Literal(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Literal(Literal::from(value))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::Literal(Literal::from(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Literal(Literal::Integer(value as i64))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Literal(Literal::Float(value))
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Literal(Literal::Boolean(value))
    }
}

impl From<Variable> for Expr {
    fn from(value: Variable) -> Self {
        Expr::Variable(value)
    }
}

impl From<&Variable> for Expr {
    fn from(value: &Variable) -> Self {
        Expr::Variable(value.clone())
    }
}

impl From<NodeRef> for Expr {
    fn from(value: NodeRef) -> Self {
        Expr::Node(value)
    }
}

impl From<&NodeRef> for Expr {
    fn from(value: &NodeRef) -> Self {
        Expr::Node(value.clone())
    }
}

impl From<RelationshipRef> for Expr {
    fn from(value: RelationshipRef) -> Self {
        Expr::Relationship(value)
    }
}

impl From<&RelationshipRef> for Expr {
    fn from(value: &RelationshipRef) -> Self {
        Expr::Relationship(value.clone())
    }
}

impl From<PathRef> for Expr {
    fn from(value: PathRef) -> Self {
        Expr::Path(value)
    }
}

impl From<&PathRef> for Expr {
    fn from(value: &PathRef) -> Self {
        Expr::Path(value.clone())
    }
}

impl From<Param> for Expr {
    fn from(value: Param) -> Self {
        Expr::Param(value)
    }
}

impl From<&Param> for Expr {
    fn from(value: &Param) -> Self {
        Expr::Param(value.clone())
    }
}

impl From<PropertyAccess> for Expr {
    fn from(value: PropertyAccess) -> Self {
        Expr::Property(value)
    }
}

impl From<Case> for Expr {
    fn from(value: Case) -> Self {
        Expr::Case(value)
    }
}

impl From<FunctionCall> for Expr {
    fn from(value: FunctionCall) -> Self {
        Expr::Function(value)
    }
}
