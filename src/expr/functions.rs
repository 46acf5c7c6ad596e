//! Scalar and aggregate function call expressions.

use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::pattern::PatternNode;
use crate::scope::Environment;
use crate::tree::ToCypher;

/// A function invocation, e.g. `coalesce(this0.title, "unknown")` or
/// `count(DISTINCT this0)`.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    name: String,
    args: Vec<Expr>,
    distinct: bool,
    star: bool,
}

impl FunctionCall {
    pub fn new<I>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        FunctionCall {
            name: name.into(),
            args: args.into_iter().collect(),
            distinct: false,
            star: false,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    fn star(name: &str) -> Self {
        FunctionCall {
            name: name.to_string(),
            args: Vec::new(),
            distinct: false,
            star: true,
        }
    }
}

impl ToCypher for FunctionCall {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        if self.star {
            return Ok(format!("{}(*)", self.name));
        }
        let args = self
            .args
            .iter()
            .map(|arg| arg.to_cypher(env))
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        Ok(format!("{}({}{})", self.name, distinct, args.join(", ")))
    }
}

fn call1(name: &str, arg: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new(name, [arg.into()]))
}

pub fn coalesce<I: IntoIterator<Item = Expr>>(args: I) -> Expr {
    Expr::Function(FunctionCall::new("coalesce", args))
}

pub fn count(arg: impl Into<Expr>) -> Expr {
    call1("count", arg)
}

pub fn count_star() -> Expr {
    Expr::Function(FunctionCall::star("count"))
}

pub fn count_distinct(arg: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("count", [arg.into()]).distinct())
}

pub fn min(arg: impl Into<Expr>) -> Expr {
    call1("min", arg)
}

pub fn max(arg: impl Into<Expr>) -> Expr {
    call1("max", arg)
}

pub fn sum(arg: impl Into<Expr>) -> Expr {
    call1("sum", arg)
}

pub fn avg(arg: impl Into<Expr>) -> Expr {
    call1("avg", arg)
}

pub fn collect(arg: impl Into<Expr>) -> Expr {
    call1("collect", arg)
}

pub fn labels(arg: impl Into<Expr>) -> Expr {
    call1("labels", arg)
}

pub fn type_of(arg: impl Into<Expr>) -> Expr {
    call1("type", arg)
}

pub fn id_of(arg: impl Into<Expr>) -> Expr {
    call1("id", arg)
}

pub fn size(arg: impl Into<Expr>) -> Expr {
    call1("size", arg)
}

pub fn head(arg: impl Into<Expr>) -> Expr {
    call1("head", arg)
}

pub fn last(arg: impl Into<Expr>) -> Expr {
    call1("last", arg)
}

/// Pattern-existence predicate: `EXISTS { (a)-[:REL]->(b) }`.
pub fn exists(pattern: PatternNode) -> Expr {
    Expr::Exists(Box::new(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::Variable;

    fn render(expr: &Expr) -> String {
        let mut env = Environment::new(None);
        expr.to_cypher(&mut env).unwrap()
    }

    #[test]
    fn test_function_call_rendering() {
        let v = Variable::named("n");
        assert_eq!(render(&count(&v)), "count(n)");
        assert_eq!(render(&count_star()), "count(*)");
        assert_eq!(render(&count_distinct(&v)), "count(DISTINCT n)");
    }

    #[test]
    fn test_coalesce_joins_arguments() {
        let v = Variable::named("n");
        let fallback = Expr::from("unknown");
        let call = coalesce([v.property("title").into(), fallback]);
        assert_eq!(render(&call), "coalesce(n.title, \"unknown\")");
    }
}
