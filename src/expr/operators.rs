//! Boolean, comparison, and math combinators.
//!
//! The n-ary boolean folds take optional operands so callers can thread
//! "maybe a predicate" values straight through: absent operands are dropped,
//! zero usable operands fold to `None`, a single operand is returned
//! unwrapped, and two or more render as one flat parenthesized group.

use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::scope::Environment;
use crate::tree::ToCypher;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BooleanOperator {
    And,
    Or,
    Xor,
}

impl BooleanOperator {
    fn symbol(self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
            BooleanOperator::Xor => "XOR",
        }
    }
}

/// An n-ary boolean combination. Always holds at least two operands; the
/// folds return single operands unwrapped instead of building one of these.
#[derive(Debug, Clone)]
pub struct BooleanOp {
    pub(crate) operator: BooleanOperator,
    pub(crate) operands: Vec<Expr>,
}

impl ToCypher for BooleanOp {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let rendered = self
            .operands
            .iter()
            .map(|operand| operand.to_cypher(env))
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        let joined = rendered.join(&format!(" {} ", self.operator.symbol()));
        Ok(format!("({})", joined))
    }
}

fn fold_boolean<I>(operator: BooleanOperator, operands: I) -> Option<Expr>
where
    I: IntoIterator<Item = Option<Expr>>,
{
    let mut usable: Vec<Expr> = operands.into_iter().flatten().collect();
    match usable.len() {
        0 => None,
        1 => usable.pop(),
        _ => Some(Expr::Boolean(BooleanOp {
            operator,
            operands: usable,
        })),
    }
}

pub fn and<I>(operands: I) -> Option<Expr>
where
    I: IntoIterator<Item = Option<Expr>>,
{
    fold_boolean(BooleanOperator::And, operands)
}

pub fn or<I>(operands: I) -> Option<Expr>
where
    I: IntoIterator<Item = Option<Expr>>,
{
    fold_boolean(BooleanOperator::Or, operands)
}

pub fn xor<I>(operands: I) -> Option<Expr>
where
    I: IntoIterator<Item = Option<Expr>>,
{
    fold_boolean(BooleanOperator::Xor, operands)
}

/// Negate a predicate. A wrapped boolean combination already carries its own
/// parentheses and is rendered as `NOT <inner>`; any other expression kind is
/// wrapped as `NOT (<inner>)`. This asymmetry is part of the text contract.
pub fn not(inner: Expr) -> Expr {
    Expr::Not(Box::new(inner))
}

pub(crate) fn render_not(inner: &Expr, env: &mut Environment) -> Result<String, CypherBuildError> {
    let text = inner.to_cypher(env)?;
    match inner {
        Expr::Boolean(_) => Ok(format!("NOT {}", text)),
        _ => Ok(format!("NOT ({})", text)),
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    In,
    StartsWith,
    EndsWith,
    Contains,
    RegexMatch,
    IsNull,
    IsNotNull,
}

impl ComparisonOperator {
    fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "<>",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanEqual => ">=",
            ComparisonOperator::In => "IN",
            ComparisonOperator::StartsWith => "STARTS WITH",
            ComparisonOperator::EndsWith => "ENDS WITH",
            ComparisonOperator::Contains => "CONTAINS",
            ComparisonOperator::RegexMatch => "=~",
            ComparisonOperator::IsNull => "IS NULL",
            ComparisonOperator::IsNotNull => "IS NOT NULL",
        }
    }
}

/// A binary comparison, or a unary postfix check when `right` is absent.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub(crate) left: Expr,
    pub(crate) operator: ComparisonOperator,
    pub(crate) right: Option<Expr>,
}

impl ToCypher for Comparison {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let left = self.left.to_cypher(env)?;
        match &self.right {
            Some(right) => Ok(format!(
                "{} {} {}",
                left,
                self.operator.symbol(),
                right.to_cypher(env)?
            )),
            None => Ok(format!("{} {}", left, self.operator.symbol())),
        }
    }
}

fn binary(left: impl Into<Expr>, operator: ComparisonOperator, right: impl Into<Expr>) -> Expr {
    Expr::Comparison(Box::new(Comparison {
        left: left.into(),
        operator,
        right: Some(right.into()),
    }))
}

fn postfix(left: impl Into<Expr>, operator: ComparisonOperator) -> Expr {
    Expr::Comparison(Box::new(Comparison {
        left: left.into(),
        operator,
        right: None,
    }))
}

pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::Equal, right)
}

pub fn neq(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::NotEqual, right)
}

pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::LessThan, right)
}

pub fn lte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::LessThanEqual, right)
}

pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::GreaterThan, right)
}

pub fn gte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::GreaterThanEqual, right)
}

pub fn in_list(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::In, right)
}

pub fn starts_with(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::StartsWith, right)
}

pub fn ends_with(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::EndsWith, right)
}

pub fn contains(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::Contains, right)
}

pub fn matches(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binary(left, ComparisonOperator::RegexMatch, right)
}

pub fn is_null(left: impl Into<Expr>) -> Expr {
    postfix(left, ComparisonOperator::IsNull)
}

pub fn is_not_null(left: impl Into<Expr>) -> Expr {
    postfix(left, ComparisonOperator::IsNotNull)
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MathOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Exponentiation,
}

impl MathOperator {
    fn symbol(self) -> &'static str {
        match self {
            MathOperator::Addition => "+",
            MathOperator::Subtraction => "-",
            MathOperator::Multiplication => "*",
            MathOperator::Division => "/",
            MathOperator::Modulo => "%",
            MathOperator::Exponentiation => "^",
        }
    }
}

/// An n-ary arithmetic or string-concatenation application. Operands are
/// joined by the operator with no implicit grouping.
#[derive(Debug, Clone)]
pub struct MathOp {
    pub(crate) operator: MathOperator,
    pub(crate) operands: Vec<Expr>,
}

impl ToCypher for MathOp {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let rendered = self
            .operands
            .iter()
            .map(|operand| operand.to_cypher(env))
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        Ok(rendered.join(&format!(" {} ", self.operator.symbol())))
    }
}

fn math<I>(operator: MathOperator, operands: I) -> Expr
where
    I: IntoIterator<Item = Expr>,
{
    Expr::Math(MathOp {
        operator,
        operands: operands.into_iter().collect(),
    })
}

pub fn plus<I: IntoIterator<Item = Expr>>(operands: I) -> Expr {
    math(MathOperator::Addition, operands)
}

pub fn minus<I: IntoIterator<Item = Expr>>(operands: I) -> Expr {
    math(MathOperator::Subtraction, operands)
}

pub fn mult<I: IntoIterator<Item = Expr>>(operands: I) -> Expr {
    math(MathOperator::Multiplication, operands)
}

pub fn div<I: IntoIterator<Item = Expr>>(operands: I) -> Expr {
    math(MathOperator::Division, operands)
}

pub fn modulo<I: IntoIterator<Item = Expr>>(operands: I) -> Expr {
    math(MathOperator::Modulo, operands)
}

pub fn pow<I: IntoIterator<Item = Expr>>(operands: I) -> Expr {
    math(MathOperator::Exponentiation, operands)
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
    fn test_and_with_no_operands_is_absent() {
        assert!(and([None, None]).is_none());
        assert!(and(std::iter::empty()).is_none());
    }

    #[test]
    fn test_and_with_one_operand_is_unwrapped() {
        let v = Variable::named("x");
        let folded = and([Some(is_null(&v)), None]).unwrap();
        assert_eq!(render(&folded), "x IS NULL");
    }

    #[test]
    fn test_and_with_three_operands_renders_one_flat_group() {
        let a = Variable::named("a");
        let b = Variable::named("b");
        let c = Variable::named("c");
        let folded = and([
            Some(eq(&a, 1)),
            Some(eq(&b, 2)),
            Some(eq(&c, 3)),
        ])
        .unwrap();
        assert_eq!(render(&folded), "(a = 1 AND b = 2 AND c = 3)");
    }

    #[test]
    fn test_or_and_xor_symbols() {
        let a = Variable::named("a");
        let b = Variable::named("b");
        let ored = or([Some(eq(&a, 1)), Some(eq(&b, 2))]).unwrap();
        assert_eq!(render(&ored), "(a = 1 OR b = 2)");
        let xored = xor([Some(eq(&a, 1)), Some(eq(&b, 2))]).unwrap();
        assert_eq!(render(&xored), "(a = 1 XOR b = 2)");
    }

    #[test]
    fn test_not_over_boolean_combinator_adds_no_parens() {
        let a = Variable::named("a");
        let b = Variable::named("b");
        let folded = and([Some(eq(&a, 1)), Some(eq(&b, 2))]).unwrap();
        assert_eq!(render(&not(folded)), "NOT (a = 1 AND b = 2)");
    }

    #[test]
    fn test_not_over_other_expressions_adds_parens() {
        let a = Variable::named("a");
        assert_eq!(render(&not(eq(&a, 1))), "NOT (a = 1)");
        assert_eq!(render(&not(is_null(&a))), "NOT (a IS NULL)");
    }

    #[test]
    fn test_unary_postfix_has_no_trailing_space() {
        let a = Variable::named("a");
        assert_eq!(render(&is_not_null(&a)), "a IS NOT NULL");
    }

    #[test]
    fn test_math_joins_without_grouping() {
        let a = Variable::named("a");
        let b = Variable::named("b");
        let sum = plus([Expr::from(&a), Expr::from(&b), Expr::from(1)]);
        assert_eq!(render(&sum), "a + b + 1");
    }
}
