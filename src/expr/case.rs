//! CASE expressions with the two-step when/then protocol.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::scope::Environment;
use crate::tree::ToCypher;

/// A CASE expression. `when` opens a branch immediately; the branch must be
/// completed with `then` before the expression can render, otherwise
/// compilation reports the dangling branch.
#[derive(Debug, Clone)]
pub struct Case {
    inner: Rc<RefCell<CaseInner>>,
}

#[derive(Debug)]
struct CaseInner {
    subject: Option<Expr>,
    branches: Vec<(Expr, Option<Expr>)>,
    else_expr: Option<Expr>,
}

impl Case {
    /// A searched CASE (`CASE WHEN <cond> THEN <result> ... END`).
    pub fn new() -> Self {
        Case {
            inner: Rc::new(RefCell::new(CaseInner {
                subject: None,
                branches: Vec::new(),
                else_expr: None,
            })),
        }
    }

    /// A simple CASE comparing a subject expression against each WHEN value.
    pub fn on(subject: impl Into<Expr>) -> Self {
        Case {
            inner: Rc::new(RefCell::new(CaseInner {
                subject: Some(subject.into()),
                branches: Vec::new(),
                else_expr: None,
            })),
        }
    }

    /// Open a branch. The branch is registered now and completed by `then`.
    pub fn when(&self, condition: impl Into<Expr>) -> CaseWhen {
        let index = {
            let mut inner = self.inner.borrow_mut();
            inner.branches.push((condition.into(), None));
            inner.branches.len() - 1
        };
        CaseWhen {
            case: self.clone(),
            index,
        }
    }

    pub fn otherwise(self, result: impl Into<Expr>) -> Self {
        self.inner.borrow_mut().else_expr = Some(result.into());
        self
    }
}

impl Default for Case {
    fn default() -> Self {
        Self::new()
    }
}

/// A CASE branch awaiting its result.
pub struct CaseWhen {
    case: Case,
    index: usize,
}

impl CaseWhen {
    pub fn then(self, result: impl Into<Expr>) -> Case {
        self.case.inner.borrow_mut().branches[self.index].1 = Some(result.into());
        self.case
    }
}

impl ToCypher for Case {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let inner = self.inner.borrow();
        let mut lines = Vec::with_capacity(inner.branches.len() + 2);
        match &inner.subject {
            Some(subject) => lines.push(format!("CASE {}", subject.to_cypher(env)?)),
            None => lines.push("CASE".to_string()),
        }
        for (index, (condition, result)) in inner.branches.iter().enumerate() {
            let result = result
                .as_ref()
                .ok_or(CypherBuildError::CaseWhenWithoutResult(index))?;
            lines.push(format!(
                "    WHEN {} THEN {}",
                condition.to_cypher(env)?,
                result.to_cypher(env)?
            ));
        }
        if let Some(else_expr) = &inner.else_expr {
            lines.push(format!("    ELSE {}", else_expr.to_cypher(env)?));
        }
        lines.push("END".to_string());
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::operators::eq;
    use crate::references::Variable;

    #[test]
    fn test_searched_case_rendering() {
        let n = Variable::named("n");
        let case = Case::new()
            .when(eq(n.property("age"), 1))
            .then("one")
            .otherwise("many");
        let mut env = Environment::new(None);
        assert_eq!(
            case.to_cypher(&mut env).unwrap(),
            "CASE\n    WHEN n.age = 1 THEN \"one\"\n    ELSE \"many\"\nEND"
        );
    }

    #[test]
    fn test_simple_case_renders_subject() {
        let n = Variable::named("n");
        let case = Case::on(n.property("age"));
        case.when(1).then("one");
        let mut env = Environment::new(None);
        assert_eq!(
            case.to_cypher(&mut env).unwrap(),
            "CASE n.age\n    WHEN 1 THEN \"one\"\nEND"
        );
    }

    #[test]
    fn test_dangling_when_is_reported() {
        let n = Variable::named("n");
        let case = Case::new();
        let _open = case.when(eq(n.property("age"), 1));
        let mut env = Environment::new(None);
        assert_eq!(
            case.to_cypher(&mut env),
            Err(CypherBuildError::CaseWhenWithoutResult(0))
        );
    }
}
