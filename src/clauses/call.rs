//! CALL subqueries and procedure calls.

use std::cell::RefCell;
use std::rc::Rc;

use super::sub_clauses::{Projection, WhereSubClause};
use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::references::Variable;
use crate::scope::Environment;
use crate::tree::{adopt, impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};
use crate::utils::escape_identifier;

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<String>>()
        .join("\n")
}

/// `CALL { ... }` wrapping an embedded sub-statement. Embedding re-parents
/// the sub-statement's root onto this clause so the whole tree shares one
/// environment at compile time.
#[derive(Debug, Clone)]
pub struct Call {
    inner: Rc<CallInner>,
}

struct CallInner {
    parent: ParentLink,
    child: RefCell<Option<Rc<dyn TreeNode>>>,
    import_with: RefCell<Option<Vec<Variable>>>,
    ret: RefCell<Option<Projection>>,
}

impl std::fmt::Debug for CallInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallInner")
            .field("parent", &self.parent)
            .field("import_with", &self.import_with)
            .finish_non_exhaustive()
    }
}

impl Call {
    pub fn subquery(statement: &impl Statement) -> Self {
        let call = Call {
            inner: Rc::new(CallInner {
                parent: ParentLink::default(),
                child: RefCell::new(None),
                import_with: RefCell::new(None),
                ret: RefCell::new(None),
            }),
        };
        let as_dyn: Rc<dyn TreeNode> = call.inner.clone();
        let root = adopt(&as_dyn, statement.tree_node());
        *call.inner.child.borrow_mut() = Some(root);
        call
    }

    /// Set the importing WITH rendered as the first line inside the braces.
    /// May only be set once.
    pub fn import_with<I>(self, variables: I) -> Result<Self, CypherBuildError>
    where
        I: IntoIterator<Item = Variable>,
    {
        let mut slot = self.inner.import_with.borrow_mut();
        if slot.is_some() {
            return Err(CypherBuildError::ImportWithAlreadySet);
        }
        *slot = Some(variables.into_iter().collect());
        drop(slot);
        Ok(self)
    }

    pub fn returns<I, E>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Projection::push_columns(&self.inner.ret, "RETURN", columns.into_iter().map(Into::into));
        self
    }

    pub fn return_star(self) -> Self {
        Projection::mark_star(&self.inner.ret, "RETURN");
        self
    }
}

impl ToCypher for CallInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut body = Vec::new();
        if let Some(variables) = self.import_with.borrow().as_ref() {
            let names: Vec<String> = variables.iter().map(|v| env.resolve(v)).collect();
            body.push(format!("WITH {}", names.join(", ")));
        }
        if let Some(child) = self.child.borrow().as_ref() {
            body.push(child.to_cypher(env)?);
        }
        let mut lines = vec![format!("CALL {{\n{}\n}}", indent(&body.join("\n")))];
        if let Some(ret) = self.ret.borrow().as_ref() {
            lines.push(ret.to_cypher(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(CallInner);

impl Statement for Call {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}

/// `CALL name(args)` with an optional YIELD projection, e.g.
/// `CALL db.labels() YIELD label`.
#[derive(Debug, Clone)]
pub struct CallProcedure {
    inner: Rc<CallProcedureInner>,
}

#[derive(Debug)]
struct CallProcedureInner {
    parent: ParentLink,
    name: String,
    args: RefCell<Vec<Expr>>,
    yields: RefCell<Vec<String>>,
    where_: RefCell<Option<WhereSubClause>>,
    ret: RefCell<Option<Projection>>,
}

impl CallProcedure {
    pub fn new(name: impl Into<String>) -> Self {
        CallProcedure {
            inner: Rc::new(CallProcedureInner {
                parent: ParentLink::default(),
                name: name.into(),
                args: RefCell::new(Vec::new()),
                yields: RefCell::new(Vec::new()),
                where_: RefCell::new(None),
                ret: RefCell::new(None),
            }),
        }
    }

    pub fn arg(self, arg: impl Into<Expr>) -> Self {
        self.inner.args.borrow_mut().push(arg.into());
        self
    }

    pub fn args<I, E>(self, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.inner
            .args
            .borrow_mut()
            .extend(args.into_iter().map(Into::into));
        self
    }

    /// Select the yielded columns. Requires at least one column.
    pub fn yield_<I, S>(self, columns: I) -> Result<Self, CypherBuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(CypherBuildError::EmptyYield);
        }
        self.inner.yields.borrow_mut().extend(columns);
        Ok(self)
    }

    pub fn where_(self, predicate: Expr) -> Self {
        WhereSubClause::merge_into(&self.inner.where_, predicate);
        self
    }

    pub fn returns<I, E>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Projection::push_columns(&self.inner.ret, "RETURN", columns.into_iter().map(Into::into));
        self
    }
}

impl ToCypher for CallProcedureInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let name = self
            .name
            .split('.')
            .map(escape_identifier)
            .collect::<Vec<String>>()
            .join(".");
        let args = self
            .args
            .borrow()
            .iter()
            .map(|arg| arg.to_cypher(env))
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        let mut first = format!("CALL {}({})", name, args.join(", "));
        let yields = self.yields.borrow();
        if !yields.is_empty() {
            let columns: Vec<String> = yields.iter().map(|c| escape_identifier(c)).collect();
            first.push_str(&format!(" YIELD {}", columns.join(", ")));
        }
        let mut lines = vec![first];
        if let Some(where_) = self.where_.borrow().as_ref() {
            lines.push(where_.to_cypher(env)?);
        }
        if let Some(ret) = self.ret.borrow().as_ref() {
            lines.push(ret.to_cypher(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(CallProcedureInner);

impl Statement for CallProcedure {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clauses::match_clause::Match;
    use crate::expr::operators::eq;
    use crate::pattern;
    use crate::references::NodeRef;

    #[test]
    fn test_call_wraps_and_indents_subquery() {
        let n = NodeRef::new(["Person"]);
        let sub = Match::new(pattern::node(&n)).returns([&n]);
        let compiled = Call::subquery(&sub).compile().unwrap();
        assert_eq!(
            compiled.text,
            "CALL {\n    MATCH (this0:`Person`)\n    RETURN this0\n}"
        );
    }

    #[test]
    fn test_compiling_embedded_statement_delegates_to_root() {
        let n = NodeRef::new(["Person"]);
        let sub = Match::new(pattern::node(&n)).returns([&n]);
        let call = Call::subquery(&sub);
        // Compiling the inner statement must produce the whole CALL text.
        assert_eq!(sub.compile().unwrap(), call.compile().unwrap());
    }

    #[test]
    fn test_import_with_can_only_be_set_once() {
        let n = NodeRef::new(["Person"]);
        let x = Variable::named("x");
        let sub = Match::new(pattern::node(&n)).returns([&n]);
        let call = Call::subquery(&sub)
            .import_with([x.clone()])
            .unwrap();
        assert_eq!(
            call.import_with([x]).unwrap_err(),
            CypherBuildError::ImportWithAlreadySet
        );
    }

    #[test]
    fn test_import_with_renders_first() {
        let n = NodeRef::new(["Person"]);
        let x = Variable::named("x");
        let sub = Match::new(pattern::node(&n))
            .where_(eq(n.property("name"), &x))
            .returns([&n]);
        let compiled = Call::subquery(&sub)
            .import_with([x])
            .unwrap()
            .compile()
            .unwrap();
        assert!(compiled.text.starts_with("CALL {\n    WITH x\n    MATCH"));
    }

    #[test]
    fn test_procedure_call_with_yield() {
        let compiled = CallProcedure::new("db.labels")
            .yield_(["label"])
            .unwrap()
            .compile()
            .unwrap();
        assert_eq!(compiled.text, "CALL db.labels() YIELD label");
    }

    #[test]
    fn test_empty_yield_is_an_error() {
        let result = CallProcedure::new("db.labels").yield_(Vec::<String>::new());
        assert_eq!(result.unwrap_err(), CypherBuildError::EmptyYield);
    }
}
