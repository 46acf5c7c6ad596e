//! UNWIND.

use std::cell::RefCell;
use std::rc::Rc;

use super::sub_clauses::{Projection, WhereSubClause};
use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::references::Variable;
use crate::scope::Environment;
use crate::tree::{impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

/// `UNWIND <list> AS <alias>`: expands a list expression into one row per
/// element bound to the alias variable.
#[derive(Debug, Clone)]
pub struct Unwind {
    inner: Rc<UnwindInner>,
}

#[derive(Debug)]
struct UnwindInner {
    parent: ParentLink,
    list: Expr,
    alias: Variable,
    where_: RefCell<Option<WhereSubClause>>,
    with: RefCell<Option<Projection>>,
    ret: RefCell<Option<Projection>>,
}

impl Unwind {
    pub fn new(list: impl Into<Expr>, alias: &Variable) -> Self {
        Unwind {
            inner: Rc::new(UnwindInner {
                parent: ParentLink::default(),
                list: list.into(),
                alias: alias.clone(),
                where_: RefCell::new(None),
                with: RefCell::new(None),
                ret: RefCell::new(None),
            }),
        }
    }

    pub fn where_(self, predicate: Expr) -> Self {
        WhereSubClause::merge_into(&self.inner.where_, predicate);
        self
    }

    pub fn with_<I, E>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Projection::push_columns(
            &self.inner.with,
            "WITH",
            columns.into_iter().map(Into::into),
        );
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

impl ToCypher for UnwindInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut lines = vec![format!(
            "UNWIND {} AS {}",
            self.list.to_cypher(env)?,
            env.resolve(&self.alias)
        )];
        if let Some(where_) = self.where_.borrow().as_ref() {
            lines.push(where_.to_cypher(env)?);
        }
        if let Some(with) = self.with.borrow().as_ref() {
            lines.push(with.to_cypher(env)?);
        }
        if let Some(ret) = self.ret.borrow().as_ref() {
            lines.push(ret.to_cypher(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(UnwindInner);

impl Statement for Unwind {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}
