//! WITH projection statement.

use std::cell::RefCell;
use std::rc::Rc;

use super::sub_clauses::{Order, OrderPaging, Projection, WhereSubClause};
use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::scope::Environment;
use crate::tree::{adopt, impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

#[derive(Debug, Clone)]
pub struct With {
    inner: Rc<WithInner>,
}

#[derive(Debug)]
struct WithInner {
    parent: ParentLink,
    projection: RefCell<Option<Projection>>,
    where_: RefCell<Option<WhereSubClause>>,
    order: RefCell<Option<OrderPaging>>,
    ret: RefCell<Option<Projection>>,
    next: RefCell<Option<Rc<dyn TreeNode>>>,
}

impl With {
    pub fn new<I, E>(columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let with = With {
            inner: Rc::new(WithInner {
                parent: ParentLink::default(),
                projection: RefCell::new(None),
                where_: RefCell::new(None),
                order: RefCell::new(None),
                ret: RefCell::new(None),
                next: RefCell::new(None),
            }),
        };
        Projection::push_columns(
            &with.inner.projection,
            "WITH",
            columns.into_iter().map(Into::into),
        );
        with
    }

    pub fn star() -> Self {
        let with = Self::new(Vec::<Expr>::new());
        Projection::mark_star(&with.inner.projection, "WITH");
        with
    }

    pub fn distinct(self) -> Self {
        Projection::mark_distinct(&self.inner.projection, "WITH");
        self
    }

    pub fn carry<I, E>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Projection::push_columns(
            &self.inner.projection,
            "WITH",
            columns.into_iter().map(Into::into),
        );
        self
    }

    pub fn carry_as(self, column: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Projection::push_aliased(&self.inner.projection, "WITH", column.into(), alias.into());
        self
    }

    pub fn where_(self, predicate: Expr) -> Self {
        WhereSubClause::merge_into(&self.inner.where_, predicate);
        self
    }

    pub fn and_where(self, predicate: Expr) -> Self {
        WhereSubClause::merge_into(&self.inner.where_, predicate);
        self
    }

    pub fn order_by(self, expr: impl Into<Expr>) -> Self {
        OrderPaging::push_order(&self.inner.order, expr.into(), Order::Asc);
        self
    }

    pub fn order_by_desc(self, expr: impl Into<Expr>) -> Self {
        OrderPaging::push_order(&self.inner.order, expr.into(), Order::Desc);
        self
    }

    pub fn skip(self, count: impl Into<Expr>) -> Self {
        OrderPaging::set_skip(&self.inner.order, count.into());
        self
    }

    pub fn limit(self, count: impl Into<Expr>) -> Self {
        OrderPaging::set_limit(&self.inner.order, count.into());
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

    pub fn return_star(self) -> Self {
        Projection::mark_star(&self.inner.ret, "RETURN");
        self
    }

    /// Chain a follow-up statement rendered after this clause, sharing the
    /// same environment.
    pub fn then(self, statement: &impl Statement) -> Self {
        let as_dyn: Rc<dyn TreeNode> = self.inner.clone();
        let root = adopt(&as_dyn, statement.tree_node());
        *self.inner.next.borrow_mut() = Some(root);
        self
    }
}

impl ToCypher for WithInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut lines = Vec::new();
        match self.projection.borrow().as_ref() {
            Some(projection) => lines.push(projection.to_cypher(env)?),
            None => return Err(CypherBuildError::EmptyWith),
        }
        if let Some(where_) = self.where_.borrow().as_ref() {
            lines.push(where_.to_cypher(env)?);
        }
        if let Some(order) = self.order.borrow().as_ref() {
            lines.extend(order.fragments(env)?);
        }
        if let Some(ret) = self.ret.borrow().as_ref() {
            lines.push(ret.to_cypher(env)?);
        }
        if let Some(next) = self.next.borrow().as_ref() {
            lines.push(next.to_cypher(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(WithInner);

impl Statement for With {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::operators::gt;
    use crate::references::Variable;

    #[test]
    fn test_with_where_return() {
        let x = Variable::named("x");
        let compiled = With::new([&x])
            .where_(gt(x.property("score"), 10))
            .returns([&x])
            .compile()
            .unwrap();
        assert_eq!(compiled.text, "WITH x\nWHERE x.score > 10\nRETURN x");
    }

    #[test]
    fn test_with_alias_and_distinct() {
        let x = Variable::named("x");
        let compiled = With::star()
            .distinct()
            .carry_as(x.property("name"), "name")
            .compile()
            .unwrap();
        assert_eq!(compiled.text, "WITH DISTINCT *, x.name AS name");
    }

    #[test]
    fn test_empty_with_is_an_error() {
        let compiled = With::new(Vec::<Expr>::new()).compile();
        assert_eq!(compiled.unwrap_err(), CypherBuildError::EmptyWith);
    }
}
