//! Standalone RETURN statement.

use std::cell::RefCell;
use std::rc::Rc;

use super::sub_clauses::{Order, OrderPaging, Projection};
use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::scope::Environment;
use crate::tree::{impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

#[derive(Debug, Clone)]
pub struct Return {
    inner: Rc<ReturnInner>,
}

#[derive(Debug)]
struct ReturnInner {
    parent: ParentLink,
    projection: RefCell<Option<Projection>>,
    order: RefCell<Option<OrderPaging>>,
}

impl Return {
    pub fn new<I, E>(columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let ret = Return {
            inner: Rc::new(ReturnInner {
                parent: ParentLink::default(),
                projection: RefCell::new(None),
                order: RefCell::new(None),
            }),
        };
        Projection::push_columns(
            &ret.inner.projection,
            "RETURN",
            columns.into_iter().map(Into::into),
        );
        ret
    }

    pub fn star() -> Self {
        let ret = Self::new(Vec::<Expr>::new());
        Projection::mark_star(&ret.inner.projection, "RETURN");
        ret
    }

    pub fn distinct(self) -> Self {
        Projection::mark_distinct(&self.inner.projection, "RETURN");
        self
    }

    pub fn column(self, column: impl Into<Expr>) -> Self {
        Projection::push_columns(&self.inner.projection, "RETURN", [column.into()]);
        self
    }

    pub fn column_as(self, column: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Projection::push_aliased(&self.inner.projection, "RETURN", column.into(), alias.into());
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
}

impl ToCypher for ReturnInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut lines = Vec::new();
        match self.projection.borrow().as_ref() {
            Some(projection) => lines.push(projection.to_cypher(env)?),
            None => return Err(CypherBuildError::EmptyReturn),
        }
        if let Some(order) = self.order.borrow().as_ref() {
            lines.extend(order.fragments(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(ReturnInner);

impl Statement for Return {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}
