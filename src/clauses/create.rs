//! CREATE.

use std::cell::RefCell;
use std::rc::Rc;

use super::sub_clauses::{Order, OrderPaging, Projection, SetItem, SetSubClause};
use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::pattern::PatternNode;
use crate::references::{PathRef, PropertyAccess};
use crate::scope::Environment;
use crate::tree::{impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

#[derive(Debug, Clone)]
pub struct Create {
    inner: Rc<CreateInner>,
}

#[derive(Debug)]
struct CreateInner {
    parent: ParentLink,
    patterns: RefCell<Vec<PatternNode>>,
    assigned_path: RefCell<Option<PathRef>>,
    set: RefCell<Option<SetSubClause>>,
    ret: RefCell<Option<Projection>>,
    order: RefCell<Option<OrderPaging>>,
}

impl Create {
    pub fn new(pattern: PatternNode) -> Self {
        Create {
            inner: Rc::new(CreateInner {
                parent: ParentLink::default(),
                patterns: RefCell::new(vec![pattern]),
                assigned_path: RefCell::new(None),
                set: RefCell::new(None),
                ret: RefCell::new(None),
                order: RefCell::new(None),
            }),
        }
    }

    pub fn and_pattern(self, pattern: PatternNode) -> Self {
        self.inner.patterns.borrow_mut().push(pattern);
        self
    }

    pub fn assign_to_path(self, path: &PathRef) -> Self {
        *self.inner.assigned_path.borrow_mut() = Some(path.clone());
        self
    }

    pub fn set(self, target: PropertyAccess, value: impl Into<Expr>) -> Self {
        SetSubClause::push_into(
            &self.inner.set,
            SetItem::Property {
                target,
                value: value.into(),
            },
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

    pub fn returns_as(self, column: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Projection::push_aliased(&self.inner.ret, "RETURN", column.into(), alias.into());
        self
    }

    pub fn return_star(self) -> Self {
        Projection::mark_star(&self.inner.ret, "RETURN");
        self
    }

    pub fn order_by(self, expr: impl Into<Expr>) -> Self {
        OrderPaging::push_order(&self.inner.order, expr.into(), Order::Asc);
        self
    }

    pub fn limit(self, count: impl Into<Expr>) -> Self {
        OrderPaging::set_limit(&self.inner.order, count.into());
        self
    }
}

impl ToCypher for CreateInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut first = String::from("CREATE ");
        if let Some(path) = self.assigned_path.borrow().as_ref() {
            first.push_str(&env.resolve(path));
            first.push_str(" = ");
        }
        let patterns = self
            .patterns
            .borrow()
            .iter()
            .map(|pattern| pattern.to_cypher(env))
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        first.push_str(&patterns.join(", "));

        let mut lines = vec![first];
        if let Some(set) = self.set.borrow().as_ref() {
            lines.push(set.to_cypher(env)?);
        }
        if let Some(ret) = self.ret.borrow().as_ref() {
            lines.push(ret.to_cypher(env)?);
        }
        if let Some(order) = self.order.borrow().as_ref() {
            lines.extend(order.fragments(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(CreateInner);

impl Statement for Create {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern;
    use crate::references::{NodeRef, Param};

    #[test]
    fn test_create_with_properties_and_return() {
        let movie = NodeRef::new(["Movie"]);
        let title = Param::new("The Matrix");
        let compiled = Create::new(
            pattern::node(&movie).with_properties([("title", &title)]),
        )
        .returns([&movie])
        .compile()
        .unwrap();
        assert_eq!(
            compiled.text,
            "CREATE (this0:`Movie` { title: $param0 })\nRETURN this0"
        );
        assert_eq!(compiled.parameters["param0"], "The Matrix");
    }

    #[test]
    fn test_create_set_renders_after_pattern() {
        let n = NodeRef::new(["Person"]);
        let compiled = Create::new(pattern::node(&n))
            .set(n.property("created"), true)
            .compile()
            .unwrap();
        assert_eq!(
            compiled.text,
            "CREATE (this0:`Person`)\nSET this0.created = true"
        );
    }
}
