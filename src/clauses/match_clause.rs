//! MATCH and OPTIONAL MATCH.

use std::cell::RefCell;
use std::rc::Rc;

use super::sub_clauses::{
    DeleteSubClause, Order, OrderPaging, Projection, RemoveItem, RemoveSubClause, SetItem,
    SetSubClause, WhereSubClause,
};
use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::pattern::PatternNode;
use crate::references::{NodeRef, PathRef, PropertyAccess};
use crate::scope::Environment;
use crate::tree::{adopt, impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

/// A MATCH clause over one or more patterns, with optional where / set /
/// remove / delete / with / return / ordering capabilities acquired through
/// fluent calls.
#[derive(Debug, Clone)]
pub struct Match {
    inner: Rc<MatchInner>,
}

#[derive(Debug)]
struct MatchInner {
    parent: ParentLink,
    optional: bool,
    patterns: RefCell<Vec<PatternNode>>,
    assigned_path: RefCell<Option<PathRef>>,
    where_: RefCell<Option<WhereSubClause>>,
    set: RefCell<Option<SetSubClause>>,
    remove: RefCell<Option<RemoveSubClause>>,
    delete: RefCell<Option<DeleteSubClause>>,
    with: RefCell<Option<Projection>>,
    ret: RefCell<Option<Projection>>,
    order: RefCell<Option<OrderPaging>>,
    next: RefCell<Option<Rc<dyn TreeNode>>>,
}

impl Match {
    pub fn new(pattern: PatternNode) -> Self {
        Self::build(pattern, false)
    }

    /// An OPTIONAL MATCH clause.
    pub fn optional(pattern: PatternNode) -> Self {
        Self::build(pattern, true)
    }

    fn build(pattern: PatternNode, optional: bool) -> Self {
        Match {
            inner: Rc::new(MatchInner {
                parent: ParentLink::default(),
                optional,
                patterns: RefCell::new(vec![pattern]),
                assigned_path: RefCell::new(None),
                where_: RefCell::new(None),
                set: RefCell::new(None),
                remove: RefCell::new(None),
                delete: RefCell::new(None),
                with: RefCell::new(None),
                ret: RefCell::new(None),
                order: RefCell::new(None),
                next: RefCell::new(None),
            }),
        }
    }

    /// Add a further comma-separated pattern to the same MATCH.
    pub fn and_pattern(self, pattern: PatternNode) -> Self {
        self.inner.patterns.borrow_mut().push(pattern);
        self
    }

    /// Bind the whole matched path to a path reference (`p0 = (...)`).
    pub fn assign_to_path(self, path: &PathRef) -> Self {
        *self.inner.assigned_path.borrow_mut() = Some(path.clone());
        self
    }

    pub fn where_(self, predicate: Expr) -> Self {
        WhereSubClause::merge_into(&self.inner.where_, predicate);
        self
    }

    /// AND-merge another predicate into the WHERE capability.
    pub fn and_where(self, predicate: Expr) -> Self {
        WhereSubClause::merge_into(&self.inner.where_, predicate);
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

    pub fn set_labels<I, S>(self, node: &NodeRef, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SetSubClause::push_into(
            &self.inner.set,
            SetItem::Labels {
                subject: Expr::from(node),
                labels: labels.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    pub fn remove(self, target: PropertyAccess) -> Self {
        RemoveSubClause::push_into(&self.inner.remove, RemoveItem::Property(target));
        self
    }

    pub fn remove_labels<I, S>(self, node: &NodeRef, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RemoveSubClause::push_into(
            &self.inner.remove,
            RemoveItem::Labels {
                subject: Expr::from(node),
                labels: labels.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    pub fn delete<I, E>(self, items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        DeleteSubClause::push_into(
            &self.inner.delete,
            false,
            items.into_iter().map(Into::into),
        );
        self
    }

    pub fn detach_delete<I, E>(self, items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        DeleteSubClause::push_into(&self.inner.delete, true, items.into_iter().map(Into::into));
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

    pub fn with_star(self) -> Self {
        Projection::mark_star(&self.inner.with, "WITH");
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

    pub fn returns_distinct<I, E>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Projection::mark_distinct(&self.inner.ret, "RETURN");
        Projection::push_columns(&self.inner.ret, "RETURN", columns.into_iter().map(Into::into));
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

    /// Chain a follow-up statement rendered after this clause. The chained
    /// statement is re-parented here, so both share one environment.
    pub fn then(self, statement: &impl Statement) -> Self {
        let as_dyn: Rc<dyn TreeNode> = self.inner.clone();
        let root = adopt(&as_dyn, statement.tree_node());
        *self.inner.next.borrow_mut() = Some(root);
        self
    }
}

impl ToCypher for MatchInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut first = String::new();
        if self.optional {
            first.push_str("OPTIONAL ");
        }
        first.push_str("MATCH ");
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
        if let Some(where_) = self.where_.borrow().as_ref() {
            lines.push(where_.to_cypher(env)?);
        }
        if let Some(set) = self.set.borrow().as_ref() {
            lines.push(set.to_cypher(env)?);
        }
        if let Some(remove) = self.remove.borrow().as_ref() {
            lines.push(remove.to_cypher(env)?);
        }
        if let Some(delete) = self.delete.borrow().as_ref() {
            lines.push(delete.to_cypher(env)?);
        }
        if let Some(with) = self.with.borrow().as_ref() {
            lines.push(with.to_cypher(env)?);
        }
        if let Some(ret) = self.ret.borrow().as_ref() {
            lines.push(ret.to_cypher(env)?);
        }
        if let Some(order) = self.order.borrow().as_ref() {
            lines.extend(order.fragments(env)?);
        }
        if let Some(next) = self.next.borrow().as_ref() {
            lines.push(next.to_cypher(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(MatchInner);

impl Statement for Match {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::operators::eq;
    use crate::pattern;
    use crate::references::{NodeRef, Param};

    #[test]
    fn test_match_where_return() {
        let movie = NodeRef::new(["Movie"]);
        let title = Param::new("The Matrix");
        let query = Match::new(pattern::node(&movie))
            .where_(eq(movie.property("title"), &title))
            .returns([&movie]);
        let compiled = query.compile().unwrap();
        assert_eq!(
            compiled.text,
            "MATCH (this0:`Movie`)\nWHERE this0.title = $param0\nRETURN this0"
        );
    }

    #[test]
    fn test_optional_match_prefix() {
        let n = NodeRef::unlabeled();
        let compiled = Match::optional(pattern::node(&n))
            .return_star()
            .compile()
            .unwrap();
        assert!(compiled.text.starts_with("OPTIONAL MATCH"));
    }

    #[test]
    fn test_chained_where_calls_are_and_merged() {
        let n = NodeRef::new(["Person"]);
        let compiled = Match::new(pattern::node(&n))
            .where_(eq(n.property("name"), "Keanu"))
            .and_where(eq(n.property("born"), 1964))
            .return_star()
            .compile()
            .unwrap();
        assert!(compiled
            .text
            .contains("WHERE (this0.name = \"Keanu\" AND this0.born = 1964)"));
    }

    #[test]
    fn test_capability_render_order() {
        let n = NodeRef::new(["Person"]);
        let m = NodeRef::unlabeled();
        let compiled = Match::new(pattern::node(&n))
            .returns([&n])
            .delete([&m])
            .set(n.property("seen"), true)
            .where_(eq(n.property("age"), 1))
            .compile()
            .unwrap();
        let lines: Vec<&str> = compiled.text.lines().collect();
        assert!(lines[0].starts_with("MATCH"));
        assert!(lines[1].starts_with("WHERE"));
        assert!(lines[2].starts_with("SET"));
        assert!(lines[3].starts_with("DELETE"));
        assert!(lines[4].starts_with("RETURN"));
    }

    #[test]
    fn test_path_assignment_prefix() {
        let n = NodeRef::unlabeled();
        let p = crate::references::PathRef::new();
        let compiled = Match::new(pattern::node(&n))
            .assign_to_path(&p)
            .returns([&p])
            .compile()
            .unwrap();
        assert!(compiled.text.starts_with("MATCH p0 = (this1)"));
        assert!(compiled.text.ends_with("RETURN p0"));
    }

    #[test]
    fn test_chained_statement_shares_numbering() {
        let person = NodeRef::new(["Person"]);
        let movie = NodeRef::new(["Movie"]);
        let second = Match::new(pattern::node(&movie)).returns([&person, &movie]);
        let query = Match::new(pattern::node(&person))
            .with_([&person])
            .then(&second);
        let compiled = query.compile().unwrap();
        assert_eq!(
            compiled.text,
            "MATCH (this0:`Person`)\nWITH this0\nMATCH (this1:`Movie`)\nRETURN this0, this1"
        );
        // Compiling the chained statement delegates to the head of the chain.
        assert_eq!(second.compile().unwrap(), compiled);
    }

    #[test]
    fn test_order_skip_limit_render_last() {
        let n = NodeRef::new(["Movie"]);
        let compiled = Match::new(pattern::node(&n))
            .returns([&n])
            .order_by_desc(n.property("released"))
            .skip(5)
            .limit(10)
            .compile()
            .unwrap();
        assert_eq!(
            compiled.text,
            "MATCH (this0:`Movie`)\nRETURN this0\nORDER BY this0.released DESC\nSKIP 5\nLIMIT 10"
        );
    }
}
