//! MERGE with ON CREATE SET / ON MATCH SET.

use std::cell::RefCell;
use std::rc::Rc;

use super::sub_clauses::{Projection, SetItem, SetSubClause};
use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::pattern::PatternNode;
use crate::references::{PathRef, PropertyAccess};
use crate::scope::Environment;
use crate::tree::{impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

#[derive(Debug, Clone)]
pub struct Merge {
    inner: Rc<MergeInner>,
}

#[derive(Debug)]
struct MergeInner {
    parent: ParentLink,
    pattern: PatternNode,
    assigned_path: RefCell<Option<PathRef>>,
    set: RefCell<Option<SetSubClause>>,
    on_create: RefCell<Option<SetSubClause>>,
    on_match: RefCell<Option<SetSubClause>>,
    ret: RefCell<Option<Projection>>,
}

impl Merge {
    pub fn new(pattern: PatternNode) -> Self {
        Merge {
            inner: Rc::new(MergeInner {
                parent: ParentLink::default(),
                pattern,
                assigned_path: RefCell::new(None),
                set: RefCell::new(None),
                on_create: RefCell::new(None),
                on_match: RefCell::new(None),
                ret: RefCell::new(None),
            }),
        }
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

    pub fn on_create_set(self, target: PropertyAccess, value: impl Into<Expr>) -> Self {
        SetSubClause::push_into(
            &self.inner.on_create,
            SetItem::Property {
                target,
                value: value.into(),
            },
        );
        self
    }

    pub fn on_match_set(self, target: PropertyAccess, value: impl Into<Expr>) -> Self {
        SetSubClause::push_into(
            &self.inner.on_match,
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

    pub fn return_star(self) -> Self {
        Projection::mark_star(&self.inner.ret, "RETURN");
        self
    }
}

impl ToCypher for MergeInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut first = String::from("MERGE ");
        if let Some(path) = self.assigned_path.borrow().as_ref() {
            first.push_str(&env.resolve(path));
            first.push_str(" = ");
        }
        first.push_str(&self.pattern.to_cypher(env)?);

        let mut lines = vec![first];
        if let Some(on_create) = self.on_create.borrow().as_ref() {
            lines.push(on_create.render_with_keyword("ON CREATE SET", env)?);
        }
        if let Some(on_match) = self.on_match.borrow().as_ref() {
            lines.push(on_match.render_with_keyword("ON MATCH SET", env)?);
        }
        if let Some(set) = self.set.borrow().as_ref() {
            lines.push(set.to_cypher(env)?);
        }
        if let Some(ret) = self.ret.borrow().as_ref() {
            lines.push(ret.to_cypher(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(MergeInner);

impl Statement for Merge {
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
    fn test_merge_with_on_create_and_on_match() {
        let user = NodeRef::new(["User"]);
        let now = Param::new(1700000000);
        let compiled = Merge::new(
            pattern::node(&user).with_properties([("id", Param::new("u1"))]),
        )
        .on_create_set(user.property("createdAt"), &now)
        .on_match_set(user.property("seenAt"), &now)
        .returns([&user])
        .compile()
        .unwrap();
        assert_eq!(
            compiled.text,
            "MERGE (this0:`User` { id: $param0 })\n\
             ON CREATE SET this0.createdAt = $param1\n\
             ON MATCH SET this0.seenAt = $param1\n\
             RETURN this0"
        );
        assert_eq!(compiled.parameters.len(), 2);
    }
}
