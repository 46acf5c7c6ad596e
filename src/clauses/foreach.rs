//! FOREACH update clause.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::CypherBuildError;
use crate::expr::Expr;
use crate::references::Variable;
use crate::scope::Environment;
use crate::tree::{adopt, impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

/// `FOREACH (x IN <list> | <update>)`, running an embedded update clause for
/// every element of a list expression.
#[derive(Debug, Clone)]
pub struct Foreach {
    inner: Rc<ForeachInner>,
}

struct ForeachInner {
    parent: ParentLink,
    variable: Variable,
    list: Expr,
    update: RefCell<Option<Rc<dyn TreeNode>>>,
}

impl std::fmt::Debug for ForeachInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForeachInner")
            .field("variable", &self.variable)
            .finish_non_exhaustive()
    }
}

impl Foreach {
    pub fn new(variable: &Variable, list: impl Into<Expr>, update: &impl Statement) -> Self {
        let foreach = Foreach {
            inner: Rc::new(ForeachInner {
                parent: ParentLink::default(),
                variable: variable.clone(),
                list: list.into(),
                update: RefCell::new(None),
            }),
        };
        let as_dyn: Rc<dyn TreeNode> = foreach.inner.clone();
        let root = adopt(&as_dyn, update.tree_node());
        *foreach.inner.update.borrow_mut() = Some(root);
        foreach
    }
}

impl ToCypher for ForeachInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let variable = env.resolve(&self.variable);
        let list = self.list.to_cypher(env)?;
        let update = match self.update.borrow().as_ref() {
            Some(update) => update.to_cypher(env)?,
            None => String::new(),
        };
        Ok(format!("FOREACH ({} IN {} | {})", variable, list, update))
    }
}

impl_tree_node!(ForeachInner);

impl Statement for Foreach {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clauses::create::Create;
    use crate::pattern;
    use crate::references::{NodeRef, Param};

    #[test]
    fn test_foreach_wraps_update_clause() {
        let x = Variable::new();
        let ids = Param::new(serde_json::json!([1, 2]));
        let n = NodeRef::new(["Entry"]);
        let update = Create::new(
            pattern::node(&n).with_properties([("id", &x)]),
        );
        let compiled = Foreach::new(&x, &ids, &update).compile().unwrap();
        assert_eq!(
            compiled.text,
            "FOREACH (var0 IN $param0 | CREATE (this1:`Entry` { id: var0 }))"
        );
    }
}
