//! USE database selection.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::CypherBuildError;
use crate::scope::Environment;
use crate::tree::{adopt, impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};
use crate::utils::escape_identifier;

/// `USE <database>` prefixing an embedded statement.
#[derive(Debug, Clone)]
pub struct Use {
    inner: Rc<UseInner>,
}

struct UseInner {
    parent: ParentLink,
    database: String,
    child: RefCell<Option<Rc<dyn TreeNode>>>,
}

impl std::fmt::Debug for UseInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UseInner")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl Use {
    pub fn new(database: impl Into<String>, statement: &impl Statement) -> Self {
        let use_ = Use {
            inner: Rc::new(UseInner {
                parent: ParentLink::default(),
                database: database.into(),
                child: RefCell::new(None),
            }),
        };
        let as_dyn: Rc<dyn TreeNode> = use_.inner.clone();
        let root = adopt(&as_dyn, statement.tree_node());
        *use_.inner.child.borrow_mut() = Some(root);
        use_
    }
}

impl ToCypher for UseInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut lines = vec![format!("USE {}", escape_identifier(&self.database))];
        if let Some(child) = self.child.borrow().as_ref() {
            lines.push(child.to_cypher(env)?);
        }
        Ok(lines.join("\n"))
    }
}

impl_tree_node!(UseInner);

impl Statement for Use {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clauses::match_clause::Match;
    use crate::pattern;
    use crate::references::NodeRef;

    #[test]
    fn test_use_prefixes_statement() {
        let n = NodeRef::new(["Movie"]);
        let query = Match::new(pattern::node(&n)).returns([&n]);
        let compiled = Use::new("movies", &query).compile().unwrap();
        assert_eq!(
            compiled.text,
            "USE movies\nMATCH (this0:`Movie`)\nRETURN this0"
        );
    }
}
