//! UNION / UNION ALL.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::CypherBuildError;
use crate::scope::Environment;
use crate::tree::{adopt, impl_tree_node, ParentLink, Statement, ToCypher, TreeNode};

/// Combines sub-statements with UNION. Each added statement is re-parented
/// onto the union so every branch shares one environment.
#[derive(Debug, Clone)]
pub struct Union {
    inner: Rc<UnionInner>,
}

struct UnionInner {
    parent: ParentLink,
    all: bool,
    branches: RefCell<Vec<Rc<dyn TreeNode>>>,
}

impl std::fmt::Debug for UnionInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionInner")
            .field("all", &self.all)
            .field("branches", &self.branches.borrow().len())
            .finish()
    }
}

impl Union {
    /// Duplicate-removing UNION.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// UNION ALL, keeping duplicates.
    pub fn new_all() -> Self {
        Self::build(true)
    }

    fn build(all: bool) -> Self {
        Union {
            inner: Rc::new(UnionInner {
                parent: ParentLink::default(),
                all,
                branches: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn add(self, statement: &impl Statement) -> Self {
        let as_dyn: Rc<dyn TreeNode> = self.inner.clone();
        let root = adopt(&as_dyn, statement.tree_node());
        self.inner.branches.borrow_mut().push(root);
        self
    }
}

impl Default for Union {
    fn default() -> Self {
        Self::new()
    }
}

impl ToCypher for UnionInner {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let branches = self.branches.borrow();
        if branches.is_empty() {
            return Err(CypherBuildError::EmptyUnion);
        }
        let rendered = branches
            .iter()
            .map(|branch| branch.to_cypher(env))
            .collect::<Result<Vec<String>, CypherBuildError>>()?;
        let separator = if self.all { "\nUNION ALL\n" } else { "\nUNION\n" };
        Ok(rendered.join(separator))
    }
}

impl_tree_node!(UnionInner);

impl Statement for Union {
    fn tree_node(&self) -> Rc<dyn TreeNode> {
        self.inner.clone()
    }
}
