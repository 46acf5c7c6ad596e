//! Statement tree plumbing: parent links, root discovery, and the compile
//! entry point that threads a single environment through every render call.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CypherBuildError;
use crate::scope::Environment;

/// Anything that renders itself to Cypher text against an environment.
pub trait ToCypher {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError>;
}

/// A node in the statement tree. The parent link is a back-reference, not
/// ownership: parents own their children, children hold a weak link upward.
/// A node with no live parent is a root.
pub trait TreeNode: ToCypher + std::fmt::Debug {
    fn parent(&self) -> Option<Rc<dyn TreeNode>>;
    fn set_parent(&self, parent: Weak<dyn TreeNode>);
}

/// Weak upward link embedded in every clause node. Re-assignment overwrites
/// the previous parent silently.
#[derive(Default)]
pub(crate) struct ParentLink(RefCell<Option<Weak<dyn TreeNode>>>);

impl ParentLink {
    pub(crate) fn get(&self) -> Option<Rc<dyn TreeNode>> {
        self.0.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn set(&self, parent: Weak<dyn TreeNode>) {
        *self.0.borrow_mut() = Some(parent);
    }
}

impl std::fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.get().is_some() {
            "ParentLink(attached)"
        } else {
            "ParentLink(root)"
        })
    }
}

/// Follow parent links until none remain.
pub(crate) fn root_of(node: Rc<dyn TreeNode>) -> Rc<dyn TreeNode> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}

/// Re-parent `child`'s root onto `parent` and hand back the adopted root so
/// the embedding clause can own and render it.
pub(crate) fn adopt(parent: &Rc<dyn TreeNode>, child: Rc<dyn TreeNode>) -> Rc<dyn TreeNode> {
    let root = root_of(child);
    root.set_parent(Rc::downgrade(parent));
    root
}

/// Forward the `TreeNode` parent accessors to an embedded `ParentLink`
/// field named `parent`.
macro_rules! impl_tree_node {
    ($ty:ty) => {
        impl crate::tree::TreeNode for $ty {
            fn parent(&self) -> Option<std::rc::Rc<dyn crate::tree::TreeNode>> {
                self.parent.get()
            }
            fn set_parent(&self, parent: std::rc::Weak<dyn crate::tree::TreeNode>) {
                self.parent.set(parent);
            }
        }
    };
}
pub(crate) use impl_tree_node;

/// The result of compiling a statement tree: query text plus the parameters
/// extracted during rendering, keyed by assigned name in encounter order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub text: String,
    pub parameters: Map<String, Value>,
}

pub(crate) fn compile_tree(
    node: Rc<dyn TreeNode>,
    prefix: Option<&str>,
    extra_params: Option<Map<String, Value>>,
) -> Result<CompiledQuery, CypherBuildError> {
    let root = root_of(node);
    let mut env = Environment::new(prefix);
    if let Some(extra) = extra_params {
        env.inject_extra(extra);
    }
    let text = root.to_cypher(&mut env)?;
    log::debug!("compiled cypher:\n{}", text);
    Ok(CompiledQuery {
        text,
        parameters: env.collect_params(),
    })
}

/// Compilation surface shared by every statement clause. Compiling a non-root
/// clause delegates to the root of its tree, so exactly one environment is
/// created per tree regardless of entry point.
pub trait Statement {
    fn tree_node(&self) -> Rc<dyn TreeNode>;

    fn compile(&self) -> Result<CompiledQuery, CypherBuildError> {
        compile_tree(self.tree_node(), None, None)
    }

    /// Compile with an optional name prefix scoping all generated names and
    /// optional caller-supplied parameters merged into the output map.
    fn compile_with(
        &self,
        prefix: Option<&str>,
        extra_params: Option<Map<String, Value>>,
    ) -> Result<CompiledQuery, CypherBuildError> {
        compile_tree(self.tree_node(), prefix, extra_params)
    }
}
