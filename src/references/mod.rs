//! Identity-based reference tokens.
//!
//! A reference has no textual form until a compile assigns it one. Identity is
//! carried by a unique id embedded at construction time; cloning a reference
//! clones a shared handle, so clones resolve to the same name while two
//! independently constructed references never collide, even when their
//! contents are identical.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::expr::Expr;

static NEXT_REF_ID: AtomicU64 = AtomicU64::new(0);

fn next_ref_id() -> u64 {
    NEXT_REF_ID.fetch_add(1, Ordering::Relaxed)
}

/// Common view over every reference kind, used by the environment to assign
/// names. Named references return a fixed identifier and are never numbered.
pub trait Reference {
    /// Unique identity of this reference.
    fn id(&self) -> u64;
    /// Naming prefix used when the environment assigns an automatic name.
    fn name_prefix(&self) -> &'static str;
    /// Caller-fixed identifier, if any. Rendered verbatim.
    fn fixed_name(&self) -> Option<&str>;
    /// Parameter view of this reference, when it is one.
    fn as_param(&self) -> Option<&Param> {
        None
    }
}

#[derive(Debug)]
struct RefInner {
    id: u64,
    fixed_name: Option<String>,
}

impl RefInner {
    fn fresh() -> Self {
        RefInner {
            id: next_ref_id(),
            fixed_name: None,
        }
    }

    fn named(name: impl Into<String>) -> Self {
        RefInner {
            id: next_ref_id(),
            fixed_name: Some(name.into()),
        }
    }
}

macro_rules! impl_reference {
    ($ty:ident, $prefix:literal) => {
        impl Reference for $ty {
            fn id(&self) -> u64 {
                self.inner.id
            }
            fn name_prefix(&self) -> &'static str {
                $prefix
            }
            fn fixed_name(&self) -> Option<&str> {
                self.inner.fixed_name.as_deref()
            }
        }
    };
}

/// A generic variable. Resolves to `var0`, `var1`, ... in encounter order.
#[derive(Debug, Clone)]
pub struct Variable {
    inner: Rc<RefInner>,
}

impl Variable {
    pub fn new() -> Self {
        Variable {
            inner: Rc::new(RefInner::fresh()),
        }
    }

    /// A variable with a caller-fixed identifier, rendered verbatim.
    pub fn named(name: impl Into<String>) -> Self {
        Variable {
            inner: Rc::new(RefInner::named(name)),
        }
    }

    pub fn property(&self, prop: impl Into<String>) -> PropertyAccess {
        PropertyAccess::new(Expr::Variable(self.clone()), prop)
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new()
    }
}

impl_reference!(Variable, "var");

/// Handle to a node in a graph pattern. Carries the labels rendered inside
/// the pattern element. Resolves to `this0`, `this1`, ...
#[derive(Debug, Clone)]
pub struct NodeRef {
    inner: Rc<RefInner>,
    labels: Rc<Vec<String>>,
}

impl NodeRef {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NodeRef {
            inner: Rc::new(RefInner::fresh()),
            labels: Rc::new(labels.into_iter().map(Into::into).collect()),
        }
    }

    /// A node with no labels.
    pub fn unlabeled() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn named<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NodeRef {
            inner: Rc::new(RefInner::named(name)),
            labels: Rc::new(labels.into_iter().map(Into::into).collect()),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn property(&self, prop: impl Into<String>) -> PropertyAccess {
        PropertyAccess::new(Expr::Node(self.clone()), prop)
    }
}

impl_reference!(NodeRef, "this");

/// Handle to a relationship in a graph pattern. Carries the relationship
/// type rendered inside the bracketed element.
#[derive(Debug, Clone)]
pub struct RelationshipRef {
    inner: Rc<RefInner>,
    rel_type: Rc<Option<String>>,
}

impl RelationshipRef {
    pub fn new(rel_type: impl Into<String>) -> Self {
        RelationshipRef {
            inner: Rc::new(RefInner::fresh()),
            rel_type: Rc::new(Some(rel_type.into())),
        }
    }

    /// A relationship with no type constraint.
    pub fn untyped() -> Self {
        RelationshipRef {
            inner: Rc::new(RefInner::fresh()),
            rel_type: Rc::new(None),
        }
    }

    pub fn named(name: impl Into<String>, rel_type: impl Into<String>) -> Self {
        RelationshipRef {
            inner: Rc::new(RefInner::named(name)),
            rel_type: Rc::new(Some(rel_type.into())),
        }
    }

    pub fn rel_type(&self) -> Option<&str> {
        self.rel_type.as_deref()
    }

    pub fn property(&self, prop: impl Into<String>) -> PropertyAccess {
        PropertyAccess::new(Expr::Relationship(self.clone()), prop)
    }
}

impl_reference!(RelationshipRef, "this");

/// Handle to a whole path, used for path assignment (`p0 = (a)-[..]->(b)`).
/// Resolves to `p0`, `p1`, ...
#[derive(Debug, Clone)]
pub struct PathRef {
    inner: Rc<RefInner>,
}

impl PathRef {
    pub fn new() -> Self {
        PathRef {
            inner: Rc::new(RefInner::fresh()),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        PathRef {
            inner: Rc::new(RefInner::named(name)),
        }
    }
}

impl Default for PathRef {
    fn default() -> Self {
        Self::new()
    }
}

impl_reference!(PathRef, "p");

/// A query parameter, optionally holding the value shipped alongside the
/// compiled text. Resolves to `$param0`, `$param1`, ... A parameter that is
/// never attached to the compiled tree receives no name and is dropped from
/// the output map.
#[derive(Debug, Clone)]
pub struct Param {
    inner: Rc<ParamInner>,
}

#[derive(Debug)]
struct ParamInner {
    base: RefInner,
    value: Option<Value>,
}

impl Param {
    pub fn new(value: impl Into<Value>) -> Self {
        Param {
            inner: Rc::new(ParamInner {
                base: RefInner::fresh(),
                value: Some(value.into()),
            }),
        }
    }

    /// A parameter declared without a value. It is numbered and rendered as a
    /// placeholder but skipped when the parameter map is collected.
    pub fn unbound() -> Self {
        Param {
            inner: Rc::new(ParamInner {
                base: RefInner::fresh(),
                value: None,
            }),
        }
    }

    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Param {
            inner: Rc::new(ParamInner {
                base: RefInner::named(name),
                value: Some(value.into()),
            }),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.inner.value.as_ref()
    }
}

impl Reference for Param {
    fn id(&self) -> u64 {
        self.inner.base.id
    }
    fn name_prefix(&self) -> &'static str {
        "param"
    }
    fn fixed_name(&self) -> Option<&str> {
        self.inner.base.fixed_name.as_deref()
    }
    fn as_param(&self) -> Option<&Param> {
        Some(self)
    }
}

/// A property path hanging off a reference or another expression, e.g.
/// `this0.title` or `var0.address.city`.
#[derive(Debug, Clone)]
pub struct PropertyAccess {
    subject: Box<Expr>,
    path: Vec<String>,
}

impl PropertyAccess {
    pub(crate) fn new(subject: Expr, prop: impl Into<String>) -> Self {
        PropertyAccess {
            subject: Box::new(subject),
            path: vec![prop.into()],
        }
    }

    /// Extend the path by one more property segment.
    pub fn property(mut self, prop: impl Into<String>) -> Self {
        self.path.push(prop.into());
        self
    }

    pub(crate) fn subject(&self) -> &Expr {
        &self.subject
    }

    pub(crate) fn path(&self) -> &[String] {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_reference_gets_a_distinct_id() {
        let a = Variable::new();
        let b = Variable::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clones_share_identity() {
        let a = NodeRef::new(["Movie"]);
        let b = a.clone();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_named_reference_exposes_fixed_name() {
        let v = Variable::named("n");
        assert_eq!(v.fixed_name(), Some("n"));
        assert!(Variable::new().fixed_name().is_none());
    }

    #[test]
    fn test_param_value_visibility() {
        let bound = Param::new("The Matrix");
        let free = Param::unbound();
        assert!(bound.value().is_some());
        assert!(free.value().is_none());
    }

    #[test]
    fn test_property_path_chains() {
        let v = Variable::new();
        let p = v.property("address").property("city");
        assert_eq!(p.path(), ["address", "city"]);
    }
}
