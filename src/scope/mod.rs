//! Per-compile symbol table.
//!
//! One `Environment` is created at the start of each compile, threaded
//! depth-first through every node's render call, and discarded afterwards.
//! It assigns names by reference identity: variables and parameters are
//! numbered in two independent interleaved sequences, both starting at 0.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::references::{Param, Reference};

#[derive(Debug, Default)]
pub struct Environment {
    prefix: Option<String>,
    names: HashMap<u64, String>,
    /// Every registered parameter with its assigned name, in encounter order.
    params: Vec<(String, Param)>,
    params_resolved: usize,
    vars_resolved: usize,
    extra: Map<String, Value>,
}

impl Environment {
    pub fn new(prefix: Option<&str>) -> Self {
        Environment {
            prefix: prefix.map(str::to_string),
            ..Default::default()
        }
    }

    /// Resolve a reference to its name, assigning the next free slot on first
    /// encounter. Named references return their fixed identifier verbatim and
    /// never consume a numbering slot. Never fails.
    pub fn resolve(&mut self, reference: &dyn Reference) -> String {
        if let Some(fixed) = reference.fixed_name() {
            if let Some(param) = reference.as_param() {
                if !self.names.contains_key(&reference.id()) {
                    self.names.insert(reference.id(), fixed.to_string());
                    self.params.push((fixed.to_string(), param.clone()));
                }
            }
            return fixed.to_string();
        }

        if let Some(existing) = self.names.get(&reference.id()) {
            return existing.clone();
        }

        let scope_prefix = self.prefix.as_deref().unwrap_or("");
        let name = match reference.as_param() {
            Some(param) => {
                let name = format!(
                    "{}{}{}",
                    scope_prefix,
                    reference.name_prefix(),
                    self.params_resolved
                );
                self.params_resolved += 1;
                self.params.push((name.clone(), param.clone()));
                name
            }
            None => {
                let name = format!(
                    "{}{}{}",
                    scope_prefix,
                    reference.name_prefix(),
                    self.vars_resolved
                );
                self.vars_resolved += 1;
                name
            }
        };
        self.names.insert(reference.id(), name.clone());
        name
    }

    /// Pre-register a parameter under a caller-chosen name. Traversal reuses
    /// the injected name instead of assigning a numbered one.
    pub fn inject_named(&mut self, name: impl Into<String>, param: &Param) {
        let name = name.into();
        self.names.insert(param.id(), name.clone());
        self.params.push((name, param.clone()));
    }

    /// Merge caller-supplied parameters that are shipped alongside the
    /// compiled text without being discovered by traversal.
    pub fn inject_extra(&mut self, extra: Map<String, Value>) {
        self.extra.extend(extra);
    }

    /// Emit `{assignedName: value}` for every bound parameter resolved during
    /// this compile, in encounter order. Unbound parameters are skipped.
    pub fn collect_params(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for (name, param) in &self.params {
            if let Some(value) = param.value() {
                out.insert(name.clone(), value.clone());
            }
        }
        for (name, value) in &self.extra {
            out.insert(name.clone(), value.clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::{NodeRef, Variable};
    use serde_json::json;

    #[test]
    fn test_variables_and_params_number_independently() {
        let mut env = Environment::new(None);
        let n = NodeRef::new(["Movie"]);
        let p = Param::new("The Matrix");
        let v = Variable::new();
        let q = Param::new(1);

        assert_eq!(env.resolve(&n), "this0");
        assert_eq!(env.resolve(&p), "param0");
        assert_eq!(env.resolve(&v), "var1");
        assert_eq!(env.resolve(&q), "param1");
    }

    #[test]
    fn test_resolution_is_cached() {
        let mut env = Environment::new(None);
        let v = Variable::new();
        let first = env.resolve(&v);
        let second = env.resolve(&v);
        assert_eq!(first, second);
    }

    #[test]
    fn test_identical_contents_get_independent_names() {
        let mut env = Environment::new(None);
        let a = NodeRef::new(["Movie"]);
        let b = NodeRef::new(["Movie"]);
        assert_ne!(env.resolve(&a), env.resolve(&b));
    }

    #[test]
    fn test_named_reference_bypasses_numbering() {
        let mut env = Environment::new(None);
        let fixed = Variable::named("n");
        let auto = Variable::new();
        assert_eq!(env.resolve(&fixed), "n");
        assert_eq!(env.resolve(&auto), "var0");
    }

    #[test]
    fn test_prefix_scopes_generated_names_only() {
        let mut env = Environment::new(Some("q1_"));
        let v = Variable::new();
        let fixed = Variable::named("n");
        let p = Param::new(1);
        assert_eq!(env.resolve(&v), "q1_var0");
        assert_eq!(env.resolve(&fixed), "n");
        assert_eq!(env.resolve(&p), "q1_param0");
    }

    #[test]
    fn test_collect_params_keeps_encounter_order_and_skips_unbound() {
        let mut env = Environment::new(None);
        let a = Param::new("first");
        let free = Param::unbound();
        let b = Param::new(2);
        env.resolve(&a);
        env.resolve(&free);
        env.resolve(&b);

        let params = env.collect_params();
        let keys: Vec<&String> = params.keys().collect();
        assert_eq!(keys, ["param0", "param2"]);
        assert_eq!(params["param0"], json!("first"));
        assert_eq!(params["param2"], json!(2));
    }

    #[test]
    fn test_injected_params_appear_under_their_names() {
        let mut env = Environment::new(None);
        let auth = Param::new("secret");
        env.inject_named("auth", &auth);
        assert_eq!(env.resolve(&auth), "auth");

        let mut extra = Map::new();
        extra.insert("limit".to_string(), json!(10));
        env.inject_extra(extra);

        let params = env.collect_params();
        assert_eq!(params["auth"], json!("secret"));
        assert_eq!(params["limit"], json!(10));
    }
}
