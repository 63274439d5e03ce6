//! Scoped variable environments for the Thistle evaluator.
//!
//! Scopes live in an arena and refer to their parents by [`ScopeId`]
//! handle, so a closure can hold onto its defining scope without ownership
//! cycles. Parent links are acyclic by construction: a child's parent must
//! already exist in the arena when the child is allocated.

use crate::value::Value;
use std::collections::BTreeMap;

/// Handle to a scope in an [`EnvArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// A single scope level.
#[derive(Debug, Clone)]
struct Scope {
    bindings: BTreeMap<String, Value>,
    parent: Option<ScopeId>,
}

/// Arena of scopes forming parent-linked chains.
///
/// Variables are looked up from the given scope outward to the root.
/// `define` always binds in the named scope, never an ancestor.
#[derive(Debug, Clone)]
pub struct EnvArena {
    scopes: Vec<Scope>,
}

impl EnvArena {
    /// Create a new arena holding only the global (root) scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                bindings: BTreeMap::new(),
                parent: None,
            }],
        }
    }

    /// The global scope — root of every chain, created once per arena.
    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Allocate a new scope parented to an existing one.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            bindings: BTreeMap::new(),
            parent: Some(parent),
        });
        id
    }

    /// Bind or rebind a variable in the given scope only.
    pub fn define(&mut self, scope: ScopeId, name: &str, value: Value) {
        self.scopes[scope.0]
            .bindings
            .insert(name.to_string(), value);
    }

    /// Look up a variable, walking parent links from the given scope to the
    /// root. A miss is an ordinary outcome, not a failure.
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Value> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id.0];
            if let Some(v) = s.bindings.get(name) {
                return Some(v);
            }
            current = s.parent;
        }
        None
    }
}

impl Default for EnvArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let mut envs = EnvArena::new();
        let g = envs.global();
        envs.define(g, "x", Value::Number(1.0));
        assert_eq!(envs.get(g, "x"), Some(&Value::Number(1.0)));
        assert_eq!(envs.get(g, "y"), None);
    }

    #[test]
    fn rebind_replaces_in_place() {
        let mut envs = EnvArena::new();
        let g = envs.global();
        envs.define(g, "x", Value::Number(1.0));
        envs.define(g, "x", Value::Number(2.0));
        assert_eq!(envs.get(g, "x"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let mut envs = EnvArena::new();
        let g = envs.global();
        envs.define(g, "x", Value::Number(1.0));
        let inner = envs.child(g);
        let innermost = envs.child(inner);
        assert_eq!(envs.get(innermost, "x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn child_shadows_without_mutating_parent() {
        let mut envs = EnvArena::new();
        let g = envs.global();
        envs.define(g, "x", Value::Number(1.0));
        let inner = envs.child(g);
        envs.define(inner, "x", Value::Number(9.0));
        assert_eq!(envs.get(inner, "x"), Some(&Value::Number(9.0)));
        assert_eq!(envs.get(g, "x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn sibling_scopes_are_isolated() {
        let mut envs = EnvArena::new();
        let g = envs.global();
        let a = envs.child(g);
        let b = envs.child(g);
        envs.define(a, "x", Value::Number(1.0));
        assert_eq!(envs.get(b, "x"), None);
    }
}
