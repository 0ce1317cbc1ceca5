//! Call-local scope stacks.
//!
//! Find and create scopes are pushed around a single operation and popped
//! when it finishes. The pop is tied to an RAII guard so the stack is
//! restored on every exit path, including panics; a poisoned lock is
//! recovered rather than propagated since the stack itself stays valid.

use crate::attrs::AttributeSet;
use relmodel_query::Expr;
use std::sync::Mutex;

/// The two scope kinds an association maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Find,
    Create,
}

/// Stacks of active find/create scopes for one association instance.
#[derive(Debug, Default)]
pub struct ScopeStack {
    find: Mutex<Vec<Expr>>,
    create: Mutex<Vec<AttributeSet>>,
}

impl ScopeStack {
    /// Create an empty scope stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a find scope; it is popped when the returned guard drops.
    pub fn push_find(&self, filter: Expr) -> ScopeGuard<'_> {
        match self.find.lock() {
            Ok(mut stack) => stack.push(filter),
            Err(poisoned) => poisoned.into_inner().push(filter),
        }
        ScopeGuard {
            stack: self,
            kind: ScopeKind::Find,
        }
    }

    /// Push a create scope; it is popped when the returned guard drops.
    pub fn push_create(&self, attrs: AttributeSet) -> ScopeGuard<'_> {
        match self.create.lock() {
            Ok(mut stack) => stack.push(attrs),
            Err(poisoned) => poisoned.into_inner().push(attrs),
        }
        ScopeGuard {
            stack: self,
            kind: ScopeKind::Create,
        }
    }

    /// The innermost active find scope, if any.
    pub fn current_find(&self) -> Option<Expr> {
        match self.find.lock() {
            Ok(stack) => stack.last().cloned(),
            Err(poisoned) => poisoned.into_inner().last().cloned(),
        }
    }

    /// The innermost active create scope, if any.
    pub fn current_create(&self) -> Option<AttributeSet> {
        match self.create.lock() {
            Ok(stack) => stack.last().cloned(),
            Err(poisoned) => poisoned.into_inner().last().cloned(),
        }
    }

    fn pop(&self, kind: ScopeKind) {
        match kind {
            ScopeKind::Find => {
                let popped = match self.find.lock() {
                    Ok(mut stack) => stack.pop(),
                    Err(poisoned) => poisoned.into_inner().pop(),
                };
                debug_assert!(popped.is_some(), "find scope stack underflow");
            }
            ScopeKind::Create => {
                let popped = match self.create.lock() {
                    Ok(mut stack) => stack.pop(),
                    Err(poisoned) => poisoned.into_inner().pop(),
                };
                debug_assert!(popped.is_some(), "create scope stack underflow");
            }
        }
    }
}

/// Guard that pops its scope on drop.
#[must_use = "dropping the guard immediately pops the scope"]
pub struct ScopeGuard<'a> {
    stack: &'a ScopeStack,
    kind: ScopeKind,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop(self.kind);
    }
}
