use std::sync::{Arc, Weak};

/// Lifetime of a mounted form. Dropping the scope ends it.
#[derive(Debug, Default)]
pub struct Scope {
    alive: Arc<()>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token carried by deferred work so it can check liveness before applying results.
    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            alive: Arc::downgrade(&self.alive),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScopeToken {
    alive: Weak<()>,
}

impl ScopeToken {
    pub fn is_alive(&self) -> bool {
        self.alive.strong_count() > 0
    }

    /// A token whose scope has already ended.
    pub fn detached() -> Self {
        Self { alive: Weak::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_follows_scope() {
        let scope = Scope::new();
        let token = scope.token();
        let clone = token.clone();
        assert!(token.is_alive());
        drop(scope);
        assert!(!token.is_alive());
        assert!(!clone.is_alive());
    }

    #[test]
    fn test_detached_token() {
        assert!(!ScopeToken::detached().is_alive());
    }
}
