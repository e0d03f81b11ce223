//! Per-session context handed to every handler.

use std::sync::Arc;

/// Who "own" data belongs to. Passed explicitly to every apply; the engine
/// has no ambient notion of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineContext {
    current_user_id: Arc<str>,
}

impl EngineContext {
    pub fn new(current_user_id: impl Into<Arc<str>>) -> Self {
        Self {
            current_user_id: current_user_id.into(),
        }
    }

    pub fn current_user_id(&self) -> &str {
        &self.current_user_id
    }

    pub fn is_current_user(&self, user_id: &str) -> bool {
        &*self.current_user_id == user_id
    }
}
