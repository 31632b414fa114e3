//! Request user context.

use std::collections::BTreeSet;

use crate::config::{CAP_EDIT_POST, CAP_MANAGE_OPTIONS};

/// The user behind a save or an admin request, with their capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    /// Host user id
    pub user_id: u64,
    capabilities: BTreeSet<String>,
}

impl UserContext {
    /// A user with no capabilities.
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            capabilities: BTreeSet::new(),
        }
    }

    /// A user holding `manage_options` and `edit_post`.
    pub fn administrator(user_id: u64) -> Self {
        Self::new(user_id)
            .with_capability(CAP_MANAGE_OPTIONS)
            .with_capability(CAP_EDIT_POST)
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// True when the user holds `capability`.
    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let editor = UserContext::new(5).with_capability(CAP_EDIT_POST);
        assert!(editor.can(CAP_EDIT_POST));
        assert!(!editor.can(CAP_MANAGE_OPTIONS));

        let admin = UserContext::administrator(1);
        assert!(admin.can(CAP_EDIT_POST) && admin.can(CAP_MANAGE_OPTIONS));
        assert!(!UserContext::default().can(CAP_EDIT_POST));
    }
}
