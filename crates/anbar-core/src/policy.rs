use crate::ident::{Role, User};

/// Configuration-driven identity classes for resolution.
///
/// The excluded set is a hard negative: those roles never resolve above
/// `None` for warehouses, even when they carry staff or superuser flags.
/// The override set grants `Administrative` on top of the flags.
#[derive(Debug, Clone)]
pub struct OverridePolicy {
    override_roles: Vec<Role>,
    excluded_roles: Vec<Role>,
}

impl OverridePolicy {
    pub fn new(override_roles: Vec<Role>, excluded_roles: Vec<Role>) -> Self {
        Self {
            override_roles,
            excluded_roles,
        }
    }

    pub fn is_excluded(&self, role: Role) -> bool {
        self.excluded_roles.contains(&role)
    }

    pub fn is_override(&self, user: &User) -> bool {
        user.is_staff || user.is_superuser || self.override_roles.contains(&user.role)
    }
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self {
            override_roles: Vec::new(),
            excluded_roles: vec![Role::AssetManager],
        }
    }
}
