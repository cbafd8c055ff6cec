use crate::models::auth::{Actor, Role};
use crate::services::error::BannerError;

/// Actions a caller can perform on banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Search,
    Disable,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Search => "search",
            Action::Disable => "disable",
        }
    }
}

/// Single policy-lookup call invoked at the top of every service method.
/// Reads are open to any authenticated actor; mutations require the admin
/// role.
pub fn check(actor: &Actor, action: Action) -> Result<(), BannerError> {
    let allowed = match action {
        Action::Read | Action::Search => true,
        Action::Create | Action::Update | Action::Delete | Action::Disable => {
            actor.role == Role::Admin
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(BannerError::PermissionDenied {
            action: action.name(),
        })
    }
}
