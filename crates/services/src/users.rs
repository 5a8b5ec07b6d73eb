//! User profiles and roles.

use serde_json::json;

use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_db::models::user::{UpdateProfile, User};
use beatstore_db::repositories::UserRepo;
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

const MAX_DISPLAY_NAME_LENGTH: usize = 100;

pub struct UserService;

impl UserService {
    pub async fn get(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<User> {
        caller.require_owner_or_admin(id, "view this profile")?;
        Ok(UserRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("User", id))?)
    }

    pub async fn update_profile(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        input: UpdateProfile,
    ) -> ServiceResult<User> {
        caller.require_owner_or_admin(id, "edit this profile")?;
        if let Some(name) = &input.display_name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(invalid("Display name must not be empty".to_string()));
            }
            if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
                return Err(invalid(format!(
                    "Display name must not exceed {MAX_DISPLAY_NAME_LENGTH} characters"
                )));
            }
        }
        let user = UserRepo::update_profile(ctx.store(), id, &input)
            .await?
            .ok_or_else(|| CoreError::not_found("User", id))?;
        tracing::info!(user_id = %id, "Profile updated");
        Ok(user)
    }

    /// Change a user's role. Admins cannot demote themselves.
    pub async fn update_role(ctx: &ServiceContext, caller: &Caller, id: &str, role: Role) -> ServiceResult<User> {
        caller.require_admin("change user roles")?;
        if caller.user_id == id && role != Role::Admin {
            return Err(CoreError::Conflict("Admins cannot remove their own admin role".to_string()).into());
        }
        let user = UserRepo::update_role(ctx.store(), id, role)
            .await?
            .ok_or_else(|| CoreError::not_found("User", id))?;

        tracing::info!(user_id = %id, role = %role, admin_id = %caller.user_id, "User role changed");
        ctx.publish(
            PlatformEvent::new(event_types::USER_ROLE_CHANGED)
                .with_source("user", id)
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "role": role })),
        );
        Ok(user)
    }

    pub async fn list(ctx: &ServiceContext, caller: &Caller, role: Option<Role>) -> ServiceResult<Vec<User>> {
        caller.require_admin("list users")?;
        Ok(UserRepo::list(ctx.store(), role).await?)
    }
}
