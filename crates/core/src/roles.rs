//! User roles and the dashboard each role lands on after sign-in.

use crate::status::define_status_enum;

define_status_enum! {
    /// Account role stored on the user profile.
    Role {
        Admin = "admin",
        Artist = "artist",
        User = "user",
    }
}

pub const ADMIN_DASHBOARD_ROUTE: &str = "/admin/dashboard";
pub const ARTIST_DASHBOARD_ROUTE: &str = "/artist/dashboard";
pub const CUSTOMER_DASHBOARD_ROUTE: &str = "/customer/dashboard";
pub const LOGIN_ROUTE: &str = "/login";

/// Role assigned to every new account.
pub const DEFAULT_ROLE: Role = Role::User;

impl Role {
    /// Dashboard route for this role.
    pub fn dashboard_route(self) -> &'static str {
        match self {
            Role::Admin => ADMIN_DASHBOARD_ROUTE,
            Role::Artist => ARTIST_DASHBOARD_ROUTE,
            Role::User => CUSTOMER_DASHBOARD_ROUTE,
        }
    }
}

/// Map a raw role value to its dashboard. Unknown or missing roles go to login.
pub fn dashboard_route(role: Option<&str>) -> &'static str {
    role.and_then(Role::parse)
        .map(Role::dashboard_route)
        .unwrap_or(LOGIN_ROUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_map_to_their_dashboards() {
        assert_eq!(dashboard_route(Some("admin")), "/admin/dashboard");
        assert_eq!(dashboard_route(Some("artist")), "/artist/dashboard");
        assert_eq!(dashboard_route(Some("user")), "/customer/dashboard");
    }

    #[test]
    fn unknown_or_unset_roles_go_to_login() {
        assert_eq!(dashboard_route(None), LOGIN_ROUTE);
        assert_eq!(dashboard_route(Some("")), LOGIN_ROUTE);
        assert_eq!(dashboard_route(Some("Admin")), LOGIN_ROUTE);
        assert_eq!(dashboard_route(Some("moderator")), LOGIN_ROUTE);
    }

    #[test]
    fn new_accounts_are_customers() {
        assert_eq!(DEFAULT_ROLE, Role::User);
    }
}
