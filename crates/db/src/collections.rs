//! Collection names.

pub const BEATS: &str = "beats";
pub const ORDERS: &str = "orders";
/// Order numbers claimed so far, keyed by the number itself.
pub const ORDER_NUMBERS: &str = "orderNumbers";
pub const CONTENT: &str = "content";
pub const COLLABORATIONS: &str = "collaborations";
pub const COLLAB_REQUESTS: &str = "collabRequests";
pub const ARTIST_ROLE_REQUESTS: &str = "artistRoleRequests";
pub const SUPPORT_MESSAGES: &str = "supportMessages";
pub const USERS: &str = "users";
pub const CREDENTIALS: &str = "credentials";
pub const SESSIONS: &str = "sessions";
pub const PASSWORD_RESETS: &str = "passwordResets";
pub const SETTINGS: &str = "settings";
pub const EVENTS: &str = "events";
