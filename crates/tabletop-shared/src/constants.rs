/// Application name
pub const APP_NAME: &str = "Tabletop";

/// Default access token lifetime when the caller supplies none (minutes)
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 15;

/// Access token lifetime handed out on login (minutes)
pub const LOGIN_TOKEN_LIFETIME_MINUTES: i64 = 60;

/// Cookie that carries the access token for browser clients
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Attribute base value used when a character has no recorded value
pub const DEFAULT_ATTRIBUTE_VALUE: i64 = 1;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;
