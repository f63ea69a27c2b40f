mod auth;
mod campaigns;
mod characters;
mod roles;

pub use auth::auth_routes;
pub use campaigns::campaign_routes;
pub use characters::character_routes;
pub use roles::role_routes;
