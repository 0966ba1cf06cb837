/// API route modules
pub mod debug;
pub mod fallback;
pub mod json;
pub mod users;
