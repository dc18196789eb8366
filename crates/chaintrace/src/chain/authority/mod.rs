mod permission_level;
pub use permission_level::PermissionLevel;
