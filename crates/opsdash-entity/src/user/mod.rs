//! User entities: model, role, and resolved authority.

pub mod authority;
pub mod model;
pub mod role;

pub use authority::Authority;
pub use model::User;
pub use role::Role;
