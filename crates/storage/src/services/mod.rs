pub mod composition;
pub mod identity;
