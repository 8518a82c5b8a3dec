pub mod auth;
pub mod category;
pub mod normalize;
pub mod realization;
pub mod target;
pub mod views;
