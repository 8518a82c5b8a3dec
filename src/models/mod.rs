pub mod credential;
pub mod realization;
pub mod target;
pub mod view;
