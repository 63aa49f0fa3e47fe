pub mod close;
pub mod listing;
pub mod submit;
