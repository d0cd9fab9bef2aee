pub mod entity;
pub mod tracker;
