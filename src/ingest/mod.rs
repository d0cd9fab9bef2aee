pub mod event;
pub mod reader;
