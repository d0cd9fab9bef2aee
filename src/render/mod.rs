pub mod codec;
pub mod cpu;
pub(crate) mod label;
pub mod surface;
