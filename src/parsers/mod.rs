pub mod common;
pub mod treesitter;

pub use common::get_supported_extensions;
