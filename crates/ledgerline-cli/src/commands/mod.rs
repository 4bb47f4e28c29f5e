//! Command implementations.

pub mod extract;
pub mod salvage;
pub mod text;

pub use self::extract::execute_extract;
pub use self::salvage::execute_salvage;
pub use self::text::execute_text;
