pub mod conversion;
pub mod definition;
pub mod language;
pub mod metadata_keys;

pub use conversion::*;
pub use definition::*;
pub use language::*;
