pub use traits::*;
pub mod memory;
pub mod traits;
pub use memory::MemoryStorage;
