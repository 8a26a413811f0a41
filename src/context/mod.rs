pub mod read;
pub mod store;
pub mod write;

pub use read::ReadContext;
pub use store::{MemStore, StoreHandle};
pub use write::{ChangeState, Writable, WriteContext};
