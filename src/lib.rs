pub mod cli;
pub mod io;
pub mod model;
pub mod ops;

pub use io::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use model::{AppData, CompletionMap, Task, TimeRange};
pub use ops::analytics::Report;
pub use ops::store::TaskStore;
