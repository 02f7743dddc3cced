pub mod file;
pub mod sqlite;
pub mod traits;

pub use file::FileRepository;
pub use sqlite::SqliteRepository;
pub use traits::{IdSeed, Repository};
