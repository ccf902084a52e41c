//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod board_repo;
mod memory_repo;


pub use traits::BoardRepository;
pub use db::{init_db, DbState};
pub use board_repo::SqliteBoardRepository;
pub use memory_repo::MemoryBoardRepository;
