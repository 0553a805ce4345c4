pub mod cell;
pub mod column;
pub mod config;
pub mod filter;
pub mod search;
pub mod classify;
pub mod storage;
pub mod persist;
pub mod timer;
pub mod refresh;
pub mod grid;
pub mod error;

pub use cell::{CellValue, GridRow};
pub use column::{ColumnDescriptor, ColumnKind};
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use filter::{FilterDescriptor, FilterStore, FilterValue};
pub use grid::{Grid, GridBuilder, GridState, GridView, SelectionState, SortDirection, SortKey};
pub use storage::{KeyValueStore, MemoryStorage, SqliteStorage};
