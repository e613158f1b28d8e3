//! portfolio-store: read-only access to portfolio records.
//!
//! Every entity (skill, experience, education) is served through the same
//! [`Repository`] contract. Concrete backends are generic over the record
//! type instead of being written once per entity.
//!
//! # Architecture
//!
//! ```text
//! Instrumented<R>            (start tracker → delegate → report outcome)
//!   └── R: Repository
//!         ├── PgRepository<T: Table>   single-table SELECT via sqlx
//!         └── MemoryRepository<T>      fixed in-memory records
//! ```
//!
//! `list()` returns at most [`MAX_LIST_ROWS`] records ordered by start date
//! descending. `get(id)` returns [`StoreError::NotFound`] when no row
//! matches; every other failure is [`StoreError::Database`].

pub mod error;
pub mod instrumented;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use instrumented::Instrumented;
pub use memory::MemoryRepository;
pub use postgres::{PgRepository, Table};
pub use repository::{list_order, Repository, MAX_LIST_ROWS};
pub use types::*;
