//! Line-delimited JSON endpoint through which remote callers reach the
//! procedures registered on an [`InMemoryRouter`](crate::infrastructure::in_memory::InMemoryRouter).

pub mod message;
pub mod server;
