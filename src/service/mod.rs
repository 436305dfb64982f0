//! Persistence gateway and pagination.

mod gateway;
mod paging;
pub use gateway::{merge_rows, Gateway};
pub use paging::{PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
