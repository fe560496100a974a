//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod item;
pub mod pagination;
pub mod params;

pub use validation::ValidationError;
pub use item::{
    coerce_flag, normalize_name, normalize_search, Item, ItemId, ItemName, ItemPatch, NewItem,
    TableMeta, MAX_NOME_ITEM_LEN,
};
pub use pagination::{ListMeta, Paginated, Pagination, PaginationParams};
pub use params::{is_on_token, parse_leading_int, IdList};
