//! Generic list-view state: filters, pagination, selection, and optimistic
//! mutations over a remote collection.

pub mod controller;
pub mod filter;
pub mod mutation;
pub mod page;
pub mod selection;

pub use controller::{ListController, ListPhase, ListSource};
pub use filter::{FilterKind, FilterSchema, Filters};
pub use mutation::{Mutation, MutationState};
pub use page::PaginationMode;
pub use selection::Selection;
