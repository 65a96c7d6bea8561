//! Search-backed admin datagrids.
//!
//! This crate wires the searchgrid components into the datagrid lifecycle
//! of an admin list view:
//!
//! 1. [`SearchDatagridBuilder::base_datagrid`] routes the admin to its search
//!    finder and creates an empty [`Datagrid`].
//! 2. [`SearchDatagridBuilder::add_filter`] resolves each admin field into a
//!    filter and registers it.
//! 3. [`Datagrid::page`] builds the composite query from the submitted
//!    values and executes one page against the finder.
//!
//! The component crates are re-exported as modules.

pub use searchgrid_core as core;
pub use searchgrid_filter as filter;
pub use searchgrid_pager as pager;
pub use searchgrid_query as query;

pub mod datagrid;
pub mod finder;

// Re-exports
pub use datagrid::{
    AdminContext, Datagrid, FallbackDatagridBuilder, FieldDescription, NoFixups,
    SearchDatagridBuilder,
};
pub use finder::{ConfiguredFinders, FinderProvider};

pub use searchgrid_core::{Error, FieldId, Result, SearchGridConfig};
pub use searchgrid_filter::{DeclaredType, FilterDescriptor, FilterKind, FilterResolver, OptionBag};
pub use searchgrid_pager::{PagedResultSet, Pager, ResultPage, SearchTransport, SimpleSearch};
pub use searchgrid_query::{CompositeQuery, FilterValue, FilterValues, QueryBuilder};
