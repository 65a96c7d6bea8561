//! Datagrid construction.
//!
//! [`SearchDatagridBuilder`] is the admin-facing entry point. Filtering goes
//! through the [`FilterResolver`] and the search finder; field metadata
//! fix-ups stay with the host framework's [`FallbackDatagridBuilder`].

use std::sync::Arc;

use serde_json::{Map, Value};

use searchgrid_core::{FieldId, Result};
use searchgrid_filter::{DeclaredType, FilterDescriptor, FilterResolver, GuessContext, OptionBag};
use searchgrid_pager::{PagedResultSet, Pager, ResultPage};
use searchgrid_query::{CompositeQuery, FilterValue, FilterValues, QueryBuilder};

use crate::finder::FinderProvider;

/// The admin a datagrid is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    /// Admin identifier, used for finder routing (`admin.post`).
    pub code: String,
    /// Entity class the admin manages.
    pub entity_class: String,
    /// Model manager the entity lives in.
    pub model_manager: String,
}

impl AdminContext {
    /// Create an admin context.
    pub fn new(
        code: impl Into<String>,
        entity_class: impl Into<String>,
        model_manager: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            entity_class: entity_class.into(),
            model_manager: model_manager.into(),
        }
    }

    fn guess_context(&self) -> GuessContext<'_> {
        GuessContext::new(&self.entity_class, &self.model_manager)
    }
}

/// An admin field offered as a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescription {
    /// Field identifier.
    pub name: FieldId,
    /// Type declared by the admin, if any.
    pub declared: DeclaredType,
    /// Filter options declared by the admin.
    pub options: OptionBag,
    /// Host-framework metadata maintained by the fallback builder.
    pub metadata: Map<String, Value>,
}

impl FieldDescription {
    /// Describe a field with no declared type or options.
    pub fn new(name: impl Into<FieldId>) -> Self {
        Self {
            name: name.into(),
            declared: DeclaredType::Unset,
            options: OptionBag::new(),
            metadata: Map::new(),
        }
    }

    /// Set the declared type.
    pub fn with_declared(mut self, declared: DeclaredType) -> Self {
        self.declared = declared;
        self
    }

    /// Set the declared options.
    pub fn with_options(mut self, options: OptionBag) -> Self {
        self.options = options;
        self
    }
}

/// The host framework's datagrid builder.
///
/// Only field metadata fix-ups are delegated to it.
pub trait FallbackDatagridBuilder: Send + Sync {
    /// Complete a field description with model metadata.
    fn fix_field_description(&self, admin: &AdminContext, field: &mut FieldDescription);
}

/// Fallback that leaves field descriptions untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFixups;

impl FallbackDatagridBuilder for NoFixups {
    fn fix_field_description(&self, _admin: &AdminContext, _field: &mut FieldDescription) {}
}

/// Builds search-backed datagrids for admins.
#[derive(Clone)]
pub struct SearchDatagridBuilder {
    fallback: Arc<dyn FallbackDatagridBuilder>,
    resolver: FilterResolver,
    finders: Arc<dyn FinderProvider>,
}

impl SearchDatagridBuilder {
    /// Create a builder.
    pub fn new(
        fallback: Arc<dyn FallbackDatagridBuilder>,
        resolver: FilterResolver,
        finders: Arc<dyn FinderProvider>,
    ) -> Self {
        Self {
            fallback,
            resolver,
            finders,
        }
    }

    /// Delegate to the fallback builder.
    pub fn fix_field_description(&self, admin: &AdminContext, field: &mut FieldDescription) {
        self.fallback.fix_field_description(admin, field);
    }

    /// Resolve `field` and register the filter on `datagrid`.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors
    /// ([`Error::UnresolvableField`](searchgrid_core::Error::UnresolvableField),
    /// [`Error::InvalidOption`](searchgrid_core::Error::InvalidOption)); the
    /// datagrid is left unchanged.
    pub fn add_filter(
        &self,
        datagrid: &mut Datagrid,
        field: &FieldDescription,
        admin: &AdminContext,
    ) -> Result<FilterDescriptor> {
        let descriptor = self.resolver.resolve(
            &admin.guess_context(),
            &field.name,
            field.declared,
            field.options.clone(),
        )?;
        log::info!(
            "Admin '{}': added {} filter '{}'",
            admin.code,
            descriptor.kind(),
            descriptor.field()
        );
        datagrid.add_filter(descriptor.clone());
        Ok(descriptor)
    }

    /// Create an empty datagrid bound to the admin's finder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](searchgrid_core::Error::Config) if the admin
    /// has no usable finder.
    pub fn base_datagrid(&self, admin: &AdminContext, values: FilterValues) -> Result<Datagrid> {
        let transport = self.finders.finder_for_admin(&admin.code)?;
        log::debug!(
            "Admin '{}': datagrid bound to finder '{}'",
            admin.code,
            transport.name()
        );
        let results = PagedResultSet::new(transport).with_timeout(self.finders.timeout());
        Ok(Datagrid::new(results, values))
    }
}

impl std::fmt::Debug for SearchDatagridBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDatagridBuilder")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// Filters, submitted values, and the result set of one admin list.
#[derive(Debug, Clone)]
pub struct Datagrid {
    builder: QueryBuilder,
    results: PagedResultSet,
    values: FilterValues,
}

impl Datagrid {
    /// Create a datagrid with no filters.
    pub fn new(results: PagedResultSet, values: FilterValues) -> Self {
        Self {
            builder: QueryBuilder::new(),
            results,
            values,
        }
    }

    /// Register a resolved filter.
    pub fn add_filter(&mut self, descriptor: FilterDescriptor) {
        self.builder.add_filter(descriptor);
    }

    /// Registered filters in registration order.
    pub fn filters(&self) -> &[FilterDescriptor] {
        self.builder.filters()
    }

    /// Set the submitted value of a filter.
    pub fn set_value(&mut self, field: impl Into<FieldId>, value: FilterValue) {
        self.values.insert(field.into(), value);
    }

    /// Submitted values.
    pub fn values(&self) -> &FilterValues {
        &self.values
    }

    /// Result set the datagrid executes against.
    pub fn results(&self) -> &PagedResultSet {
        &self.results
    }

    /// Build the query for the submitted values.
    pub fn build_query(&self) -> Result<CompositeQuery> {
        self.builder.build(&self.values)
    }

    /// Build the query and execute one page.
    ///
    /// # Errors
    ///
    /// Propagates query building and execution errors; no partial page is
    /// returned.
    pub async fn page(&self, offset: i64, limit: i64) -> Result<ResultPage> {
        let query = self.build_query()?;
        self.results.execute(&query, offset, limit).await
    }

    /// Build the query and wrap it in a lazy [`Pager`].
    pub fn pager(&self) -> Result<Pager> {
        Ok(Pager::new(self.results.clone(), self.build_query()?))
    }
}
