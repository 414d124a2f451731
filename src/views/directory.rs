//! Directory entities: organizers, staff, suppliers, venues.
//!
//! All four share one source: list via `getAll{Entity}`, write via
//! `create/update/delete{Entity}`, status via `update{Entity}`. Each entity
//! only differs in its pre-request checks and filter schema.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::api::{AdminApi, Entity, ListParams, Listing};
use crate::error::ApiError;
use crate::list::{FilterSchema, ListController, ListSource, Mutation, PaginationMode};
use crate::models::status::DomainStatus;
use crate::models::{OnboardingStatus, Organizer, RecordId, Record, Staff, Supplier, Venue};
use crate::validation::{self, ValidationError};

use super::{ViewContext, present, unsupported};

// =============================================================================
// RULES
// =============================================================================

/// Pre-request checks for one entity's create/update payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRules {
    pub required: &'static [&'static str],
    /// `(min, max)` field names of a fee range, if the entity quotes one.
    pub fee_range: Option<(&'static str, &'static str)>,
    /// Numeric fields that must not be negative.
    pub non_negative: &'static [&'static str],
}

impl EntityRules {
    #[must_use]
    pub fn for_entity(entity: Entity) -> Self {
        match entity {
            Entity::Organizer => Self {
                required: &["name", "email"],
                fee_range: Some(("fee_min", "fee_max")),
                non_negative: &[],
            },
            Entity::Staff => Self { required: &["name", "email", "role"], fee_range: None, non_negative: &[] },
            Entity::Supplier => Self {
                required: &["name", "category"],
                fee_range: Some(("price_min", "price_max")),
                non_negative: &[],
            },
            Entity::Venue => Self { required: &["name", "location"], fee_range: None, non_negative: &["capacity", "rate"] },
        }
    }

    /// A create must carry every required field; an update may omit them
    /// but must not blank them.
    ///
    /// # Errors
    ///
    /// The first rule the payload breaks.
    pub fn check(&self, payload: &Map<String, Value>, creating: bool) -> Result<(), ValidationError> {
        if creating {
            validation::require_fields(payload, self.required)?;
        } else {
            let supplied: Vec<&str> = self.required.iter().copied().filter(|f| payload.contains_key(*f)).collect();
            validation::require_fields(payload, &supplied)?;
        }

        if let Some(Value::String(email)) = payload.get("email") {
            if !email.trim().is_empty() {
                validation::validate_email(email)?;
            }
        }

        if let Some((min, max)) = self.fee_range {
            validation::validate_fee_range(
                validation::numeric_field(payload, min),
                validation::numeric_field(payload, max),
            )?;
        }

        for field in self.non_negative {
            if validation::numeric_field(payload, field).is_some_and(|v| v < 0.0) {
                return Err(ValidationError::NegativeAmount { field: (*field).to_owned() });
            }
        }
        Ok(())
    }
}

// =============================================================================
// SOURCE
// =============================================================================

pub struct DirectorySource<T> {
    api: AdminApi,
    entity: Entity,
    rules: EntityRules,
    _record: PhantomData<fn() -> T>,
}

impl<T> DirectorySource<T> {
    #[must_use]
    pub fn new(api: AdminApi, entity: Entity) -> Self {
        Self { api, entity, rules: EntityRules::for_entity(entity), _record: PhantomData }
    }

    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }
}

#[async_trait::async_trait]
impl<T> ListSource<T> for DirectorySource<T>
where
    T: Record + DeserializeOwned,
{
    async fn fetch(&self, params: &ListParams) -> Result<Listing<T>, ApiError> {
        self.api.get_all(self.entity, params).await
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<(), ApiError> {
        match mutation {
            Mutation::Create { payload } => {
                self.rules.check(payload, true)?;
                self.api.create(self.entity, payload).await.map(|_| ())
            }
            Mutation::Update { id, payload } => {
                self.rules.check(payload, false)?;
                self.api.update(self.entity, *id, payload).await
            }
            Mutation::Delete { id } => self.api.delete(self.entity, *id).await,
            Mutation::SetStatus { id, status } => {
                let status = OnboardingStatus::parse(status)?;
                let mut payload = Map::new();
                payload.insert("status".to_owned(), json!(status.as_str()));
                self.api.update(self.entity, *id, &payload).await
            }
            other @ Mutation::Action { .. } => Err(unsupported(view_name(self.entity), other)),
        }
    }
}

fn view_name(entity: Entity) -> &'static str {
    match entity {
        Entity::Organizer => "organizers",
        Entity::Staff => "staff",
        Entity::Supplier => "suppliers",
        Entity::Venue => "venues",
    }
}

// =============================================================================
// SCHEMAS
// =============================================================================

fn status_of<T: HasOnboardingStatus>(record: &T) -> &str {
    record.onboarding_status().as_str()
}

trait HasOnboardingStatus {
    fn onboarding_status(&self) -> OnboardingStatus;
}

macro_rules! onboarding_status {
    ($($ty:ty),*) => {
        $(impl HasOnboardingStatus for $ty {
            fn onboarding_status(&self) -> OnboardingStatus {
                self.status
            }
        })*
    };
}

onboarding_status!(Organizer, Staff, Supplier, Venue);

#[must_use]
pub fn organizer_schema() -> FilterSchema<Organizer> {
    FilterSchema::new()
        .search("search", |o: &Organizer| {
            present([Some(o.name.as_str()), o.email.as_deref(), o.company.as_deref(), o.phone.as_deref()])
        })
        .exact("status", status_of)
}

#[must_use]
pub fn staff_schema() -> FilterSchema<Staff> {
    FilterSchema::new()
        .search("search", |s: &Staff| present([Some(s.name.as_str()), s.email.as_deref(), s.role.as_deref()]))
        .exact("status", status_of)
        .exact("role", |s| s.role.as_deref().unwrap_or_default())
}

#[must_use]
pub fn supplier_schema() -> FilterSchema<Supplier> {
    FilterSchema::new()
        .search("search", |s: &Supplier| {
            present([Some(s.name.as_str()), s.contact_person.as_deref(), s.email.as_deref(), s.category.as_deref()])
        })
        .exact("status", status_of)
        .exact("category", |s| s.category.as_deref().unwrap_or_default())
}

#[must_use]
pub fn venue_schema() -> FilterSchema<Venue> {
    FilterSchema::new()
        .search("search", |v: &Venue| present([Some(v.name.as_str()), v.location.as_deref()]))
        .exact("status", status_of)
}

// =============================================================================
// VIEWS
// =============================================================================

pub type OrganizersView = ListController<Organizer, DirectorySource<Organizer>>;
pub type StaffView = ListController<Staff, DirectorySource<Staff>>;
pub type SuppliersView = ListController<Supplier, DirectorySource<Supplier>>;
pub type VenuesView = ListController<Venue, DirectorySource<Venue>>;

fn build<T>(ctx: &ViewContext, entity: Entity, schema: FilterSchema<T>) -> ListController<T, DirectorySource<T>>
where
    T: Record + DeserializeOwned,
{
    let (api, token) = ctx.scoped_api();
    ctx.build(view_name(entity), DirectorySource::new(api, entity), schema, PaginationMode::Client, token)
}

#[must_use]
pub fn organizers(ctx: &ViewContext) -> OrganizersView {
    build(ctx, Entity::Organizer, organizer_schema())
}

#[must_use]
pub fn staff(ctx: &ViewContext) -> StaffView {
    build(ctx, Entity::Staff, staff_schema())
}

#[must_use]
pub fn suppliers(ctx: &ViewContext) -> SuppliersView {
    build(ctx, Entity::Supplier, supplier_schema())
}

#[must_use]
pub fn venues(ctx: &ViewContext) -> VenuesView {
    build(ctx, Entity::Venue, venue_schema())
}

impl<T> ListController<T, DirectorySource<T>>
where
    T: Record + DeserializeOwned,
{
    /// # Errors
    ///
    /// Validation or request errors; nothing is sent when validation fails.
    pub async fn create(&mut self, payload: Map<String, Value>) -> Result<(), ApiError> {
        self.mutate(Mutation::Create { payload }).await
    }

    /// # Errors
    ///
    /// Validation or request errors.
    pub async fn update(&mut self, id: RecordId, payload: Map<String, Value>) -> Result<(), ApiError> {
        self.mutate(Mutation::Update { id, payload }).await
    }

    /// # Errors
    ///
    /// Request errors; the row is restored.
    pub async fn delete(&mut self, id: RecordId) -> Result<(), ApiError> {
        self.mutate(Mutation::Delete { id }).await
    }

    /// # Errors
    ///
    /// Request errors; the row's previous status is restored.
    pub async fn set_status(&mut self, id: RecordId, status: OnboardingStatus) -> Result<(), ApiError> {
        self.mutate(Mutation::SetStatus { id, status: status.as_str().to_owned() }).await
    }
}

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;
