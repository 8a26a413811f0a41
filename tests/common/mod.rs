#![allow(dead_code)]

use repokit::{
    AuditStamp, AuditTimestamps, Entity, EntityId, FieldAccess, FieldDef, FieldRead, FieldRef,
    Identifiable, MapFrom, MapTo, Pagination, Query, ReadContext, RepoError, Repository, Result,
    StoreHandle, Value, WriteContext,
};

// ============================================================================
// User: audit-tracked entity with a store-assigned integer identifier
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub audit: AuditStamp,
}

impl User {
    pub fn new(id: i64, name: &str, age: i32) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            audit: AuditStamp::default(),
        }
    }
}

impl Entity for User {
    fn audit(&self) -> Option<&dyn AuditTimestamps> {
        Some(&self.audit)
    }

    fn audit_mut(&mut self) -> Option<&mut dyn AuditTimestamps> {
        Some(&mut self.audit)
    }
}

impl Identifiable for User {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl FieldRead for User {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "id" => Some(FieldRef::Value(self.id.into())),
            "name" => Some(FieldRef::Value(self.name.as_str().into())),
            "age" => Some(FieldRef::Value(self.age.into())),
            _ => None,
        }
    }
}

impl FieldAccess for User {
    fn entity_name() -> &'static str {
        "User"
    }

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 3] = [
            FieldDef::scalar("id"),
            FieldDef::scalar("name"),
            FieldDef::scalar("age"),
        ];
        &FIELDS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub age: i32,
}

impl MapTo<UserDto> for User {
    fn map_to(&self) -> Result<UserDto> {
        Ok(UserDto {
            id: self.id,
            name: self.name.clone(),
            age: self.age,
        })
    }
}

impl MapFrom<UserDto> for User {
    fn map_from(&mut self, source: &UserDto) {
        self.name = source.name.clone();
        self.age = source.age;
    }
}

/// Projection that rejects unnamed users; exercises mapping-failure
/// propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedUserDto {
    pub name: String,
}

impl MapTo<NamedUserDto> for User {
    fn map_to(&self) -> Result<NamedUserDto> {
        if self.name.trim().is_empty() {
            return Err(RepoError::Mapping(format!("user {} has no name", self.id)));
        }
        Ok(NamedUserDto {
            name: self.name.clone(),
        })
    }
}

// ============================================================================
// Customer with a nested address: dotted-path sorting fixture
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

impl FieldRead for Address {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "city" => Some(FieldRef::Value(self.city.as_str().into())),
            "zip" => Some(FieldRef::Value(self.zip.as_str().into())),
            _ => None,
        }
    }
}

impl FieldAccess for Address {
    fn entity_name() -> &'static str {
        "Address"
    }

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 2] = [FieldDef::scalar("city"), FieldDef::scalar("zip")];
        &FIELDS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub address: Option<Address>,
}

impl Customer {
    pub fn new(id: i32, name: &str, city: &str, zip: &str) -> Self {
        Self {
            id,
            name: name.into(),
            address: Some(Address {
                city: city.into(),
                zip: zip.into(),
            }),
        }
    }
}

impl Entity for Customer {}

impl Identifiable for Customer {
    type Id = i32;

    fn id(&self) -> &i32 {
        &self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl FieldRead for Customer {
    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "id" => Some(FieldRef::Value(self.id.into())),
            "name" => Some(FieldRef::Value(self.name.as_str().into())),
            "address" => Some(match &self.address {
                Some(address) => FieldRef::Nested(address),
                None => FieldRef::Value(Value::Null),
            }),
            _ => None,
        }
    }
}

impl FieldAccess for Customer {
    fn entity_name() -> &'static str {
        "Customer"
    }

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 3] = [
            FieldDef::scalar("id"),
            FieldDef::scalar("name"),
            FieldDef::nested("address", <Address as FieldAccess>::fields),
        ];
        &FIELDS
    }
}

// ============================================================================
// Tag: string-identifier entity (caller-assigned keys)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

impl Tag {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl Entity for Tag {}

impl Identifiable for Tag {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

// ============================================================================
// Device: opaque comparable identifier (generic upsert path)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: uuid::Uuid,
    pub name: String,
}

impl Entity for Device {}

impl Identifiable for Device {
    type Id = uuid::Uuid;

    fn id(&self) -> &uuid::Uuid {
        &self.id
    }

    fn set_id(&mut self, id: uuid::Uuid) {
        self.id = id;
    }
}

// ============================================================================
// Identifier-bearing reference and a concrete repository
// ============================================================================

/// Plain identifier-bearing reference, the input shape for lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct IdRef<Id: EntityId> {
    pub id: Id,
}

impl<Id: EntityId> IdRef<Id> {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

impl<Id: EntityId> Identifiable for IdRef<Id> {
    type Id = Id;

    fn id(&self) -> &Id {
        &self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

pub struct UserRepository {
    read: ReadContext,
    write: WriteContext,
    pub min_age: Option<i32>,
}

impl UserRepository {
    pub fn new(store: &StoreHandle) -> Self {
        Self {
            read: ReadContext::new(store.clone()),
            write: WriteContext::new(store.clone()),
            min_age: None,
        }
    }
}

impl Repository for UserRepository {
    type Entity = User;

    fn read_context(&self) -> &ReadContext {
        &self.read
    }

    fn write_context(&self) -> &WriteContext {
        &self.write
    }

    /// Entity-specific predicate: minimum age when configured.
    fn filter(&self, query: Query<User>, _pagination: &Pagination) -> Query<User> {
        match self.min_age {
            Some(min) => query.filter(move |user| user.age >= min),
            None => query,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn contexts() -> (StoreHandle, ReadContext, WriteContext) {
    let store = StoreHandle::new();
    let read = ReadContext::new(store.clone());
    let write = WriteContext::new(store.clone());
    (store, read, write)
}

/// Seed users through the regular write pipeline and return the store.
pub fn seeded_users(users: Vec<User>) -> StoreHandle {
    let (store, _, write) = contexts();
    write
        .writable::<User>()
        .create_or_update_list(users)
        .unwrap();
    write.save_changes().unwrap();
    store
}
