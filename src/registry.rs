//! Endpoint registry: one descriptor per served table, built once at startup.

use crate::error::AppError;
use crate::model::{
    LabelType, Record, TImage, TImageSet, TLabel, TProject, TProjectUser, TUser, TableInfo,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// URL templates and schema for one table, as served by `/ddl`.
#[derive(Clone, Debug, Serialize)]
pub struct EndpointDescriptor {
    pub name: &'static str,
    pub create_url: String,
    pub retrieve_one_url: String,
    pub retrieve_many_url: String,
    pub update_url: String,
    pub delete_url: String,
    pub fetch_ddl_url: String,
    pub table_info: &'static TableInfo,
}

impl EndpointDescriptor {
    pub fn for_record<T: Record>() -> Self {
        let collection = format!("/{}", T::ROUTE);
        let item = format!("/{}/{{id}}", T::ROUTE);
        EndpointDescriptor {
            name: T::table_name(),
            create_url: collection.clone(),
            retrieve_one_url: item.clone(),
            retrieve_many_url: collection,
            update_url: item.clone(),
            delete_url: item,
            fetch_ddl_url: format!("/ddl/{}", T::table_name()),
            table_info: T::table_info(),
        }
    }
}

/// Table name to descriptor. Serializes as a JSON object keyed by table name.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct EntityRegistry {
    entries: BTreeMap<&'static str, EndpointDescriptor>,
}

impl EntityRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn lookup(&self, table: &str) -> Result<&EndpointDescriptor, AppError> {
        self.entries
            .get(table)
            .ok_or_else(|| AppError::UnknownTable(table.to_string()))
    }

    /// Every descriptor keyed by table name.
    pub fn list_all(&self) -> &BTreeMap<&'static str, EndpointDescriptor> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<&'static str, EndpointDescriptor>,
}

impl RegistryBuilder {
    pub fn register<T: Record>(mut self) -> Self {
        self.entries.insert(T::table_name(), EndpointDescriptor::for_record::<T>());
        self
    }

    pub fn build(self) -> EntityRegistry {
        EntityRegistry { entries: self.entries }
    }
}

/// Registry of all seven labeling tables.
pub fn default_registry() -> EntityRegistry {
    EntityRegistry::builder()
        .register::<LabelType>()
        .register::<TImage>()
        .register::<TImageSet>()
        .register::<TLabel>()
        .register::<TProject>()
        .register::<TProjectUser>()
        .register::<TUser>()
        .build()
}
