//! In-memory [`DocumentStore`] implementation.
//!
//! Backs the test suite and local/offline runs. Collections are keyed by
//! their full path; documents within a collection live in a `BTreeMap` so
//! listings are deterministic. `set_offline(true)` makes every operation fail
//! with a remote error, which is how the tests exercise degraded-store paths.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::store::{DocumentStore, Fields, Order, StoredDoc};

pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Fields>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate the store being unreachable. Every subsequent call fails
    /// with a `Remote` error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::Relaxed);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(AtomicOrdering::Relaxed) {
            return Err(AppError::remote("store unreachable"));
        }
        Ok(())
    }

    fn doc(path: &str, id: &str, fields: &Fields) -> StoredDoc {
        StoredDoc {
            id: id.to_string(),
            path: path.to_string(),
            fields: fields.clone(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Value ordering for `list_ordered`: numbers before strings.
fn compare_values(x: &Value, y: &Value) -> Ordering {
    match (x.as_f64(), y.as_f64()) {
        (Some(xf), Some(yf)) => xf.partial_cmp(&yf).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => x.as_str().unwrap_or("").cmp(y.as_str().unwrap_or("")),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDoc>> {
        self.check_online()?;
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).map(|fields| Self::doc(collection, id, fields))))
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        self.check_online()?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String> {
        self.check_online()?;
        let id = Uuid::new_v4().to_string();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<()> {
        self.check_online()?;
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| AppError::not_found(format!("no document {collection}/{id}")))?;
        let fields = docs
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("no document {collection}/{id}")))?;
        for (key, value) in patch {
            fields.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.check_online()?;
        if let Some(mut docs) = self.collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDoc>> {
        self.check_online()?;
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Self::doc(collection, id, fields))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        field: &str,
        order: Order,
    ) -> Result<Vec<StoredDoc>> {
        let mut docs = self.list(collection).await?;
        // Documents missing the field sort last regardless of direction.
        docs.sort_by(|a, b| match (a.fields.get(field), b.fields.get(field)) {
            (Some(x), Some(y)) => {
                let ordering = compare_values(x, y);
                match order {
                    Order::Asc => ordering,
                    Order::Desc => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(docs)
    }

    async fn query_range(
        &self,
        collection: &str,
        field: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<StoredDoc>> {
        self.check_online()?;
        let mut hits: Vec<StoredDoc> = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| {
                        fields
                            .get(field)
                            .and_then(Value::as_str)
                            .is_some_and(|v| v >= start && v <= end)
                    })
                    .map(|(id, fields)| Self::doc(collection, id, fields))
                    .collect()
            })
            .unwrap_or_default();
        hits.sort_by(|a, b| {
            a.str_field(field)
                .unwrap_or("")
                .cmp(b.str_field(field).unwrap_or(""))
        });
        Ok(hits)
    }

    async fn query_group(
        &self,
        subcollection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDoc>> {
        self.check_online()?;
        let mut hits = Vec::new();
        for entry in self.collections.iter() {
            let path = entry.key();
            if path.rsplit('/').next() != Some(subcollection) {
                continue;
            }
            for (id, fields) in entry.value().iter() {
                if fields.get(field).and_then(Value::as_str) == Some(value) {
                    hits.push(Self::doc(path, id, fields));
                }
            }
        }
        Ok(hits)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        self.check_online()?;
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0))
    }

    async fn count_group(&self, subcollection: &str, field: &str, value: &str) -> Result<usize> {
        Ok(self.query_group(subcollection, field, value).await?.len())
    }
}
