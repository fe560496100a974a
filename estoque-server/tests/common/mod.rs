//! Shared fixtures for router-level tests
//!
//! `MemoryStore` mirrors what the `itens` table gives the service: a
//! uniqueness key that ignores case and accents, `atualizado_em` bumped on
//! every write, affected-row counts. Names arrive already normalized by the
//! models, same as with MySQL.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use estoque_server::db::{DbError, ItemStore};
use estoque_server::http::{build_router, AppState};
use estoque_server::models::{IdList, Item, ItemId, ItemPatch, NewItem, Pagination, TableMeta};

#[derive(Default)]
struct Inner {
    rows: Vec<Item>,
    next_id: u64,
    clock: Option<DateTime<Utc>>,
    offline: bool,
}

impl Inner {
    /// Strictly increasing timestamps, millisecond resolution like TIMESTAMP(3).
    fn tick(&mut self) -> DateTime<Utc> {
        let next = match self.clock {
            Some(last) => last + Duration::milliseconds(1),
            None => Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        };
        self.clock = Some(next);
        next
    }

    fn check(&self) -> Result<(), DbError> {
        if self.offline {
            Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }

    fn name_taken(&self, name: &str, except: Option<ItemId>) -> bool {
        let wanted = collation_key(name);
        self.rows
            .iter()
            .any(|row| Some(row.id_item) != except && collation_key(&row.nome_item) == wanted)
    }
}

/// Case- and accent-insensitive comparison key (utf8mb4_0900_ai_ci stand-in).
pub fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// In-memory `ItemStore`, cloneable so tests can inspect it after requests
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Insert a row directly, bypassing validation.
    pub fn seed(&self, name: &str, ativo: bool) -> u64 {
        let mut inner = self.lock();
        let now = inner.tick();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(Item {
            id_item: ItemId::new(id),
            nome_item: name.to_string(),
            ativo,
            criado_em: now,
            atualizado_em: now,
        });
        id
    }

    pub fn get(&self, id: u64) -> Option<Item> {
        self.lock()
            .rows
            .iter()
            .find(|row| row.id_item.get() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// Make every call fail like an unreachable database.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list(&self, search: Option<&str>, page: Pagination) -> Result<Vec<Item>, DbError> {
        let inner = self.lock();
        inner.check()?;

        let needle = search.map(collation_key);
        let mut rows: Vec<Item> = inner
            .rows
            .iter()
            .filter(|row| match &needle {
                Some(n) => collation_key(&row.nome_item).contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            collation_key(&a.nome_item)
                .cmp(&collation_key(&b.nome_item))
                .then(a.id_item.cmp(&b.id_item))
        });

        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn meta(&self) -> Result<TableMeta, DbError> {
        let inner = self.lock();
        inner.check()?;
        Ok(TableMeta {
            total: inner.rows.len() as i64,
            last_updated: inner.rows.iter().map(|row| row.atualizado_em).max(),
        })
    }

    async fn create(&self, item: &NewItem) -> Result<ItemId, DbError> {
        let mut inner = self.lock();
        inner.check()?;
        if inner.name_taken(item.nome_item.as_str(), None) {
            return Err(DbError::DuplicateName);
        }

        let now = inner.tick();
        inner.next_id += 1;
        let id = ItemId::new(inner.next_id);
        inner.rows.push(Item {
            id_item: id,
            nome_item: item.nome_item.as_str().to_string(),
            ativo: item.ativo,
            criado_em: now,
            atualizado_em: now,
        });
        Ok(id)
    }

    async fn update(&self, patch: &ItemPatch) -> Result<u64, DbError> {
        let mut inner = self.lock();
        inner.check()?;
        if !inner.rows.iter().any(|row| row.id_item == patch.id_item) {
            return Ok(0);
        }
        if let Some(name) = &patch.nome_item {
            if inner.name_taken(name.as_str(), Some(patch.id_item)) {
                return Err(DbError::DuplicateName);
            }
        }

        let now = inner.tick();
        let row = inner
            .rows
            .iter_mut()
            .find(|row| row.id_item == patch.id_item)
            .unwrap();
        if let Some(name) = &patch.nome_item {
            row.nome_item = name.as_str().to_string();
        }
        if let Some(ativo) = patch.ativo {
            row.ativo = ativo;
        }
        row.atualizado_em = now;
        Ok(1)
    }

    async fn soft_delete(&self, ids: &IdList) -> Result<u64, DbError> {
        let mut inner = self.lock();
        inner.check()?;
        let now = inner.tick();

        let mut count = 0;
        for row in inner.rows.iter_mut() {
            if row.ativo && ids.as_slice().contains(&row.id_item.get()) {
                row.ativo = false;
                row.atualizado_em = now;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn hard_delete(&self, ids: &IdList) -> Result<u64, DbError> {
        let mut inner = self.lock();
        inner.check()?;

        let before = inner.rows.len();
        inner
            .rows
            .retain(|row| !ids.as_slice().contains(&row.id_item.get()));
        Ok((before - inner.rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.lock().check()
    }
}

/// Router over a clone of the store.
pub fn app(store: &MemoryStore) -> Router {
    build_router(Arc::new(AppState::new(store.clone())))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// Send one request; `body` is sent raw with a JSON content type.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        json,
    }
}
