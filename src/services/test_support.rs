//! Dobles de prueba para el motor de sincronización.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use async_trait::async_trait;

use crate::errors::{ProgressError, ProgressResult};
use crate::models::{ProgressUpsertRequest, RemoteProgress};
use crate::services::api_client::ProgressApi;

#[derive(Default)]
struct ScriptedInner {
    // (profileId, world, level) -> fila
    rows: BTreeMap<(String, u32, u32), RemoteProgress>,
    offline: bool,
    fail_fetch: bool,
    fail_levels: HashSet<u32>,
    upsert_calls: usize,
    fetch_calls: usize,
}

/// Backend falso con semántica upsert (sobrescribe stars/xp como el real)
#[derive(Clone, Default)]
pub struct ScriptedApi {
    inner: Rc<RefCell<ScriptedInner>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.inner.borrow_mut().offline = offline;
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.inner.borrow_mut().fail_fetch = fail;
    }

    pub fn fail_level(&self, level: u32) {
        self.inner.borrow_mut().fail_levels.insert(level);
    }

    pub fn insert_row(&self, row: RemoteProgress) {
        let key = (row.profile_id.clone().unwrap_or_default(), row.world, row.level);
        self.inner.borrow_mut().rows.insert(key, row);
    }

    pub fn row(&self, profile_id: &str, world: u32, level: u32) -> Option<RemoteProgress> {
        self.inner
            .borrow()
            .rows
            .get(&(profile_id.to_string(), world, level))
            .cloned()
    }

    pub fn row_count(&self) -> usize {
        self.inner.borrow().rows.len()
    }

    pub fn upsert_calls(&self) -> usize {
        self.inner.borrow().upsert_calls
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.borrow().fetch_calls
    }
}

pub fn remote_row(profile_id: &str, world: u32, level: u32, stars: u8, xp: u32) -> RemoteProgress {
    RemoteProgress {
        id: None,
        profile_id: Some(profile_id.to_string()),
        world,
        level,
        stars,
        xp,
        attempts_count: 1,
        last_played_at: None,
    }
}

#[async_trait(?Send)]
impl ProgressApi for ScriptedApi {
    async fn fetch_progress(&self, profile_id: &str) -> ProgressResult<Vec<RemoteProgress>> {
        let mut inner = self.inner.borrow_mut();
        inner.fetch_calls += 1;
        if inner.offline {
            return Err(ProgressError::Network("Failed to fetch".to_string()));
        }
        if inner.fail_fetch {
            return Err(ProgressError::Http {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(inner
            .rows
            .iter()
            .filter(|((profile, _, _), _)| profile == profile_id)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn upsert_progress(&self, request: &ProgressUpsertRequest) -> ProgressResult<RemoteProgress> {
        let mut inner = self.inner.borrow_mut();
        inner.upsert_calls += 1;
        if inner.offline {
            return Err(ProgressError::Network("Failed to fetch".to_string()));
        }
        if inner.fail_levels.contains(&request.level) {
            return Err(ProgressError::Http {
                status: 400,
                message: "Validation error".to_string(),
            });
        }
        let key = (request.profile_id.clone(), request.world, request.level);
        let attempts = inner.rows.get(&key).map(|r| r.attempts_count).unwrap_or(0);
        let row = RemoteProgress {
            id: Some(format!("{}-{}-{}", request.profile_id, request.world, request.level)),
            profile_id: Some(request.profile_id.clone()),
            world: request.world,
            level: request.level,
            stars: request.stars,
            xp: request.xp,
            attempts_count: attempts + request.attempts_count,
            last_played_at: Some(chrono::Utc::now()),
        };
        inner.rows.insert(key, row.clone());
        Ok(row)
    }
}

/// Cede el control al runtime antes de cada llamada, para intercalar tareas
#[derive(Clone)]
pub struct YieldingApi {
    inner: ScriptedApi,
}

impl YieldingApi {
    pub fn new(inner: ScriptedApi) -> Self {
        Self { inner }
    }
}

#[async_trait(?Send)]
impl ProgressApi for YieldingApi {
    async fn fetch_progress(&self, profile_id: &str) -> ProgressResult<Vec<RemoteProgress>> {
        tokio::task::yield_now().await;
        self.inner.fetch_progress(profile_id).await
    }

    async fn upsert_progress(&self, request: &ProgressUpsertRequest) -> ProgressResult<RemoteProgress> {
        tokio::task::yield_now().await;
        self.inner.upsert_progress(request).await
    }
}
