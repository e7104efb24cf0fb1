//! Whole-document JSON store for route collections.
//!
//! Layout under the data directory:
//! `global_routes.json` and `user_data/{user_id}/{routes,applications,history}.json`.
//! Every write replaces the full document (temp file + rename). There is no
//! locking between writers; the last save wins.

use fs_err::tokio as fs;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io;
use std::path::{Path, PathBuf};

use super::{Collection, Scope};
use crate::config::{self, files};
use crate::error::{StorageError, StorageResult};
use crate::model::{Route, UserId};

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the configured `DATA_DIR`.
    pub fn from_config() -> Self {
        Self::new(config::data_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, scope: Scope, kind: Collection) -> PathBuf {
        match (scope, kind) {
            (Scope::Global, Collection::Routes) => self.root.join(files::GLOBAL_ROUTES_FILE),
            (Scope::Global, other) => self.root.join(format!("global_{}.json", other)),
            (Scope::User(user), kind) => self
                .root
                .join(files::USER_DATA_DIR)
                .join(user.to_string())
                .join(format!("{}.json", kind)),
        }
    }

    /// Loads a collection, treating a missing or unreadable file as empty.
    pub async fn load(&self, scope: Scope, kind: Collection) -> Vec<Route> {
        match self.try_load(scope, kind).await {
            Ok(routes) => routes,
            Err(e) => {
                log::warn!("JsonStore: treating {:?} {} as empty: {}", scope, kind, e);
                Vec::new()
            }
        }
    }

    /// Loads a collection, reporting corrupt files instead of hiding them.
    ///
    /// A missing file is still an empty collection.
    pub async fn try_load(&self, scope: Scope, kind: Collection) -> StorageResult<Vec<Route>> {
        let path = self.path(scope, kind);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut routes: Vec<Route> =
            serde_json::from_str(&content).map_err(|source| StorageError::Corrupt { path, source })?;
        routes.iter_mut().for_each(Route::ensure_id);
        Ok(routes)
    }

    /// Overwrites a collection with `routes`.
    pub async fn save(&self, scope: Scope, kind: Collection, routes: &[Route]) -> StorageResult<()> {
        let path = self.path(scope, kind);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let bytes = encode(routes)?;
        let temp_path = path.with_extension(format!("json.{}", files::TEMP_SUFFIX));
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        log::debug!("JsonStore: saved {} record(s) to {:?}", routes.len(), path);
        Ok(())
    }

    /// Appends one record and returns the new collection length.
    pub async fn append(&self, scope: Scope, kind: Collection, route: Route) -> StorageResult<usize> {
        let mut routes = self.load(scope, kind).await;
        routes.push(route);
        self.save(scope, kind, &routes).await?;
        Ok(routes.len())
    }

    /// Removes the record at `index`; `None` when the index is out of range
    /// (the file is left untouched).
    pub async fn remove(&self, scope: Scope, kind: Collection, index: usize) -> StorageResult<Option<Route>> {
        let mut routes = self.load(scope, kind).await;
        if index >= routes.len() {
            return Ok(None);
        }
        let removed = routes.remove(index);
        self.save(scope, kind, &routes).await?;
        Ok(Some(removed))
    }

    /// Copies the reviews of `route` into its catalog copies: the global
    /// collection and the owner's personal routes, matched by route id.
    /// Legacy routes have no recorded owner, so every user's personal routes
    /// are searched for a copy.
    ///
    /// Returns how many collection files were rewritten.
    pub async fn replicate_reviews(&self, route: &Route) -> StorageResult<usize> {
        let mut scopes = vec![Scope::Global];
        match route.owner {
            Some(owner) => scopes.push(Scope::User(owner)),
            None => scopes.extend(self.user_ids().await?.into_iter().map(Scope::User)),
        }

        let mut rewritten = 0;
        for scope in scopes {
            let mut routes = self.load(scope, Collection::Routes).await;
            let mut changed = false;
            for copy in routes.iter_mut().filter(|copy| copy.id == route.id) {
                changed |= copy.merge_reviews(route);
            }
            if changed {
                self.save(scope, Collection::Routes, &routes).await?;
                rewritten += 1;
            }
        }

        if rewritten == 0 {
            log::debug!("JsonStore: no catalog copy of route {} needed review sync", route.id);
        }
        Ok(rewritten)
    }

    /// Users that have a data directory, ascending.
    pub async fn user_ids(&self) -> StorageResult<Vec<UserId>> {
        let dir = self.root.join(files::USER_DATA_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut users = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(id) = entry.file_name().to_str().and_then(|name| name.parse::<u64>().ok()) {
                users.push(UserId(id));
            }
        }
        users.sort();
        Ok(users)
    }
}

/// Pretty JSON with four-space indentation, non-ASCII kept as is.
fn encode(routes: &[Route]) -> StorageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    routes.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}
