//! `trailbot check-data`: reads every collection the way the bot would and
//! reports what it finds, without the fail-soft fallback hiding corrupt files.

use std::path::PathBuf;
use strum::IntoEnumIterator;
use trailcore::{Collection, JsonStore, Scope};

use crate::error::AppResult;

/// State of one collection file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub path: PathBuf,
    pub status: CollectionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionStatus {
    Missing,
    Records(usize),
    /// The bot treats this collection as empty
    Unreadable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataReport {
    pub collections: Vec<CollectionReport>,
}

impl DataReport {
    pub fn unreadable(&self) -> impl Iterator<Item = &CollectionReport> {
        self.collections
            .iter()
            .filter(|c| matches!(c.status, CollectionStatus::Unreadable(_)))
    }

    pub fn total_records(&self) -> usize {
        self.collections
            .iter()
            .map(|c| match c.status {
                CollectionStatus::Records(n) => n,
                _ => 0,
            })
            .sum()
    }
}

/// Inspects the global catalog and every user's collections.
pub async fn check_data(store: &JsonStore) -> AppResult<DataReport> {
    let mut report = DataReport::default();
    report.collections.push(inspect(store, Scope::Global, Collection::Routes).await);

    for user in store.user_ids().await? {
        for kind in Collection::iter() {
            report.collections.push(inspect(store, Scope::User(user), kind).await);
        }
    }
    Ok(report)
}

async fn inspect(store: &JsonStore, scope: Scope, kind: Collection) -> CollectionReport {
    let path = store.path(scope, kind);
    let status = if !path.exists() {
        CollectionStatus::Missing
    } else {
        match store.try_load(scope, kind).await {
            Ok(routes) => CollectionStatus::Records(routes.len()),
            Err(e) => CollectionStatus::Unreadable(e.to_string()),
        }
    };
    CollectionReport { path, status }
}

/// Prints the report to stdout, one line per collection file.
pub fn print_report(report: &DataReport) {
    for entry in &report.collections {
        match &entry.status {
            CollectionStatus::Missing => println!("  -  {} (missing)", entry.path.display()),
            CollectionStatus::Records(n) => println!("  ok {} ({} records)", entry.path.display(), n),
            CollectionStatus::Unreadable(e) => println!("  !! {}: {}", entry.path.display(), e),
        }
    }
    println!(
        "{} collection file(s), {} record(s), {} unreadable",
        report.collections.len(),
        report.total_records(),
        report.unreadable().count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use trailcore::UserId;

    #[tokio::test]
    async fn test_empty_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = check_data(&JsonStore::new(dir.path())).await.unwrap();
        assert_eq!(report.collections.len(), 1);
        assert_eq!(report.collections[0].status, CollectionStatus::Missing);
    }

    #[tokio::test]
    async fn test_reports_counts_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        store.save(Scope::Global, Collection::Routes, &[]).await.unwrap();
        store
            .save(Scope::User(UserId(8)), Collection::Applications, &[])
            .await
            .unwrap();
        std::fs::write(store.path(Scope::User(UserId(8)), Collection::History), "{oops").unwrap();

        let report = check_data(&store).await.unwrap();
        // global + routes/applications/history of user 8
        assert_eq!(report.collections.len(), 4);
        assert_eq!(report.collections[0].status, CollectionStatus::Records(0));
        assert_eq!(report.total_records(), 0);

        let unreadable: Vec<_> = report.unreadable().collect();
        assert_eq!(unreadable.len(), 1);
        assert!(unreadable[0].path.ends_with("history.json"));
    }
}
