use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};

use models::{NewParent, Parent, ParentUpdate, Profile};

use crate::errors::ServiceError;

/// On-disk shape: the id counter travels with the records so ids are never
/// reused, including across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ParentTable {
    next_id: u64,
    records: BTreeMap<u64, Parent>,
}

impl ParentTable {
    fn normalize(&mut self) {
        let min_next = self.records.keys().next_back().map_or(1, |max| max + 1);
        if self.next_id < min_next {
            self.next_id = min_next;
        }
    }
}

/// File storage: persists the parent collection as a JSON document.
///
/// Single `RwLock` guards the whole table; writers are exclusive, so every
/// request sees a consistent snapshot and no partial mutation is observable.
#[derive(Clone)]
pub struct ParentStore {
    inner: Arc<RwLock<ParentTable>>,
    file_path: PathBuf,
}

impl ParentStore {
    /// Initialize the store; creates the file with an empty table if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        let mut table: ParentTable = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => ParentTable::default(),
        };
        table.normalize();

        let store = Self { inner: Arc::new(RwLock::new(table)), file_path };
        store.save().await?;
        Ok(Arc::new(store))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let table = self.inner.read().await;
        self.persist(&table).await
    }

    /// Write a snapshot of the given table state to disk. Mutating operations
    /// call this while still holding the write lock and undo their change if
    /// it fails, so a 500 never leaves a mutation visible to later reads.
    async fn persist(&self, table: &ParentTable) -> Result<(), ServiceError> {
        let data =
            serde_json::to_vec(table).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// List all parents ordered by ascending id.
    pub async fn list(&self) -> Vec<Parent> {
        let table = self.inner.read().await;
        table.records.values().cloned().collect()
    }

    /// Fetch a single parent by id.
    pub async fn get(&self, id: u64) -> Option<Parent> {
        let table = self.inner.read().await;
        table.records.get(&id).cloned()
    }

    /// Project the read-only profile views across all parents.
    pub async fn profiles(&self) -> Vec<Profile> {
        let table = self.inner.read().await;
        table.records.values().map(Profile::for_parent).collect()
    }

    /// Create a new parent, assigning the next sequential id.
    pub async fn create(&self, input: NewParent) -> Result<u64, ServiceError> {
        input.validate()?;
        let mut table = self.inner.write().await;
        if table
            .records
            .values()
            .any(|p| p.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(ServiceError::DuplicateEmail(input.email));
        }
        let id = table.next_id;
        table.next_id += 1;
        table
            .records
            .insert(id, Parent { id, name: input.name, email: input.email });
        if let Err(e) = self.persist(&table).await {
            table.records.remove(&id);
            table.next_id = id;
            return Err(e);
        }
        Ok(id)
    }

    /// Apply a partial update; only supplied fields change, `id` never does.
    pub async fn update(&self, id: u64, patch: ParentUpdate) -> Result<(), ServiceError> {
        patch.validate()?;
        let mut table = self.inner.write().await;
        if !table.records.contains_key(&id) {
            return Err(ServiceError::ParentNotFound(id));
        }
        if let Some(email) = &patch.email {
            if table
                .records
                .values()
                .any(|p| p.id != id && p.email.eq_ignore_ascii_case(email))
            {
                return Err(ServiceError::DuplicateEmail(email.clone()));
            }
        }
        let record = table.records.get_mut(&id).ok_or(ServiceError::ParentNotFound(id))?;
        let previous = record.clone();
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(email) = patch.email {
            record.email = email;
        }
        if let Err(e) = self.persist(&table).await {
            table.records.insert(id, previous);
            return Err(e);
        }
        Ok(())
    }

    /// Remove a parent; the freed id is never assigned again.
    pub async fn remove(&self, id: u64) -> Result<(), ServiceError> {
        let mut table = self.inner.write().await;
        let removed = table
            .records
            .remove(&id)
            .ok_or(ServiceError::ParentNotFound(id))?;
        if let Err(e) = self.persist(&table).await {
            table.records.insert(id, removed);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("parents_{}.json", uuid::Uuid::new_v4()))
    }

    fn parent_input(name: &str, email: &str) -> NewParent {
        NewParent { name: name.into(), email: email.into() }
    }

    #[tokio::test]
    async fn create_assigns_strictly_increasing_ids_from_one() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = ParentStore::new(&path).await?;

        assert_eq!(store.create(parent_input("A", "a@x.com")).await?, 1);
        assert_eq!(store.create(parent_input("B", "b@x.com")).await?, 2);

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 1);
        assert_eq!(listed[1].id, 2);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_rejected_case_insensitively() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = ParentStore::new(&path).await?;
        store.create(parent_input("A", "a@x.com")).await?;

        let dup = store.create(parent_input("A2", "A@X.COM")).await;
        assert!(matches!(dup, Err(ServiceError::DuplicateEmail(_))));
        assert_eq!(store.list().await.len(), 1);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = ParentStore::new(&path).await?;
        let id = store.create(parent_input("A", "a@x.com")).await?;

        store
            .update(id, ParentUpdate { name: Some("A3".into()), email: None })
            .await?;
        let rec = store.get(id).await.expect("record exists");
        assert_eq!(rec.id, id);
        assert_eq!(rec.name, "A3");
        assert_eq!(rec.email, "a@x.com");

        // invalid patch leaves the record untouched
        let bad = store
            .update(id, ParentUpdate { name: None, email: Some("not-an-email".into()) })
            .await;
        assert!(matches!(bad, Err(ServiceError::InvalidParent(_))));
        assert_eq!(store.get(id).await.expect("record exists").email, "a@x.com");

        // changing to another parent's email is a conflict
        let other = store.create(parent_input("B", "b@x.com")).await?;
        let clash = store
            .update(other, ParentUpdate { name: None, email: Some("a@x.com".into()) })
            .await;
        assert!(matches!(clash, Err(ServiceError::DuplicateEmail(_))));

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn unknown_ids_yield_not_found() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = ParentStore::new(&path).await?;

        assert!(store.get(3).await.is_none());
        assert!(matches!(
            store.update(3, ParentUpdate::default()).await,
            Err(ServiceError::ParentNotFound(3))
        ));
        assert!(matches!(store.remove(3).await, Err(ServiceError::ParentNotFound(3))));

        let id = store.create(parent_input("A", "a@x.com")).await?;
        store.remove(id).await?;
        // second delete of the same id
        assert!(matches!(store.remove(id).await, Err(ServiceError::ParentNotFound(_))));

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reused_even_after_reload() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = ParentStore::new(&path).await?;
        store.create(parent_input("A", "a@x.com")).await?;
        let second = store.create(parent_input("B", "b@x.com")).await?;
        store.remove(second).await?;

        // same process: counter keeps climbing
        assert_eq!(store.create(parent_input("C", "c@x.com")).await?, 3);

        // fresh process over the same file: counter survives
        let reloaded = ParentStore::new(&path).await?;
        assert_eq!(reloaded.create(parent_input("D", "d@x.com")).await?, 4);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_persist_rolls_back_in_memory_state() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = ParentStore::new(&path).await?;
        store.create(parent_input("A", "a@x.com")).await?;

        // replace the backing file with a directory so every write fails
        fs::remove_file(&path).await?;
        fs::create_dir_all(&path).await?;

        let res = store.create(parent_input("B", "b@x.com")).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        assert_eq!(store.list().await.len(), 1);

        let res = store
            .update(1, ParentUpdate { name: Some("A2".into()), email: None })
            .await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        assert_eq!(store.get(1).await.expect("record exists").name, "A");

        let res = store.remove(1).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        assert_eq!(store.list().await.len(), 1);

        // once the path is writable again the counter has not skipped ahead
        fs::remove_dir(&path).await?;
        assert_eq!(store.create(parent_input("B", "b@x.com")).await?, 2);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn profiles_are_projected_one_per_parent() -> anyhow::Result<()> {
        let path = temp_store_path();
        let store = ParentStore::new(&path).await?;
        assert!(store.profiles().await.is_empty());

        let id = store.create(parent_input("A", "a@x.com")).await?;
        let profiles = store.profiles().await;
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].kind, "Parent");
        assert_eq!(profiles[0].parent_id, id);

        store.remove(id).await?;
        assert!(store.profiles().await.is_empty());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }
}
