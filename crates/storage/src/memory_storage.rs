//! In-memory storage, for tests and throwaway servers.

use std::collections::HashMap;

use async_trait::async_trait;

use super::trait_::{RecordKind, Result, Storage};

/// Volatile storage keeping every record in a map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    records: HashMap<(RecordKind, String), String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, across all kinds.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put_record(&mut self, kind: RecordKind, id: &str, json: String) -> Result<()> {
        self.records.insert((kind, id.to_string()), json);
        Ok(())
    }

    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<Option<String>> {
        Ok(self.records.get(&(kind, id.to_string())).cloned())
    }

    async fn scan_records(&self, kind: RecordKind) -> Result<Vec<String>> {
        Ok(self
            .records
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, json)| json.clone())
            .collect())
    }

    async fn remove_record(&mut self, kind: RecordKind, id: &str) -> Result<bool> {
        Ok(self.records.remove(&(kind, id.to_string())).is_some())
    }

    async fn commit(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildwise_core::{Project, ProjectMember, User, UserRole};

    #[tokio::test]
    async fn test_members_are_scoped_to_their_project() {
        let mut storage = MemoryStorage::new();
        let user = User::new("m@site.test", None, UserRole::Foreman);
        let a = Project::new("A", user.id);
        let b = Project::new("B", user.id);

        storage.save_project_member(&ProjectMember::new(a.id, user.id)).await.unwrap();
        storage.save_project_member(&ProjectMember::new(b.id, user.id)).await.unwrap();

        let members = storage.list_project_members(a.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].project_id, a.id);
        assert_eq!(storage.len(), 2);
    }
}
