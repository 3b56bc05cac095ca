//! User record service: CRUD over the users collection

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::domain::user::{
    check_id_reassignment, validate_for_create, validate_for_update, UserCandidate, UserRecord,
    UserRecordStore,
};
use crate::domain::DomainError;

/// CRUD operations over the users collection
///
/// Every mutation is a load, validate, save cycle. The cycles are
/// serialized so concurrent requests cannot overwrite each other's writes.
pub struct UserRecordService {
    store: Arc<dyn UserRecordStore>,
    write_lock: Mutex<()>,
}

impl UserRecordService {
    /// Create a new user record service
    pub fn new(store: Arc<dyn UserRecordStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// List every record
    pub async fn list(&self) -> Result<Vec<UserRecord>, DomainError> {
        self.load("Error reading user data").await
    }

    /// Validate and append a new record
    pub async fn create(&self, candidate: Option<UserCandidate>) -> Result<UserRecord, DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load("Error reading data").await?;

        let errors = validate_for_create(candidate.as_ref(), &records);
        let candidate = match candidate {
            Some(candidate) if errors.is_empty() => candidate,
            _ => {
                debug!(errors = errors.len(), "User candidate rejected");
                return Err(DomainError::invalid_input(errors));
            }
        };

        let record = UserRecord::from_candidate(candidate);
        records.push(record.clone());
        self.save(&records, "Error saving user").await?;

        info!(id = ?record.id(), "User created");
        Ok(record)
    }

    /// Apply a partial update to the record with the given path id
    pub async fn update(&self, raw_id: &str, candidate: UserCandidate) -> Result<UserRecord, DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load("Error reading data").await?;

        let (id, index) = locate(&records, raw_id)?;

        check_id_reassignment(candidate.requested_id(), id, &records)
            .map_err(|e| DomainError::conflict(e.to_string()))?;

        let errors = validate_for_update(&candidate);
        if !errors.is_empty() {
            debug!(id, errors = errors.len(), "User update rejected");
            return Err(DomainError::invalid_input(errors));
        }

        records[index].merge(candidate);
        let updated = records[index].clone();
        self.save(&records, "Error updating user").await?;

        info!(id, new_id = ?updated.id(), "User updated");
        Ok(updated)
    }

    /// Remove the record with the given path id
    pub async fn delete(&self, raw_id: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load("Error connecting with data").await?;

        let (id, index) = locate(&records, raw_id)?;
        records.remove(index);
        self.save(&records, "Could not delete user").await?;

        info!(id, "User deleted");
        Ok(())
    }

    async fn load(&self, context: &'static str) -> Result<Vec<UserRecord>, DomainError> {
        self.store.load().await.map_err(|e| {
            error!(error = %e, "{}", context);
            DomainError::storage(context)
        })
    }

    async fn save(&self, records: &[UserRecord], context: &'static str) -> Result<(), DomainError> {
        self.store.save(records).await.map_err(|e| {
            error!(error = %e, "{}", context);
            DomainError::storage(context)
        })
    }
}

/// Find the record addressed by a path segment
fn locate(records: &[UserRecord], raw_id: &str) -> Result<(u64, usize), DomainError> {
    let id = parse_path_id(raw_id);

    id.and_then(|id| {
        records
            .iter()
            .position(|r| r.id() == Some(id))
            .map(|index| (id, index))
    })
    .ok_or_else(|| {
        let shown = id.map_or_else(|| raw_id.to_string(), |id| id.to_string());
        DomainError::not_found(format!("User with ID {} not found", shown))
    })
}

/// Leading-integer parse of a path segment, so `"12abc"` addresses 12
fn parse_path_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..digits_end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRecordStore;
    use crate::infrastructure::user::repository::InMemoryUserStore;
    use serde_json::json;

    fn seeded_service() -> (UserRecordService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::with_records(vec![
            UserRecord::new(Some(1), "Alice", "alice@example.com"),
            UserRecord::new(Some(2), "Bob", "bob@example.com"),
        ]));
        (UserRecordService::new(store.clone()), store)
    }

    fn error_list(err: DomainError) -> Vec<String> {
        match err {
            DomainError::InvalidInput { errors } => errors,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_path_id() {
        assert_eq!(parse_path_id("12"), Some(12));
        assert_eq!(parse_path_id(" 7"), Some(7));
        assert_eq!(parse_path_id("12abc"), Some(12));
        assert_eq!(parse_path_id("+3"), Some(3));
        assert_eq!(parse_path_id("abc"), None);
        assert_eq!(parse_path_id("-3"), None);
        assert_eq!(parse_path_id(""), None);
    }

    #[tokio::test]
    async fn test_list() {
        let (service, _) = seeded_service();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_appends_record() {
        let (service, store) = seeded_service();
        let candidate = UserCandidate::new()
            .with_id(3)
            .with_name("Carla")
            .with_email("carla@example.com");

        let created = service.create(Some(candidate)).await.unwrap();

        assert_eq!(created.id(), Some(3));
        let records = store.load().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], created);
    }

    #[tokio::test]
    async fn test_create_without_id() {
        let (service, _) = seeded_service();
        let candidate = UserCandidate::new().with_name("Dora").with_email("dora@example.com");

        let created = service.create(Some(candidate)).await.unwrap();

        assert_eq!(created.id(), None);
    }

    #[tokio::test]
    async fn test_create_missing_payload() {
        let (service, store) = seeded_service();

        let err = service.create(None).await.unwrap_err();

        assert_eq!(error_list(err), vec!["No data was received"]);
        assert_eq!(store.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_id() {
        let (service, _) = seeded_service();
        let candidate = UserCandidate::new()
            .with_id(2)
            .with_name("Other")
            .with_email("other@example.com");

        let err = service.create(Some(candidate)).await.unwrap_err();

        assert_eq!(error_list(err), vec!["User with ID 2 already exists"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (service, _) = seeded_service();
        let candidate = UserCandidate::new()
            .with_email("bobby@example.com")
            .with_field("city", "Cusco");

        let updated = service.update("2", candidate).await.unwrap();

        assert_eq!(updated.name(), "Bob");
        assert_eq!(updated.email(), "bobby@example.com");
        assert_eq!(updated.extra().get("city"), Some(&json!("Cusco")));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (service, _) = seeded_service();

        let err = service.update("9", UserCandidate::new()).await.unwrap_err();

        assert_eq!(err.to_string(), "Not found: User with ID 9 not found");
    }

    #[tokio::test]
    async fn test_update_unparseable_id() {
        let (service, _) = seeded_service();

        let err = service.update("abc", UserCandidate::new()).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("User with ID abc not found"));
    }

    #[tokio::test]
    async fn test_update_id_conflict_checked_before_fields() {
        let (service, _) = seeded_service();
        let candidate = UserCandidate::new().with_id(1).with_email("bad");

        let err = service.update("2", candidate).await.unwrap_err();

        match err {
            DomainError::Conflict { message } => {
                assert_eq!(message, "ID 1 is already used by another user");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_invalid_fields() {
        let (service, store) = seeded_service();
        let candidate = UserCandidate::new().with_name("B0b");

        let err = service.update("2", candidate).await.unwrap_err();

        assert_eq!(error_list(err).len(), 1);
        assert_eq!(store.load().await.unwrap()[1].name(), "Bob");
    }

    #[tokio::test]
    async fn test_update_reassigns_free_id() {
        let (service, store) = seeded_service();

        let updated = service.update("2", UserCandidate::new().with_id(20)).await.unwrap();

        assert_eq!(updated.id(), Some(20));
        let ids: Vec<_> = store.load().await.unwrap().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![Some(1), Some(20)]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, store) = seeded_service();

        service.delete("1").await.unwrap();

        let records = store.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some(2));
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let (service, _) = seeded_service();

        let err = service.delete("5").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_store_read_failure_is_hidden() {
        let mut store = MockUserRecordStore::new();
        store
            .expect_load()
            .returning(|| Err(DomainError::storage("disk on fire")));
        let service = UserRecordService::new(Arc::new(store));

        let err = service.list().await.unwrap_err();

        match err {
            DomainError::Storage { message } => assert_eq!(message, "Error reading user data"),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_write_failure() {
        let mut store = MockUserRecordStore::new();
        store.expect_load().returning(|| Ok(Vec::new()));
        store
            .expect_save()
            .returning(|_| Err(DomainError::storage("read-only filesystem")));
        let service = UserRecordService::new(Arc::new(store));
        let candidate = UserCandidate::new().with_name("Eva").with_email("eva@example.com");

        let err = service.create(Some(candidate)).await.unwrap_err();

        assert_eq!(err.to_string(), "Storage error: Error saving user");
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = Arc::new(UserRecordService::new(store.clone()));

        let mut handles = Vec::new();
        for id in 1..=10u64 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let candidate = UserCandidate::new()
                    .with_id(id)
                    .with_name("Worker")
                    .with_email("worker@example.com");
                service.create(Some(candidate)).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.load().await.unwrap().len(), 10);
    }
}
