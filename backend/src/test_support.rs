//! In-memory port implementations for tests.
//!
//! These adapters implement the same contracts as the Diesel-backed ones,
//! including the owner-scoped lookup rule, filter semantics, and stable
//! ordering, so the HTTP surface can be exercised end-to-end without a
//! database. Compiled only for tests and the `test-support` feature.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entry::{
    EntryDraft, EntryFilter, EntryId, EntryPage, EntryPatch, JournalEntry, Pagination,
};
use crate::domain::ports::{
    CredentialRecord, EntryRepository, EntryRepositoryError, NewUserRecord, UserRepository,
    UserRepositoryError,
};
use crate::domain::user::{User, UserId};

/// In-memory user store enforcing the same uniqueness rules as the schema.
#[derive(Default)]
pub struct InMemoryUserRepository {
    records: Mutex<Vec<CredentialRecord>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut records = self.records.lock().expect("user store mutex poisoned");

        if records
            .iter()
            .any(|existing| existing.user.email() == &record.email)
        {
            return Err(UserRepositoryError::DuplicateEmail);
        }
        if records
            .iter()
            .any(|existing| existing.user.username() == &record.username)
        {
            return Err(UserRepositoryError::DuplicateUsername);
        }

        let user = User::new(
            UserId::random(),
            record.email.clone(),
            record.username.clone(),
            Utc::now(),
        );
        records.push(CredentialRecord {
            user: user.clone(),
            hashed_password: record.hashed_password.clone(),
        });
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let records = self.records.lock().expect("user store mutex poisoned");
        Ok(records
            .iter()
            .find(|record| record.user.id() == id)
            .map(|record| record.user.clone()))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError> {
        let records = self.records.lock().expect("user store mutex poisoned");
        Ok(records
            .iter()
            .find(|record| record.user.email().as_str() == email)
            .cloned())
    }
}

struct StoredEntry {
    entry: JournalEntry,
    seq: u64,
}

/// In-memory entry store mirroring the SQL adapter's semantics: mandatory
/// owner conjunct, case-insensitive substring search, recency ordering with
/// insertion-order tie-break, and pagination totals.
#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: Mutex<Vec<StoredEntry>>,
    next_seq: AtomicU64,
}

impl InMemoryEntryRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(entry: &JournalEntry, filter: &EntryFilter) -> bool {
    if let Some(category) = filter.category {
        if entry.category != category {
            return false;
        }
    }
    if let Some(term) = filter.search_term() {
        let needle = term.to_lowercase();
        let in_title = entry.title.as_str().to_lowercase().contains(&needle);
        let in_content = entry.content.as_str().to_lowercase().contains(&needle);
        if !in_title && !in_content {
            return false;
        }
    }
    if let Some(favorite) = filter.is_favorite {
        if entry.is_favorite != favorite {
            return false;
        }
    }
    true
}

fn apply_patch(entry: &mut JournalEntry, patch: EntryPatch) {
    if let Some(title) = patch.title {
        entry.title = title;
    }
    if let Some(content) = patch.content {
        entry.content = content;
    }
    if let Some(category) = patch.category {
        entry.category = category;
    }
    if let Some(phonetic) = patch.phonetic {
        entry.phonetic = phonetic;
    }
    if let Some(example) = patch.example {
        entry.example = example;
    }
    if let Some(is_favorite) = patch.is_favorite {
        entry.is_favorite = is_favorite;
    }
    entry.updated_at = Utc::now();
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn list(
        &self,
        owner: &UserId,
        filter: &EntryFilter,
        page: &Pagination,
    ) -> Result<EntryPage, EntryRepositoryError> {
        let entries = self.entries.lock().expect("entry store mutex poisoned");

        let mut matching: Vec<&StoredEntry> = entries
            .iter()
            .filter(|stored| stored.entry.owner == *owner)
            .filter(|stored| matches_filter(&stored.entry, filter))
            .collect();
        matching.sort_by(|a, b| {
            b.entry
                .created_at
                .cmp(&a.entry.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let entries = matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|stored| stored.entry.clone())
            .collect();

        Ok(EntryPage {
            entries,
            total,
            skip: page.skip(),
            limit: page.limit(),
        })
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError> {
        let entries = self.entries.lock().expect("entry store mutex poisoned");
        Ok(entries
            .iter()
            .find(|stored| stored.entry.id == *id && stored.entry.owner == *owner)
            .map(|stored| stored.entry.clone()))
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: EntryDraft,
    ) -> Result<JournalEntry, EntryRepositoryError> {
        let now = Utc::now();
        let entry = JournalEntry {
            id: EntryId::random(),
            owner: *owner,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            phonetic: draft.phonetic,
            example: draft.example,
            is_favorite: draft.is_favorite,
            created_at: now,
            updated_at: now,
        };

        let mut entries = self.entries.lock().expect("entry store mutex poisoned");
        entries.push(StoredEntry {
            entry: entry.clone(),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        });
        Ok(entry)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &EntryId,
        patch: EntryPatch,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError> {
        let mut entries = self.entries.lock().expect("entry store mutex poisoned");
        let Some(stored) = entries
            .iter_mut()
            .find(|stored| stored.entry.id == *id && stored.entry.owner == *owner)
        else {
            return Ok(None);
        };

        apply_patch(&mut stored.entry, patch);
        Ok(Some(stored.entry.clone()))
    }

    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let mut entries = self.entries.lock().expect("entry store mutex poisoned");
        let before = entries.len();
        entries.retain(|stored| !(stored.entry.id == *id && stored.entry.owner == *owner));
        Ok(entries.len() < before)
    }

    async fn toggle_favorite(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError> {
        let mut entries = self.entries.lock().expect("entry store mutex poisoned");
        let Some(stored) = entries
            .iter_mut()
            .find(|stored| stored.entry.id == *id && stored.entry.owner == *owner)
        else {
            return Ok(None);
        };

        // Flip relative to the persisted value, under the same lock that
        // guards reads, mirroring the SQL adapter's single-statement update.
        stored.entry.is_favorite = !stored.entry.is_favorite;
        stored.entry.updated_at = Utc::now();
        Ok(Some(stored.entry.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::{EntryCategory, EntryContent, EntryTitle};
    use rstest::rstest;

    fn draft(title: &str, content: &str) -> EntryDraft {
        EntryDraft {
            title: EntryTitle::new(title).expect("title"),
            content: EntryContent::new(content).expect("content"),
            category: EntryCategory::Fact,
            phonetic: None,
            example: None,
            is_favorite: false,
        }
    }

    #[tokio::test]
    async fn list_never_leaks_across_owners() {
        let repo = InMemoryEntryRepository::new();
        let alice = UserId::random();
        let bob = UserId::random();

        repo.insert(&alice, draft("alice entry", "hers")).await.expect("insert");
        repo.insert(&bob, draft("bob entry", "his")).await.expect("insert");

        let page = repo
            .list(&alice, &EntryFilter::default(), &Pagination::default())
            .await
            .expect("list");

        assert_eq!(page.total, 1);
        assert!(page.entries.iter().all(|entry| entry.owner == alice));
    }

    #[tokio::test]
    async fn cross_owner_lookups_read_as_missing() {
        let repo = InMemoryEntryRepository::new();
        let alice = UserId::random();
        let bob = UserId::random();
        let entry = repo.insert(&alice, draft("secret", "hers")).await.expect("insert");

        assert!(repo.find(&bob, &entry.id).await.expect("find").is_none());
        assert!(repo
            .update(&bob, &entry.id, EntryPatch::default())
            .await
            .expect("update")
            .is_none());
        assert!(!repo.delete(&bob, &entry.id).await.expect("delete"));
        assert!(repo
            .toggle_favorite(&bob, &entry.id)
            .await
            .expect("toggle")
            .is_none());

        // The entry is untouched and still visible to its owner.
        assert!(repo.find(&alice, &entry.id).await.expect("find").is_some());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_title_and_content() {
        let repo = InMemoryEntryRepository::new();
        let owner = UserId::random();
        repo.insert(&owner, draft("Hello World", "body text")).await.expect("insert");
        repo.insert(&owner, draft("other", "Contains HELLO inside")).await.expect("insert");
        repo.insert(&owner, draft("unrelated", "nothing here")).await.expect("insert");

        for term in ["hello", "WORLD", "Hello"] {
            let page = repo
                .list(
                    &owner,
                    &EntryFilter {
                        search: Some(term.into()),
                        ..EntryFilter::default()
                    },
                    &Pagination::default(),
                )
                .await
                .expect("list");
            assert!(page.total >= 1, "term {term} should match");
        }

        let page = repo
            .list(
                &owner,
                &EntryFilter {
                    search: Some("hello".into()),
                    ..EntryFilter::default()
                },
                &Pagination::default(),
            )
            .await
            .expect("list");
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn pagination_reports_totals_independent_of_the_page() {
        let repo = InMemoryEntryRepository::new();
        let owner = UserId::random();
        for i in 0..5 {
            repo.insert(&owner, draft(&format!("entry {i}"), "body"))
                .await
                .expect("insert");
        }

        let page = repo
            .list(
                &owner,
                &EntryFilter::default(),
                &Pagination::new(0, 2).expect("valid"),
            )
            .await
            .expect("list");
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.total, 5);

        let past_end = repo
            .list(
                &owner,
                &EntryFilter::default(),
                &Pagination::new(5, 2).expect("valid"),
            )
            .await
            .expect("list");
        assert!(past_end.entries.is_empty());
        assert_eq!(past_end.total, 5);
    }

    #[tokio::test]
    async fn listing_orders_most_recent_first() {
        let repo = InMemoryEntryRepository::new();
        let owner = UserId::random();
        for i in 0..3 {
            repo.insert(&owner, draft(&format!("entry {i}"), "body"))
                .await
                .expect("insert");
        }

        let page = repo
            .list(&owner, &EntryFilter::default(), &Pagination::default())
            .await
            .expect("list");
        let titles: Vec<&str> = page.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["entry 2", "entry 1", "entry 0"]);
    }

    #[tokio::test]
    async fn toggle_twice_restores_the_original_value() {
        let repo = InMemoryEntryRepository::new();
        let owner = UserId::random();
        let entry = repo.insert(&owner, draft("t", "c")).await.expect("insert");
        assert!(!entry.is_favorite);

        let once = repo
            .toggle_favorite(&owner, &entry.id)
            .await
            .expect("toggle")
            .expect("found");
        assert!(once.is_favorite);

        let twice = repo
            .toggle_favorite(&owner, &entry.id)
            .await
            .expect("toggle")
            .expect("found");
        assert!(!twice.is_favorite);
    }

    #[rstest]
    fn duplicate_checks_prefer_email_over_username() {
        // Matches the SQL adapter, which hits the email constraint first in
        // the common case of re-registering the same account.
        let repo = InMemoryUserRepository::new();
        let record = NewUserRecord {
            email: crate::domain::Email::new("ada@example.com").expect("email"),
            username: crate::domain::Username::new("ada").expect("username"),
            hashed_password: "hash".into(),
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        runtime.block_on(async {
            repo.insert(&record).await.expect("first insert");
            let err = repo.insert(&record).await.expect_err("duplicate");
            assert_eq!(err, UserRepositoryError::DuplicateEmail);
        });
    }
}
