use async_trait::async_trait;
use uuid::Uuid;

use super::domain::Message;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

/// Store contract the message service depends on.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert when the id is unknown, otherwise overwrite. Returns the stored row.
    async fn save(&self, message: Message) -> Result<Message, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, ServiceError>;
    /// No error when nothing matches.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError>;
    async fn delete(&self, message: &Message) -> Result<(), ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    async fn list_messages(&self, page: PageRequest) -> Result<Page<Message>, ServiceError>;
}

/// Simple in-memory repository for tests, benches and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct InMemoryMessageRepository {
        messages: Mutex<HashMap<Uuid, Message>>, // key: message id
        failure: Mutex<Option<String>>,
        saves: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl InMemoryMessageRepository {
        /// Number of `save` calls that reached the store.
        pub fn save_calls(&self) -> usize { self.saves.load(Ordering::SeqCst) }

        /// Number of `delete`/`delete_by_id` calls that reached the store.
        pub fn delete_calls(&self) -> usize { self.deletes.load(Ordering::SeqCst) }

        /// Make every following call fail with a store error until cleared with `None`.
        pub fn set_failure(&self, reason: Option<&str>) {
            if let Ok(mut f) = self.failure.lock() {
                *f = reason.map(str::to_string);
            }
        }

        fn messages(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Message>>, ServiceError> {
            let failure = self.failure.lock().map_err(|_| ServiceError::Db("in-memory store lock poisoned".into()))?;
            if let Some(reason) = failure.as_ref() {
                return Err(ServiceError::Db(reason.clone()));
            }
            self.messages.lock().map_err(|_| ServiceError::Db("in-memory store lock poisoned".into()))
        }
    }

    #[async_trait]
    impl MessageRepository for InMemoryMessageRepository {
        async fn save(&self, message: Message) -> Result<Message, ServiceError> {
            let mut messages = self.messages()?;
            self.saves.fetch_add(1, Ordering::SeqCst);
            messages.insert(message.id, message.clone());
            Ok(message)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, ServiceError> {
            let messages = self.messages()?;
            Ok(messages.get(&id).cloned())
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
            let mut messages = self.messages()?;
            self.deletes.fetch_add(1, Ordering::SeqCst);
            messages.remove(&id);
            Ok(())
        }

        async fn delete(&self, message: &Message) -> Result<(), ServiceError> {
            self.delete_by_id(message.id).await
        }

        async fn count(&self) -> Result<u64, ServiceError> {
            let messages = self.messages()?;
            Ok(messages.len() as u64)
        }

        async fn list_messages(&self, page: PageRequest) -> Result<Page<Message>, ServiceError> {
            let page = page.normalize();
            let messages = self.messages()?;
            let mut all: Vec<&Message> = messages.values().collect();
            all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            let items = all
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(page.size).unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok(Page::new(items, page, messages.len() as u64))
        }
    }

}
