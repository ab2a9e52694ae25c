use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{Message, RegisterInput, UpdateInput};
use super::repository::MessageRepository;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

/// Message business service independent of storage engine and transport.
///
/// Every operation is at most one read followed by one write. Read-modify-write
/// paths (`update`, `increment_like`) are not serialized here, so concurrent
/// callers on the same id can lose updates unless the store prevents it.
pub struct MessageService<R: MessageRepository> {
    repo: Arc<R>,
}

impl<R: MessageRepository> MessageService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Register a new message under a freshly generated id.
    ///
    /// # Examples
    /// ```
    /// use service::message::{MessageService, RegisterInput, repository::mock::InMemoryMessageRepository};
    /// use std::sync::Arc;
    /// let svc = MessageService::new(Arc::new(InMemoryMessageRepository::default()));
    /// let input = RegisterInput { author: "Jose".into(), content: "hello".into() };
    /// let msg = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(msg.content, "hello");
    /// assert_eq!(msg.like_count, 0);
    /// ```
    #[instrument(skip(self, input), fields(author = %input.author))]
    pub async fn register(&self, input: RegisterInput) -> Result<Message, ServiceError> {
        let message = Message {
            id: Uuid::new_v4(),
            author: input.author,
            content: input.content,
            like_count: 0,
            created_at: Utc::now(),
        };
        let saved = self.repo.save(message).await?;
        info!(message_id = %saved.id, "message_registered");
        Ok(saved)
    }

    /// Look a message up by id, failing with `NotFound` when absent.
    #[instrument(skip(self), fields(message_id = %id))]
    pub async fn find(&self, id: Uuid) -> Result<Message, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            debug!("message_not_found");
            ServiceError::not_found("message")
        })
    }

    /// Replace the content of an existing message.
    ///
    /// The payload id must match `id`; a mismatch is reported as `NotFound`
    /// and nothing is written.
    ///
    /// # Examples
    /// ```
    /// use service::message::{MessageService, RegisterInput, UpdateInput, repository::mock::InMemoryMessageRepository};
    /// use std::sync::Arc;
    /// let svc = MessageService::new(Arc::new(InMemoryMessageRepository::default()));
    /// let msg = tokio_test::block_on(svc.register(RegisterInput { author: "Jose".into(), content: "hello".into() })).unwrap();
    /// let updated = tokio_test::block_on(svc.update(msg.id, UpdateInput { id: msg.id, content: "abcd".into() })).unwrap();
    /// assert_eq!(updated.content, "abcd");
    /// assert_eq!(updated.author, "Jose");
    /// ```
    #[instrument(skip(self, input), fields(message_id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateInput) -> Result<Message, ServiceError> {
        let mut message = self.find(id).await?;
        if message.id != input.id {
            debug!(claimed_id = %input.id, "message_id_mismatch");
            return Err(ServiceError::NotFound("updated message does not carry the expected id".into()));
        }
        message.content = input.content;
        let saved = self.repo.save(message).await?;
        info!(message_id = %saved.id, "message_updated");
        Ok(saved)
    }

    /// Delete an existing message. Unknown ids fail with `NotFound`.
    #[instrument(skip(self), fields(message_id = %id))]
    pub async fn remove(&self, id: Uuid) -> Result<bool, ServiceError> {
        let message = self.find(id).await?;
        self.repo.delete(&message).await?;
        info!(message_id = %id, "message_removed");
        Ok(true)
    }

    /// Add exactly one like. A counter already at `i64::MAX` is rejected
    /// with `Validation` and nothing is written.
    #[instrument(skip(self), fields(message_id = %id))]
    pub async fn increment_like(&self, id: Uuid) -> Result<Message, ServiceError> {
        let mut message = self.find(id).await?;
        message.like_count = message.like_count.checked_add(1).ok_or_else(|| {
            debug!(like_count = message.like_count, "like_count_overflow");
            ServiceError::Validation("like_count is at its maximum".into())
        })?;
        let saved = self.repo.save(message).await?;
        info!(message_id = %saved.id, like_count = saved.like_count, "message_liked");
        Ok(saved)
    }

    /// One page of messages, exactly as the store returns it.
    #[instrument(skip(self, page), fields(page_index = page.page, page_size = page.size))]
    pub async fn list(&self, page: PageRequest) -> Result<Page<Message>, ServiceError> {
        self.repo.list_messages(page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::repository::mock::InMemoryMessageRepository;

    fn setup() -> (Arc<InMemoryMessageRepository>, MessageService<InMemoryMessageRepository>) {
        let repo = Arc::new(InMemoryMessageRepository::default());
        (repo.clone(), MessageService::new(repo))
    }

    fn input() -> RegisterInput {
        RegisterInput { author: "José".into(), content: "conteúdo da mensagem".into() }
    }

    #[tokio::test]
    async fn register_assigns_id_and_persists() {
        let (repo, svc) = setup();
        let msg = svc.register(RegisterInput { author: "Jose".into(), content: "hello".into() }).await.unwrap();

        assert!(!msg.id.is_nil());
        assert_eq!(msg.author, "Jose");
        assert_eq!(msg.content, "hello");
        assert_eq!(msg.like_count, 0);
        assert_eq!(repo.save_calls(), 1);
        assert_eq!(repo.find_by_id(msg.id).await.unwrap(), Some(msg));
    }

    #[tokio::test]
    async fn register_generates_distinct_ids() {
        let (repo, svc) = setup();
        let a = svc.register(input()).await.unwrap();
        let b = svc.register(input()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn find_returns_registered_message() {
        let (_repo, svc) = setup();
        let msg = svc.register(input()).await.unwrap();
        assert_eq!(svc.find(msg.id).await.unwrap(), msg);
    }

    #[tokio::test]
    async fn find_unknown_id_is_not_found() {
        let (_repo, svc) = setup();
        let err = svc.find(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_changes_content_only() {
        let (repo, svc) = setup();
        let msg = svc.register(RegisterInput { author: "Jose".into(), content: "hello".into() }).await.unwrap();
        svc.increment_like(msg.id).await.unwrap();

        let updated = svc.update(msg.id, UpdateInput { id: msg.id, content: "abcd".into() }).await.unwrap();
        assert_eq!(updated.id, msg.id);
        assert_eq!(updated.author, "Jose");
        assert_eq!(updated.content, "abcd");
        assert_eq!(updated.like_count, 1);
        assert_eq!(updated.created_at, msg.created_at);
        assert_eq!(repo.find_by_id(msg.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_with_mismatched_id_is_not_found_and_writes_nothing() {
        let (repo, svc) = setup();
        let msg = svc.register(input()).await.unwrap();
        let saves_before = repo.save_calls();

        let err = svc.update(msg.id, UpdateInput { id: Uuid::new_v4(), content: "abcd".into() }).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.save_calls(), saves_before);
        assert_eq!(svc.find(msg.id).await.unwrap().content, "conteúdo da mensagem");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (repo, svc) = setup();
        let id = Uuid::new_v4();
        let err = svc.update(id, UpdateInput { id, content: "abcd".into() }).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.save_calls(), 0);
    }

    #[tokio::test]
    async fn increment_like_counts_each_call() {
        let (_repo, svc) = setup();
        let msg = svc.register(input()).await.unwrap();

        let once = svc.increment_like(msg.id).await.unwrap();
        assert_eq!(once.like_count, 1);

        for _ in 0..9 {
            svc.increment_like(msg.id).await.unwrap();
        }
        let after = svc.find(msg.id).await.unwrap();
        assert_eq!(after.like_count, 10);
        assert_eq!(after.content, msg.content);
        assert_eq!(after.author, msg.author);
    }

    #[tokio::test]
    async fn increment_like_at_max_is_rejected_without_write() {
        let (repo, svc) = setup();
        let msg = svc.register(input()).await.unwrap();
        let mut maxed = msg.clone();
        maxed.like_count = i64::MAX;
        repo.save(maxed).await.unwrap();
        let saves_before = repo.save_calls();

        let err = svc.increment_like(msg.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(err.code(), 1001);
        assert_eq!(repo.save_calls(), saves_before);
        assert_eq!(svc.find(msg.id).await.unwrap().like_count, i64::MAX);
    }

    #[tokio::test]
    async fn increment_like_unknown_id_is_not_found() {
        let (repo, svc) = setup();
        assert!(svc.increment_like(Uuid::new_v4()).await.unwrap_err().is_not_found());
        assert_eq!(repo.save_calls(), 0);
    }

    #[tokio::test]
    async fn remove_then_find_is_not_found() {
        let (repo, svc) = setup();
        let msg = svc.register(input()).await.unwrap();

        assert!(svc.remove(msg.id).await.unwrap());
        assert_eq!(repo.delete_calls(), 1);
        assert!(svc.find(msg.id).await.unwrap_err().is_not_found());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found_without_delete() {
        let (repo, svc) = setup();
        assert!(svc.remove(Uuid::new_v4()).await.unwrap_err().is_not_found());
        assert_eq!(repo.delete_calls(), 0);
    }

    #[tokio::test]
    async fn list_passes_store_page_through() {
        let (repo, svc) = setup();
        for i in 0..3 {
            svc.register(RegisterInput { author: "José".into(), content: format!("m{i}") }).await.unwrap();
        }
        let request = PageRequest::new(0, 2);
        let page = svc.list(request).await.unwrap();
        assert_eq!(page, repo.list_messages(request).await.unwrap());
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 3);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty_page() {
        let (_repo, svc) = setup();
        let page = svc.list(PageRequest::default()).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_items, 0);
    }

    #[tokio::test]
    async fn store_errors_pass_through() {
        let (repo, svc) = setup();
        let msg = svc.register(input()).await.unwrap();
        repo.set_failure(Some("connection refused"));

        let err = svc.find(msg.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(ref s) if s == "connection refused"));
        assert!(matches!(svc.register(input()).await, Err(ServiceError::Db(_))));
        assert!(matches!(svc.list(PageRequest::default()).await, Err(ServiceError::Db(_))));
    }
}
