use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, TransactionTrait};
use tracing::debug;
use uuid::Uuid;

use models::message;

use crate::errors::ServiceError;
use crate::message::domain::Message;
use crate::message::repository::MessageRepository;
use crate::pagination::{Page, PageRequest};

/// SeaORM-backed message store.
pub struct SeaOrmMessageRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmMessageRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl MessageRepository for SeaOrmMessageRepository {
    async fn save(&self, m: Message) -> Result<Message, ServiceError> {
        let txn = self.db.begin().await?;
        let exists = message::Entity::find_by_id(m.id).one(&txn).await?.is_some();
        let am: message::ActiveModel = m.into();
        let saved = if exists { am.update(&txn).await? } else { am.insert(&txn).await? };
        txn.commit().await?;
        debug!(message_id = %saved.id, inserted = !exists, "message_saved");
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, ServiceError> {
        let res = message::Entity::find_by_id(id).one(&self.db).await?;
        Ok(res.map(Message::from))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        message::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, m: &Message) -> Result<(), ServiceError> {
        let am: message::ActiveModel = m.clone().into();
        am.delete(&self.db).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(message::Entity::find().count(&self.db).await?)
    }

    async fn list_messages(&self, page: PageRequest) -> Result<Page<Message>, ServiceError> {
        let page = page.normalize();
        let paginator = message::Entity::find()
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .paginate(&self.db, page.size);
        let total = paginator.num_items().await?;
        // The paginator multiplies page by size unchecked and binds the offset as i64.
        let in_range = page
            .page
            .checked_mul(page.size)
            .is_some_and(|offset| offset < total && i64::try_from(offset).is_ok());
        if !in_range {
            return Ok(Page::new(Vec::new(), page, total));
        }
        let rows = paginator.fetch_page(page.page).await?;
        Ok(Page::new(rows.into_iter().map(Message::from).collect(), page, total))
    }
}
