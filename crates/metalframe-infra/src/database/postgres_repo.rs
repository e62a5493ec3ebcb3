//! PostgreSQL repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set,
    TransactionTrait,
};

use metalframe_core::domain::{NewPost, Post, PostChanges, PostId};
use metalframe_core::error::RepoError;
use metalframe_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository over the `posts` table.
///
/// Update-by-id is a single-row `UPDATE`, so concurrent writers to the same
/// row serialize in the database.
pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Ids are serial integers; anything else cannot match a row.
    fn row_id(id: &PostId) -> Option<i32> {
        id.as_str().trim().parse().ok()
    }
}

fn query_error(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        let Some(row_id) = Self::row_id(id) else {
            return Ok(None);
        };

        let row = PostEntity::find_by_id(row_id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let active: post::ActiveModel = new_post.into();
        let row = active.insert(&self.db).await.map_err(query_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let row_id = Self::row_id(id).ok_or(RepoError::NotFound)?;
        let row = PostEntity::find_by_id(row_id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)?;

        let mut active = row.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title.to_json_value());
        }
        if let Some(description) = changes.description {
            active.description = Set(description.to_json_value());
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let row = active.update(&self.db).await.map_err(query_error)?;
        Ok(row.into())
    }

    async fn delete(&self, id: &PostId) -> Result<(), RepoError> {
        let row_id = Self::row_id(id).ok_or(RepoError::NotFound)?;
        let result = PostEntity::delete_by_id(row_id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    /// Insert every post in one transaction.
    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<usize, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;
        let mut inserted = 0;
        for new_post in posts {
            let active: post::ActiveModel = new_post.into();
            active.insert(&txn).await.map_err(query_error)?;
            inserted += 1;
        }
        txn.commit().await.map_err(query_error)?;
        Ok(inserted)
    }
}
