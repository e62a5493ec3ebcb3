//! Post entity for SeaORM.

use sea_orm::{NotSet, Set};
use sea_orm::entity::prelude::*;

use metalframe_core::domain::{LocalizedText, NewPost, Post, PostId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub title: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub description: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: PostId::from(model.id),
            title: LocalizedText::from_json_value(model.title),
            description: LocalizedText::from_json_value(model.description),
            image_url: model.image_url.unwrap_or_default(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// Conversion from a new Domain Post to an insertable ActiveModel.
impl From<NewPost> for ActiveModel {
    fn from(post: NewPost) -> Self {
        let created_at = post.created_at.unwrap_or_else(chrono::Utc::now);
        Self {
            id: NotSet,
            title: Set(post.title.to_json_value()),
            description: Set(post.description.to_json_value()),
            image_url: Set(Some(post.image_url)),
            created_at: Set(created_at.into()),
            updated_at: Set(None),
        }
    }
}
