#[cfg(test)]
mod tests {
    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;
    use metalframe_core::domain::{Lang, LocalizedText, NewPost, Post, PostId};
    use metalframe_core::error::RepoError;
    use metalframe_core::ports::PostRepository;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn model(id: i32, title: serde_json::Value) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            title,
            description: json!({ "en": "Powder coated", "uk": "Порошкове фарбування" }),
            image_url: Some("https://res.cloudinary.com/demo/image/upload/v1/posts/a.jpg".into()),
            created_at: now.into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_posts_maps_both_title_shapes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                model(2, json!({ "en": "Staircase", "uk": "Сходи" })),
                model(1, json!("Legacy title")),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let posts: Vec<Post> = repo.list().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id.as_str(), "2");
        assert_eq!(posts[0].title.resolve(Lang::Uk), "Сходи");
        assert_eq!(posts[1].title, LocalizedText::from("Legacy title"));
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(7, json!({ "en": "Gate" }))]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.find_by_id(&PostId::from("7")).await.unwrap();

        let post = result.expect("post exists");
        assert_eq!(post.id.as_str(), "7");
        assert_eq!(post.title.resolve(Lang::En), "Gate");
    }

    #[tokio::test]
    async fn test_non_numeric_id_never_matches() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PostgresPostRepository::new(db);

        assert!(repo.find_by_id(&PostId::from("abc")).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&PostId::from("abc")).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_insert_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(12, json!({ "en": "A", "uk": "А" }))]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let post = repo
            .insert(NewPost::new(
                LocalizedText::translations("A", "А"),
                LocalizedText::translations("B", "Б"),
                "https://res.cloudinary.com/demo/image/upload/v1/posts/a.jpg".into(),
            ))
            .await
            .unwrap();

        assert_eq!(post.id.as_str(), "12");
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.delete(&PostId::from("5")).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
