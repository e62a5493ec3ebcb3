//! Flat JSON file post repository.
//!
//! The whole store lives in one pretty-printed JSON object,
//! `{ "lastId": N, "posts": [...] }`, where `lastId` is the largest id ever
//! handed out. A bare JSON array of posts is still read. Every write reads
//! the file, modifies it and writes it back. Writers inside this
//! process are serialized by a mutex; writers in other processes are not,
//! and a concurrent writer elsewhere can lose an update.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use metalframe_core::domain::{NewPost, Post, PostChanges, PostId};
use metalframe_core::error::RepoError;
use metalframe_core::ports::PostRepository;

use super::{allocate_id, newest_first};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostsFile {
    #[serde(default)]
    last_id: i64,
    posts: Vec<Post>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPosts {
    File(PostsFile),
    List(Vec<Post>),
}

impl From<StoredPosts> for PostsFile {
    fn from(stored: StoredPosts) -> Self {
        match stored {
            StoredPosts::File(file) => file,
            StoredPosts::List(posts) => Self { last_id: 0, posts },
        }
    }
}

pub struct JsonFilePostRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFilePostRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<PostsFile, RepoError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PostsFile::default()),
            Err(e) => return Err(RepoError::Io(e.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(PostsFile::default());
        }
        serde_json::from_str::<StoredPosts>(&raw)
            .map(PostsFile::from)
            .map_err(|e| {
                RepoError::Query(format!("{} is not a valid post list: {}", self.path.display(), e))
            })
    }

    async fn write_all(&self, file: &PostsFile) -> Result<(), RepoError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| RepoError::Io(e.to_string()))?;
        }
        let raw =
            serde_json::to_string_pretty(file).map_err(|e| RepoError::Query(e.to_string()))?;

        // Write a sibling file and rename it over, so readers never see half a file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| RepoError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepoError::Io(e.to_string()))
    }
}

#[async_trait]
impl PostRepository for JsonFilePostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.read_all().await?.posts;
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.read_all().await?.posts.into_iter().find(|p| p.id == *id))
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_all().await?;
        let post = new_post.into_post(allocate_id(&mut file.last_id, &file.posts)?);
        file.posts.push(post.clone());
        self.write_all(&file).await?;
        Ok(post)
    }

    async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_all().await?;
        let post = file
            .posts
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or(RepoError::NotFound)?;
        changes.apply_to(post);
        let updated = post.clone();
        self.write_all(&file).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &PostId) -> Result<(), RepoError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_all().await?;
        let before = file.posts.len();
        file.posts.retain(|p| p.id != *id);
        if file.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        self.write_all(&file).await
    }

    async fn insert_many(&self, new_posts: Vec<NewPost>) -> Result<usize, RepoError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_all().await?;
        let count = new_posts.len();
        for new_post in new_posts {
            let id = allocate_id(&mut file.last_id, &file.posts)?;
            file.posts.push(new_post.into_post(id));
        }
        self.write_all(&file).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metalframe_core::domain::LocalizedText;

    fn new_post(title: &str) -> NewPost {
        NewPost::new(
            LocalizedText::translations(title, title),
            LocalizedText::from("desc"),
            format!("/uploads/{title}.jpg"),
        )
    }

    #[tokio::test]
    async fn missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFilePostRepository::new(dir.path().join("posts.json"));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_incrementing_ids_and_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFilePostRepository::new(dir.path().join("data/posts.json"));

        let first = repo.insert(new_post("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.insert(new_post("second")).await.unwrap();

        assert_eq!(first.id.as_str(), "1");
        assert_eq!(second.id.as_str(), "2");
        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn update_and_delete_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFilePostRepository::new(dir.path().join("posts.json"));
        let post = repo.insert(new_post("gate")).await.unwrap();

        let updated = repo
            .update(
                &post.id,
                PostChanges {
                    image_url: Some("/uploads/new.jpg".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.image_url, "/uploads/new.jpg");
        assert_eq!(updated.title, post.title);

        repo.delete(&post.id).await.unwrap();
        assert!(matches!(
            repo.delete(&post.id).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repo.update(&post.id, PostChanges::default()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn insert_many_appends_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFilePostRepository::new(dir.path().join("posts.json"));
        repo.insert(new_post("a")).await.unwrap();

        let count = repo
            .insert_many(vec![new_post("a"), new_post("a")])
            .await
            .unwrap();

        assert_eq!(count, 2);
        let ids: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"3".to_string()));
    }

    #[tokio::test]
    async fn deleted_newest_id_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let repo = JsonFilePostRepository::new(&path);

        repo.insert(new_post("first")).await.unwrap();
        let second = repo.insert(new_post("second")).await.unwrap();
        repo.delete(&second.id).await.unwrap();

        // A fresh instance sees only the file.
        let reopened = JsonFilePostRepository::new(&path);
        let third = reopened.insert(new_post("third")).await.unwrap();
        assert_eq!(third.id.as_str(), "3");

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["lastId"], 3);
        assert_eq!(saved["posts"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn bare_array_file_is_still_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "9", "title": "Gate", "imageUrl": "/a.jpg", "createdAt": "2024-03-01T10:00:00Z"},
                {"id": "10", "title": "Fence", "imageUrl": "/b.jpg", "createdAt": "2024-03-01T10:00:00Z"}
            ]"#,
        )
        .unwrap();
        let repo = JsonFilePostRepository::new(&path);

        let ids: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        // Same timestamp: the higher numeric id comes first.
        assert_eq!(ids, vec!["10", "9"]);

        let next = repo.insert(new_post("rail")).await.unwrap();
        assert_eq!(next.id.as_str(), "11");
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "{ not a list").unwrap();

        let repo = JsonFilePostRepository::new(path);

        assert!(matches!(repo.list().await, Err(RepoError::Query(_))));
    }
}
