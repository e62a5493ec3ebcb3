use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::domain::{Lang, LocalizedText};
use crate::ports::{ApiError, StoreError};

#[derive(Default)]
struct ApiState {
    online: bool,
    posts: Vec<Post>,
    next_id: u32,
    calls: usize,
    reject_with: Option<(u16, String)>,
    imported: Vec<Post>,
}

/// In-process stand-in for the HTTP backend.
struct FakeApi {
    state: Mutex<ApiState>,
}

impl FakeApi {
    fn online(next_id: u32) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ApiState {
                online: true,
                next_id,
                ..Default::default()
            }),
        })
    }

    fn offline() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ApiState::default()),
        })
    }

    fn set_online(&self, online: bool) {
        self.state.lock().unwrap().online = online;
    }

    fn reject_next(&self, status: u16, message: &str) {
        self.state.lock().unwrap().reject_with = Some((status, message.to_string()));
    }

    fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, ApiState>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if !state.online {
            return Err(ApiError::Transport("connection refused".into()));
        }
        if let Some((status, message)) = state.reject_with.take() {
            return Err(ApiError::Rejected {
                status,
                message: Some(message),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl PostsApi for FakeApi {
    async fn list(&self) -> Result<Vec<Post>, ApiError> {
        Ok(self.enter()?.posts.clone())
    }

    async fn create(&self, payload: PostPayload) -> Result<Post, ApiError> {
        let mut state = self.enter()?;
        let id = PostId::from(state.next_id.to_string());
        state.next_id += 1;
        let post = NewPost::new(payload.title, payload.description, "https://img/x.jpg".into())
            .into_post(id);
        state.posts.insert(0, post.clone());
        Ok(post)
    }

    async fn update(&self, id: &PostId, payload: PostPayload) -> Result<Post, ApiError> {
        let mut state = self.enter()?;
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or(ApiError::Rejected {
                status: 404,
                message: Some("Not found".into()),
            })?;
        PostChanges {
            title: Some(payload.title),
            description: Some(payload.description),
            image_url: None,
        }
        .apply_to(post);
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<(), ApiError> {
        let mut state = self.enter()?;
        let before = state.posts.len();
        state.posts.retain(|p| p.id != *id);
        if state.posts.len() == before {
            return Err(ApiError::Rejected {
                status: 404,
                message: Some("Not found".into()),
            });
        }
        Ok(())
    }

    async fn import(&self, posts: Vec<Post>) -> Result<usize, ApiError> {
        let mut state = self.enter()?;
        let count = posts.len();
        state.imported.extend(posts);
        Ok(count)
    }
}

#[derive(Default)]
struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn with_posts(posts: &[Post]) -> Arc<Self> {
        let store = Self::default();
        store.slots.lock().unwrap().insert(
            LOCAL_POSTS_SLOT.to_string(),
            serde_json::to_string(posts).unwrap(),
        );
        Arc::new(store)
    }

    fn with_raw(raw: &str) -> Arc<Self> {
        let store = Self::default();
        store
            .slots
            .lock()
            .unwrap()
            .insert(LOCAL_POSTS_SLOT.to_string(), raw.to_string());
        Arc::new(store)
    }

    fn posts(&self) -> Vec<Post> {
        self.slots
            .lock()
            .unwrap()
            .get(LOCAL_POSTS_SLOT)
            .map(|raw| serde_json::from_str(raw).unwrap())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn read(&self, slot: &str) -> Option<String> {
        self.slots.lock().unwrap().get(slot).cloned()
    }

    async fn write(&self, slot: &str, value: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .unwrap()
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

fn local_post(id: &str, title: &str) -> Post {
    NewPost::new(
        LocalizedText::translations(title, title),
        LocalizedText::translations("d", "д"),
        "data:image/png;base64,AA==".into(),
    )
    .into_post(PostId::from(id))
}

fn form(image: bool) -> PostForm {
    PostForm {
        title_en: "A".into(),
        title_uk: "А".into(),
        description_en: "B".into(),
        description_uk: "Б".into(),
        image: image.then(|| ImageUpload::new("frame.jpg", vec![0xff, 0xd8, 0xff])),
    }
}

async fn local_session(sync: &PostsSync) -> Session {
    let mut session = Session::new();
    sync.fetch_posts(&mut session).await;
    assert_eq!(session.mode(), StorageMode::Local);
    session
}

#[tokio::test]
async fn fetch_falls_back_to_local_cache_when_api_is_down() {
    let store = MemoryStore::with_posts(&[local_post("1", "Gate")]);
    let sync = PostsSync::new(FakeApi::offline(), store);
    let mut session = Session::new();

    let posts = sync.fetch_posts(&mut session).await;

    assert_eq!(session.mode(), StorageMode::Local);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title.resolve(Lang::En), "Gate");
}

#[tokio::test]
async fn fetch_falls_back_to_local_cache_when_list_is_rejected() {
    let api = FakeApi::online(1);
    let store = MemoryStore::with_posts(&[local_post("4", "Rail")]);
    let sync = PostsSync::new(api.clone(), store);
    let mut session = Session::new();

    api.reject_next(500, "relation \"posts\" does not exist");
    let posts = sync.fetch_posts(&mut session).await;

    assert_eq!(session.mode(), StorageMode::Local);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id.as_str(), "4");
}

#[tokio::test]
async fn fetch_reads_corrupt_or_missing_cache_as_empty() {
    let sync = PostsSync::new(FakeApi::offline(), MemoryStore::with_raw("{oops"));
    assert!(sync.fetch_posts(&mut Session::new()).await.is_empty());

    let sync = PostsSync::new(FakeApi::offline(), Arc::new(MemoryStore::default()));
    assert!(sync.fetch_posts(&mut Session::new()).await.is_empty());
}

#[tokio::test]
async fn mode_is_reprobed_on_every_read() {
    let api = FakeApi::online(1);
    let sync = PostsSync::new(api.clone(), Arc::new(MemoryStore::default()));
    let mut session = Session::new();

    sync.fetch_posts(&mut session).await;
    assert_eq!(session.mode(), StorageMode::Api);

    api.set_online(false);
    sync.fetch_posts(&mut session).await;
    assert_eq!(session.mode(), StorageMode::Local);

    api.set_online(true);
    sync.fetch_posts(&mut session).await;
    assert_eq!(session.mode(), StorageMode::Api);
}

#[tokio::test]
async fn api_create_without_image_fails_before_any_call() {
    let api = FakeApi::online(1);
    let sync = PostsSync::new(api.clone(), Arc::new(MemoryStore::default()));
    let mut session = Session::new();

    let err = sync
        .submit_post(&mut session, form(false), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Validation(ref v) if v.field == FormField::Image));
    assert_eq!(err.user_message(), "Please choose an image");
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn api_create_reports_status_and_reloads_list() {
    let api = FakeApi::online(5);
    let sync = PostsSync::new(api.clone(), Arc::new(MemoryStore::default()));
    let mut session = Session::new();

    let outcome = sync
        .submit_post(&mut session, form(true), None)
        .await
        .unwrap();

    assert_eq!(outcome.status, Some("Post created."));
    let created = outcome
        .posts
        .iter()
        .find(|p| p.id.as_str() == "5")
        .expect("reloaded list contains the new post");
    assert_eq!(created.title, LocalizedText::translations("A", "А"));
    assert_eq!(session.mode(), StorageMode::Api);
}

#[tokio::test]
async fn api_update_is_visible_after_refetch() {
    let api = FakeApi::online(1);
    let sync = PostsSync::new(api.clone(), Arc::new(MemoryStore::default()));
    let mut session = Session::new();
    sync.submit_post(&mut session, form(true), None).await.unwrap();

    let mut edit = form(false);
    edit.title_en = "Renamed".into();
    let outcome = sync
        .submit_post(&mut session, edit, Some(&PostId::from("1")))
        .await
        .unwrap();

    assert_eq!(outcome.status, Some("Post updated."));
    let refetched = sync.fetch_posts(&mut session).await;
    assert_eq!(refetched[0].title.resolve(Lang::En), "Renamed");
    assert!(refetched[0].updated_at.is_some());
}

#[tokio::test]
async fn resubmitting_a_create_duplicates_the_post() {
    let api = FakeApi::online(1);
    let sync = PostsSync::new(api, Arc::new(MemoryStore::default()));
    let mut session = Session::new();

    sync.submit_post(&mut session, form(true), None).await.unwrap();
    let outcome = sync
        .submit_post(&mut session, form(true), None)
        .await
        .unwrap();

    assert_eq!(outcome.posts.len(), 2);
    assert_ne!(outcome.posts[0].id, outcome.posts[1].id);
}

#[tokio::test]
async fn backend_rejection_is_surfaced_verbatim() {
    let api = FakeApi::online(1);
    let sync = PostsSync::new(api.clone(), Arc::new(MemoryStore::default()));
    let mut session = Session::new();

    api.reject_next(500, "value too long for type character varying");
    let err = sync
        .submit_post(&mut session, form(true), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Backend(_)));
    assert_eq!(
        err.user_message(),
        "value too long for type character varying"
    );
}

#[tokio::test]
async fn transport_failure_on_write_gives_generic_message() {
    let api = FakeApi::online(1);
    let store = Arc::new(MemoryStore::default());
    let sync = PostsSync::new(api.clone(), store.clone());
    let mut session = Session::new();
    sync.fetch_posts(&mut session).await;

    api.set_online(false);
    let err = sync
        .submit_post(&mut session, form(true), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Transport(_)));
    assert_eq!(err.user_message(), SUBMIT_FAILED);
    assert!(store.posts().is_empty(), "no optimistic local write");
}

#[tokio::test]
async fn local_create_without_image_leaves_cache_untouched() {
    let store = MemoryStore::with_posts(&[]);
    let sync = PostsSync::new(FakeApi::offline(), store.clone());
    let mut session = local_session(&sync).await;

    let err = sync
        .submit_post(&mut session, form(false), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Validation(ref v) if v.field == FormField::Image));
    assert!(store.posts().is_empty());
}

#[tokio::test]
async fn local_create_assigns_next_id_and_inlines_image() {
    let store = MemoryStore::with_posts(&[
        local_post("3", "c"),
        local_post("1", "a"),
        local_post("7", "g"),
    ]);
    let sync = PostsSync::new(FakeApi::offline(), store.clone());
    let mut session = local_session(&sync).await;

    let outcome = sync
        .submit_post(&mut session, form(true), None)
        .await
        .unwrap();

    assert_eq!(outcome.status, Some("Post created (local)."));
    let cached = store.posts();
    assert_eq!(cached.len(), 4);
    assert_eq!(cached[0].id.as_str(), "8");
    assert!(cached[0].image_url.starts_with("data:image/jpeg;base64,"));
    assert_eq!(outcome.posts, cached);
}

#[tokio::test]
async fn local_update_replaces_in_place_and_keeps_image() {
    let original = local_post("2", "Old");
    let store = MemoryStore::with_posts(&[local_post("1", "x"), original.clone()]);
    let sync = PostsSync::new(FakeApi::offline(), store.clone());
    let mut session = local_session(&sync).await;

    let outcome = sync
        .submit_post(&mut session, form(false), Some(&PostId::from("2")))
        .await
        .unwrap();

    assert_eq!(outcome.status, Some("Post updated (local)."));
    let cached = store.posts();
    assert_eq!(cached[1].id.as_str(), "2");
    assert_eq!(cached[1].title.resolve(Lang::Uk), "А");
    assert_eq!(cached[1].image_url, original.image_url);
    assert_eq!(cached[1].created_at, original.created_at);
    assert!(cached[1].updated_at.is_some());
}

#[tokio::test]
async fn local_update_of_unknown_id_is_an_error() {
    let store = MemoryStore::with_posts(&[local_post("1", "x")]);
    let sync = PostsSync::new(FakeApi::offline(), store.clone());
    let mut session = local_session(&sync).await;

    let err = sync
        .submit_post(&mut session, form(true), Some(&PostId::from("9")))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::NotFound(_)));
    assert_eq!(err.user_message(), "Post not found locally");
    assert_eq!(store.posts().len(), 1);
}

#[tokio::test]
async fn local_delete_of_unknown_id_is_a_noop() {
    let store = MemoryStore::with_posts(&[local_post("1", "x"), local_post("2", "y")]);
    let sync = PostsSync::new(FakeApi::offline(), store.clone());
    let mut session = local_session(&sync).await;

    let outcome = sync
        .delete_post(&mut session, &PostId::from("42"))
        .await
        .unwrap();
    assert_eq!(outcome.posts.len(), 2);

    let outcome = sync
        .delete_post(&mut session, &PostId::from("1"))
        .await
        .unwrap();
    assert_eq!(outcome.posts.len(), 1);
    assert_eq!(store.posts()[0].id.as_str(), "2");
}

#[tokio::test]
async fn api_delete_of_unknown_id_surfaces_not_found() {
    let api = FakeApi::online(1);
    let sync = PostsSync::new(api, Arc::new(MemoryStore::default()));
    let mut session = Session::new();

    let err = sync
        .delete_post(&mut session, &PostId::from("404"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::NotFound(ref m) if m == "Not found"));
}

#[tokio::test]
async fn find_post_returns_matching_record() {
    let store = MemoryStore::with_posts(&[local_post("1", "x"), local_post("2", "Stairs")]);
    let sync = PostsSync::new(FakeApi::offline(), store);
    let mut session = Session::new();

    let post = sync.find_post(&mut session, &PostId::from("2")).await;
    assert_eq!(post.map(|p| p.title.resolve(Lang::En).to_string()).as_deref(), Some("Stairs"));
    assert!(sync.find_post(&mut session, &PostId::from("3")).await.is_none());
}

#[tokio::test]
async fn import_sends_whole_cache_and_keeps_it() {
    let api = FakeApi::online(1);
    let store = MemoryStore::with_posts(&[local_post("1", "x"), local_post("2", "y")]);
    let sync = PostsSync::new(api.clone(), store.clone());

    assert_eq!(sync.import_local().await.unwrap(), 2);
    assert_eq!(sync.import_local().await.unwrap(), 2);

    assert_eq!(api.state.lock().unwrap().imported.len(), 4);
    assert_eq!(store.posts().len(), 2);
}

#[tokio::test]
async fn local_create_fails_cleanly_when_ids_are_exhausted() {
    let last = local_post(&i64::MAX.to_string(), "last");
    let store = MemoryStore::with_posts(&[last.clone()]);
    let sync = PostsSync::new(FakeApi::offline(), store.clone());
    let mut session = local_session(&sync).await;

    let err = sync
        .submit_post(&mut session, form(true), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Storage(_)));
    assert_eq!(store.posts(), vec![last]);
}
