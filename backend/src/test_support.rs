//! In-memory fixtures for unit and integration tests.
//!
//! [`InMemoryStore`] holds the four tables behind a mutex; the
//! `InMemory*Repository` adapters implement the domain ports against it with
//! the same zero-row and foreign-key semantics as the PostgreSQL adapters.
//! [`InMemoryStore::seeded`] loads the reference dataset the test suite's
//! fixture assertions are written against.
//!
//! Enabled through the `test-support` feature, which the crate's own
//! dev-dependency on itself switches on for test builds.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pagination::{PageWindow, Paginated};

use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, CommentRepository, CommentRepositoryError,
    TopicRepository, TopicRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Article, ArticleDetail, ArticleFilter, ArticleSummary, ArticlesService, Comment,
    CommentsService, NewArticle, NewComment, NewTopic, SortColumn, SortOrder, Topic,
    TopicsService, User, UsersService,
};
use crate::inbound::http::state::HttpState;

/// Image URL applied when an insert does not provide one, matching the
/// column default in the migrations.
pub const DEFAULT_ARTICLE_IMG_URL: &str =
    "https://images.pexels.com/photos/97050/pexels-photo-97050.jpeg?w=700&h=700";

#[derive(Default)]
struct StoreState {
    topics: Vec<Topic>,
    users: Vec<User>,
    articles: Vec<Article>,
    comments: Vec<Comment>,
    next_article_id: i64,
    next_comment_id: i64,
}

/// Shared in-memory stand-in for the relational store.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

fn ts(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, month, day, hour, minute, 0)
        .single()
        .expect("valid fixture timestamp")
}

impl InMemoryStore {
    /// An empty store.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The reference dataset: three topics (one without articles), four
    /// users, five articles (article 1 with votes 100 and 11 comments,
    /// article 2 with none) and thirteen comments.
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        {
            let mut state = store.state.lock().expect("store lock");

            state.topics = vec![
                topic("mitch", "The man, the Mitch, the legend"),
                topic("cats", "Not dogs"),
                topic("paper", "what books are made of"),
            ];
            state.users = vec![
                user("butter_bridge", "jonny"),
                user("icellusedkars", "sam"),
                user("rogersop", "paul"),
                user("lurker", "do_nothing"),
            ];
            state.articles = vec![
                article(
                    1,
                    "Living in the shadow of a great man",
                    "mitch",
                    "butter_bridge",
                    "I find this existence challenging",
                    ts(7, 9, 21, 11),
                    100,
                ),
                article(
                    2,
                    "Sony Vaio; or, The Laptop",
                    "mitch",
                    "icellusedkars",
                    "Call me Mitchell.",
                    ts(10, 16, 6, 3),
                    0,
                ),
                article(
                    3,
                    "Eight pug gifs that remind me of mitch",
                    "mitch",
                    "icellusedkars",
                    "some gifs",
                    ts(11, 3, 9, 12),
                    0,
                ),
                article(
                    4,
                    "Student SUES Mitch!",
                    "mitch",
                    "rogersop",
                    "We all love Mitch and his wonderful, unique typing style.",
                    ts(5, 6, 2, 14),
                    0,
                ),
                article(
                    5,
                    "UNCOVERED: catspiracy to bring down democracy",
                    "cats",
                    "rogersop",
                    "Bastet walks amongst us",
                    ts(8, 3, 14, 29),
                    0,
                ),
            ];
            state.comments = vec![
                comment(1, 1, "butter_bridge", 16, ts(4, 6, 13, 17), "This morning, I showered for nine minutes."),
                comment(2, 1, "butter_bridge", 14, ts(10, 31, 3, 3), "The beautiful thing about treasure is that it exists."),
                comment(3, 1, "icellusedkars", 100, ts(2, 23, 12, 1), "Replacing the quiet elegance of the dark suit."),
                comment(4, 1, "icellusedkars", -100, ts(2, 23, 12, 2), "I carry a log about with me."),
                comment(5, 1, "icellusedkars", 1, ts(11, 3, 21, 0), "I hate streaming noses"),
                comment(6, 1, "icellusedkars", 0, ts(4, 11, 21, 2), "I hate streaming eyes even more"),
                comment(7, 1, "icellusedkars", 0, ts(5, 15, 20, 19), "Lobster pot"),
                comment(8, 1, "icellusedkars", 0, ts(4, 14, 20, 19), "Delicious crackerbreads"),
                comment(9, 1, "icellusedkars", 0, ts(1, 1, 3, 8), "Superficially charming"),
                comment(10, 1, "rogersop", 9, ts(3, 2, 7, 10), "Massive intercranial brain haemorrhage"),
                comment(11, 1, "butter_bridge", 4, ts(6, 9, 5, 0), "Ambidextrous marsupial"),
                comment(12, 3, "icellusedkars", 0, ts(6, 20, 7, 24), "git push origin master"),
                comment(13, 3, "icellusedkars", 0, ts(7, 21, 0, 20), "Fruit pastilles"),
            ];
            state.next_article_id = 6;
            state.next_comment_id = 14;
        }
        Arc::new(store)
    }
}

fn topic(slug: &str, description: &str) -> Topic {
    Topic {
        slug: slug.to_owned(),
        description: description.to_owned(),
    }
}

fn user(username: &str, name: &str) -> User {
    User {
        username: username.to_owned(),
        name: name.to_owned(),
        avatar_url: format!("https://avatars.example.com/{username}.png"),
    }
}

fn article(
    article_id: i64,
    title: &str,
    topic: &str,
    author: &str,
    body: &str,
    created_at: DateTime<Utc>,
    votes: i32,
) -> Article {
    Article {
        article_id,
        title: title.to_owned(),
        topic: topic.to_owned(),
        author: author.to_owned(),
        body: body.to_owned(),
        created_at,
        votes,
        article_img_url: DEFAULT_ARTICLE_IMG_URL.to_owned(),
    }
}

fn comment(
    comment_id: i64,
    article_id: i64,
    author: &str,
    votes: i32,
    created_at: DateTime<Utc>,
    body: &str,
) -> Comment {
    Comment {
        comment_id,
        article_id,
        author: author.to_owned(),
        body: body.to_owned(),
        created_at,
        votes,
    }
}

fn count_comments(state: &StoreState, article_id: i64) -> i64 {
    state
        .comments
        .iter()
        .filter(|c| c.article_id == article_id)
        .count() as i64
}

fn compare_on(column: SortColumn, a: &(Article, i64), b: &(Article, i64)) -> Ordering {
    match column {
        SortColumn::ArticleId => a.0.article_id.cmp(&b.0.article_id),
        SortColumn::Title => a.0.title.cmp(&b.0.title),
        SortColumn::Author => a.0.author.cmp(&b.0.author),
        SortColumn::Body => a.0.body.cmp(&b.0.body),
        SortColumn::Topic => a.0.topic.cmp(&b.0.topic),
        SortColumn::CreatedAt => a.0.created_at.cmp(&b.0.created_at),
        SortColumn::Votes => a.0.votes.cmp(&b.0.votes),
        SortColumn::CommentCount => a.1.cmp(&b.1),
    }
}

fn summarize(article: &Article, comment_count: i64) -> ArticleSummary {
    ArticleSummary {
        article_id: article.article_id,
        title: article.title.clone(),
        topic: article.topic.clone(),
        author: article.author.clone(),
        created_at: article.created_at,
        votes: article.votes,
        article_img_url: article.article_img_url.clone(),
        comment_count,
    }
}

/// In-memory [`ArticleRepository`].
#[derive(Clone)]
pub struct InMemoryArticleRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryArticleRepository {
    pub fn new(store: &Arc<InMemoryStore>) -> Self {
        Self {
            store: Arc::clone(store),
        }
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list(
        &self,
        sort: SortColumn,
        order: SortOrder,
        filter: ArticleFilter,
    ) -> Result<Vec<ArticleSummary>, ArticleRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        let mut rows: Vec<(Article, i64)> = state
            .articles
            .iter()
            .filter(|a| filter.topic.as_deref().is_none_or(|t| a.topic == t))
            .filter(|a| filter.author.as_deref().is_none_or(|u| a.author == u))
            .map(|a| (a.clone(), count_comments(&state, a.article_id)))
            .collect();
        // Stable sort keeps insertion order for ties, like the unadorned
        // ORDER BY in the SQL adapter.
        rows.sort_by(|a, b| {
            let ordering = compare_on(sort, a, b);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        Ok(rows
            .iter()
            .map(|(article, count)| summarize(article, *count))
            .collect())
    }

    async fn find_by_id(
        &self,
        article_id: i64,
    ) -> Result<Option<ArticleDetail>, ArticleRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state
            .articles
            .iter()
            .find(|a| a.article_id == article_id)
            .map(|a| ArticleDetail {
                article_id: a.article_id,
                title: a.title.clone(),
                topic: a.topic.clone(),
                author: a.author.clone(),
                body: a.body.clone(),
                created_at: a.created_at,
                votes: a.votes,
                article_img_url: a.article_img_url.clone(),
                comment_count: count_comments(&state, article_id),
            }))
    }

    async fn exists(&self, article_id: i64) -> Result<bool, ArticleRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state.articles.iter().any(|a| a.article_id == article_id))
    }

    async fn increment_votes(
        &self,
        article_id: i64,
        delta: i32,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut state = self.store.state.lock().expect("store lock");
        Ok(state
            .articles
            .iter_mut()
            .find(|a| a.article_id == article_id)
            .map(|a| {
                a.votes += delta;
                a.clone()
            }))
    }

    async fn insert(&self, article: NewArticle) -> Result<Article, ArticleRepositoryError> {
        let mut state = self.store.state.lock().expect("store lock");
        let topic_known = state.topics.iter().any(|t| t.slug == article.topic());
        let author_known = state.users.iter().any(|u| u.username == article.author());
        if !topic_known || !author_known {
            return Err(ArticleRepositoryError::foreign_key(
                "insert or update on table \"articles\" violates foreign key constraint",
            ));
        }

        let row = Article {
            article_id: state.next_article_id,
            title: article.title().to_owned(),
            topic: article.topic().to_owned(),
            author: article.author().to_owned(),
            body: article.body().to_owned(),
            created_at: Utc::now(),
            votes: 0,
            article_img_url: article
                .article_img_url()
                .unwrap_or(DEFAULT_ARTICLE_IMG_URL)
                .to_owned(),
        };
        state.next_article_id += 1;
        state.articles.push(row.clone());
        Ok(row)
    }
}

/// In-memory [`CommentRepository`].
#[derive(Clone)]
pub struct InMemoryCommentRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryCommentRepository {
    pub fn new(store: &Arc<InMemoryStore>) -> Self {
        Self {
            store: Arc::clone(store),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_article(
        &self,
        article_id: i64,
        window: Option<PageWindow>,
    ) -> Result<Paginated<Comment>, CommentRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        let mut rows: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total_count = rows.len() as i64;

        let items = match window {
            None => rows,
            Some(window) => {
                let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
                let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
                rows.into_iter().skip(offset).take(limit).collect()
            }
        };
        Ok(Paginated { items, total_count })
    }

    async fn find_by_id(
        &self,
        comment_id: i64,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state
            .comments
            .iter()
            .find(|c| c.comment_id == comment_id)
            .cloned())
    }

    async fn exists(&self, comment_id: i64) -> Result<bool, CommentRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state.comments.iter().any(|c| c.comment_id == comment_id))
    }

    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut state = self.store.state.lock().expect("store lock");
        let article_known = state
            .articles
            .iter()
            .any(|a| a.article_id == comment.article_id);
        let author_known = state.users.iter().any(|u| u.username == comment.author);
        if !article_known || !author_known {
            return Err(CommentRepositoryError::foreign_key(
                "insert or update on table \"comments\" violates foreign key constraint",
            ));
        }

        let row = Comment {
            comment_id: state.next_comment_id,
            article_id: comment.article_id,
            author: comment.author,
            body: comment.body,
            created_at: Utc::now(),
            votes: 0,
        };
        state.next_comment_id += 1;
        state.comments.push(row.clone());
        Ok(row)
    }

    async fn increment_votes(
        &self,
        comment_id: i64,
        delta: i32,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut state = self.store.state.lock().expect("store lock");
        Ok(state
            .comments
            .iter_mut()
            .find(|c| c.comment_id == comment_id)
            .map(|c| {
                c.votes += delta;
                c.clone()
            }))
    }

    async fn delete(&self, comment_id: i64) -> Result<bool, CommentRepositoryError> {
        let mut state = self.store.state.lock().expect("store lock");
        let before = state.comments.len();
        state.comments.retain(|c| c.comment_id != comment_id);
        Ok(state.comments.len() < before)
    }
}

/// In-memory [`TopicRepository`].
#[derive(Clone)]
pub struct InMemoryTopicRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryTopicRepository {
    pub fn new(store: &Arc<InMemoryStore>) -> Self {
        Self {
            store: Arc::clone(store),
        }
    }
}

#[async_trait]
impl TopicRepository for InMemoryTopicRepository {
    async fn list(&self) -> Result<Vec<Topic>, TopicRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state.topics.clone())
    }

    async fn exists(&self, slug: &str) -> Result<bool, TopicRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state.topics.iter().any(|t| t.slug == slug))
    }

    async fn insert(&self, topic: NewTopic) -> Result<Topic, TopicRepositoryError> {
        let mut state = self.store.state.lock().expect("store lock");
        if state.topics.iter().any(|t| t.slug == topic.slug()) {
            return Err(TopicRepositoryError::query(
                "duplicate key value violates unique constraint \"topics_pkey\"",
            ));
        }
        let row = Topic {
            slug: topic.slug().to_owned(),
            description: topic.description().to_owned(),
        };
        state.topics.push(row.clone());
        Ok(row)
    }
}

/// In-memory [`UserRepository`].
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: &Arc<InMemoryStore>) -> Self {
        Self {
            store: Arc::clone(store),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state.users.clone())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists(&self, username: &str) -> Result<bool, UserRepositoryError> {
        let state = self.store.state.lock().expect("store lock");
        Ok(state.users.iter().any(|u| u.username == username))
    }
}

/// Build a [`TopicsService`] over the store.
pub fn topics_service(store: &Arc<InMemoryStore>) -> TopicsService {
    TopicsService::new(Arc::new(InMemoryTopicRepository::new(store)))
}

/// Build a [`UsersService`] over the store.
pub fn users_service(store: &Arc<InMemoryStore>) -> UsersService {
    UsersService::new(Arc::new(InMemoryUserRepository::new(store)))
}

/// Build an [`ArticlesService`] over the store.
pub fn articles_service(store: &Arc<InMemoryStore>) -> ArticlesService {
    ArticlesService::new(
        Arc::new(InMemoryArticleRepository::new(store)),
        Arc::new(InMemoryTopicRepository::new(store)),
        Arc::new(InMemoryUserRepository::new(store)),
    )
}

/// Build a [`CommentsService`] over the store.
pub fn comments_service(store: &Arc<InMemoryStore>) -> CommentsService {
    CommentsService::new(
        Arc::new(InMemoryCommentRepository::new(store)),
        Arc::new(InMemoryArticleRepository::new(store)),
        Arc::new(InMemoryUserRepository::new(store)),
    )
}

/// Build the full HTTP handler state over the store.
pub fn http_state(store: &Arc<InMemoryStore>) -> HttpState {
    HttpState {
        topics: topics_service(store),
        articles: articles_service(store),
        comments: comments_service(store),
        users: users_service(store),
    }
}

/// The handler state over the seeded reference dataset.
pub fn seeded_http_state() -> HttpState {
    http_state(&InMemoryStore::seeded())
}
