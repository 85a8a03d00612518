//! Server construction: state wiring and app assembly.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::doc;
use crate::domain::{ArticlesService, CommentsService, Error, TopicsService, UsersService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{articles, comments, endpoint_not_found, health, topics, users};
use crate::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselCommentRepository, DieselTopicRepository,
    DieselUserRepository,
};

/// Wire the Diesel repositories and domain services over one pool.
pub fn build_state(pool: &DbPool) -> HttpState {
    let article_repo = Arc::new(DieselArticleRepository::new(pool.clone()));
    let comment_repo = Arc::new(DieselCommentRepository::new(pool.clone()));
    let topic_repo = Arc::new(DieselTopicRepository::new(pool.clone()));
    let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));

    HttpState {
        topics: TopicsService::new(topic_repo.clone()),
        articles: ArticlesService::new(
            article_repo.clone(),
            topic_repo.clone(),
            user_repo.clone(),
        ),
        comments: CommentsService::new(comment_repo, article_repo, user_repo.clone()),
        users: UsersService::new(user_repo),
    }
}

/// Assemble the application: one route per domain operation, a typed 404
/// for everything else, and JSON deserialization failures mapped into the
/// standard error envelope.
pub fn build_app(
    state: HttpState,
    health_state: web::Data<health::HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| Error::invalid_field(err.to_string()).into());

    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config)
        .app_data(health_state)
        .service(doc::api_index)
        .service(
            web::scope("/api")
                .service(topics::get_topics)
                .service(topics::post_topic)
                .service(articles::get_articles)
                .service(articles::post_article)
                .service(articles::get_article_by_id)
                .service(articles::patch_article_votes)
                .service(comments::get_comments_for_article)
                .service(comments::post_comment)
                .service(comments::get_comment_by_id)
                .service(comments::patch_comment_votes)
                .service(comments::delete_comment)
                .service(users::get_users)
                .service(users::get_user_by_username),
        )
        .service(health::ready)
        .service(health::live)
        .default_service(web::route().to(endpoint_not_found))
}
