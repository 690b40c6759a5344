use crate::server::{
    Result, ServerError, ServerRouter,
    extract::{Json, Query},
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use folio_common::model::{
    Id,
    post::{DeleteResult, Post, PostFields, PostMarker},
    query::ListOptions,
};
use folio_db::service::PostService;
use serde::Deserialize;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(create_post)
        .typed_get(list_posts)
        .typed_get(list_posts_by_author)
        .typed_get(list_posts_by_tag)
        .typed_get(get_post)
        .typed_patch(update_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/author/{author}", rejection(ServerError))]
struct PostsByAuthorPath {
    author: String,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/tag/{tag}", rejection(ServerError))]
struct PostsByTagPath {
    tag: String,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: Id<PostMarker>,
}

async fn create_post(
    PostsPath(): PostsPath,
    State(posts): State<PostService>,
    Json(fields): Json<PostFields>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = posts.create_post(fields).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

async fn list_posts(
    PostsPath(): PostsPath,
    State(posts): State<PostService>,
    Query(options): Query<ListOptions>,
) -> Result<Json<Vec<Post>>> {
    let posts = posts.list_all_posts(options).await?;

    Ok(Json(posts))
}

async fn list_posts_by_author(
    PostsByAuthorPath { author }: PostsByAuthorPath,
    State(posts): State<PostService>,
    Query(options): Query<ListOptions>,
) -> Result<Json<Vec<Post>>> {
    let posts = posts.list_posts_by_author(author, options).await?;

    Ok(Json(posts))
}

async fn list_posts_by_tag(
    PostsByTagPath { tag }: PostsByTagPath,
    State(posts): State<PostService>,
    Query(options): Query<ListOptions>,
) -> Result<Json<Vec<Post>>> {
    let posts = posts.list_posts_by_tag(tag, options).await?;

    Ok(Json(posts))
}

async fn get_post(
    PostPath { id }: PostPath,
    State(posts): State<PostService>,
) -> Result<Json<Post>> {
    let post = posts
        .get_post_by_id(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn update_post(
    PostPath { id }: PostPath,
    State(posts): State<PostService>,
    Json(fields): Json<PostFields>,
) -> Result<Json<Post>> {
    let post = posts
        .update_post(id, fields)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn delete_post(
    PostPath { id }: PostPath,
    State(posts): State<PostService>,
) -> Result<Json<DeleteResult>> {
    let result = posts.delete_post(id).await?;

    Ok(Json(result))
}
