use crate::{
    record::PostRecord,
    store::{PostStore, Result},
};
use async_trait::async_trait;
use folio_common::model::{
    Id,
    post::{NewPost, Post, PostMarker, PostTitle, PostUpdate},
    query::{ListOptions, PostFilter, SortField, SortOrder},
};
use sqlx::{PgPool, Postgres, QueryBuilder, postgres::PgPoolOptions, query, query_as};
use tracing::debug;

/// Postgres-backed [`PostStore`].
#[derive(Clone, Debug)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Database migrations applied");

        Ok(())
    }
}

#[async_trait]
impl PostStore for DbClient {
    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let post_id = Id::<PostMarker>::generate();

        let record = query_as::<_, PostRecord>(
            "
            INSERT INTO posts.posts (post_id, title, author, contents, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                post_id, title, author, contents, tags, created_at, updated_at
            ",
        )
        .bind(post_id.uuid())
        .bind(post.title.into_inner())
        .bind(post.author)
        .bind(post.contents)
        .bind(post.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(Post::try_from(record)?)
    }

    async fn find_posts(&self, filter: PostFilter, options: ListOptions) -> Result<Vec<Post>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "
            SELECT
                post_id, title, author, contents, tags, created_at, updated_at
            FROM
                posts.posts
            ",
        );

        push_filter(&mut builder, filter);
        builder.push(order_by_clause(options));

        let records = builder
            .build_query_as::<PostRecord>()
            .fetch_all(&self.pool)
            .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;
        Ok(posts)
    }

    async fn find_post(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT
                post_id, title, author, contents, tags, created_at, updated_at
            FROM
                posts.posts
            WHERE
                post_id = $1
            ",
        )
        .bind(id.uuid())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    async fn update_post(&self, id: Id<PostMarker>, update: PostUpdate) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            UPDATE posts.posts
            SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                contents = COALESCE($4, contents),
                tags = COALESCE($5, tags),
                updated_at = GREATEST(updated_at, now() AT TIME ZONE 'UTC')
            WHERE
                post_id = $1
            RETURNING
                post_id, title, author, contents, tags, created_at, updated_at
            ",
        )
        .bind(id.uuid())
        .bind(update.title.map(PostTitle::into_inner))
        .bind(update.author)
        .bind(update.contents)
        .bind(update.tags)
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    async fn delete_post(&self, id: Id<PostMarker>) -> Result<u64> {
        let result = query("DELETE FROM posts.posts WHERE post_id = $1")
            .bind(id.uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Tag membership is written as array containment so `posts_tags_idx` can serve it.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: PostFilter) {
    match filter {
        PostFilter::All => {}
        PostFilter::Author(author) => {
            builder.push(" WHERE author = ").push_bind(author);
        }
        PostFilter::Tag(tag) => {
            builder.push(" WHERE tags @> ARRAY[").push_bind(tag).push("]");
        }
    }
}

/// Text columns compare bytewise, matching [`crate::memory::MemoryStore`] whatever
/// the database locale.
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Title => "title COLLATE \"C\"",
        SortField::Author => "author COLLATE \"C\"",
        SortField::Contents => "contents COLLATE \"C\"",
        SortField::Id => "post_id",
    }
}

/// Missing values sort lowest, and ties fall back to the id in the same direction.
fn order_by_clause(options: ListOptions) -> String {
    let direction = match options.sort_order {
        SortOrder::Ascending => "ASC NULLS FIRST",
        SortOrder::Descending => "DESC NULLS LAST",
    };
    let column = sort_column(options.sort_by);

    if options.sort_by == SortField::Id {
        format!(" ORDER BY {column} {direction}")
    } else {
        format!(" ORDER BY {column} {direction}, post_id {direction}")
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{DbClient, order_by_clause, push_filter};
    use crate::service::PostService;
    use folio_common::model::{
        Id,
        post::{Post, PostFields},
        query::{ListOptions, PostFilter, SortField, SortOrder},
    };
    use sqlx::{PgPool, Postgres, QueryBuilder};
    use std::{sync::Arc, time::Duration};

    #[test]
    fn default_order() {
        assert_eq!(
            order_by_clause(ListOptions::default()),
            " ORDER BY created_at DESC NULLS LAST, post_id DESC NULLS LAST"
        );
    }

    #[test]
    fn explicit_order() {
        let options = ListOptions {
            sort_by: SortField::UpdatedAt,
            sort_order: SortOrder::Ascending,
        };
        assert_eq!(
            order_by_clause(options),
            " ORDER BY updated_at ASC NULLS FIRST, post_id ASC NULLS FIRST"
        );

        let options = ListOptions {
            sort_by: SortField::Id,
            sort_order: SortOrder::Ascending,
        };
        assert_eq!(order_by_clause(options), " ORDER BY post_id ASC NULLS FIRST");
    }

    #[test]
    fn text_columns_sort_bytewise() {
        let options = ListOptions {
            sort_by: SortField::Author,
            sort_order: SortOrder::Descending,
        };
        assert_eq!(
            order_by_clause(options),
            " ORDER BY author COLLATE \"C\" DESC NULLS LAST, post_id DESC NULLS LAST"
        );

        let options = ListOptions {
            sort_by: SortField::Title,
            sort_order: SortOrder::Ascending,
        };
        assert!(order_by_clause(options).starts_with(" ORDER BY title COLLATE \"C\" ASC"));
    }

    #[test]
    fn filter_clauses() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM posts.posts");
        push_filter(&mut builder, PostFilter::Tag("react".into()));
        assert_eq!(builder.sql(), "SELECT * FROM posts.posts WHERE tags @> ARRAY[$1]");

        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM posts.posts");
        push_filter(&mut builder, PostFilter::Author("Daniel Bugl".into()));
        assert_eq!(builder.sql(), "SELECT * FROM posts.posts WHERE author = $1");

        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM posts.posts");
        push_filter(&mut builder, PostFilter::All);
        assert_eq!(builder.sql(), "SELECT * FROM posts.posts");
    }

    fn fields(title: &str, author: Option<&str>, tags: &[&str]) -> PostFields {
        PostFields {
            title: Some(title.into()),
            author: author.map(Into::into),
            contents: None,
            tags: Some(tags.iter().map(|&tag| tag.into()).collect()),
        }
    }

    async fn sample_posts(service: &PostService) -> Vec<Post> {
        let samples = [
            fields("Learning Redux", Some("Daniel Bugl"), &["redux"]),
            fields("Learn React Hooks", Some("Daniel Bugl"), &["react"]),
            fields("Full Stack React Projects", Some("Daniel Bugl"), &["react", "nodejs"]),
            fields("Guide to TypeScript", None, &[]),
        ];

        let mut created = Vec::new();
        for sample in samples {
            created.push(service.create_post(sample).await.unwrap());
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        created
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|post| post.title.get()).collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server in DATABASE_URL"]
    async fn postgres_listing(pool: PgPool) {
        let service = PostService::new(Arc::new(DbClient::new(pool)));
        let created = sample_posts(&service).await;

        let posts = service.list_all_posts(ListOptions::default()).await.unwrap();
        assert_eq!(
            titles(&posts),
            [
                "Guide to TypeScript",
                "Full Stack React Projects",
                "Learn React Hooks",
                "Learning Redux",
            ]
        );
        assert_eq!(posts[3], created[0]);

        service
            .update_post(created[0].id, PostFields::default())
            .await
            .unwrap()
            .unwrap();
        let options = ListOptions {
            sort_by: SortField::UpdatedAt,
            sort_order: SortOrder::Ascending,
        };
        let posts = service.list_all_posts(options).await.unwrap();
        assert!(posts.windows(2).all(|pair| pair[0].updated_at <= pair[1].updated_at));
        assert_eq!(posts.last().unwrap().id, created[0].id);

        let options = ListOptions {
            sort_by: SortField::Author,
            sort_order: SortOrder::Ascending,
        };
        let posts = service.list_all_posts(options).await.unwrap();
        assert_eq!(posts[0].author, None);

        let posts = service
            .list_posts_by_author("Daniel Bugl".into(), ListOptions::default())
            .await
            .unwrap();
        assert_eq!(posts.len(), 3);
        let posts = service
            .list_posts_by_author("daniel bugl".into(), ListOptions::default())
            .await
            .unwrap();
        assert!(posts.is_empty());

        let options = ListOptions {
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Ascending,
        };
        let posts = service.list_posts_by_tag("react".into(), options).await.unwrap();
        assert_eq!(titles(&posts), ["Learn React Hooks", "Full Stack React Projects"]);
        let posts = service
            .list_posts_by_tag("nodejs".into(), ListOptions::default())
            .await
            .unwrap();
        assert_eq!(titles(&posts), ["Full Stack React Projects"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server in DATABASE_URL"]
    async fn postgres_mutations(pool: PgPool) {
        let service = PostService::new(Arc::new(DbClient::new(pool)));
        let created = sample_posts(&service).await;
        let original = &created[1];

        assert!(original.created_at <= original.updated_at);
        assert_eq!(service.get_post_by_id(original.id).await.unwrap().as_ref(), Some(original));
        assert_eq!(service.get_post_by_id(Id::generate()).await.unwrap(), None);

        let updated = service
            .update_post(
                original.id,
                PostFields {
                    contents: Some("Now with hooks".into()),
                    ..PostFields::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.author, original.author);
        assert_eq!(updated.tags, original.tags);
        assert_eq!(updated.contents.as_deref(), Some("Now with hooks"));
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);

        let missing = service
            .update_post(Id::generate(), fields("Ghost", None, &[]))
            .await
            .unwrap();
        assert_eq!(missing, None);
        let posts = service.list_all_posts(ListOptions::default()).await.unwrap();
        assert_eq!(posts.len(), created.len());

        assert_eq!(service.delete_post(Id::generate()).await.unwrap().deleted_count, 0);
        assert_eq!(service.delete_post(original.id).await.unwrap().deleted_count, 1);
        assert_eq!(service.get_post_by_id(original.id).await.unwrap(), None);
        assert_eq!(service.delete_post(original.id).await.unwrap().deleted_count, 0);
    }
}
