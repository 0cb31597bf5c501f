#[cfg(test)]
mod tests {
    use crate::database::entity::{comment, post, user};
    use crate::database::postgres_repo::{
        PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
        contains_pattern, mask_email,
    };
    use quill_core::domain::{Post, PostFilter, PostStatus, User};
    use quill_core::error::RepoError;
    use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: uuid::Uuid, author_id: uuid::Uuid, status: post::Status) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            author_id,
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            tags: vec!["Tech".to_owned(), "MERN".to_owned()],
            status,
            views: 0,
            comment_count: 3,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn statements_sql(db: sea_orm::DatabaseConnection) -> Vec<String> {
        db.into_transaction_log()
            .iter()
            .flat_map(|tx| tx.statements().iter().map(|s| s.sql.clone()).collect::<Vec<_>>())
            .collect()
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(
                post_id,
                author_id,
                post::Status::Published,
            )]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.author_id, author_id);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.tags, vec!["Tech", "MERN"]);
        assert_eq!(post.comment_count, 3);
    }

    #[tokio::test]
    async fn test_find_published_applies_search_and_tag() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(
                uuid::Uuid::new_v4(),
                uuid::Uuid::new_v4(),
                post::Status::Published,
            )]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let filter = PostFilter::new(Some("rust".into()), Some("Tech".into()));

        let posts = repo.find_published(&filter).await.unwrap();
        assert_eq!(posts.len(), 1);

        let sql = statements_sql(repo.db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains(r#""posts"."status" = "#));
        assert!(sql[0].contains("ILIKE"));
        assert!(sql[0].contains("unnest"));
        assert!(sql[0].contains("ANY"));
        assert!(sql[0].contains(r#"ORDER BY "posts"."created_at" DESC"#));
    }

    #[tokio::test]
    async fn test_find_published_without_filter_only_checks_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let posts = repo.find_published(&PostFilter::default()).await.unwrap();
        assert!(posts.is_empty());

        let sql = statements_sql(repo.db);
        assert!(!sql[0].contains("ILIKE"));
        assert!(!sql[0].contains("ANY"));
    }

    #[tokio::test]
    async fn test_insert_user_returns_stored_row() {
        let now = chrono::Utc::now();
        let user = User::new("ada".into(), "ada@example.com".into(), "$argon2id$hash".into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user.id,
                username: "ada".to_owned(),
                email: "ada@example.com".to_owned(),
                password_hash: "$argon2id$hash".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let stored = repo.insert(user.clone()).await.unwrap();

        assert_eq!(stored.id, user.id);
        assert_eq!(stored.username, "ada");
    }

    #[tokio::test]
    async fn test_find_user_by_ids() {
        let now = chrono::Utc::now();
        let id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id,
                username: "ada".to_owned(),
                email: "ada@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let users = repo.find_by_ids(&[id, uuid::Uuid::new_v4()]).await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "ada");
        assert!(statements_sql(repo.db)[0].contains(" IN ("));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, _>::delete(&repo, uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_content_leaves_counters_alone() {
        let id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(id, author_id, post::Status::Published)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let mut edited: Post = post_model(id, author_id, post::Status::Draft).into();
        edited.title = "Edited".to_owned();
        edited.comment_count = 0;

        let stored = repo.update_content(edited).await.unwrap();
        assert_eq!(stored.comment_count, 3);

        let sql = statements_sql(repo.db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with("UPDATE"));
        let set_clause = sql[0].split("RETURNING").next().unwrap();
        assert!(set_clause.contains(r#""title" = "#));
        assert!(!set_clause.contains("comment_count"));
        assert!(!set_clause.contains("views"));
        assert!(!set_clause.contains("author_id"));
    }

    #[tokio::test]
    async fn test_increment_comment_count_is_a_single_update() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        repo.increment_comment_count(uuid::Uuid::new_v4())
            .await
            .unwrap();

        let sql = statements_sql(repo.db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with("UPDATE"));
        assert!(sql[0].contains(r#""comment_count" = "comment_count" + "#));
    }

    #[tokio::test]
    async fn test_comments_for_post_are_mapped() {
        let now = chrono::Utc::now();
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![comment::Model {
                id: uuid::Uuid::new_v4(),
                post_id,
                author_id: uuid::Uuid::new_v4(),
                content: "Nice post".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);
        let comments = repo.find_by_post(post_id).await.unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].post_id, post_id);
        assert_eq!(comments[0].content, "Nice post");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("ada@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("no-at-sign"), "***");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("100%_done"), "%100\\%\\_done%");
    }
}
