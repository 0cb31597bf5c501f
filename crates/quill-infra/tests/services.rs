//! Service behaviour over the in-memory repositories and real auth primitives.

use std::sync::Arc;

use quill_core::DomainError;
use quill_core::domain::{Author, PostFilter, PostStatus};
use quill_core::ports::{PostRepository, TokenService, UserRepository};
use quill_core::services::{
    AuthService, CommentService, Credentials, NewComment, NewPost, NewUser, PostPatch, PostService,
};
use quill_infra::{
    Argon2PasswordService, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService,
};

struct Harness {
    auth: AuthService,
    posts: PostService,
    comments: CommentService,
    tokens: Arc<JwtTokenService>,
}

fn harness() -> Harness {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
    let comments = Arc::new(InMemoryCommentRepository::new());
    let passwords = Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    }));

    Harness {
        auth: AuthService::new(users.clone(), passwords, tokens.clone()),
        posts: PostService::new(posts.clone(), users.clone()),
        comments: CommentService::new(comments, posts, users),
        tokens,
    }
}

fn signup(username: &str, email: &str) -> NewUser {
    NewUser {
        username: Some(username.to_string()),
        email: Some(email.to_string()),
        password: Some("secret123".to_string()),
    }
}

async fn register(h: &Harness, username: &str) -> Author {
    let user = h
        .auth
        .register(signup(username, &format!("{username}@example.com")))
        .await
        .unwrap();
    Author::from(&user)
}

fn published(title: &str, tags: &str) -> NewPost {
    NewPost {
        title: Some(title.to_string()),
        content: Some(format!("{title} body")),
        tags: Some(tags.to_string()),
        status: Some("published".to_string()),
    }
}

#[tokio::test]
async fn test_register_then_login_issues_valid_token() {
    let h = harness();
    let user = h
        .auth
        .register(signup("ada", "Ada@Example.com"))
        .await
        .unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert_ne!(user.password_hash, "secret123");

    let (logged_in, token) = h
        .auth
        .authenticate(Credentials {
            email: Some("ada@example.com".to_string()),
            password: Some("secret123".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    let claims = h.tokens.validate_token(&token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.username, "ada");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_missing_fields() {
    let h = harness();
    h.auth.register(signup("ada", "ada@example.com")).await.unwrap();

    let err = h.auth.register(signup("other", "ada@example.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::DuplicateEmail));
    assert_eq!(err.to_string(), "User already exists");

    let err = h.auth.register(signup("ada", "new@example.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::DuplicateUsername));

    let err = h
        .auth
        .register(NewUser {
            username: Some("bob".to_string()),
            email: Some("bob@example.com".to_string()),
            password: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();
    h.auth.register(signup("ada", "ada@example.com")).await.unwrap();

    let wrong_password = h
        .auth
        .authenticate(Credentials {
            email: Some("ada@example.com".to_string()),
            password: Some("nope".to_string()),
        })
        .await
        .unwrap_err();
    let unknown_email = h
        .auth
        .authenticate(Credentials {
            email: Some("ghost@example.com".to_string()),
            password: Some("secret123".to_string()),
        })
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert!(matches!(unknown_email, DomainError::InvalidCredentials));
}

#[tokio::test]
async fn test_create_post_defaults_and_validation() {
    let h = harness();
    let ada = register(&h, "ada").await;

    let created = h
        .posts
        .create(
            &ada,
            NewPost {
                title: Some("  Hello  ".to_string()),
                content: Some("World".to_string()),
                tags: Some("Tech, ,MERN,".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.item.title, "Hello");
    assert_eq!(created.item.tags, vec!["Tech", "MERN"]);
    assert_eq!(created.item.status, PostStatus::Draft);
    assert_eq!(created.item.comment_count, 0);

    let err = h
        .posts
        .create(
            &ada,
            NewPost {
                title: Some("   ".to_string()),
                content: Some("x".to_string()),
                ..NewPost::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ref m) if m == "Title is required"));

    let err = h
        .posts
        .create(
            &ada,
            NewPost {
                status: Some("archived".to_string()),
                ..published("t", "")
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_list_filters_by_tag_and_search() {
    let h = harness();
    let ada = register(&h, "ada").await;

    h.posts.create(&ada, published("Rust tips", "Tech,Rust")).await.unwrap();
    h.posts.create(&ada, published("Cooking", "Food")).await.unwrap();
    h.posts
        .create(
            &ada,
            NewPost {
                status: Some("draft".to_string()),
                ..published("Secret draft", "Tech")
            },
        )
        .await
        .unwrap();

    let all = h.posts.list(&PostFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].item.title, "Cooking");
    assert_eq!(all[0].author.as_ref().unwrap().username, "ada");

    let tech = h
        .posts
        .list(&PostFilter::new(None, Some("Tech".to_string())))
        .await
        .unwrap();
    assert_eq!(tech.len(), 1);
    assert_eq!(tech[0].item.title, "Rust tips");

    let search = h
        .posts
        .list(&PostFilter::new(Some("COOK".to_string()), None))
        .await
        .unwrap();
    assert_eq!(search.len(), 1);

    let mine = h.posts.list_mine(&ada).await.unwrap();
    assert_eq!(mine.len(), 3);
}

#[tokio::test]
async fn test_update_and_delete_require_ownership() {
    let h = harness();
    let ada = register(&h, "ada").await;
    let bob = register(&h, "bob").await;

    let post = h.posts.create(&ada, published("Mine", "a")).await.unwrap();
    let id = post.item.id.to_string();

    let err = h
        .posts
        .update(
            &id,
            &bob,
            PostPatch {
                title: Some("Stolen".to_string()),
                ..PostPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User not authorized to update this post");

    let err = h.posts.delete(&id, &bob).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { action: "delete", .. }));

    let updated = h
        .posts
        .update(
            &id,
            &ada,
            PostPatch {
                title: Some(String::new()),
                content: Some("New body".to_string()),
                tags: Some("x,y".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.item.title, "Mine");
    assert_eq!(updated.item.content, "New body");
    assert_eq!(updated.item.tags, vec!["x", "y"]);
    assert!(updated.item.updated_at >= post.item.updated_at);

    h.posts.delete(&id, &ada).await.unwrap();
    assert!(matches!(
        h.posts.get(&id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_malformed_post_id_is_not_found() {
    let h = harness();
    let ada = register(&h, "ada").await;

    assert!(matches!(
        h.posts.get("not-an-id").await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        h.posts.delete("not-an-id", &ada).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_comments_bump_count_and_survive_post_deletion() {
    let h = harness();
    let ada = register(&h, "ada").await;
    let bob = register(&h, "bob").await;

    let post = h.posts.create(&ada, published("Talk", "t")).await.unwrap();
    let id = post.item.id.to_string();

    h.comments
        .create(
            &bob,
            NewComment {
                content: Some(" Nice post ".to_string()),
                post_id: Some(id.clone()),
            },
        )
        .await
        .unwrap();

    let fetched = h.posts.get(&id).await.unwrap();
    assert_eq!(fetched.item.comment_count, 1);

    let listed = h.comments.list_for_post(&id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].item.content, "Nice post");
    assert_eq!(listed[0].author.as_ref().unwrap().username, "bob");

    h.posts.delete(&id, &ada).await.unwrap();
    assert_eq!(h.comments.list_for_post(&id).await.unwrap().len(), 1);

    let err = h
        .comments
        .create(
            &bob,
            NewComment {
                content: Some("Too late".to_string()),
                post_id: Some(id),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Post not found");
}

#[tokio::test]
async fn test_comment_validation_and_unknown_post_listing() {
    let h = harness();
    let ada = register(&h, "ada").await;
    let post = h.posts.create(&ada, published("Talk", "t")).await.unwrap();

    let err = h
        .comments
        .create(
            &ada,
            NewComment {
                content: Some("   ".to_string()),
                post_id: Some(post.item.id.to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ref m) if m == "Comment content is required"));

    assert!(h.comments.list_for_post("garbage").await.unwrap().is_empty());
    assert!(
        h.comments
            .list_for_post(&uuid::Uuid::new_v4().to_string())
            .await
            .unwrap()
            .is_empty()
    );
}
