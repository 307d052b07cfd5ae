mod support;

use domain::{ComponentCategory, DomainError, ListingStatus, NewListing};
use support::fixture;

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let fx = fixture().await;

    let err = fx.service.create_user("alice", None).await.unwrap_err();
    assert_eq!(err, DomainError::UserExists("alice".to_string()));

    let err = fx.service.create_user("has space", None).await.unwrap_err();
    assert!(err.is_validation_error());
}

#[tokio::test]
async fn test_review_rules() {
    let fx = fixture().await;
    let gpu = fx.part(ComponentCategory::Gpu, "GeForce RTX 3060").await;

    let review = fx
        .service
        .post_review("alice", gpu, 4, "Quiet and cool")
        .await
        .unwrap();
    assert_eq!(review.rating.stars(), 4);
    assert_eq!(review.author.as_deref(), Some("alice"));

    let err = fx
        .service
        .post_review("alice", gpu, 5, "Changed my mind")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateReview { .. }));

    let err = fx.service.post_review("alice", gpu, 6, "Too good").await.unwrap_err();
    assert_eq!(err, DomainError::InvalidRating(6));

    let err = fx.service.post_review("nobody", gpu, 3, "Hmm").await.unwrap_err();
    assert_eq!(err, DomainError::UserNotFound("nobody".to_string()));
}

#[tokio::test]
async fn test_reviews_newest_first_with_average() {
    let fx = fixture().await;
    fx.service.create_user("bob", None).await.unwrap();
    let cpu = fx.part(ComponentCategory::Cpu, "Ryzen 5 5600X").await;

    fx.service.post_review("alice", cpu, 5, "Great").await.unwrap();
    fx.service.post_review("bob", cpu, 2, "Runs hot").await.unwrap();

    let summary = fx.service.component_reviews(cpu).await.unwrap();
    let authors: Vec<_> = summary.reviews.iter().map(|r| r.author_label()).collect();
    assert_eq!(authors, vec!["bob", "alice"]);
    assert_eq!(summary.average_rating(), Some(3.5));
}

#[tokio::test]
async fn test_delete_user_cascades_and_anonymises_reviews() {
    let fx = fixture().await;
    fx.service.create_user("bob", None).await.unwrap();
    let cpu = fx.part(ComponentCategory::Cpu, "Core i9-13900K").await;

    let build = fx.new_build("bob").await;
    fx.service.add_component("bob", build, cpu).await.unwrap();
    fx.service.wishlist_add("bob", cpu).await.unwrap();
    fx.service.post_review("bob", cpu, 3, "Fine").await.unwrap();
    let listing = fx
        .service
        .post_listing(NewListing {
            seller: "bob".to_string(),
            title: "Spare PSU".to_string(),
            description: "Barely used".to_string(),
        })
        .await
        .unwrap();

    fx.service.delete_user("bob").await.unwrap();

    let err = fx.service.build_summary("bob", build).await.unwrap_err();
    assert_eq!(err, DomainError::BuildNotFound(build));

    let err = fx.service.listing(listing.id).await.unwrap_err();
    assert_eq!(err, DomainError::ListingNotFound(listing.id));

    let reviews = fx.service.component_reviews(cpu).await.unwrap().reviews;
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].author, None);
    assert_eq!(reviews[0].author_label(), "Deleted User");

    let err = fx.service.delete_user("bob").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_wishlist_is_idempotent() {
    let fx = fixture().await;
    let case = fx.part(ComponentCategory::Case, "NR200P").await;

    assert!(fx.service.wishlist_add("alice", case).await.unwrap());
    assert!(!fx.service.wishlist_add("alice", case).await.unwrap());

    let items = fx.service.wishlist("alice").await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].component.name, "NR200P");

    assert!(fx.service.wishlist_remove("alice", case).await.unwrap());
    assert!(!fx.service.wishlist_remove("alice", case).await.unwrap());
    assert!(fx.service.wishlist("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_marketplace_flow() {
    let fx = fixture().await;
    fx.service.create_user("bob", None).await.unwrap();

    let listing = fx
        .service
        .post_listing(NewListing {
            seller: "alice".to_string(),
            title: "RTX 3060, boxed".to_string(),
            description: "Used for a year".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(listing.status, ListingStatus::Available);

    fx.service
        .comment("bob", listing.id, "Still available?")
        .await
        .unwrap();
    fx.service.comment("alice", listing.id, "Yes").await.unwrap();

    let detail = fx.service.listing(listing.id).await.unwrap();
    let thread: Vec<_> = detail
        .comments
        .iter()
        .map(|c| (c.author.as_str(), c.text.as_str()))
        .collect();
    assert_eq!(thread, vec![("bob", "Still available?"), ("alice", "Yes")]);

    let err = fx.service.mark_sold("bob", listing.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotOwner { .. }));

    let sold = fx.service.mark_sold("alice", listing.id).await.unwrap();
    assert_eq!(sold.status, ListingStatus::Sold);
    assert!(fx.service.listings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_title_validated() {
    let fx = fixture().await;

    let err = fx
        .service
        .post_listing(NewListing {
            seller: "alice".to_string(),
            title: "  ".to_string(),
            description: String::new(),
        })
        .await
        .unwrap_err();
    assert!(err.is_validation_error());
}
