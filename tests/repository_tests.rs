use storefront_api::{
    models::{Product, ProductInput, Role, RoleInput},
    repository::{MemoryRepository, Repository, RepositoryError},
};
use tokio::test;

fn input(name: &str) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: "BT".to_string(),
        price: 59.99,
        stock: 150,
        category: "Electronic".to_string(),
        image_url: "http://x/y.jpg".to_string(),
    }
}

#[test]
async fn create_then_get_returns_same_record() {
    let repo = MemoryRepository::<Product>::new();
    let created = repo.create(input("Headphones")).await.unwrap();

    let fetched = repo.get_by_id(created.id.as_str()).await.unwrap();
    assert_eq!(fetched, Some(created));
}

#[test]
async fn created_ids_are_distinct() {
    let repo = MemoryRepository::<Role>::new();
    let a = repo.create(RoleInput { name: "a".into() }).await.unwrap();
    let b = repo.create(RoleInput { name: "b".into() }).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
async fn list_all_keeps_insertion_order_across_updates() {
    let repo = MemoryRepository::<Product>::new();
    let first = repo.create(input("first")).await.unwrap();
    let second = repo.create(input("second")).await.unwrap();

    repo.update(first.id.as_str(), input("first, renamed"))
        .await
        .unwrap()
        .unwrap();

    let names: Vec<String> = repo
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["first, renamed", "second"]);
    assert_eq!(repo.list_all().await.unwrap()[1], second);
}

#[test]
async fn ids_are_matched_case_insensitively() {
    let repo = MemoryRepository::<Role>::new();
    let role = repo.create(RoleInput { name: "admin".into() }).await.unwrap();

    let upper = role.id.as_str().to_ascii_uppercase();
    assert_eq!(repo.get_by_id(&upper).await.unwrap(), Some(role));
}

#[test]
async fn unknown_ids_yield_none_and_false() {
    let repo = MemoryRepository::<Product>::new();
    let unknown = "62f7a9b3c4d1e01234567890";

    assert!(repo.get_by_id(unknown).await.unwrap().is_none());
    assert!(repo.update(unknown, input("x")).await.unwrap().is_none());
    assert!(!repo.delete(unknown).await.unwrap());
}

#[test]
async fn delete_removes_only_the_target() {
    let repo = MemoryRepository::<Product>::new();
    let keep = repo.create(input("keep")).await.unwrap();
    let gone = repo.create(input("drop")).await.unwrap();

    assert!(repo.delete(gone.id.as_str()).await.unwrap());
    assert_eq!(repo.list_all().await.unwrap(), vec![keep]);
    assert!(!repo.delete(gone.id.as_str()).await.unwrap());
}

#[test]
async fn malformed_ids_are_rejected_before_lookup() {
    let repo = MemoryRepository::<Product>::new();
    for bad in ["", "abc", "62f7a9b3c4d1e0123456789g", "62f7a9b3c4d1e012345678901"] {
        assert!(matches!(
            repo.get_by_id(bad).await,
            Err(RepositoryError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            repo.update(bad, input("x")).await,
            Err(RepositoryError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            repo.delete(bad).await,
            Err(RepositoryError::InvalidIdentifier(_))
        ));
    }
}

#[test]
async fn seeded_records_are_listed() {
    let seed = MemoryRepository::<Role>::new();
    let admin = seed.create(RoleInput { name: "admin".into() }).await.unwrap();

    let repo = MemoryRepository::with_records(vec![admin.clone()]);
    assert_eq!(repo.list_all().await.unwrap(), vec![admin]);
}

#[test]
async fn role_names_are_unique_in_memory() {
    let repo = MemoryRepository::<Role>::new();
    let admin = repo.create(RoleInput { name: "admin".into() }).await.unwrap();
    let customer = repo.create(RoleInput { name: "customer".into() }).await.unwrap();

    let err = repo.create(RoleInput { name: "admin".into() }).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(ref msg) if msg == "Role with this name already exists"));

    let err = repo
        .update(customer.id.as_str(), RoleInput { name: "admin".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // Rewriting a role with its own name is allowed.
    let same = repo
        .update(admin.id.as_str(), RoleInput { name: "admin".into() })
        .await
        .unwrap();
    assert_eq!(same, Some(admin));
    assert_eq!(repo.list_all().await.unwrap().len(), 2);
}

#[test]
async fn unknown_role_id_wins_over_name_clash() {
    let repo = MemoryRepository::<Role>::new();
    repo.create(RoleInput { name: "admin".into() }).await.unwrap();

    let result = repo
        .update("62f7a9b3c4d1e01234567890", RoleInput { name: "admin".into() })
        .await
        .unwrap();
    assert!(result.is_none());
}

#[test]
async fn products_have_no_unique_fields() {
    let repo = MemoryRepository::<Product>::new();
    repo.create(input("same")).await.unwrap();
    repo.create(input("same")).await.unwrap();
    assert_eq!(repo.list_all().await.unwrap().len(), 2);
}
