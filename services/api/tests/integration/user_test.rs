use restau_api::error::ApiError;
use restau_api::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeactivateUserUseCase, ListUsersUseCase, UpdateUserInput,
    UpdateUserUseCase,
};
use restau_auth_types::password::verify_password;
use restau_domain::user::UserRole;

use crate::helpers::MemoryStore;

#[tokio::test]
async fn should_create_employee_account() {
    let store = MemoryStore::new();

    let user = CreateUserUseCase {
        repo: store.users(),
    }
    .execute(CreateUserInput {
        name: "Paul Durand".to_owned(),
        address: "3 place du Marché".to_owned(),
        phone: "0700000000".to_owned(),
        email: "paul@restau.local".to_owned(),
        password: "cuisine".to_owned(),
        role: UserRole::Employe,
    })
    .await
    .unwrap();

    assert_eq!(user.role, UserRole::Employe);
    assert!(verify_password("cuisine", &user.password_hash));
}

#[tokio::test]
async fn should_hide_deactivated_users_unless_requested() {
    let store = MemoryStore::new();
    store.add_user("active@example.com", UserRole::Client);
    let leaving = store.add_user("leaving@example.com", UserRole::Client);

    DeactivateUserUseCase {
        repo: store.users(),
    }
    .execute(leaving.id)
    .await
    .unwrap();

    let uc = ListUsersUseCase {
        repo: store.users(),
    };
    assert_eq!(uc.execute(false).await.unwrap().len(), 1);
    assert_eq!(uc.execute(true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn should_return_user_not_found_when_deactivating_missing_user() {
    let store = MemoryStore::new();

    let result = DeactivateUserUseCase {
        repo: store.users(),
    }
    .execute(404)
    .await;

    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_rehash_password_on_update() {
    let store = MemoryStore::new();
    let user = store.add_user("alice@example.com", UserRole::Client);

    let updated = UpdateUserUseCase {
        repo: store.users(),
    }
    .execute(
        user.id,
        UpdateUserInput {
            password: Some("nouveau".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(verify_password("nouveau", &updated.password_hash));
    assert!(!verify_password("correct-horse", &updated.password_hash));
}

#[tokio::test]
async fn should_reject_email_change_onto_another_account() {
    let store = MemoryStore::new();
    let alice = store.add_user("alice@example.com", UserRole::Client);
    store.add_user("bob@example.com", UserRole::Client);

    let result = UpdateUserUseCase {
        repo: store.users(),
    }
    .execute(
        alice.id,
        UpdateUserInput {
            email: Some("BOB@example.com".to_owned()),
            ..Default::default()
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::EmailAlreadyExists)),
        "expected EmailAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_empty_user_update() {
    let store = MemoryStore::new();
    let alice = store.add_user("alice@example.com", UserRole::Client);

    let result = UpdateUserUseCase {
        repo: store.users(),
    }
    .execute(alice.id, UpdateUserInput::default())
    .await;

    assert!(
        matches!(result, Err(ApiError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}
