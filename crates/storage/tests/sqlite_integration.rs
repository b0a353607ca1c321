use storage::repository::{ClientStateRepository, Storage, StorageKey};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_round_trips_client_state() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_client_state?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get(StorageKey::Token).await.unwrap(), None);

    repo.set(StorageKey::Token, "session-1").await.unwrap();
    repo.set(StorageKey::ActiveTab, "review").await.unwrap();
    repo.set(StorageKey::Token, "session-2").await.unwrap();

    assert_eq!(
        repo.get(StorageKey::Token).await.unwrap().as_deref(),
        Some("session-2")
    );
    assert_eq!(
        repo.get(StorageKey::ActiveTab).await.unwrap().as_deref(),
        Some("review")
    );

    repo.remove(StorageKey::Token).await.unwrap();
    assert_eq!(repo.get(StorageKey::Token).await.unwrap(), None);
    assert_eq!(
        repo.get(StorageKey::ActiveTab).await.unwrap().as_deref(),
        Some("review")
    );
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set(StorageKey::DarkMode, "true").await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(
        repo.get(StorageKey::DarkMode).await.unwrap().as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn storage_sqlite_exposes_client_state() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .client_state
        .set(StorageKey::ActiveTab, "progress")
        .await
        .unwrap();
    assert_eq!(
        storage
            .client_state
            .get(StorageKey::ActiveTab)
            .await
            .unwrap()
            .as_deref(),
        Some("progress")
    );
}
