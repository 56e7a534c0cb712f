// src/application/controller_tests.rs
//
// Library controller: optimistic updates, id and progress rules, retry.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::application::controller::{LibraryController, LoadState, MediaInput};
    use crate::application::filter::CategoryFilter;
    use crate::db::{create_memory_pool, get_connection, initialize_database};
    use crate::domain::{DomainError, MediaCategory, MediaRecord, MediaStatus};
    use crate::error::AppError;
    use crate::integrations::remote::{MockRemoteStore, RemoteError};
    use crate::integrations::Enrichment;
    use crate::repositories::{LocalStore, SqliteLocalStore};
    use crate::services::{PersistenceGateway, StorageMode};

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn local_store() -> Arc<SqliteLocalStore> {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&get_connection(&pool).unwrap()).unwrap();
        Arc::new(SqliteLocalStore::new(pool))
    }

    async fn local_controller() -> (Arc<SqliteLocalStore>, LibraryController) {
        let local = local_store();
        let gateway = Arc::new(PersistenceGateway::local_only(local.clone()));
        let mut controller = LibraryController::new(gateway);
        controller.load().await.unwrap();
        (local, controller)
    }

    fn input(title: &str, total: Option<u32>) -> MediaInput {
        let mut input = MediaInput::new(title, MediaCategory::Anime);
        input.total_progress = total;
        input.rating = 7.5;
        input
    }

    fn seeded(id: &str, current: u32, total: Option<u32>) -> MediaRecord {
        MediaRecord {
            id: id.to_string(),
            title: format!("Seeded {}", id),
            category: MediaCategory::Manga,
            status: MediaStatus::Ongoing,
            current_progress: current,
            total_progress: total,
            rating: 6.0,
            cover_image_url: None,
            genres: None,
            description: None,
            external_link: None,
            last_modified_at: 4_102_444_800_000, // 2100-01-01, ahead of the clock
        }
    }

    // ========================================================================
    // LOADING
    // ========================================================================

    #[tokio::test]
    async fn test_load_seeds_collection() {
        let local = local_store();
        local.write_all(&[seeded("1", 0, None)]);
        let gateway = Arc::new(PersistenceGateway::local_only(local));

        let mut controller = LibraryController::new(gateway);
        assert_eq!(controller.load_state(), &LoadState::Loading);

        controller.load().await.unwrap();

        assert_eq!(controller.load_state(), &LoadState::Ready);
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn test_refused_list_loads_local_copy() {
        let local = local_store();
        local.write_all(&[seeded("1", 2, None)]);

        let mut remote = MockRemoteStore::new();
        remote.expect_list().times(1).returning(|| {
            Err(RemoteError::Rejected {
                status: 400,
                message: "bad request".to_string(),
            })
        });

        let gateway = Arc::new(PersistenceGateway::new(Arc::new(remote), local));
        let mut controller = LibraryController::new(gateway);

        controller.load().await.unwrap();
        assert_eq!(controller.load_state(), &LoadState::Ready);
        assert_eq!(controller.storage_mode(), StorageMode::LocalFallback);
        assert_eq!(controller.items().len(), 1);

        // Retrying re-reads the local store without touching the remote again.
        controller.load().await.unwrap();
        assert_eq!(controller.items().len(), 1);
    }

    // ========================================================================
    // ADD / EDIT
    // ========================================================================

    #[tokio::test]
    async fn test_add_prepends_and_persists() {
        let (local, mut controller) = local_controller().await;

        let first = controller.add_or_edit(input("Frieren", Some(28)), None).await.unwrap();
        let second = controller.add_or_edit(input("Dandadan", None), None).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.last_modified_at > first.last_modified_at);
        assert_eq!(controller.items()[0].id, second.id);
        assert_eq!(local.read_all(), controller.items().to_vec());
    }

    #[tokio::test]
    async fn test_edit_keeps_id_and_restamps() {
        let (local, mut controller) = local_controller().await;
        let created = controller.add_or_edit(input("Frieren", Some(28)), None).await.unwrap();

        let mut edit = MediaInput::from_record(&created);
        edit.status = MediaStatus::Completed;
        edit.current_progress = 28;
        let edited = controller.add_or_edit(edit, Some(created.id.as_str())).await.unwrap();

        assert_eq!(edited.id, created.id);
        assert!(edited.last_modified_at > created.last_modified_at);
        assert_eq!(controller.items().len(), 1);
        assert_eq!(local.read_all()[0].status, MediaStatus::Completed);
    }

    #[tokio::test]
    async fn test_edit_unknown_id_is_not_found() {
        let (_, mut controller) = local_controller().await;

        let result = controller.add_or_edit(input("Ghost", None), Some("missing")).await;

        assert!(matches!(result, Err(AppError::NotFound)));
        assert!(controller.items().is_empty());
    }

    #[tokio::test]
    async fn test_ids_stay_unique() {
        let (local, mut controller) = local_controller().await;

        let mut ids = Vec::new();
        for i in 0..10 {
            let record = controller
                .add_or_edit(input(&format!("Title {}", i), None), None)
                .await
                .unwrap();
            ids.push(record.id);
        }
        for id in ids.iter().take(3) {
            let edit = MediaInput::from_record(controller.get(id).unwrap());
            controller.add_or_edit(edit, Some(id.as_str())).await.unwrap();
        }

        let mut stored: Vec<String> = local.read_all().into_iter().map(|r| r.id).collect();
        stored.sort();
        stored.dedup();
        assert_eq!(stored.len(), 10);
        assert_eq!(controller.items().len(), 10);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rolled_back() {
        let (local, mut controller) = local_controller().await;

        let result = controller.add_or_edit(input("   ", None), None).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(controller.items().is_empty());
        assert!(local.read_all().is_empty());
    }

    #[tokio::test]
    async fn test_input_is_normalized() {
        let (_, mut controller) = local_controller().await;

        let mut form = input("  Pluto  ", Some(0));
        form.description = Some("   ".to_string());
        form.genres = Some(Vec::new());
        let record = controller.add_or_edit(form, None).await.unwrap();

        assert_eq!(record.title, "Pluto");
        assert_eq!(record.total_progress, None);
        assert_eq!(record.description, None);
        assert_eq!(record.genres, None);
    }

    #[test]
    fn test_apply_enrichment_fills_form() {
        let mut form = input("Cowboy Bebop", None);
        form.apply_enrichment(&Enrichment {
            genres: vec!["Action".to_string()],
            description: "Bounty hunters in space.".to_string(),
            total_episodes_or_chapters: Some(26),
        });

        assert_eq!(form.total_progress, Some(26));
        assert_eq!(form.genres, Some(vec!["Action".to_string()]));
        assert_eq!(form.description.as_deref(), Some("Bounty hunters in space."));
    }

    // ========================================================================
    // PROGRESS
    // ========================================================================

    #[tokio::test]
    async fn test_increment_adds_exactly_one() {
        let local = local_store();
        local.write_all(&[seeded("1", 4, Some(12))]);
        let mut controller = LibraryController::new(Arc::new(PersistenceGateway::local_only(local.clone())));
        controller.load().await.unwrap();

        let updated = controller.increment_progress("1").await.unwrap();

        assert_eq!(updated.current_progress, 5);
        assert!(updated.last_modified_at > seeded("1", 4, Some(12)).last_modified_at);
        assert_eq!(local.read_all()[0].current_progress, 5);
    }

    #[tokio::test]
    async fn test_increment_at_total_is_refused() {
        let local = local_store();
        local.write_all(&[seeded("1", 12, Some(12))]);
        let mut controller = LibraryController::new(Arc::new(PersistenceGateway::local_only(local.clone())));
        controller.load().await.unwrap();

        assert!(!controller.can_increment("1"));
        let result = controller.increment_progress("1").await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::ProgressComplete { total: 12, .. }))
        ));
        assert_eq!(controller.get("1").unwrap().current_progress, 12);
        assert_eq!(local.read_all()[0].current_progress, 12);
    }

    #[tokio::test]
    async fn test_increment_without_known_total_is_unbounded() {
        let local = local_store();
        local.write_all(&[seeded("1", 500, None), seeded("2", 3, Some(0))]);
        let mut controller = LibraryController::new(Arc::new(PersistenceGateway::local_only(local)));
        controller.load().await.unwrap();

        assert!(controller.can_increment("1"));
        assert!(controller.can_increment("2"));
        assert_eq!(controller.increment_progress("1").await.unwrap().current_progress, 501);
        assert_eq!(controller.increment_progress("2").await.unwrap().current_progress, 4);
    }

    #[tokio::test]
    async fn test_increment_at_numeric_limit_is_refused() {
        let local = local_store();
        local.write_all(&[seeded("1", u32::MAX, None)]);
        let mut controller = LibraryController::new(Arc::new(PersistenceGateway::local_only(local.clone())));
        controller.load().await.unwrap();

        let result = controller.increment_progress("1").await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::InvariantViolation(_)))
        ));
        assert_eq!(controller.get("1").unwrap().current_progress, u32::MAX);
        assert_eq!(local.read_all()[0].current_progress, u32::MAX);
    }

    #[tokio::test]
    async fn test_increment_unknown_id() {
        let (_, mut controller) = local_controller().await;
        assert!(!controller.can_increment("nope"));
        assert!(matches!(
            controller.increment_progress("nope").await,
            Err(AppError::NotFound)
        ));
    }

    // ========================================================================
    // REMOVE
    // ========================================================================

    #[tokio::test]
    async fn test_remove() {
        let (local, mut controller) = local_controller().await;
        let keep = controller.add_or_edit(input("Keep", None), None).await.unwrap();
        let dropped = controller.add_or_edit(input("Drop", None), None).await.unwrap();

        controller.remove(&dropped.id).await.unwrap();

        assert_eq!(controller.items(), &[keep.clone()]);
        assert_eq!(local.read_all(), vec![keep]);
        assert!(matches!(controller.remove(&dropped.id).await, Err(AppError::NotFound)));
    }

    // ========================================================================
    // REMOTE INTERACTION
    // ========================================================================

    #[tokio::test]
    async fn test_remote_write_failure_is_invisible() {
        let mut remote = MockRemoteStore::new();
        remote.expect_list().times(1).returning(|| Ok(Vec::new()));
        remote
            .expect_create()
            .times(1)
            .returning(|_| Err(RemoteError::Unavailable("connection refused".to_string())));

        let local = local_store();
        let gateway = Arc::new(PersistenceGateway::new(Arc::new(remote), local.clone()));
        let mut controller = LibraryController::new(gateway);
        controller.load().await.unwrap();
        assert_eq!(controller.storage_mode(), StorageMode::Remote);

        let record = controller.add_or_edit(input("Offline", None), None).await.unwrap();

        assert_eq!(controller.storage_mode(), StorageMode::LocalFallback);
        assert_eq!(controller.items(), &[record.clone()]);
        assert_eq!(local.read_all(), vec![record]);
    }

    // ========================================================================
    // DERIVED VIEWS
    // ========================================================================

    #[tokio::test]
    async fn test_visible_and_statistics() {
        let (_, mut controller) = local_controller().await;
        controller.add_or_edit(input("Attack on Titan", Some(87)), None).await.unwrap();
        let mut manga = MediaInput::new("Attack on Titan", MediaCategory::Manga);
        manga.current_progress = 139;
        manga.rating = 9.0;
        controller.add_or_edit(manga, None).await.unwrap();

        controller.set_category_filter(CategoryFilter::Only(MediaCategory::Manga));
        controller.set_search("titan");
        let visible = controller.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].category, MediaCategory::Manga);
        assert_eq!(controller.items().len(), 2);

        let stats = controller.statistics();
        assert_eq!(stats.total_titles, 2);
        assert_eq!(stats.total_progress, 139);
    }
}
