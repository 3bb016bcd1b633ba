use folio_core::models::{Project, Skill};
use folio_core::{Direction, ProjectId, ordering};
use folio_engine::{EngineError, ProjectsBinding, ReconciliationPolicy, SkillsBinding, Status};
use folio_harness::{Fixture, Op, init_tracing};
use folio_storage::{RemoteStore, StoreError};

fn titles(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|p| p.title.as_str()).collect()
}

async fn server_titles(fx: &Fixture) -> Result<Vec<String>, StoreError> {
    let mut projects = RemoteStore::<Project>::fetch_all(fx.backend()).await?;
    ordering::sort_by_order(&mut projects);
    Ok(projects.into_iter().map(|p| p.title).collect())
}

fn ids_for(binding: &ProjectsBinding, wanted: &[&str]) -> Vec<ProjectId> {
    let projects = binding.projects();
    wanted
        .iter()
        .filter_map(|t| projects.iter().find(|p| p.title == *t).map(|p| p.id.clone()))
        .collect()
}

fn skill_line(skills: &[Skill]) -> Vec<(&str, u32)> {
    skills.iter().map(|s| (s.name.as_str(), s.order)).collect()
}

async fn projects_with_policy(
    fx: &Fixture,
    policy: ReconciliationPolicy,
) -> Result<ProjectsBinding, Box<dyn std::error::Error>> {
    fx.seed_projects(&[("Alpha", false), ("Beta", false), ("Gamma", false)])
        .await?;
    let binding = ProjectsBinding::new(fx.store.clone(), fx.ui.clone()).with_policy(policy);
    binding.load().await?;
    fx.store.reset_calls();
    Ok(binding)
}

// ============================================================================
// Refetch (default)
// ============================================================================

#[tokio::test]
async fn failed_skill_reorder_reloads_server_order() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let fx = Fixture::new()?;
    let (web, seeded) = fx.seed_category("Web", &["A", "B", "C"]).await?;
    let skills = SkillsBinding::new(fx.store.clone(), fx.store.clone(), fx.ui.clone());
    skills.load().await?;
    fx.store.reset_calls();

    let gate = fx.store.hold_reorders();
    fx.store.fail_next(Op::Reorder, 1);
    let wanted = vec![seeded[2].id.clone(), seeded[0].id.clone(), seeded[1].id.clone()];

    let (result, ()) = tokio::join!(skills.reorder_skills(&web.id, wanted), async {
        assert_eq!(
            skill_line(&skills.skills_in(&web.id)),
            vec![("C", 0), ("A", 1), ("B", 2)]
        );
        gate.release(1);
    });

    assert!(matches!(result, Err(EngineError::ReorderFailed { .. })));
    assert_eq!(fx.store.calls(Op::FetchAll), 1);
    assert_eq!(
        skill_line(&skills.skills_in(&web.id)),
        vec![("A", 0), ("B", 1), ("C", 2)]
    );
    assert!(ordering::is_dense(&skills.skills().items(), &web.id));
    assert_eq!(fx.notifier.errors(), vec!["Failed to reorder skills".to_string()]);
    Ok(())
}

#[tokio::test]
async fn failed_reload_during_reconciliation_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = projects_with_policy(&fx, ReconciliationPolicy::Refetch).await?;
    fx.store.fail_next(Op::Reorder, 1);
    fx.store.fail_next(Op::FetchAll, 1);

    let result = binding.move_project(0, Direction::Down).await;

    assert!(matches!(result, Err(EngineError::ReorderFailed { .. })));
    assert_eq!(
        fx.notifier.errors(),
        vec![
            "Failed to load projects".to_string(),
            "Failed to reorder projects".to_string()
        ]
    );
    assert!(matches!(binding.controller().status(), Status::Error(_)));

    // a manual retry of the load restores server truth
    binding.load().await?;
    assert_eq!(titles(&binding.projects()), vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(binding.controller().status(), Status::Idle);
    Ok(())
}

#[tokio::test]
async fn reload_waits_for_overlapping_reorders() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let fx = Fixture::new()?;
    let binding = projects_with_policy(&fx, ReconciliationPolicy::Refetch).await?;
    let first = ids_for(&binding, &["Beta", "Alpha", "Gamma"]);
    let second = ids_for(&binding, &["Beta", "Gamma", "Alpha"]);
    let gate = fx.store.hold_reorders();
    fx.store.fail_next(Op::Reorder, 1);

    let (r1, r2, ()) = tokio::join!(binding.reorder(first), binding.reorder(second), async {
        gate.release(1);
        tokio::task::yield_now().await;
        // no reload while the second reorder is unanswered
        assert_eq!(fx.store.calls(Op::FetchAll), 0);
        gate.release(1);
    });

    assert!(matches!(r1, Err(EngineError::ReorderFailed { .. })));
    r2?;
    assert_eq!(fx.store.calls(Op::FetchAll), 1);
    assert_eq!(server_titles(&fx).await?, vec!["Beta", "Gamma", "Alpha"]);
    assert_eq!(titles(&binding.projects()), vec!["Beta", "Gamma", "Alpha"]);
    assert!(ordering::is_dense(&binding.projects(), &()));
    assert_eq!(fx.notifier.errors(), vec!["Failed to reorder projects".to_string()]);
    Ok(())
}

#[tokio::test]
async fn failed_reorder_leaves_error_status() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = projects_with_policy(&fx, ReconciliationPolicy::Refetch).await?;
    fx.store.fail_next(Op::Reorder, 1);
    let reversed = ids_for(&binding, &["Gamma", "Beta", "Alpha"]);

    let result = binding.reorder(reversed).await;

    assert!(result.is_err());
    // the reconciliation reload succeeded, the reorder did not
    assert_eq!(fx.store.calls(Op::FetchAll), 1);
    let status = binding.controller().status();
    assert!(status.error().is_some_and(|e| e.contains("injected")));

    binding.load().await?;
    assert_eq!(binding.controller().status(), Status::Idle);
    Ok(())
}

#[tokio::test]
async fn reorder_failure_carries_the_store_error() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = projects_with_policy(&fx, ReconciliationPolicy::Refetch).await?;
    fx.store.fail_next(Op::Reorder, 1);

    let err = match binding.move_project(1, Direction::Up).await {
        Err(e) => e,
        Ok(_) => return Err("reorder should fail".into()),
    };
    assert!(matches!(err.store_error(), Some(StoreError::Network(_))));
    assert_eq!(titles(&binding.projects()), vec!["Alpha", "Beta", "Gamma"]);
    Ok(())
}

// ============================================================================
// Revert
// ============================================================================

#[tokio::test]
async fn revert_restores_snapshot_without_reload() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = projects_with_policy(&fx, ReconciliationPolicy::Revert).await?;
    fx.store.fail_next(Op::Reorder, 1);

    let result = binding.move_project(2, Direction::Up).await;

    assert!(matches!(result, Err(EngineError::ReorderFailed { .. })));
    assert_eq!(titles(&binding.projects()), vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(fx.store.calls(Op::FetchAll), 0);
    assert_eq!(fx.notifier.errors(), vec!["Failed to reorder projects".to_string()]);
    Ok(())
}

#[tokio::test]
async fn revert_falls_back_to_reload_when_state_moved_on() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = projects_with_policy(&fx, ReconciliationPolicy::Revert).await?;
    let gate = fx.store.hold_reorders();
    fx.store.fail_next(Op::Reorder, 1);

    let (first, second, ()) = tokio::join!(
        binding.move_project(2, Direction::Up),
        binding.move_project(0, Direction::Down),
        async { gate.release(2) }
    );

    assert!(first.is_err());
    assert!(second?);
    // the snapshot of the first reorder is stale, so the store was asked
    assert_eq!(fx.store.calls(Op::FetchAll), 1);

    binding.load().await?;
    let projects = binding.projects();
    assert!(ordering::is_dense(&projects, &()));
    assert_eq!(projects.len(), 3);
    Ok(())
}

// ============================================================================
// Unmount
// ============================================================================

#[tokio::test]
async fn results_after_unmount_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = projects_with_policy(&fx, ReconciliationPolicy::Refetch).await?;
    let gate = fx.store.hold_reorders();
    fx.store.fail_next(Op::Reorder, 1);

    let (result, ()) = tokio::join!(binding.move_project(0, Direction::Down), async {
        binding.controller().unmount();
        gate.release(1);
    });

    assert!(result.is_err());
    // no reconciliation, no notice, state left as it was at unmount
    assert_eq!(fx.store.calls(Op::FetchAll), 0);
    assert!(fx.notifier.notices().is_empty());
    assert_eq!(titles(&binding.projects()), vec!["Beta", "Alpha", "Gamma"]);

    let after = binding.load().await;
    assert!(matches!(after, Err(EngineError::Unmounted)));
    Ok(())
}
