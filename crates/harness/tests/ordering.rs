use folio_core::models::{Project, Skill};
use folio_core::{Direction, ProjectId, ordering};
use folio_engine::{EngineError, ProjectsBinding, SkillsBinding};
use folio_harness::{Fixture, Op, init_tracing};
use folio_storage::RemoteStore;

fn titles(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|p| p.title.as_str()).collect()
}

fn names(skills: &[Skill]) -> Vec<&str> {
    skills.iter().map(|s| s.name.as_str()).collect()
}

fn orders<E: folio_core::OrderedEntity>(items: &[E]) -> Vec<u32> {
    items.iter().map(|e| e.order()).collect()
}

async fn server_projects(fx: &Fixture) -> Result<Vec<Project>, Box<dyn std::error::Error>> {
    let mut projects = RemoteStore::<Project>::fetch_all(fx.backend()).await?;
    ordering::sort_by_order(&mut projects);
    Ok(projects)
}

async fn loaded_projects(
    fx: &Fixture,
    specs: &[(&str, bool)],
) -> Result<ProjectsBinding, Box<dyn std::error::Error>> {
    fx.seed_projects(specs).await?;
    let binding = ProjectsBinding::new(fx.store.clone(), fx.ui.clone());
    binding.load().await?;
    fx.store.reset_calls();
    Ok(binding)
}

// ============================================================================
// Local moves
// ============================================================================

#[tokio::test]
async fn boundary_moves_are_no_ops_without_network() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let fx = Fixture::new()?;
    let binding = loaded_projects(&fx, &[("Alpha", false), ("Beta", false), ("Gamma", false)]).await?;

    assert!(!binding.move_project(0, Direction::Up).await?);
    assert!(!binding.move_project(2, Direction::Down).await?);
    assert!(!binding.move_project(7, Direction::Up).await?);

    assert_eq!(titles(&binding.projects()), vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(fx.store.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn move_item_is_local_and_keeps_order_dense() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = loaded_projects(&fx, &[("Alpha", false), ("Beta", false), ("Gamma", false)]).await?;
    let controller = binding.controller();

    assert!(controller.move_item(&(), 0, Direction::Down));
    assert!(!controller.move_item(&(), 0, Direction::Up));

    let projects = binding.projects();
    assert_eq!(titles(&projects), vec!["Beta", "Alpha", "Gamma"]);
    assert_eq!(orders(&projects), vec![0, 1, 2]);
    assert_eq!(fx.store.total_calls(), 0);

    // the server still has the old order until a reorder is sent
    assert_eq!(titles(&server_projects(&fx).await?), vec!["Alpha", "Beta", "Gamma"]);
    Ok(())
}

// ============================================================================
// Optimistic reorder
// ============================================================================

#[tokio::test]
async fn reorder_applies_before_confirmation() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = loaded_projects(&fx, &[("Alpha", false), ("Beta", false), ("Gamma", false)]).await?;
    let ids: Vec<ProjectId> = binding.projects().iter().map(|p| p.id.clone()).collect();
    let reversed: Vec<ProjectId> = ids.iter().rev().cloned().collect();
    let gate = fx.store.hold_reorders();

    let (result, ()) = tokio::join!(binding.reorder(reversed.clone()), async {
        // store call issued but not yet answered
        assert_eq!(fx.store.calls(Op::Reorder), 1);
        assert_eq!(titles(&binding.projects()), vec!["Gamma", "Beta", "Alpha"]);
        assert!(binding.controller().is_saving());
        gate.release(1);
    });
    result?;

    assert!(!binding.controller().is_saving());
    assert_eq!(titles(&server_projects(&fx).await?), vec!["Gamma", "Beta", "Alpha"]);
    assert_eq!(orders(&binding.projects()), vec![0, 1, 2]);
    Ok(())
}

#[tokio::test]
async fn rapid_moves_build_on_latest_local_state() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = loaded_projects(&fx, &[("Alpha", false), ("Beta", false), ("Gamma", false)]).await?;
    let gate = fx.store.hold_reorders();

    // Gamma up twice before either request resolves
    let (first, second, ()) = tokio::join!(
        binding.move_project(2, Direction::Up),
        binding.move_project(1, Direction::Up),
        async {
            assert_eq!(titles(&binding.projects()), vec!["Gamma", "Alpha", "Beta"]);
            assert_eq!(fx.store.calls(Op::Reorder), 2);
            gate.release(2);
        }
    );
    assert!(first?);
    assert!(second?);

    assert_eq!(titles(&server_projects(&fx).await?), vec!["Gamma", "Alpha", "Beta"]);
    assert_eq!(orders(&binding.projects()), vec![0, 1, 2]);
    Ok(())
}

#[tokio::test]
async fn reorder_to_identical_sequence_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = loaded_projects(&fx, &[("Alpha", false), ("Beta", false)]).await?;
    let before = binding.projects();
    let ids = binding.controller().ids(&());

    binding.reorder(ids).await?;

    assert_eq!(binding.projects(), before);
    assert!(fx.notifier.errors().is_empty());
    binding.load().await?;
    assert_eq!(binding.projects(), before);
    Ok(())
}

#[tokio::test]
async fn reorder_rejects_non_permutations_locally() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let binding = loaded_projects(&fx, &[("Alpha", false), ("Beta", false)]).await?;
    let ids = binding.controller().ids(&());

    let missing = binding.reorder(vec![ids[0].clone()]).await;
    assert!(matches!(missing, Err(EngineError::InvalidOrder(_))));

    let duplicated = binding.reorder(vec![ids[0].clone(), ids[0].clone()]).await;
    assert!(matches!(duplicated, Err(EngineError::InvalidOrder(_))));

    let foreign = binding.reorder(vec![ids[0].clone(), ProjectId::from("nope")]).await;
    assert!(matches!(foreign, Err(EngineError::InvalidOrder(_))));

    assert_eq!(titles(&binding.projects()), vec!["Alpha", "Beta"]);
    assert_eq!(fx.store.calls(Op::Reorder), 0);
    Ok(())
}

// ============================================================================
// Scoped ordering (skills within categories)
// ============================================================================

#[tokio::test]
async fn skill_reorder_touches_only_its_category() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let (web, _) = fx.seed_category("Web", &["HTML", "CSS", "JS"]).await?;
    let (tools, _) = fx.seed_category("Tools", &["Git", "Docker"]).await?;
    let skills = SkillsBinding::new(fx.store.clone(), fx.store.clone(), fx.ui.clone());
    skills.load().await?;

    let web_ids = skills.skills().ids(&web.id);
    let reordered = vec![web_ids[2].clone(), web_ids[0].clone(), web_ids[1].clone()];
    skills.reorder_skills(&web.id, reordered).await?;

    assert_eq!(names(&skills.skills_in(&web.id)), vec!["JS", "HTML", "CSS"]);
    assert_eq!(orders(&skills.skills_in(&web.id)), vec![0, 1, 2]);
    assert_eq!(names(&skills.skills_in(&tools.id)), vec!["Git", "Docker"]);
    assert_eq!(orders(&skills.skills_in(&tools.id)), vec![0, 1]);

    // the server agrees after a fresh load
    skills.load().await?;
    assert_eq!(names(&skills.skills_in(&web.id)), vec!["JS", "HTML", "CSS"]);
    assert!(ordering::is_dense(&skills.skills().items(), &tools.id));
    Ok(())
}

#[tokio::test]
async fn skill_ids_from_another_category_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    let (web, _) = fx.seed_category("Web", &["HTML", "CSS"]).await?;
    let (tools, _) = fx.seed_category("Tools", &["Git", "Docker"]).await?;
    let skills = SkillsBinding::new(fx.store.clone(), fx.store.clone(), fx.ui.clone());
    skills.load().await?;

    let result = skills.reorder_skills(&web.id, skills.skills().ids(&tools.id)).await;
    assert!(matches!(result, Err(EngineError::InvalidOrder(_))));
    assert_eq!(names(&skills.skills_in(&web.id)), vec!["HTML", "CSS"]);
    Ok(())
}

#[tokio::test]
async fn categories_move_as_one_scope() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new()?;
    fx.seed_category("Web", &["HTML"]).await?;
    fx.seed_category("Tools", &["Git"]).await?;
    let skills = SkillsBinding::new(fx.store.clone(), fx.store.clone(), fx.ui.clone());
    skills.load().await?;

    assert!(skills.move_category(1, Direction::Up).await?);
    let order: Vec<String> = skills.categories().items().into_iter().map(|c| c.name).collect();
    assert_eq!(order, vec!["Tools", "Web"]);
    Ok(())
}
