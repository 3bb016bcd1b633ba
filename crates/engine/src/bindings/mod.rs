//! Per-resource wiring of the generic controllers.

pub mod about;
pub mod experience;
pub mod hero;
pub mod projects;
pub mod settings;
pub mod skills;

pub use about::AboutEditor;
pub use experience::ExperienceBinding;
pub use hero::HeroEditor;
pub use projects::ProjectsBinding;
pub use settings::{Inbox, SettingsBinding};
pub use skills::SkillsBinding;
