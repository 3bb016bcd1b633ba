pub mod about;
pub mod experience;
pub mod hero;
pub mod projects;
pub mod settings;
pub mod skills;

pub use about::{About, AboutParagraph, AboutPatch, MAX_PARAGRAPH_CHARS, MIN_PARAGRAPHS};
pub use experience::{Experience, ExperienceDraft, ExperienceForm};
pub use hero::{Hero, HeroPatch, HeroProfile, HeroStat, MAX_HERO_STATS};
pub use projects::{Project, ProjectForm, TechStack};
pub use settings::{ContactMessage, ContactSettings, ContactSettingsForm, SiteSettings, SiteSettingsForm};
pub use skills::{CategoryInput, Skill, SkillCategory, SkillDraft, SkillPatch};
