use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;

use folio_core::models::{
    About, AboutParagraph, CategoryInput, ContactMessage, ContactSettings, Experience,
    ExperienceDraft, Hero, HeroStat, Project, ProjectForm, SiteSettings, Skill, SkillCategory,
    SkillDraft,
};
use folio_core::{DocumentId, MessageId, ParagraphId};
use folio_engine::{MemoryNotifier, Ui};
use folio_storage::{RemoteStore, SqliteStore, StoreError};

use crate::faulty::FaultyStore;

pub type TestStore = FaultyStore<SqliteStore>;

/// An in-memory backend behind a fault-injecting wrapper, plus recording
/// UI collaborators.
pub struct Fixture {
    pub store: Arc<TestStore>,
    pub notifier: Arc<MemoryNotifier>,
    pub ui: Ui,
    confirm: Arc<AtomicBool>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self::with_store(SqliteStore::open_in_memory()?))
    }

    pub fn with_store(store: SqliteStore) -> Self {
        let notifier = Arc::new(MemoryNotifier::new());
        let confirm = Arc::new(AtomicBool::new(true));
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let gate = {
            let confirm = Arc::clone(&confirm);
            let prompts = Arc::clone(&prompts);
            move |prompt: &str| {
                prompts.lock().push(prompt.to_string());
                confirm.load(Ordering::SeqCst)
            }
        };
        let ui = Ui::new(notifier.clone(), Arc::new(gate));
        Self {
            store: Arc::new(FaultyStore::new(store)),
            notifier,
            ui,
            confirm,
            prompts,
        }
    }

    pub fn backend(&self) -> &SqliteStore {
        self.store.inner()
    }

    /// Answer for subsequent confirmation prompts.
    pub fn answer_confirmations(&self, yes: bool) {
        self.confirm.store(yes, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    // ------------------------------------------------------------------
    // Seeding, straight into the backend
    // ------------------------------------------------------------------

    pub async fn seed_projects(&self, specs: &[(&str, bool)]) -> Result<Vec<Project>, StoreError> {
        let mut out = Vec::new();
        for (title, featured) in specs {
            let mut form = ProjectForm::new(title, "A project worth describing");
            form.featured = *featured;
            out.push(RemoteStore::<Project>::create(self.backend(), &form).await?);
        }
        Ok(out)
    }

    pub async fn seed_experience(&self, titles: &[&str]) -> Result<Vec<Experience>, StoreError> {
        let mut out = Vec::new();
        for title in titles {
            let draft = ExperienceDraft {
                job_title: title.to_string(),
                company: "Acme Corp".into(),
                location: "Remote".into(),
                start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
                end_date: None,
                description: "Built and shipped things".into(),
                is_visible: true,
            };
            out.push(RemoteStore::<Experience>::create(self.backend(), &draft).await?);
        }
        Ok(out)
    }

    /// A category holding the named skills, in order.
    pub async fn seed_category(
        &self,
        name: &str,
        skills: &[&str],
    ) -> Result<(SkillCategory, Vec<Skill>), StoreError> {
        let category =
            RemoteStore::<SkillCategory>::create(self.backend(), &CategoryInput::new(name)).await?;
        let mut out = Vec::new();
        for skill in skills {
            let draft = SkillDraft::new(category.id.clone(), skill);
            out.push(RemoteStore::<Skill>::create(self.backend(), &draft).await?);
        }
        Ok((category, out))
    }

    pub fn seed_about(&self, texts: &[&str]) -> Result<About, StoreError> {
        let now = Utc::now();
        let about = About {
            id: DocumentId::new(),
            content: texts
                .iter()
                .enumerate()
                .map(|(i, t)| AboutParagraph {
                    id: ParagraphId::new(),
                    text: t.to_string(),
                    order: i as u32,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };
        self.backend().put_document(&about)?;
        Ok(about)
    }

    pub fn seed_hero(&self, stats: &[(&str, &str)]) -> Result<Hero, StoreError> {
        let now = Utc::now();
        let hero = Hero {
            id: DocumentId::new(),
            initials: "JD".into(),
            full_name: "Jane Doe".into(),
            title: "Software Engineer".into(),
            location: "Lisbon, Portugal".into(),
            profile_image: None,
            gradient_from: "#3b82f6".into(),
            gradient_to: "#8b5cf6".into(),
            stats: stats.iter().map(|(v, l)| HeroStat::new(*v, *l)).collect(),
            created_at: now,
            updated_at: now,
        };
        self.backend().put_document(&hero)?;
        Ok(hero)
    }

    pub fn seed_settings(&self) -> Result<(SiteSettings, ContactSettings), StoreError> {
        let now = Utc::now();
        let site = SiteSettings {
            id: DocumentId::new(),
            site_title: "Jane Doe".into(),
            site_tagline: None,
            favicon: None,
            og_image: None,
            github_url: None,
            linkedin_url: None,
            twitter_url: None,
            portfolio_url: None,
            footer_text: String::new(),
            created_at: now,
            updated_at: now,
        };
        let contact = ContactSettings {
            id: DocumentId::new(),
            heading: "Get in touch".into(),
            description: String::new(),
            email: "jane@site.dev".into(),
            button_text: "Send".into(),
            show_subject_field: true,
            require_subject: false,
            created_at: now,
            updated_at: now,
        };
        self.backend().put_document(&site)?;
        self.backend().put_document(&contact)?;
        Ok((site, contact))
    }

    pub fn seed_message(&self, name: &str, is_read: bool) -> Result<ContactMessage, StoreError> {
        let message = ContactMessage {
            id: MessageId::new(),
            name: name.to_string(),
            email: format!("{}@mail.dev", name.to_lowercase()),
            subject: None,
            message: "Hello there".into(),
            is_read,
            created_at: Utc::now(),
        };
        self.backend().insert_message(&message)?;
        Ok(message)
    }
}
