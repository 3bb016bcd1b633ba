//! Server-side behaviour of each resource as modelled by [`crate::SqliteStore`]:
//! what a create produces, how a patch lands, which children go with a delete.

use chrono::{DateTime, Utc};

use folio_core::models::{
    About, ContactSettings, Experience, Hero, Project, Skill, SkillCategory, SiteSettings,
};
use folio_core::{CategoryId, Document, ExperienceId, Flag, ProjectId, Resource, SkillId};

use crate::error::StoreError;

pub trait Stored: Resource {
    const KIND: &'static str;

    /// Kinds whose records are scoped by this entity's id and are removed with it.
    const CHILDREN: &'static [&'static str] = &[];

    fn scope_key(scope: &Self::Scope) -> String;

    fn draft_scope(draft: &Self::Draft) -> Self::Scope;

    /// Record that must exist before a draft can be created, as `(kind, id)`.
    fn parent(_draft: &Self::Draft) -> Option<(&'static str, String)> {
        None
    }

    fn create(draft: &Self::Draft, order: u32, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>);

    fn toggle(&mut self, flag: Flag, _now: DateTime<Utc>) -> Result<(), StoreError> {
        let _ = flag;
        Err(StoreError::Unsupported("toggle"))
    }
}

pub trait StoredDocument: Document {
    const KIND: &'static str;

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>);
}

impl Stored for Project {
    const KIND: &'static str = "project";

    fn scope_key(_: &()) -> String {
        String::new()
    }

    fn draft_scope(_: &Self::Draft) {}

    fn create(draft: &Self::Draft, order: u32, now: DateTime<Utc>) -> Self {
        let draft = draft.clone().normalized();
        Project {
            id: ProjectId::new(),
            title: draft.title,
            description: draft.description,
            details: draft.details,
            image_url: draft.image_url,
            live_url: draft.live_url,
            github_url: draft.github_url,
            tech_stack: draft.tech_stack,
            featured: draft.featured,
            order,
            is_visible: draft.is_visible,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        let patch = patch.clone().normalized();
        self.title = patch.title;
        self.description = patch.description;
        self.details = patch.details;
        self.image_url = patch.image_url;
        self.live_url = patch.live_url;
        self.github_url = patch.github_url;
        self.tech_stack = patch.tech_stack;
        self.featured = patch.featured;
        self.is_visible = patch.is_visible;
        self.updated_at = now;
    }

    fn toggle(&mut self, flag: Flag, now: DateTime<Utc>) -> Result<(), StoreError> {
        match flag {
            Flag::Visible => self.is_visible = !self.is_visible,
            Flag::Featured => self.featured = !self.featured,
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Stored for Experience {
    const KIND: &'static str = "experience";

    fn scope_key(_: &()) -> String {
        String::new()
    }

    fn draft_scope(_: &Self::Draft) {}

    fn create(draft: &Self::Draft, order: u32, now: DateTime<Utc>) -> Self {
        Experience {
            id: ExperienceId::new(),
            job_title: draft.job_title.clone(),
            company: draft.company.clone(),
            location: draft.location.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            description: draft.description.clone(),
            order,
            is_visible: draft.is_visible,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        self.job_title = patch.job_title.clone();
        self.company = patch.company.clone();
        self.location = patch.location.clone();
        self.start_date = patch.start_date;
        self.end_date = patch.end_date;
        self.description = patch.description.clone();
        self.is_visible = patch.is_visible;
        self.updated_at = now;
    }

    fn toggle(&mut self, flag: Flag, now: DateTime<Utc>) -> Result<(), StoreError> {
        match flag {
            Flag::Visible => self.is_visible = !self.is_visible,
            Flag::Featured => return Err(StoreError::Unsupported("experience has no featured flag")),
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Stored for SkillCategory {
    const KIND: &'static str = "skill_category";
    const CHILDREN: &'static [&'static str] = &[Skill::KIND];

    fn scope_key(_: &()) -> String {
        String::new()
    }

    fn draft_scope(_: &Self::Draft) {}

    fn create(draft: &Self::Draft, order: u32, now: DateTime<Utc>) -> Self {
        SkillCategory {
            id: CategoryId::new(),
            name: draft.name.clone(),
            order,
            skills: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        self.name = patch.name.clone();
        self.updated_at = now;
    }
}

impl Stored for Skill {
    const KIND: &'static str = "skill";

    fn scope_key(scope: &CategoryId) -> String {
        scope.to_string()
    }

    fn draft_scope(draft: &Self::Draft) -> CategoryId {
        draft.category_id.clone()
    }

    fn parent(draft: &Self::Draft) -> Option<(&'static str, String)> {
        Some((SkillCategory::KIND, draft.category_id.to_string()))
    }

    fn create(draft: &Self::Draft, order: u32, now: DateTime<Utc>) -> Self {
        Skill {
            id: SkillId::new(),
            name: draft.name.clone(),
            order,
            category_id: draft.category_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        self.name = patch.name.clone();
        self.updated_at = now;
    }
}

impl StoredDocument for About {
    const KIND: &'static str = "about";

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        let mut content = patch.content.clone();
        for (i, p) in content.iter_mut().enumerate() {
            p.order = i as u32;
        }
        self.content = content;
        self.updated_at = now;
    }
}

impl StoredDocument for Hero {
    const KIND: &'static str = "hero";

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        if let Some(profile) = &patch.profile {
            self.initials = profile.initials.clone();
            self.full_name = profile.full_name.clone();
            self.title = profile.title.clone();
            self.location = profile.location.clone();
            self.profile_image = profile.profile_image.clone();
            self.gradient_from = profile.gradient_from.clone();
            self.gradient_to = profile.gradient_to.clone();
        }
        if let Some(stats) = &patch.stats {
            self.stats = stats.clone();
        }
        self.updated_at = now;
    }
}

impl StoredDocument for SiteSettings {
    const KIND: &'static str = "site_settings";

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        let blank_to_none = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        self.site_title = patch.site_title.clone();
        self.site_tagline = blank_to_none(&patch.site_tagline);
        self.github_url = blank_to_none(&patch.github_url);
        self.linkedin_url = blank_to_none(&patch.linkedin_url);
        self.twitter_url = blank_to_none(&patch.twitter_url);
        self.portfolio_url = blank_to_none(&patch.portfolio_url);
        self.footer_text = patch.footer_text.clone().unwrap_or_default();
        self.updated_at = now;
    }
}

impl StoredDocument for ContactSettings {
    const KIND: &'static str = "contact_settings";

    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        let patch = patch.clone().normalized();
        self.heading = patch.heading;
        self.description = patch.description.unwrap_or_default();
        self.email = patch.email;
        self.button_text = patch.button_text;
        self.show_subject_field = patch.show_subject_field;
        self.require_subject = patch.require_subject;
        self.updated_at = now;
    }
}
