//! Read-only projections of controller state for live-preview panes.
//!
//! Everything here is a pure function of its input slices: nothing is
//! mutated, and calling a projection on every state change is fine.

use folio_core::OrderedEntity;
use folio_core::models::{AboutParagraph, Experience, HeroStat, Project, Skill, SkillCategory};

/// Projects the preview shows before "view all".
pub const PROJECT_PREVIEW_LIMIT: usize = 4;

/// How an entity is placed and flagged in a preview.
pub trait Previewable {
    /// Partially filled; the caller styles a warning around it.
    fn is_incomplete(&self) -> bool {
        false
    }

    /// Pinned entities sort ahead of all others, whatever their order.
    fn is_pinned(&self) -> bool {
        false
    }
}

impl Previewable for AboutParagraph {
    fn is_incomplete(&self) -> bool {
        AboutParagraph::is_incomplete(self)
    }
}

impl Previewable for HeroStat {
    fn is_incomplete(&self) -> bool {
        HeroStat::is_incomplete(self)
    }
}

impl Previewable for Project {
    fn is_incomplete(&self) -> bool {
        self.title.trim().is_empty() || self.description.trim().is_empty()
    }

    fn is_pinned(&self) -> bool {
        self.featured
    }
}

impl Previewable for Experience {
    fn is_incomplete(&self) -> bool {
        self.job_title.trim().is_empty() || self.company.trim().is_empty()
    }
}

impl Previewable for SkillCategory {}

impl Previewable for Skill {
    fn is_incomplete(&self) -> bool {
        self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Previewed<T> {
    pub item: T,
    pub incomplete: bool,
}

/// A sorted collection, or an explicit marker for "nothing to show".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortedView<T> {
    Empty,
    Items(Vec<Previewed<T>>),
}

impl<T> SortedView<T> {
    fn from_vec(items: Vec<Previewed<T>>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Items(items)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Items(items) => items.len(),
        }
    }

    pub fn entries(&self) -> &[Previewed<T>] {
        match self {
            Self::Empty => &[],
            Self::Items(items) => items,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries().iter().map(|p| &p.item)
    }

    pub fn has_incomplete(&self) -> bool {
        self.entries().iter().any(|p| p.incomplete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutPreview {
    pub paragraphs: SortedView<AboutParagraph>,
    pub stats: SortedView<HeroStat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectsPreview {
    /// Visible projects in total, shown or not.
    pub visible_total: usize,
    pub shown: SortedView<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPreview {
    pub category: SkillCategory,
    pub skills: SortedView<Skill>,
}

pub struct PreviewProjector;

impl PreviewProjector {
    /// Pinned first, then `order` ascending. Ties keep input order.
    pub fn project<E: OrderedEntity + Previewable>(items: &[E]) -> SortedView<E> {
        let mut sorted: Vec<&E> = items.iter().collect();
        sorted.sort_by_key(|e| (!e.is_pinned(), e.order()));
        SortedView::from_vec(sorted.into_iter().map(previewed).collect())
    }

    /// Positional list, kept in index order.
    pub fn stats(stats: &[HeroStat]) -> SortedView<HeroStat> {
        SortedView::from_vec(stats.iter().map(previewed).collect())
    }

    /// The about page merges paragraphs with the hero's stats.
    pub fn about(paragraphs: &[AboutParagraph], stats: &[HeroStat]) -> AboutPreview {
        AboutPreview {
            paragraphs: Self::project(paragraphs),
            stats: Self::stats(stats),
        }
    }

    /// Visible projects, featured first, cut to [`PROJECT_PREVIEW_LIMIT`].
    pub fn projects(projects: &[Project]) -> ProjectsPreview {
        let visible: Vec<Project> = projects.iter().filter(|p| p.is_visible).cloned().collect();
        let shown = match Self::project(&visible) {
            SortedView::Items(mut items) => {
                items.truncate(PROJECT_PREVIEW_LIMIT);
                SortedView::Items(items)
            }
            SortedView::Empty => SortedView::Empty,
        };
        ProjectsPreview {
            visible_total: visible.len(),
            shown,
        }
    }

    pub fn experience(entries: &[Experience]) -> SortedView<Experience> {
        let visible: Vec<Experience> = entries.iter().filter(|e| e.is_visible).cloned().collect();
        Self::project(&visible)
    }

    /// Categories in order, each with its own skills in order. A category
    /// without skills is flagged incomplete.
    pub fn skills(categories: &[SkillCategory], skills: &[Skill]) -> SortedView<CategoryPreview> {
        let ordered = Self::project(categories);
        let previews = ordered
            .items()
            .map(|category| {
                let own: Vec<Skill> = skills
                    .iter()
                    .filter(|s| s.category_id == category.id)
                    .cloned()
                    .collect();
                let skills = Self::project(&own);
                Previewed {
                    incomplete: skills.is_empty(),
                    item: CategoryPreview {
                        category: category.clone(),
                        skills,
                    },
                }
            })
            .collect();
        SortedView::from_vec(previews)
    }
}

fn previewed<T: Previewable + Clone>(item: &T) -> Previewed<T> {
    Previewed {
        item: item.clone(),
        incomplete: item.is_incomplete(),
    }
}
