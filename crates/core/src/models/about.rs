use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Document, OrderedEntity};
use crate::ids::{DocumentId, ParagraphId};
use crate::validation::{Checker, Validate, ValidationErrors};

pub const MAX_PARAGRAPH_CHARS: usize = 2000;
pub const MIN_PARAGRAPHS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutParagraph {
    pub id: ParagraphId,
    pub text: String,
    pub order: u32,
}

impl AboutParagraph {
    /// A new empty paragraph with a locally minted id.
    pub fn blank(order: u32) -> Self {
        Self {
            id: ParagraphId::new(),
            text: String::new(),
            order,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl OrderedEntity for AboutParagraph {
    type Id = ParagraphId;
    type Scope = ();

    fn id(&self) -> &ParagraphId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn scope(&self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub id: DocumentId,
    pub content: Vec<AboutParagraph>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The whole paragraph array, replaced atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutPatch {
    pub content: Vec<AboutParagraph>,
}

impl Validate for AboutPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checker = Checker::new();
        if self.content.len() < MIN_PARAGRAPHS {
            checker.push("content", "At least one paragraph is required");
        }
        for (i, p) in self.content.iter().enumerate() {
            let field = format!("content[{i}].text");
            checker
                .not_blank(&field, &p.text)
                .length(&field, &p.text, 0, MAX_PARAGRAPH_CHARS);
        }
        checker.finish()
    }
}

impl Document for About {
    type Patch = AboutPatch;

    const LABEL: &'static str = "About section";
}
