//! JSON actions accepted by `sectionsync exec`.
//!
//! ```json
//! {"action": "section_update", "parentId": "root", "sectionTitle": "Log", "rawText": "..."}
//! {"action": "replace_block", "parentId": "p", "matchText": "old", "newKind": "paragraph", "newContent": "new"}
//! ```

use serde::Deserialize;

use sectionsync_core::{
    Outcome, RemoteDocumentStore, ReplaceBlockRequest, ReplaceSectionRequest, SectionReplacer,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    #[serde(alias = "notion_section_update")]
    SectionUpdate(ReplaceSectionRequest),

    #[serde(alias = "notion_replace_block")]
    ReplaceBlock(ReplaceBlockRequest),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SectionUpdate(_) => "section_update",
            Action::ReplaceBlock(_) => "replace_block",
        }
    }

    pub fn dispatch<S: RemoteDocumentStore>(&self, replacer: &SectionReplacer<S>) -> Outcome {
        tracing::debug!(action = self.name(), "dispatching action");
        let result = match self {
            Action::SectionUpdate(request) => replacer.replace(request),
            Action::ReplaceBlock(request) => replacer.replace_block(request),
        };
        Outcome::from_result(result)
    }
}
