// Comment panel state per post. Visibility and load state are tracked
// separately: closing a loaded panel hides it without evicting the data.

use crate::models::Comment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    pub(crate) visible: bool,
    pub(crate) phase: LoadPhase,
    pub(crate) comments: Vec<Comment>,
}

impl CommentThread {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == LoadPhase::Loaded
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }
}
