//! Weekly review use-case service.
//!
//! # Responsibility
//! - Expose the fixed review checklist and track per-session progress.
//! - Finalize sessions into persistent [`WeeklyReview`] records.
//!
//! # Invariants
//! - The checklist is a fixed, ordered, hard-coded sequence; it is never
//!   stored or user-editable.
//! - Session progress is in-memory only; an abandoned session leaves no
//!   trace in storage.
//! - Finalizing is always allowed, whatever the toggle progress.

use crate::model::review::WeeklyReview;
use crate::model::UserId;
use crate::repo::review_repo::ReviewRepository;
use crate::repo::RepoError;
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One step of the weekly review checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// The fixed weekly review sequence, in presentation order.
const CHECKLIST: [ChecklistEntry; 7] = [
    ChecklistEntry {
        id: "clear_inbox",
        title: "Clear Inbox to Zero",
        description:
            "Process all items in your inbox - decide what each item is and what to do with it",
    },
    ChecklistEntry {
        id: "review_next_actions",
        title: "Review Next Actions",
        description:
            "Review all next action lists for each context - mark complete, update, or delete",
    },
    ChecklistEntry {
        id: "review_waiting_for",
        title: "Review Waiting For",
        description: "Check on delegated items - follow up on anything overdue",
    },
    ChecklistEntry {
        id: "review_projects",
        title: "Review Projects",
        description:
            "Review each project - ensure at least one next action exists for active projects",
    },
    ChecklistEntry {
        id: "review_someday",
        title: "Review Someday/Maybe",
        description: "Review someday/maybe list - move items to active if appropriate",
    },
    ChecklistEntry {
        id: "review_calendar",
        title: "Review Calendar",
        description: "Review past and upcoming calendar events - capture any actions needed",
    },
    ChecklistEntry {
        id: "review_goals",
        title: "Review Goals & Vision",
        description: "Review higher horizons - ensure projects align with goals",
    },
];

/// Returns the fixed checklist in presentation order.
pub fn checklist() -> &'static [ChecklistEntry] {
    &CHECKLIST
}

/// In-memory progress of one review sitting.
///
/// Holds the set of checked-off entry ids. Dropping the session discards
/// the progress.
#[derive(Debug, Default)]
pub struct ReviewSession {
    checked: HashSet<&'static str>,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one entry between checked and unchecked.
    ///
    /// Unknown ids are ignored, so toggling is idempotent per id and a
    /// stale id from a caller cannot corrupt progress accounting.
    pub fn toggle(&mut self, entry_id: &str) {
        let Some(entry) = CHECKLIST.iter().find(|entry| entry.id == entry_id) else {
            return;
        };
        if !self.checked.remove(entry.id) {
            self.checked.insert(entry.id);
        }
    }

    pub fn is_checked(&self, entry_id: &str) -> bool {
        self.checked.contains(entry_id)
    }

    /// Count of checked entries, for progress display.
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn is_complete(&self) -> bool {
        self.checked.len() == CHECKLIST.len()
    }

    fn clear(&mut self) {
        self.checked.clear();
    }
}

/// Errors from weekly review operations.
#[derive(Debug)]
pub enum ReviewServiceError {
    Repo(RepoError),
}

impl Display for ReviewServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReviewServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ReviewServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Weekly review service over an injected repository.
pub struct ReviewService<R: ReviewRepository> {
    reviews: R,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(reviews: R) -> Self {
        Self { reviews }
    }

    /// Finalizes a sitting: persists one review record and resets the
    /// session. Allowed at any progress level.
    pub fn complete_review(
        &self,
        owner: UserId,
        session: &mut ReviewSession,
        notes: Option<String>,
    ) -> Result<WeeklyReview, ReviewServiceError> {
        let review = WeeklyReview::new(owner, notes);
        self.reviews.create_review(&review)?;
        session.clear();

        info!(
            "event=review_complete module=service status=ok review={}",
            review.id
        );
        Ok(review)
    }

    /// Lists the owner's review history, newest first.
    pub fn list_reviews(&self, owner: UserId) -> Result<Vec<WeeklyReview>, ReviewServiceError> {
        Ok(self.reviews.list_reviews(owner)?)
    }
}
