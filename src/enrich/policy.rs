//! Two-attempt translation policy.
//!
//! ```text
//! Pending ──▶ Attempt1 ──▶ Succeeded
//!                │  └────▶ Failed(kind)
//!                ▼ (prohibited content)
//!             Attempt2 ──▶ Succeeded | Failed(kind)
//! ```
//!
//! The first attempt translates title and synopsis. Only a prohibited-content
//! block earns a second, title-only attempt; every other failure is final.
//! Transitions are pure so the policy can be tested without any network code.

use crate::AniranError;
use crate::types::{AnimeRecord, TranslationCandidate, TranslationErrorKind};

use super::validity::is_valid_for;

/// Which request an attempt sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    /// Title and synopsis.
    Full,
    /// Title only; the synopsis is what got blocked.
    TitleOnly,
}

impl AttemptKind {
    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            AttemptKind::Full => "full",
            AttemptKind::TitleOnly => "title_only",
        }
    }
}

/// A translation the policy has accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTranslation {
    pub persian_title: String,
    /// `None` when only the title was translated.
    pub persian_synopsis: Option<String>,
}

/// Result of one attempt, reduced to what the policy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Translation passed the validity check.
    Valid(TranslationCandidate),
    /// Translation came back but echoed a source title or was empty.
    Invalid,
    RateLimited,
    /// Blocked for prohibited content.
    Blocked,
    /// Any other failure.
    Failed,
}

impl AttemptOutcome {
    /// Classify a translation result against the record it translates.
    pub fn classify(
        result: &Result<TranslationCandidate, AniranError>,
        record: &AnimeRecord,
    ) -> Self {
        match result {
            Ok(candidate) if is_valid_for(candidate.persian_title.as_deref(), record) => {
                AttemptOutcome::Valid(candidate.clone())
            }
            Ok(_) => AttemptOutcome::Invalid,
            Err(AniranError::RateLimited) => AttemptOutcome::RateLimited,
            Err(e) if e.is_prohibited_content() => AttemptOutcome::Blocked,
            Err(_) => AttemptOutcome::Failed,
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Valid(_) => "accepted",
            AttemptOutcome::Invalid => "rejected",
            AttemptOutcome::RateLimited => "rate_limit",
            AttemptOutcome::Blocked => "blocked",
            AttemptOutcome::Failed => "error",
        }
    }
}

/// Where the translation sub-flow stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationState {
    Pending,
    Attempt1,
    Attempt2,
    Succeeded(AcceptedTranslation),
    Failed(TranslationErrorKind),
}

impl TranslationState {
    /// The attempt to make next, or `None` once the flow has finished.
    ///
    /// `Pending` reports the first attempt without changing state; call
    /// [`next`](Self::next) with its outcome.
    pub fn pending_attempt(&self) -> Option<AttemptKind> {
        match self {
            TranslationState::Pending | TranslationState::Attempt1 => Some(AttemptKind::Full),
            TranslationState::Attempt2 => Some(AttemptKind::TitleOnly),
            TranslationState::Succeeded(_) | TranslationState::Failed(_) => None,
        }
    }

    /// Advance with the outcome of the attempt reported by
    /// [`pending_attempt`](Self::pending_attempt). Terminal states are unchanged.
    pub fn next(self, outcome: AttemptOutcome) -> Self {
        match self {
            TranslationState::Pending | TranslationState::Attempt1 => match outcome {
                AttemptOutcome::Valid(candidate) => {
                    TranslationState::Succeeded(AcceptedTranslation {
                        persian_title: candidate.persian_title.unwrap_or_default(),
                        persian_synopsis: candidate.persian_synopsis,
                    })
                }
                AttemptOutcome::Blocked => TranslationState::Attempt2,
                AttemptOutcome::RateLimited => {
                    TranslationState::Failed(TranslationErrorKind::RateLimit)
                }
                AttemptOutcome::Invalid | AttemptOutcome::Failed => {
                    TranslationState::Failed(TranslationErrorKind::GeneralFailure)
                }
            },
            TranslationState::Attempt2 => match outcome {
                AttemptOutcome::Valid(candidate) => {
                    TranslationState::Succeeded(AcceptedTranslation {
                        persian_title: candidate.persian_title.unwrap_or_default(),
                        persian_synopsis: None,
                    })
                }
                AttemptOutcome::RateLimited => {
                    TranslationState::Failed(TranslationErrorKind::RateLimit)
                }
                AttemptOutcome::Invalid | AttemptOutcome::Blocked | AttemptOutcome::Failed => {
                    TranslationState::Failed(TranslationErrorKind::GeneralFailure)
                }
            },
            terminal => terminal,
        }
    }

    /// Whether no further attempts will be made.
    pub fn is_terminal(&self) -> bool {
        self.pending_attempt().is_none()
    }
}
