//! Report intake and review.
//!
//! Filing a report stores a [`Report`] and bumps the target's report metadata in the same call.
//! Review moves reports through a small status graph in which resolved and dismissed are
//! final.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::clock::{Clock, IdSequence};
use super::domain::{ForumPost, HousingListing, Listing, ModerationFlags, RecordId, UserId};
use super::store::{Record, RecordRepository, RepositoryError};

/// Reasons offered by the report dialog.
pub const REPORT_REASONS: [&str; 6] = [
    "Spam or misleading",
    "Inappropriate content",
    "Suspicious pricing",
    "Scam or fraud",
    "Harassment",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportedItemType {
    Listing,
    Housing,
    Post,
    Reply,
}

impl ReportedItemType {
    pub const fn label(self) -> &'static str {
        match self {
            ReportedItemType::Listing => "listing",
            ReportedItemType::Housing => "housing",
            ReportedItemType::Post => "post",
            ReportedItemType::Reply => "reply",
        }
    }
}

impl fmt::Display for ReportedItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportedItemType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "listing" => Ok(Self::Listing),
            "housing" => Ok(Self::Housing),
            "post" => Ok(Self::Post),
            "reply" => Ok(Self::Reply),
            other => Err(format!("unknown report item type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Dismissed)
    }

    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        match self {
            ReportStatus::Pending => next != ReportStatus::Pending,
            ReportStatus::Reviewed => next.is_terminal(),
            ReportStatus::Resolved | ReportStatus::Dismissed => false,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(format!("unknown report status '{other}'")),
        }
    }
}

/// Moderation flag raised against an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: RecordId,
    pub item_id: RecordId,
    pub item_type: ReportedItemType,
    pub reporter_id: UserId,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Report {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// What the report dialog submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub item_id: RecordId,
    pub item_type: ReportedItemType,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Records that carry report metadata directly.
pub trait Reportable: Record {
    const ITEM_TYPE: ReportedItemType;

    fn moderation(&self) -> &ModerationFlags;
    fn moderation_mut(&mut self) -> &mut ModerationFlags;
}

impl Reportable for Listing {
    const ITEM_TYPE: ReportedItemType = ReportedItemType::Listing;

    fn moderation(&self) -> &ModerationFlags {
        &self.moderation
    }

    fn moderation_mut(&mut self) -> &mut ModerationFlags {
        &mut self.moderation
    }
}

impl Reportable for HousingListing {
    const ITEM_TYPE: ReportedItemType = ReportedItemType::Housing;

    fn moderation(&self) -> &ModerationFlags {
        &self.moderation
    }

    fn moderation_mut(&mut self) -> &mut ModerationFlags {
        &mut self.moderation
    }
}

impl Reportable for ForumPost {
    const ITEM_TYPE: ReportedItemType = ReportedItemType::Post;

    fn moderation(&self) -> &ModerationFlags {
        &self.moderation
    }

    fn moderation_mut(&mut self) -> &mut ModerationFlags {
        &mut self.moderation
    }
}

/// Service composing the report store with the collections being reported on.
pub struct ReportRecorder<R> {
    reports: Arc<R>,
    clock: Arc<dyn Clock>,
    ids: IdSequence,
}

impl<R> ReportRecorder<R>
where
    R: RecordRepository<Report> + 'static,
{
    pub fn new(reports: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reports,
            clock,
            ids: IdSequence::new("rpt"),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.reports
    }

    /// File a report against a listing, housing unit, or post held in `targets`.
    pub fn file<T, S>(
        &self,
        targets: &S,
        reporter: &UserId,
        submission: ReportSubmission,
    ) -> Result<Report, ModerationError>
    where
        T: Reportable,
        S: RecordRepository<T> + ?Sized,
    {
        check_submission(&submission)?;
        if submission.item_type != T::ITEM_TYPE {
            return Err(ModerationError::ItemTypeMismatch {
                expected: T::ITEM_TYPE,
                found: submission.item_type,
            });
        }

        let target = targets
            .update_with(&submission.item_id, |target: &mut T| {
                target.moderation_mut().record_report();
                Ok::<_, RepositoryError>(())
            })
            .map_err(|err| match err {
                RepositoryError::NotFound => ModerationError::TargetNotFound {
                    item_type: submission.item_type,
                    item_id: submission.item_id.clone(),
                },
                other => other.into(),
            })?;
        let report_count = target.moderation().report_count;

        let report = self.store(reporter, submission)?;
        info!(
            report_id = %report.id,
            item_type = %report.item_type,
            item_id = %report.item_id,
            report_count,
            "report filed"
        );
        Ok(report)
    }

    /// File a report against a reply; the reply is located inside its thread.
    pub fn file_reply<S>(
        &self,
        posts: &S,
        reporter: &UserId,
        submission: ReportSubmission,
    ) -> Result<Report, ModerationError>
    where
        S: RecordRepository<ForumPost> + ?Sized,
    {
        check_submission(&submission)?;
        if submission.item_type != ReportedItemType::Reply {
            return Err(ModerationError::ItemTypeMismatch {
                expected: ReportedItemType::Reply,
                found: submission.item_type,
            });
        }

        let not_found = || ModerationError::TargetNotFound {
            item_type: ReportedItemType::Reply,
            item_id: submission.item_id.clone(),
        };
        let post_id = posts
            .all()?
            .into_iter()
            .find(|post| post.reply(&submission.item_id).is_some())
            .map(|post| post.id)
            .ok_or_else(not_found)?;
        let post = posts.update_with(&post_id, |post: &mut ForumPost| {
            let reply = post
                .replies
                .iter_mut()
                .find(|reply| reply.id == submission.item_id)
                .ok_or_else(not_found)?;
            reply.moderation.record_report();
            Ok::<_, ModerationError>(())
        })?;
        let report_count = post
            .reply(&submission.item_id)
            .map(|reply| reply.moderation.report_count)
            .unwrap_or_default();

        let report = self.store(reporter, submission)?;
        info!(
            report_id = %report.id,
            item_id = %report.item_id,
            %post_id,
            report_count,
            "reply report filed"
        );
        Ok(report)
    }

    /// Move a report to a new status, refreshing its update stamp.
    pub fn review(
        &self,
        report_id: &RecordId,
        status: ReportStatus,
    ) -> Result<Report, ModerationError> {
        let now = self.clock.now();
        let report = self
            .reports
            .update_with(report_id, |report: &mut Report| {
                if !report.status.can_transition_to(status) {
                    warn!(report_id = %report.id, from = %report.status, to = %status, "report transition refused");
                    return Err(ModerationError::InvalidTransition {
                        from: report.status,
                        to: status,
                    });
                }
                report.status = status;
                report.updated_at = now;
                Ok(())
            })?;
        info!(report_id = %report.id, status = %report.status, "report reviewed");
        Ok(report)
    }

    /// Open reports, oldest first so moderators work the queue in arrival order.
    pub fn pending(&self) -> Result<Vec<Report>, ModerationError> {
        let mut open: Vec<Report> = self
            .reports
            .all()?
            .into_iter()
            .filter(|report| report.status == ReportStatus::Pending)
            .collect();
        open.sort_by_key(|report| report.created_at);
        Ok(open)
    }

    pub fn for_item(&self, item_id: &RecordId) -> Result<Vec<Report>, ModerationError> {
        Ok(self
            .reports
            .all()?
            .into_iter()
            .filter(|report| &report.item_id == item_id)
            .collect())
    }

    fn store(
        &self,
        reporter: &UserId,
        submission: ReportSubmission,
    ) -> Result<Report, ModerationError> {
        let now = self.clock.now();
        let report = Report {
            id: self.ids.next_id(),
            item_id: submission.item_id,
            item_type: submission.item_type,
            reporter_id: reporter.clone(),
            reason: submission.reason.trim().to_string(),
            description: submission
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            status: ReportStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        Ok(self.reports.insert(report)?)
    }
}

fn check_submission(submission: &ReportSubmission) -> Result<(), ModerationError> {
    if submission.reason.trim().is_empty() {
        return Err(ModerationError::MissingReason);
    }
    Ok(())
}

/// Error raised by the report recorder.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("a report reason is required")]
    MissingReason,
    #[error("report targets a {found} but was filed against {expected} records")]
    ItemTypeMismatch {
        expected: ReportedItemType,
        found: ReportedItemType,
    },
    #[error("{item_type} {item_id} not found")]
    TargetNotFound {
        item_type: ReportedItemType,
        item_id: RecordId,
    },
    #[error("report cannot move from {from} to {to}")]
    InvalidTransition {
        from: ReportStatus,
        to: ReportStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_final() {
        for next in [
            ReportStatus::Pending,
            ReportStatus::Reviewed,
            ReportStatus::Resolved,
            ReportStatus::Dismissed,
        ] {
            assert!(!ReportStatus::Resolved.can_transition_to(next));
            assert!(!ReportStatus::Dismissed.can_transition_to(next));
        }
    }

    #[test]
    fn reviewed_only_moves_forward() {
        assert!(ReportStatus::Reviewed.can_transition_to(ReportStatus::Resolved));
        assert!(ReportStatus::Reviewed.can_transition_to(ReportStatus::Dismissed));
        assert!(!ReportStatus::Reviewed.can_transition_to(ReportStatus::Pending));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Dismissed));
        assert!(!ReportStatus::Pending.can_transition_to(ReportStatus::Pending));
    }

    #[test]
    fn item_types_parse_labels() {
        assert_eq!("Reply".parse::<ReportedItemType>(), Ok(ReportedItemType::Reply));
        assert!("event".parse::<ReportedItemType>().is_err());
    }
}
