//! Guestbook message entity and its read models.
//!
//! [`Message`] is the stored aggregate. [`MessageView`] is the public shape
//! shown on the guestbook wall and [`MessageBackView`] is the moderation shape
//! used by the admin console. Serialised field names are camelCase.

use std::fmt;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Identifier assigned to a message when it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u32);

impl MessageId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for MessageId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Moderation state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    /// Waiting for a moderator; hidden from the public wall.
    Pending,
    /// Visible on the public wall.
    Approved,
}

/// Raised when a review flag is neither `0` nor `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("review flag must be 0 or 1, got {0}")]
pub struct InvalidReviewFlag(pub u8);

impl ReviewStatus {
    /// Parse the `isReview` wire flag.
    ///
    /// # Examples
    /// ```
    /// use guestbook::domain::ReviewStatus;
    ///
    /// assert_eq!(ReviewStatus::from_flag(1), Ok(ReviewStatus::Approved));
    /// assert!(ReviewStatus::from_flag(7).is_err());
    /// ```
    pub const fn from_flag(flag: u8) -> Result<Self, InvalidReviewFlag> {
        match flag {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Approved),
            other => Err(InvalidReviewFlag(other)),
        }
    }

    /// Wire flag for this status.
    #[must_use]
    pub const fn as_flag(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
        }
    }
}

/// Submission accepted from a visitor, prior to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub nickname: String,
    pub avatar: String,
    pub content: String,
    /// Danmaku scroll time chosen by the visitor, in seconds.
    pub speed: Option<u32>,
    pub ip_address: String,
}

/// Fully prepared record handed to the repository for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub nickname: String,
    pub avatar: String,
    pub content: String,
    pub speed: Option<u32>,
    pub ip_address: String,
    pub review: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

/// Stored guestbook message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub nickname: String,
    pub avatar: String,
    pub content: String,
    pub speed: Option<u32>,
    pub ip_address: String,
    pub review: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Assign an identifier to a draft.
    #[must_use]
    pub fn from_draft(id: MessageId, draft: MessageDraft) -> Self {
        let MessageDraft {
            nickname,
            avatar,
            content,
            speed,
            ip_address,
            review,
            created_at,
        } = draft;
        Self {
            id,
            nickname,
            avatar,
            content,
            speed,
            ip_address,
            review,
            created_at,
        }
    }
}

/// Public read model for the guestbook wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[schema(value_type = u32, example = 1)]
    pub id: MessageId,
    #[schema(example = "Ada")]
    pub nickname: String,
    pub avatar: String,
    #[schema(example = "Lovely blog!")]
    pub message_content: String,
    pub time: Option<u32>,
}

impl From<Message> for MessageView {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            nickname: value.nickname,
            avatar: value.avatar,
            message_content: value.content,
            time: value.speed,
        }
    }
}

/// Moderation read model including network origin and review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageBackView {
    #[schema(value_type = u32, example = 1)]
    pub id: MessageId,
    pub nickname: String,
    pub avatar: String,
    #[schema(example = "203.0.113.7")]
    pub ip_address: String,
    pub message_content: String,
    /// `1` when approved, `0` while pending.
    #[schema(example = 1)]
    pub is_review: u8,
    pub create_time: DateTime<Utc>,
}

impl From<Message> for MessageBackView {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            nickname: value.nickname,
            avatar: value.avatar,
            ip_address: value.ip_address,
            message_content: value.content,
            is_review: value.review.as_flag(),
            create_time: value.created_at,
        }
    }
}

/// Moderation list criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub page: PageRequest,
    /// Case-insensitive substring matched against the nickname.
    pub keywords: Option<String>,
    pub review: Option<ReviewStatus>,
}

impl MessageFilter {
    /// Whether `message` satisfies the keyword and review criteria.
    #[must_use]
    pub fn matches(&self, message: &Message) -> bool {
        let keyword_ok = self.keywords.as_deref().is_none_or(|needle| {
            message
                .nickname
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let review_ok = self.review.is_none_or(|status| message.review == status);
        keyword_ok && review_ok
    }
}

/// Moderator decision applied to a batch of messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDecision {
    pub ids: Vec<MessageId>,
    pub status: ReviewStatus,
}

/// Remove markup from visitor-supplied text.
///
/// Anything between `<` and the next `>` is dropped, so tags and inline
/// handlers never reach the rendered wall. An unterminated `<` drops the rest
/// of the input.
///
/// # Examples
/// ```
/// use guestbook::domain::strip_markup;
///
/// assert_eq!(strip_markup("<b>hi</b> there"), "hi there");
/// ```
#[must_use]
pub fn strip_markup(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match (in_tag, ch) {
            (false, '<') => in_tag = true,
            (true, '>') => in_tag = false,
            (false, other) => output.push(other),
            (true, _) => {}
        }
    }
    output
}
