//! Guestbook message handlers.
//!
//! ```text
//! POST   /messages                {"nickname":"Ada","avatar":"a.png","messageContent":"Hi"}
//! GET    /messages
//! GET    /showMessages
//! GET    /admin/messages?current=1&size=10&keywords=ada&isReview=0
//! PUT    /admin/messages/review   {"idList":[1,2],"isReview":1}
//! DELETE /admin/messages          [1,2,3]
//! ```
//!
//! Handlers are plain functions so [`crate::inbound::http::routes`] can
//! attach the rate limit and audit middleware per route.

use actix_web::{HttpRequest, web};
use pagination::{PageRequest, PageRequestError, PageResult};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Fault, FieldError, MessageBackView, MessageFilter, MessageId, MessageView, NewMessage,
    ReviewDecision, ReviewStatus,
};
use crate::inbound::http::envelope::{ApiResult, Envelope};
use crate::inbound::http::remote_address;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldChecks, Validate, ValidJson};

const NICKNAME_BLANK: &str = "Nickname must not be blank";
const AVATAR_BLANK: &str = "Avatar must not be blank";
const CONTENT_BLANK: &str = "Message content must not be blank";
const IDS_MISSING: &str = "Message ids must not be null";
const REVIEW_MISSING: &str = "Review status must not be null";
const REVIEW_INVALID: &str = "Review status must be 0 or 1";
const PAGE_INVALID: &str = "Page number must be at least 1";
const SIZE_INVALID: &str = "Page size must be between 1 and 100";

/// Visitor submission body for `POST /messages`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    #[schema(example = "Ada")]
    pub nickname: Option<String>,
    #[schema(example = "https://example.com/ada.png")]
    pub avatar: Option<String>,
    #[schema(example = "Lovely blog!")]
    pub message_content: Option<String>,
    /// Danmaku scroll time in seconds.
    #[schema(example = 8)]
    pub time: Option<u32>,
}

/// Submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSubmission {
    pub nickname: String,
    pub avatar: String,
    pub content: String,
    pub time: Option<u32>,
}

impl MessageSubmission {
    /// Attach the caller's address to build the domain command.
    #[must_use]
    pub fn into_new_message(self, ip_address: String) -> NewMessage {
        NewMessage {
            nickname: self.nickname,
            avatar: self.avatar,
            content: self.content,
            speed: self.time,
            ip_address,
        }
    }
}

impl Validate for MessageRequest {
    type Valid = MessageSubmission;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>> {
        let mut checks = FieldChecks::default();
        let nickname = checks.not_blank("nickname", self.nickname, NICKNAME_BLANK);
        let avatar = checks.not_blank("avatar", self.avatar, AVATAR_BLANK);
        let content = checks.not_blank("messageContent", self.message_content, CONTENT_BLANK);
        match (nickname, avatar, content) {
            (Some(nickname), Some(avatar), Some(content)) => Ok(MessageSubmission {
                nickname,
                avatar,
                content,
                time: self.time,
            }),
            _ => Err(checks.into_errors()),
        }
    }
}

/// Moderator decision body for `PUT /admin/messages/review`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[schema(value_type = Option<Vec<u32>>, example = json!([1, 2]))]
    pub id_list: Option<Vec<MessageId>>,
    /// `1` approves, `0` withdraws approval.
    #[schema(example = 1)]
    pub is_review: Option<i32>,
}

fn review_status(flag: i32) -> Option<ReviewStatus> {
    u8::try_from(flag)
        .ok()
        .and_then(|flag| ReviewStatus::from_flag(flag).ok())
}

impl Validate for ReviewRequest {
    type Valid = ReviewDecision;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>> {
        let mut checks = FieldChecks::default();
        let ids = checks.present("idList", self.id_list, IDS_MISSING);
        let status = checks
            .present("isReview", self.is_review, REVIEW_MISSING)
            .and_then(|flag| {
                let status = review_status(flag);
                if status.is_none() {
                    checks.reject("isReview", REVIEW_INVALID);
                }
                status
            });
        match (ids, status) {
            (Some(ids), Some(status)) => Ok(ReviewDecision { ids, status }),
            _ => Err(checks.into_errors()),
        }
    }
}

/// Moderation list criteria for `GET /admin/messages`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConditionQuery {
    /// 1-based page number, default 1.
    pub current: Option<u64>,
    /// Page size, default 10, at most 100.
    pub size: Option<u64>,
    /// Case-insensitive nickname fragment.
    pub keywords: Option<String>,
    /// `0` for pending, `1` for approved; omit for both.
    pub is_review: Option<i32>,
}

impl Validate for ConditionQuery {
    type Valid = MessageFilter;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>> {
        let mut checks = FieldChecks::default();
        let page = match PageRequest::from_parts(self.current, self.size) {
            Ok(page) => Some(page),
            Err(PageRequestError::ZeroPage) => {
                checks.reject("current", PAGE_INVALID);
                None
            }
            Err(PageRequestError::ZeroSize | PageRequestError::SizeTooLarge { .. }) => {
                checks.reject("size", SIZE_INVALID);
                None
            }
        };
        let review = match self.is_review {
            None => Some(None),
            Some(flag) => {
                let status = review_status(flag);
                if status.is_none() {
                    checks.reject("isReview", REVIEW_INVALID);
                }
                status.map(Some)
            }
        };
        let keywords = self
            .keywords
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        match (page, review) {
            (Some(page), Some(review)) => Ok(MessageFilter {
                page,
                keywords,
                review,
            }),
            _ => Err(checks.into_errors()),
        }
    }
}

/// Submit a guestbook message.
///
/// Limited per caller address; see the route registration for the budget.
#[utoipa::path(
    post,
    path = "/messages",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Envelope; `data` is null. Failures carry codes 50000/51000/52000", body = crate::inbound::http::schemas::EmptyEnvelopeSchema)
    ),
    tags = ["messages"],
    operation_id = "saveMessage"
)]
pub async fn save_message(
    state: web::Data<HttpState>,
    request: HttpRequest,
    ValidJson(submission): ValidJson<MessageRequest>,
) -> ApiResult<()> {
    let ip_address = remote_address(&request.connection_info());
    state
        .messages
        .save_message(submission.into_new_message(ip_address))
        .await?;
    Ok(Envelope::empty())
}

/// List messages shown on the public wall.
#[utoipa::path(
    get,
    path = "/messages",
    responses(
        (status = 200, description = "Approved messages", body = crate::inbound::http::schemas::MessageListEnvelopeSchema)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
pub async fn list_messages(state: web::Data<HttpState>) -> ApiResult<Vec<MessageView>> {
    let messages = state.messages.list_messages().await?;
    Ok(Envelope::ok(messages))
}

/// List the text of every message on the public wall.
#[utoipa::path(
    get,
    path = "/showMessages",
    responses(
        (status = 200, description = "Approved message contents", body = crate::inbound::http::schemas::ContentListEnvelopeSchema)
    ),
    tags = ["messages"],
    operation_id = "showMessages"
)]
pub async fn show_messages(state: web::Data<HttpState>) -> ApiResult<Vec<String>> {
    let contents = state
        .messages
        .list_messages()
        .await?
        .into_iter()
        .map(|view| view.message_content)
        .collect();
    Ok(Envelope::ok(contents))
}

/// Page through messages for moderation.
#[utoipa::path(
    get,
    path = "/admin/messages",
    params(ConditionQuery),
    responses(
        (status = 200, description = "Moderation page", body = crate::inbound::http::schemas::MessagePageEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "listMessageBack"
)]
pub async fn list_message_back(
    state: web::Data<HttpState>,
    query: web::Query<ConditionQuery>,
) -> ApiResult<PageResult<MessageBackView>> {
    let filter = query.into_inner().validate().map_err(Fault::validation)?;
    let page = state.messages.list_message_back(filter).await?;
    Ok(Envelope::ok(page))
}

/// Approve or withdraw a batch of messages.
#[utoipa::path(
    put,
    path = "/admin/messages/review",
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Envelope; `data` is null", body = crate::inbound::http::schemas::EmptyEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "updateMessagesReview"
)]
pub async fn update_messages_review(
    state: web::Data<HttpState>,
    ValidJson(decision): ValidJson<ReviewRequest>,
) -> ApiResult<()> {
    state.messages.update_messages_review(decision).await?;
    Ok(Envelope::empty())
}

/// Delete messages by id.
#[utoipa::path(
    delete,
    path = "/admin/messages",
    request_body(content = Vec<u32>, description = "Identifiers to delete", example = json!([1, 2, 3])),
    responses(
        (status = 200, description = "Envelope; `data` is null", body = crate::inbound::http::schemas::EmptyEnvelopeSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteMessages"
)]
pub async fn delete_messages(
    state: web::Data<HttpState>,
    ids: web::Json<Vec<MessageId>>,
) -> ApiResult<()> {
    state.messages.remove_by_ids(ids.into_inner()).await?;
    Ok(Envelope::empty())
}
