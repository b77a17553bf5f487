//! OpenAPI schema definitions for envelope shapes.
//!
//! [`Envelope`](crate::inbound::http::Envelope) and
//! [`PageResult`](pagination::PageResult) are generic and stay free of
//! `utoipa` derives. The concrete shapes each route returns are described
//! here instead.

#![expect(
    dead_code,
    reason = "Fields exist only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

use crate::domain::{MessageBackView, MessageView};

/// Envelope whose `data` is always `null`.
///
/// Also the shape of every failure response.
#[derive(ToSchema)]
#[schema(as = EmptyEnvelope)]
pub struct EmptyEnvelopeSchema {
    /// `200` on success; `50000`, `51000` or `52000` on failure.
    #[schema(example = 200)]
    code: i32,
    #[schema(example = "success")]
    message: String,
    #[schema(value_type = Option<Object>)]
    data: Option<serde_json::Value>,
}

/// Envelope carrying the public message wall.
#[derive(ToSchema)]
#[schema(as = MessageListEnvelope)]
pub struct MessageListEnvelopeSchema {
    #[schema(example = 200)]
    code: i32,
    #[schema(example = "success")]
    message: String,
    data: Option<Vec<MessageView>>,
}

/// Envelope carrying message contents only.
#[derive(ToSchema)]
#[schema(as = ContentListEnvelope)]
pub struct ContentListEnvelopeSchema {
    #[schema(example = 200)]
    code: i32,
    #[schema(example = "success")]
    message: String,
    #[schema(example = json!(["Lovely blog!"]))]
    data: Option<Vec<String>>,
}

/// One page of moderation records.
#[derive(ToSchema)]
#[schema(as = MessagePage, rename_all = "camelCase")]
pub struct MessagePageSchema {
    record_list: Vec<MessageBackView>,
    /// Matching records across all pages.
    #[schema(example = 42)]
    count: u64,
}

/// Envelope carrying a moderation page.
#[derive(ToSchema)]
#[schema(as = MessagePageEnvelope)]
pub struct MessagePageEnvelopeSchema {
    #[schema(example = 200)]
    code: i32,
    #[schema(example = "success")]
    message: String,
    data: Option<MessagePageSchema>,
}
