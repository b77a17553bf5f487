//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every guestbook route and the concrete envelope
//! schemas from [`crate::inbound::http::schemas`]. The document is served by
//! Swagger UI in debug builds and exported via `cargo run --bin openapi-dump`.

use crate::domain::{MessageBackView, MessageView};
use crate::inbound::http::messages::{MessageRequest, ReviewRequest};
use crate::inbound::http::schemas::{
    ContentListEnvelopeSchema, EmptyEnvelopeSchema, MessageListEnvelopeSchema,
    MessagePageEnvelopeSchema, MessagePageSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the guestbook API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Guestbook API",
        description = "Visitor messages and their moderation. Every response is a 200 envelope; failures are signalled by `code`."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::messages::save_message,
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::messages::show_messages,
        crate::inbound::http::messages::list_message_back,
        crate::inbound::http::messages::update_messages_review,
        crate::inbound::http::messages::delete_messages,
    ),
    components(schemas(
        MessageRequest,
        ReviewRequest,
        MessageView,
        MessageBackView,
        EmptyEnvelopeSchema,
        MessageListEnvelopeSchema,
        ContentListEnvelopeSchema,
        MessagePageSchema,
        MessagePageEnvelopeSchema,
    )),
    tags(
        (name = "messages", description = "Public guestbook wall"),
        (name = "admin", description = "Moderation console")
    )
)]
pub struct ApiDoc;
