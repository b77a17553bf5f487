//! End-to-end behaviour of the guestbook routes.
//!
//! The full middleware stack is assembled the way the server does it, over
//! the in-memory adapters. A recording audit log and a failing repository
//! stand in where the tests need to observe or break a driven port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use guestbook::domain::ports::{
    AuditEntry, AuditLog, AuditOutcome, MessageRepository, MessageRepositoryError,
    OperationType, RateLimitPolicy,
};
use guestbook::domain::{
    GuestbookService, Message, MessageDraft, MessageFilter, MessageId, ReviewPolicy,
    ReviewStatus, TRACE_ID_HEADER,
};
use guestbook::inbound::http::routes::{RouteGuards, configure};
use guestbook::inbound::http::state::HttpState;
use guestbook::outbound::memory::{InMemoryMessageRepository, InMemoryRateLimiter};
use guestbook::{FaultTranslator, Trace};
use mockable::DefaultClock;
use pagination::PageResult;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct RecordingAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl RecordingAuditLog {
    fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit entries lock").clone()
    }
}

impl AuditLog for RecordingAuditLog {
    fn record(&self, entry: AuditEntry) {
        self.entries.lock().expect("audit entries lock").push(entry);
    }
}

/// Repository whose backing store is permanently unreachable.
struct UnreachableRepository;

impl UnreachableRepository {
    fn error() -> MessageRepositoryError {
        MessageRepositoryError::connection("connect to 10.1.2.3:5432 timed out")
    }
}

#[async_trait]
impl MessageRepository for UnreachableRepository {
    async fn insert(&self, _draft: MessageDraft) -> Result<Message, MessageRepositoryError> {
        Err(Self::error())
    }

    async fn list_approved(&self) -> Result<Vec<Message>, MessageRepositoryError> {
        Err(Self::error())
    }

    async fn page(
        &self,
        _filter: &MessageFilter,
    ) -> Result<PageResult<Message>, MessageRepositoryError> {
        Err(Self::error())
    }

    async fn update_review(
        &self,
        _ids: &[MessageId],
        _status: ReviewStatus,
    ) -> Result<u64, MessageRepositoryError> {
        Err(Self::error())
    }

    async fn delete_many(&self, _ids: &[MessageId]) -> Result<u64, MessageRepositoryError> {
        Err(Self::error())
    }
}

struct Harness {
    audit: RecordingAuditLog,
    guards: RouteGuards,
}

#[fixture]
fn harness() -> Harness {
    let audit = RecordingAuditLog::default();
    let guards = RouteGuards {
        limiter: Arc::new(InMemoryRateLimiter::new(Arc::new(DefaultClock))),
        submit_policy: RateLimitPolicy::new(Duration::from_secs(60), 1),
        trust_forwarded: false,
        audit: Arc::new(audit.clone()),
    };
    Harness { audit, guards }
}

async fn init<R>(
    repository: R,
    policy: ReviewPolicy,
    guards: RouteGuards,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl actix_web::body::MessageBody>,
    Error = actix_web::Error,
>
where
    R: MessageRepository + 'static,
{
    let service = GuestbookService::new(Arc::new(repository), Arc::new(DefaultClock), policy);
    let state = web::Data::new(HttpState::new(Arc::new(service)));
    actix_test::init_service(
        App::new()
            .app_data(state)
            .wrap(FaultTranslator)
            .wrap(Trace)
            .configure(move |cfg| configure(cfg, &guards)),
    )
    .await
}

fn submission(nickname: &str) -> Value {
    json!({
        "nickname": nickname,
        "avatar": "https://example.com/avatar.png",
        "messageContent": format!("{nickname} says hi"),
        "time": 6
    })
}

async fn send<S, B>(app: &S, request: actix_test::TestRequest) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    actix_test::read_body_json(response).await
}

#[rstest]
#[actix_web::test]
async fn second_submission_within_window_is_rejected(harness: Harness) {
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    let first = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/messages")
            .set_json(submission("Ada")),
    )
    .await;
    assert_eq!(first, json!({"code": 200, "message": "success", "data": null}));

    let second = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/messages")
            .set_json(submission("Ada")),
    )
    .await;
    assert_eq!(
        second,
        json!({
            "code": 51000,
            "message": "Too many requests, please try again later",
            "data": null
        })
    );

    let wall = send(&app, actix_test::TestRequest::get().uri("/messages")).await;
    assert_eq!(wall["data"].as_array().map(Vec::len), Some(1));
}

async fn submit_from<S, B>(app: &S, forwarded_for: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    send(
        app,
        actix_test::TestRequest::post()
            .uri("/messages")
            .peer_addr("198.51.100.9:41000".parse().expect("socket address"))
            .insert_header(("X-Forwarded-For", forwarded_for.to_owned()))
            .set_json(submission("Ada")),
    )
    .await
}

#[rstest]
#[actix_web::test]
async fn rotating_forwarded_headers_do_not_reset_the_budget(harness: Harness) {
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    let mut codes = Vec::new();
    for host in 0..5 {
        let body = submit_from(&app, &format!("10.0.0.{host}")).await;
        codes.push(body["code"].clone());
    }
    assert_eq!(codes, [200, 51000, 51000, 51000, 51000]);
}

#[rstest]
#[actix_web::test]
async fn trusted_proxy_headers_separate_callers(mut harness: Harness) {
    harness.guards.trust_forwarded = true;
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    assert_eq!(submit_from(&app, "10.0.0.1").await["code"], 200);
    assert_eq!(submit_from(&app, "10.0.0.2").await["code"], 200);
    assert_eq!(submit_from(&app, "10.0.0.1").await["code"], 51000);

    let wall = send(&app, actix_test::TestRequest::get().uri("/admin/messages")).await;
    assert_eq!(wall["data"]["count"], 2);
}

#[rstest]
#[actix_web::test]
async fn invalid_submission_does_not_consume_budget(harness: Harness) {
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    let rejected = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({"nickname": "Ada", "avatar": "a.png"})),
    )
    .await;
    assert_eq!(rejected["code"], 52000);
    assert_eq!(rejected["message"], "Message content must not be blank");

    let accepted = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/messages")
            .set_json(submission("Ada")),
    )
    .await;
    assert_eq!(accepted["code"], 200);
}

#[rstest]
#[actix_web::test]
async fn moderation_flow_publishes_pending_messages(harness: Harness) {
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::RequireApproval,
        harness.guards,
    )
    .await;

    send(
        &app,
        actix_test::TestRequest::post()
            .uri("/messages")
            .set_json(submission("<b>Grace</b>")),
    )
    .await;

    let wall = send(&app, actix_test::TestRequest::get().uri("/showMessages")).await;
    assert_eq!(wall["data"], json!([]));

    let pending = send(
        &app,
        actix_test::TestRequest::get().uri("/admin/messages?isReview=0"),
    )
    .await;
    assert_eq!(pending["data"]["count"], 1);
    let record = &pending["data"]["recordList"][0];
    assert_eq!(record["nickname"], "Grace");
    assert_eq!(record["isReview"], 0);
    let id = record["id"].as_u64().expect("numeric id");

    let reviewed = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/admin/messages/review")
            .set_json(json!({"idList": [id], "isReview": 1})),
    )
    .await;
    assert_eq!(reviewed["code"], 200);

    let wall = send(&app, actix_test::TestRequest::get().uri("/showMessages")).await;
    assert_eq!(wall["data"], json!(["Grace says hi"]));

    let entries = harness.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].operation, OperationType::Update);
    assert_eq!(entries[0].outcome, AuditOutcome::Succeeded);
}

#[rstest]
#[actix_web::test]
async fn delete_is_audited_and_idempotent(harness: Harness) {
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    for _ in 0..2 {
        let body = send(
            &app,
            actix_test::TestRequest::delete()
                .uri("/admin/messages")
                .set_json(json!([1, 2, 3])),
        )
        .await;
        assert_eq!(body, json!({"code": 200, "message": "success", "data": null}));
    }

    let entries = harness.audit.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| {
        entry.operation == OperationType::Remove
            && entry.method == "DELETE"
            && entry.path == "/admin/messages"
            && entry.trace_id.is_some()
    }));
}

#[rstest]
#[actix_web::test]
async fn review_with_missing_field_reports_first_violation(harness: Harness) {
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    let body = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/admin/messages/review")
            .set_json(json!({"isReview": 1})),
    )
    .await;
    assert_eq!(
        body,
        json!({"code": 52000, "message": "Message ids must not be null", "data": null})
    );

    let entries = harness.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, AuditOutcome::Failed { code: 52000 });
}

#[rstest]
#[actix_web::test]
async fn storage_failures_are_masked(harness: Harness) {
    let app = init(
        UnreachableRepository,
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    for request in [
        actix_test::TestRequest::get().uri("/messages"),
        actix_test::TestRequest::get().uri("/admin/messages"),
        actix_test::TestRequest::delete()
            .uri("/admin/messages")
            .set_json(json!([1])),
    ] {
        let body = send(&app, request).await;
        assert_eq!(
            body,
            json!({"code": 50000, "message": "System error", "data": null})
        );
        assert!(!body.to_string().contains("10.1.2.3"));
    }
}

#[rstest]
#[actix_web::test]
async fn oversized_body_is_a_system_error(harness: Harness) {
    let app = init(
        InMemoryMessageRepository::new(),
        ReviewPolicy::PublishImmediately,
        harness.guards,
    )
    .await;

    let huge = "x".repeat(3 * 1024 * 1024);
    let body = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({"nickname": "Ada", "avatar": "a.png", "messageContent": huge})),
    )
    .await;
    assert_eq!(body["code"], 50000);
    assert_eq!(body["message"], "System error");
}
