//! Runs `HttpBackend` against an in-process axum server.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tutor_core::chat::{ChatMetadata, SessionState, TranscriptEntry, TranscriptRole, Turn};
use tutor_core::config::ClientConfig;
use tutor_core::remote::{AiReply, AiReplyFetcher, ChatGenerator, ChatStore, ReplyFetcher};
use tutor_core::TutorError;
use tutor_infrastructure::HttpBackend;

#[derive(Default)]
struct Recorded {
    cookies: Vec<String>,
    bodies: Vec<Value>,
    stored: Option<Value>,
}

type Shared = Arc<Mutex<Recorded>>;

fn record(state: &Shared, headers: &HeaderMap, body: Option<Value>) {
    let mut recorded = state.lock().unwrap();
    if let Some(cookie) = headers.get("cookie").and_then(|v| v.to_str().ok()) {
        recorded.cookies.push(cookie.to_string());
    }
    if let Some(body) = body {
        recorded.bodies.push(body);
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn backend(base_url: String, cookie: Option<&str>) -> HttpBackend {
    let mut config = ClientConfig::default();
    config.base_url = base_url;
    config.session_cookie = cookie.map(str::to_string);
    HttpBackend::new(config).unwrap()
}

fn tutor_router(state: Shared) -> Router {
    async fn load(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
        record(&state, &headers, None);
        let stored = state.lock().unwrap().stored.clone();
        Json(stored.unwrap_or(Value::Null))
    }

    async fn save(
        State(state): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        record(&state, &headers, Some(body.clone()));
        // The server keeps these three sections and nothing else.
        let kept = json!({
            "active": body.get("active").cloned().unwrap_or_else(|| json!({})),
            "archived": body.get("archived").cloned().unwrap_or_else(|| json!({})),
            "meta": body.get("meta").cloned().unwrap_or_else(|| json!({})),
        });
        state.lock().unwrap().stored = Some(kept);
        StatusCode::NO_CONTENT
    }

    async fn reply(
        State(state): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        record(&state, &headers, Some(body.clone()));
        match body["message"].as_str() {
            Some("2x+4=0") => Json(json!({
                "reply": "Simplify or solve?",
                "type": "algebra_options",
                "expr": "2x+4=0"
            })),
            Some("silent") => Json(json!({})),
            _ => Json(json!({"reply": "2"})),
        }
    }

    async fn ai_reply(
        State(state): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        record(&state, &headers, Some(body.clone()));
        match body["chat_id"].as_str() {
            Some("limited") => (StatusCode::OK, Json(json!({"error": "rate limited"}))),
            Some("broken") => (StatusCode::BAD_GATEWAY, Json(json!({}))),
            _ => (StatusCode::OK, Json(json!({"reply": "x = 1"}))),
        }
    }

    async fn new_ai_chat(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        match body["topic"].as_str() {
            Some("quota") => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": "quota exceeded"})),
            ),
            Some("crash") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
            Some("garbled") => (StatusCode::OK, Json(json!({"chat_name": "Orphan"}))),
            _ => (
                StatusCode::OK,
                Json(json!({
                    "chat_name": "Fractions",
                    "messages": [{"user": "", "bot": "Let's practise fractions."}]
                })),
            ),
        }
    }

    Router::new()
        .route("/api/chats", get(load).post(save))
        .route("/send", post(reply))
        .route("/ai_reply", post(ai_reply))
        .route("/new_ai_chat", post(new_ai_chat))
        .with_state(state)
}

#[tokio::test]
async fn test_empty_store_loads_as_none() {
    let state = Shared::default();
    let base = spawn(tutor_router(state)).await;
    assert_eq!(backend(base, None).load().await.unwrap(), None);
}

#[tokio::test]
async fn test_snapshot_round_trip_sends_cookie() {
    let state = Shared::default();
    let base = spawn(tutor_router(state.clone())).await;
    let backend = backend(base, Some("session=abc123"));

    let mut snapshot = tutor_core::chat::ChatSnapshot::default();
    snapshot
        .active
        .insert("Chat 1".into(), vec![Turn { user: "hi".into(), bot: "2".into() }]);
    snapshot.meta.insert("Chat 1".into(), ChatMetadata::ai());
    snapshot.archived.insert(
        "Old".into(),
        tutor_core::chat::ArchivedChat {
            turns: vec![Turn::pending("left behind")],
            metadata: Some(ChatMetadata::ai()),
        },
    );

    backend.save(&snapshot).await.unwrap();
    let loaded = backend.load().await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);

    let recorded = state.lock().unwrap();
    assert_eq!(recorded.cookies, vec!["session=abc123", "session=abc123"]);
    assert_eq!(recorded.bodies[0]["archived"]["Old.__meta__"], json!({"ai": true}));
}

#[tokio::test]
async fn test_archived_ai_chat_survives_reload() {
    let state = Shared::default();
    let backend = backend(spawn(tutor_router(state)).await, None);

    let mut session = SessionState::default();
    let id = session.insert_ai_chat("Calculus", vec![Turn::pending("d/dx x^2")]);
    session.archive_chat(&id).unwrap();
    backend.save(&session.snapshot()).await.unwrap();

    let mut reloaded = SessionState::from_snapshot(backend.load().await.unwrap(), "Chat");
    assert_eq!(
        reloaded.archived()["Calculus"].metadata,
        Some(ChatMetadata::ai())
    );
    reloaded.unarchive_chat("Calculus").unwrap();
    assert!(reloaded.is_ai("Calculus"));
    assert_eq!(reloaded.current_chat_id(), "Calculus");
}

#[tokio::test]
async fn test_legacy_snapshot_is_folded() {
    let state = Shared::default();
    state.lock().unwrap().stored = Some(json!({
        "active": {"Chat 1": []},
        "archived": {
            "Geometry": [{"user": "area of a circle", "bot": "πr²"}],
            "Geometry.__meta__": {"ai": true}
        },
        "meta": {}
    }));
    let base = spawn(tutor_router(state)).await;

    let loaded = backend(base, None).load().await.unwrap().unwrap();
    assert_eq!(loaded.archived.len(), 1);
    assert_eq!(loaded.archived["Geometry"].metadata, Some(ChatMetadata::ai()));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_expired() {
    let router = Router::new()
        .route("/api/chats", get(|| async { StatusCode::UNAUTHORIZED }))
        .route("/send", post(|| async { StatusCode::UNAUTHORIZED }))
        .route("/ai_reply", post(|| async { StatusCode::UNAUTHORIZED }))
        .route("/new_ai_chat", post(|| async { StatusCode::UNAUTHORIZED }));
    let backend = backend(spawn(router).await, None);

    assert_eq!(backend.load().await.unwrap_err(), TutorError::AuthExpired);
    assert_eq!(backend.fetch_reply("1+1").await.unwrap_err(), TutorError::AuthExpired);
    assert_eq!(
        backend.fetch_ai_reply("Chat 1", &[]).await.unwrap_err(),
        TutorError::AuthExpired
    );
    assert_eq!(backend.generate_chat("").await.unwrap_err(), TutorError::AuthExpired);
}

#[tokio::test]
async fn test_compute_reply_variants() {
    let state = Shared::default();
    let backend = backend(spawn(tutor_router(state.clone())).await, None);

    let plain = backend.fetch_reply("1+1").await.unwrap();
    assert_eq!(plain.reply.as_deref(), Some("2"));

    let options = backend.fetch_reply("2x+4=0").await.unwrap();
    assert_eq!(options.algebra_options(), Some("2x+4=0"));

    let silent = backend.fetch_reply("silent").await.unwrap();
    assert_eq!(silent.reply, None);

    assert_eq!(state.lock().unwrap().bodies[0], json!({"message": "1+1"}));
}

#[tokio::test]
async fn test_ai_reply_outcomes() {
    let state = Shared::default();
    let backend = backend(spawn(tutor_router(state.clone())).await, None);
    let transcript = vec![
        TranscriptEntry {
            role: TranscriptRole::System,
            text: "tutor".into(),
        },
        TranscriptEntry {
            role: TranscriptRole::User,
            text: "x+1=2".into(),
        },
    ];

    assert_eq!(
        backend.fetch_ai_reply("Algebra", &transcript).await.unwrap(),
        AiReply::Reply(Some("x = 1".into()))
    );
    assert_eq!(
        backend.fetch_ai_reply("limited", &transcript).await.unwrap(),
        AiReply::Failed("rate limited".into())
    );
    assert_eq!(
        backend.fetch_ai_reply("broken", &transcript).await.unwrap(),
        AiReply::Failed("Server error: 502".into())
    );

    let sent = &state.lock().unwrap().bodies[0];
    assert_eq!(sent["chat_id"], "Algebra");
    assert_eq!(sent["messages"][1]["role"], "user");
    assert_eq!(sent["messages"][1]["content"][0], json!({"type": "text", "text": "x+1=2"}));
}

#[tokio::test]
async fn test_generate_chat_outcomes() {
    let backend = backend(spawn(tutor_router(Shared::default())).await, None);

    let chat = backend.generate_chat("fractions").await.unwrap();
    assert_eq!(chat.name, "Fractions");
    assert_eq!(chat.turns[0].bot, "Let's practise fractions.");

    assert_eq!(
        backend.generate_chat("quota").await.unwrap_err(),
        TutorError::application("quota exceeded")
    );
    assert_eq!(
        backend.generate_chat("crash").await.unwrap_err(),
        TutorError::application("Server error: 500")
    );
    assert_eq!(
        backend.generate_chat("garbled").await.unwrap_err(),
        TutorError::malformed("Failed to create AI chat. Server returned unexpected data.")
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = backend(format!("http://{}", addr), None);
    assert!(backend.fetch_reply("1+1").await.unwrap_err().is_transport());
    assert!(backend.save(&Default::default()).await.unwrap_err().is_transport());
}
