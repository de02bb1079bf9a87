use anyhow::Result;
use axum::{extract::State, http::{HeaderValue, StatusCode}, routing::{get, post}, Json, Router};
use engine::present::{highlight, summary_html};
use engine::{load_pages, Answer, Engine, PageMap, Reply, Session, Summary};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, String);

#[derive(Deserialize)]
pub struct LoadRequest {
    #[serde(default)]
    pub pages: Option<Vec<String>>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct LoadResponse {
    pub pages: usize,
    pub sentences: usize,
    pub terms: usize,
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub session: Option<u64>,
}

#[derive(Deserialize)]
pub struct MoreRequest {
    pub session: u64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AskStatus {
    Found,
    NoMatch,
    NoCorpus,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub session: u64,
    pub status: AskStatus,
    pub answer: Option<AnswerView>,
    pub has_more: bool,
}

#[derive(Serialize)]
pub struct MoreResponse {
    pub session: u64,
    pub done: bool,
    pub answer: Option<AnswerView>,
    pub has_more: bool,
}

#[derive(Serialize)]
pub struct AnswerView {
    pub sentence: String,
    pub score: f64,
    pub highlighted: String,
    pub page: Option<usize>,
}

#[derive(Deserialize, Default)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub pages: Option<Vec<usize>>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Ok,
    NoContent,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub status: SummaryStatus,
    pub sentences: Vec<String>,
    pub html: String,
    pub pages: Vec<usize>,
}

/// A chat session: the answer cursor plus the question it answers, for highlighting.
struct Chat {
    session: Session,
    question: String,
}

/// Open chats kept by default; the oldest are dropped beyond this.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
    /// Held for writing across a corpus load so pages and corpus always match.
    pages: Arc<RwLock<PageMap>>,
    /// Keyed by monotonic id, so the first entry is always the oldest chat.
    chats: Arc<Mutex<BTreeMap<u64, Chat>>>,
    next_session: Arc<AtomicU64>,
    max_sessions: usize,
}

impl AppState {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self::with_session_limit(engine, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_session_limit(engine: Arc<Engine>, max_sessions: usize) -> Self {
        Self {
            engine,
            pages: Arc::new(RwLock::new(PageMap::default())),
            chats: Arc::new(Mutex::new(BTreeMap::new())),
            next_session: Arc::new(AtomicU64::new(1)),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Replace pages and corpus together.
    pub fn load(&self, pages: Vec<String>) -> LoadResponse {
        let map = PageMap::new(pages);
        let mut guard = self.pages.write();
        let stats = self.engine.load_corpus(&map.corpus_text());
        let response = LoadResponse { pages: map.len(), sentences: stats.sentences, terms: stats.terms };
        *guard = map;
        response
    }

    /// Load a text file or a directory of pages.
    pub fn load_path(&self, path: &Path) -> Result<LoadResponse> {
        Ok(self.load(load_pages(path)?))
    }

    pub fn session_count(&self) -> usize { self.chats.lock().len() }

    fn store_chat(&self, id: u64, chat: Chat) {
        let mut chats = self.chats.lock();
        chats.insert(id, chat);
        while chats.len() > self.max_sessions {
            if let Some((evicted, _)) = chats.pop_first() {
                tracing::debug!(session = evicted, "evicted oldest chat");
            }
        }
    }
}

/// CORS from CORS_ALLOW_ORIGIN (comma-separated); any origin when unset or nothing parses.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/corpus", post(load_handler))
        .route("/ask", post(ask_handler))
        .route("/more", post(more_handler))
        .route("/summarize", post(summarize_handler))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

pub async fn load_handler(State(state): State<AppState>, Json(req): Json<LoadRequest>) -> Result<Json<LoadResponse>, ApiError> {
    let pages = match (req.pages, req.text) {
        (Some(pages), _) => pages,
        (None, Some(text)) => vec![text],
        (None, None) => return Err((StatusCode::BAD_REQUEST, "expected \"pages\" or \"text\"".into())),
    };
    Ok(Json(state.load(pages)))
}

pub async fn ask_handler(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Result<Json<AskResponse>, ApiError> {
    if req.question.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "question must not be blank".into()));
    }
    let existing = req.session.and_then(|id| state.chats.lock().remove(&id).map(|chat| (id, chat)));
    let (id, mut chat) = existing.unwrap_or_else(|| {
        let id = state.next_session.fetch_add(1, Ordering::Relaxed);
        (id, Chat { session: Session::new(state.engine.clone()), question: String::new() })
    });

    let (status, answer) = {
        let pages = state.pages.read();
        match chat.session.ask_question(&req.question) {
            Reply::Found(a) => (AskStatus::Found, Some(view(a, &req.question, &pages))),
            Reply::NoMatch(a) => (AskStatus::NoMatch, Some(view(a, &req.question, &pages))),
            Reply::NoCorpus => (AskStatus::NoCorpus, None),
        }
    };
    chat.question = req.question;
    let has_more = chat.session.has_more();
    state.store_chat(id, chat);
    Ok(Json(AskResponse { session: id, status, answer, has_more }))
}

pub async fn more_handler(State(state): State<AppState>, Json(req): Json<MoreRequest>) -> Result<Json<MoreResponse>, ApiError> {
    let mut chats = state.chats.lock();
    let chat = chats
        .get_mut(&req.session)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown session {}", req.session)))?;
    let answer = chat.session.next_answer().map(|a| view(a, &chat.question, &state.pages.read()));
    Ok(Json(MoreResponse { session: req.session, done: answer.is_none(), answer, has_more: chat.session.has_more() }))
}

pub async fn summarize_handler(State(state): State<AppState>, Json(req): Json<SummarizeRequest>) -> Json<SummarizeResponse> {
    let pages = state.pages.read();
    let summary = match &req.pages {
        Some(selected) => state.engine.summarize_subset(&pages.selection_text(selected)),
        None => state.engine.summarize_all(),
    };
    let response = match summary {
        Summary::Sentences(sentences) => SummarizeResponse {
            status: SummaryStatus::Ok,
            html: summary_html(&sentences),
            pages: pages.locate_all(&sentences),
            sentences,
        },
        Summary::NoContent => SummarizeResponse { status: SummaryStatus::NoContent, sentences: vec![], html: String::new(), pages: vec![] },
    };
    tracing::info!(selected = response.sentences.len(), "summary served");
    Json(response)
}

fn view(answer: Answer, question: &str, pages: &PageMap) -> AnswerView {
    AnswerView {
        highlighted: highlight(&answer.sentence, question),
        page: pages.locate(&answer.sentence),
        sentence: answer.sentence,
        score: answer.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state(limit: usize) -> AppState {
        let state = AppState::with_session_limit(Arc::new(Engine::new()), limit);
        state.load(vec!["Compilers translate source code. Linkers join object files.".into()]);
        state
    }

    async fn ask(state: &AppState, question: &str, session: Option<u64>) -> AskResponse {
        let req = AskRequest { question: question.into(), session };
        match ask_handler(State(state.clone()), Json(req)).await {
            Ok(Json(resp)) => resp,
            Err((code, msg)) => panic!("ask failed with {code}: {msg}"),
        }
    }

    #[tokio::test]
    async fn sessionless_asks_stay_bounded() {
        let state = loaded_state(4);
        let mut ids = Vec::new();
        for _ in 0..50 {
            ids.push(ask(&state, "source code compilers", None).await.session);
        }
        assert_eq!(state.session_count(), 4);
        // newest chats survive, the oldest were dropped
        let oldest = MoreRequest { session: ids[0] };
        assert!(more_handler(State(state.clone()), Json(oldest)).await.is_err());
        let newest = MoreRequest { session: ids[49] };
        assert!(more_handler(State(state.clone()), Json(newest)).await.is_ok());
    }

    #[tokio::test]
    async fn reusing_a_session_does_not_grow_the_map() {
        let state = loaded_state(4);
        let id = ask(&state, "linkers", None).await.session;
        for _ in 0..10 {
            assert_eq!(ask(&state, "object files", Some(id)).await.session, id);
        }
        assert_eq!(state.session_count(), 1);
    }
}
