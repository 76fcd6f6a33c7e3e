#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use linkpulse::api::routes::routes;
use linkpulse::domain::click_event::ClickEvent;
use linkpulse::domain::click_worker::ClickQueue;
use linkpulse::domain::entities::{Click, Link};
use linkpulse::infrastructure::cache::{LinkCache, MokaLinkCache};
use linkpulse::infrastructure::persistence::InMemoryStore;
use linkpulse::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;
use uuid::Uuid;

pub const PEER_ADDR: &str = "127.0.0.1:12345";

pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
pub const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
pub const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Inserts the peer address `axum::serve` would provide in production.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_state(
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let cache: Arc<dyn LinkCache> = Arc::new(MokaLinkCache::new(1_000));
    let (queue, rx) = ClickQueue::bounded(queue_capacity);

    let state = AppState::new(store.clone(), store.clone(), cache, queue, false);

    (state, rx, store)
}

pub fn test_server(state: AppState) -> TestServer {
    let app = routes().layer(MockConnectInfoLayer).with_state(state);
    TestServer::new(app).unwrap()
}

pub fn spawn_app() -> TestApp {
    let (state, clicks, store) = create_test_state(100);

    TestApp {
        server: test_server(state.clone()),
        state,
        store,
        clicks,
    }
}

pub fn create_test_link(
    store: &InMemoryStore,
    owner_id: Uuid,
    slug: &str,
    short_code: &str,
    destination: &str,
) -> Link {
    create_test_link_at(store, owner_id, slug, short_code, destination, Utc::now())
}

pub fn create_test_link_at(
    store: &InMemoryStore,
    owner_id: Uuid,
    slug: &str,
    short_code: &str,
    destination: &str,
    created_at: DateTime<Utc>,
) -> Link {
    let link = Link {
        id: Uuid::new_v4(),
        owner_id,
        slug: slug.to_string(),
        short_code: short_code.to_string(),
        destination: destination.to_string(),
        is_active: true,
        created_at,
    };
    store.insert_link(link.clone()).unwrap();
    link
}

pub fn create_test_click(
    store: &InMemoryStore,
    link_id: Uuid,
    device_type: Option<&str>,
    country: Option<&str>,
    created_at: DateTime<Utc>,
) {
    store
        .insert_click(Click {
            id: Uuid::new_v4(),
            link_id,
            ip: Some("203.0.113.1".to_string()),
            referrer: None,
            user_agent: None,
            device_type: device_type.map(str::to_string),
            country: country.map(str::to_string),
            conversion: false,
            high_value: false,
            created_at,
        })
        .unwrap();
}
