// Shared one-time server bootstrap for the integration tests.
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use auth_form::FormSettings;

// Short timings keep the suite fast while still exercising real delays.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(300);
pub const REDIRECT_DELAY: Duration = Duration::from_millis(100);
pub const IDLE_TTL: Duration = Duration::from_secs(60);

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Ephemeral port avoids collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));

                let settings = FormSettings {
                    port: addr.port(),
                    submit_delay: SUBMIT_DELAY,
                    redirect_delay: REDIRECT_DELAY,
                    idle_ttl: IDLE_TTL,
                };
                auth_form::run(listener, settings).await.expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Open a new form on the shared server and return its id.
pub async fn open_form(client: &reqwest::Client, base_url: &str) -> String {
    let res = client
        .post(format!("{base_url}/forms"))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let payload: serde_json::Value = res.json().await.expect("json body");
    payload["form_id"]
        .as_str()
        .expect("form id should be a string")
        .to_string()
}

fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
