use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use machine_learning::{
    ModelHandle, MlErr, app,
    arch::{Sequential, layers::Layer},
    training::TrainingConfig,
};
use serde_json::Value;
use server::{AppState, ServerConfig, ServerErr, create_router};
use tempfile::TempDir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use tower::ServiceExt;

/// Persists `y = 3x + 1` to a scratch directory and loads it back.
fn state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(app::MODEL_DIR).join(app::MODEL_FILENAME);

    let model = Sequential::new([Layer::dense((1, 1))]);
    let handle = ModelHandle::from_params(model, vec![3.0, 1.0], &TrainingConfig::default())
        .unwrap();
    app::persist(&handle, &path).unwrap();

    (dir, AppState::load(&path).unwrap())
}

fn router() -> (TempDir, Router) {
    let (dir, state) = state();
    (dir, create_router(state))
}

async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, String::from_utf8_lossy(&bytes).to_string())
}

#[tokio::test]
async fn prediction_returns_a_single_nested_value() {
    let (_dir, router) = router();

    let (status, body) = call(router, Method::GET, "/prediction/5.0").await;

    assert_eq!(status, StatusCode::OK, "unexpected response: {body}");
    let json: Value = serde_json::from_str(&body).unwrap();
    let prediction = json["prediction"].as_array().unwrap();
    assert_eq!(prediction.len(), 1);

    let row = prediction[0].as_array().unwrap();
    assert_eq!(row.len(), 1);
    assert_eq!(row[0].as_f64(), Some(16.0));
}

#[tokio::test]
async fn prediction_accepts_negative_and_integer_values() {
    let (_dir, router) = router();

    let (status, body) = call(router, Method::GET, "/prediction/-2").await;

    assert_eq!(status, StatusCode::OK, "unexpected response: {body}");
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["prediction"][0][0].as_f64(), Some(-5.0));
}

#[tokio::test]
async fn non_numeric_input_is_rejected() {
    let (_dir, router) = router();

    let (status, _) = call(router, Method::GET, "/prediction/ten").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_and_wrong_method() {
    let (_dir, router) = router();

    let (status, _) = call(router.clone(), Method::GET, "/predictions/1.0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(router, Method::POST, "/prediction/1.0").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn concurrent_requests_share_the_model() {
    let (_dir, router) = router();

    let calls = (0..8).map(|i| {
        let router = router.clone();
        async move { call(router, Method::GET, &format!("/prediction/{i}")).await }
    });

    for (i, (status, body)) in join_all(calls).await.into_iter().enumerate() {
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["prediction"][0][0].as_f64(), Some(3.0 * i as f64 + 1.0));
    }
}

async fn join_all<F, T>(calls: impl Iterator<Item = F>) -> Vec<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = calls.map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());

    for handle in handles {
        results.push(handle.await.unwrap());
    }

    results
}

#[tokio::test]
async fn startup_fails_fast_without_an_artifact() {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig {
        port: 0,
        model_path: dir.path().join("missing.safetensors"),
        ..Default::default()
    };

    let err = server::run(config).await.unwrap_err();

    assert!(matches!(err, ServerErr::Model(MlErr::ArtifactNotFound { .. })));
}

#[tokio::test]
async fn startup_fails_fast_with_a_corrupt_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(app::MODEL_FILENAME);
    std::fs::write(&path, b"not a model").unwrap();

    let config = ServerConfig {
        port: 0,
        model_path: path,
        ..Default::default()
    };

    let err = server::run(config).await.unwrap_err();

    assert!(matches!(err, ServerErr::Model(MlErr::ArtifactFormat { .. })));
}

#[tokio::test]
async fn serves_over_tcp_until_shutdown() {
    let (_dir, state) = state();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(server::serve(listener, state, async move {
        let _ = stop_rx.await;
    }));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /prediction/1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with(r#"{"prediction":[[4.0]]}"#), "{response}");

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
