use axum::{
    body::Body,
    http::{Request, Response},
};
use futures_util::StreamExt;
use std::convert::Infallible;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Duration, timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::client::IntoClientRequest, tungstenite::protocol::Message,
};
use tower::make::Shared;
use tower::util::BoxCloneService;
use url::Url;

/// Spawns the Axum app on a random local port
pub async fn spawn_server(
    app: BoxCloneService<Request<Body>, Response<Body>, Infallible>,
) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Shared::new(app);

    tokio::spawn(async move {
        axum::serve(listener, service).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

/// Connects to a WebSocket route at `/ws/{path}?token=...`
pub async fn connect_ws(
    addr: &str,
    path: &str,
    token: &str,
) -> Result<
    (
        WebSocketStream<MaybeTlsStream<TcpStream>>,
        axum::http::Response<Option<Vec<u8>>>,
    ),
    tokio_tungstenite::tungstenite::Error,
> {
    let url = Url::parse(&format!("ws://{addr}/ws/{path}?token={token}")).unwrap();

    let req = url.to_string().into_client_request().unwrap();
    connect_async(req).await
}

/// Reads the next text frame and parses it as JSON, skipping WS-level pings.
pub async fn next_json(
    ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>,
) -> serde_json::Value {
    loop {
        let msg = timeout(Duration::from_millis(1000), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream closed")
            .expect("ws error");
        match msg {
            Message::Text(txt) => return serde_json::from_str(&txt).expect("frame is not JSON"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}
