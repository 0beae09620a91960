use super::*;
use crate::routes;
use futures::{SinkExt, StreamExt};
use tiles::{Palette, TilePos};
use tokio::net::TcpStream;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

// =============================================================
// Dispatch (no sockets)
// =============================================================

#[tokio::test]
async fn dispatch_commits_and_broadcasts_a_valid_paint() {
    let state = AppState::new();
    let (tx, mut rx) = mpsc::channel(8);
    sync::join(&state, Uuid::new_v4(), tx).await;

    let text = tiles::encode(&ClientMessage::PlaceTile { x: 5, y: 6, color: 3 });
    dispatch_text(&state, Uuid::new_v4(), &text).await;

    assert_eq!(
        rx.recv().await,
        Some(ServerMessage::NewTile { x: 5, y: 6, color: 3 })
    );
    assert_eq!(state.canvas.read().await.store.get(TilePos::new(5, 6)), 3);
}

#[tokio::test]
async fn dispatch_drops_an_invalid_paint_without_broadcast() {
    let state = AppState::new();
    let (tx, mut rx) = mpsc::channel(8);
    sync::join(&state, Uuid::new_v4(), tx).await;

    let text = tiles::encode(&ClientMessage::PlaceTile { x: 0, y: 0, color: Palette::LEN });
    dispatch_text(&state, Uuid::new_v4(), &text).await;

    assert!(rx.try_recv().is_err(), "rejected paint must not broadcast");
    assert!(state.canvas.read().await.store.is_empty());
}

#[tokio::test]
async fn dispatch_ignores_malformed_text() {
    let state = AppState::new();
    let (tx, mut rx) = mpsc::channel(8);
    sync::join(&state, Uuid::new_v4(), tx).await;

    dispatch_text(&state, Uuid::new_v4(), "not json").await;
    dispatch_text(&state, Uuid::new_v4(), r#"{"type":"place-tile","x":-1,"y":0,"color":0}"#).await;

    assert!(rx.try_recv().is_err());
    assert!(state.canvas.read().await.store.is_empty());
}

// =============================================================
// End-to-end over a real websocket
// =============================================================

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server(state: AppState) -> String {
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve failed");
    });
    format!("ws://{addr}/ws")
}

async fn connect(url: &str) -> Client {
    let (ws, _) = timeout(Duration::from_secs(1), connect_async(url))
        .await
        .expect("connect timed out")
        .expect("connect failed");
    ws
}

async fn recv_server_message(ws: &mut Client) -> ServerMessage {
    loop {
        let msg = timeout(Duration::from_secs(1), ws.next())
            .await
            .expect("receive timed out")
            .expect("stream ended")
            .expect("websocket error");
        if let WsMessage::Text(text) = msg {
            return tiles::decode_server(text.as_str()).expect("invalid server message");
        }
    }
}

async fn send_client_message(ws: &mut Client, message: &ClientMessage) {
    ws.send(WsMessage::Text(tiles::encode(message).into()))
        .await
        .expect("send failed");
}

#[tokio::test]
async fn first_message_is_the_full_snapshot() {
    let state = AppState::new();
    {
        let mut canvas = state.canvas.write().await;
        canvas.store.paint(TilePos::new(2, 3), 7).unwrap();
        canvas.store.paint(TilePos::new(4, 4), 2).unwrap();
    }
    let url = spawn_server(state).await;

    let mut client = connect(&url).await;
    let ServerMessage::AllTiles { mut entries } = recv_server_message(&mut client).await else {
        panic!("first message must be all-tiles");
    };
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    assert_eq!(entries.len(), 2);
    assert_eq!((entries[0].key.as_str(), entries[0].color), ("2,3", 7));
    assert_eq!((entries[1].key.as_str(), entries[1].color), ("4,4", 2));
}

#[tokio::test]
async fn committed_paint_echoes_to_the_sender() {
    let url = spawn_server(AppState::new()).await;
    let mut client = connect(&url).await;
    recv_server_message(&mut client).await; // all-tiles

    send_client_message(&mut client, &ClientMessage::PlaceTile { x: 1, y: 2, color: 9 }).await;
    assert_eq!(
        recv_server_message(&mut client).await,
        ServerMessage::NewTile { x: 1, y: 2, color: 9 }
    );
}

#[tokio::test]
async fn committed_paint_broadcasts_to_peers() {
    let url = spawn_server(AppState::new()).await;
    let mut painter = connect(&url).await;
    let mut viewer = connect(&url).await;
    recv_server_message(&mut painter).await;
    recv_server_message(&mut viewer).await;

    send_client_message(&mut painter, &ClientMessage::PlaceTile { x: 30, y: 40, color: 5 }).await;

    let expected = ServerMessage::NewTile { x: 30, y: 40, color: 5 };
    assert_eq!(recv_server_message(&mut viewer).await, expected);
    assert_eq!(recv_server_message(&mut painter).await, expected);
}

#[tokio::test]
async fn invalid_paint_is_silently_dropped() {
    let url = spawn_server(AppState::new()).await;
    let mut client = connect(&url).await;
    recv_server_message(&mut client).await;

    // Out-of-palette color, then out-of-grid position: no reply for either.
    send_client_message(&mut client, &ClientMessage::PlaceTile { x: 0, y: 0, color: 99 }).await;
    send_client_message(&mut client, &ClientMessage::PlaceTile { x: 200, y: 0, color: 1 }).await;
    // A valid paint afterwards is the next (and only) message observed.
    send_client_message(&mut client, &ClientMessage::PlaceTile { x: 8, y: 8, color: 1 }).await;

    assert_eq!(
        recv_server_message(&mut client).await,
        ServerMessage::NewTile { x: 8, y: 8, color: 1 }
    );
}

#[tokio::test]
async fn late_joiner_sees_committed_paints_in_its_snapshot() {
    let url = spawn_server(AppState::new()).await;
    let mut painter = connect(&url).await;
    recv_server_message(&mut painter).await;

    send_client_message(&mut painter, &ClientMessage::PlaceTile { x: 11, y: 12, color: 4 }).await;
    // The echo confirms the commit happened before the second client joins.
    recv_server_message(&mut painter).await;

    let mut joiner = connect(&url).await;
    let ServerMessage::AllTiles { entries } = recv_server_message(&mut joiner).await else {
        panic!("first message must be all-tiles");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "11,12");
    assert_eq!(entries[0].color, 4);
}

#[tokio::test]
async fn connection_survives_garbage_input() {
    let url = spawn_server(AppState::new()).await;
    let mut client = connect(&url).await;
    recv_server_message(&mut client).await;

    client
        .send(WsMessage::Text("definitely not json".into()))
        .await
        .expect("send failed");
    send_client_message(&mut client, &ClientMessage::PlaceTile { x: 0, y: 0, color: 2 }).await;

    assert_eq!(
        recv_server_message(&mut client).await,
        ServerMessage::NewTile { x: 0, y: 0, color: 2 }
    );
}
