//! End-to-end tests for the WebSocket client against a local replay peer.

use std::time::Duration;

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use tetris_view::adapter::feed::{load_frames, serve_connection};
use tetris_view::adapter::{parse_snapshot, run_client, ClientConfig, ClientEvent};

const FRAME: &str = r##"{"grid": [["#000000", "#000000"], ["#000000", "#F00000"]], "current_piece": {"shape": [[1]], "x": 0, "y": 0, "color": "#F00000"}, "score": 10, "level": 1, "high_score": 100}"##;

fn local(port: u16) -> ClientConfig {
    ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        wire_log: None,
    }
}

async fn collect_until_closed(mut rx: mpsc::UnboundedReceiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    loop {
        let ev = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("client stalled")
            .expect("channel closed before Closed event");
        let closed = matches!(ev, ClientEvent::Closed);
        events.push(ev);
        if closed {
            return events;
        }
    }
}

#[tokio::test]
async fn client_reports_frames_in_order_then_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let frames = vec![
        FRAME.to_string(),
        "{not json".to_string(),
        FRAME.replace("\"score\": 10", "\"score\": 20"),
    ];
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        serve_connection(stream, &frames, Duration::ZERO).await
    });

    let config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        wire_log: None,
    };
    let (tx, rx) = mpsc::unbounded_channel();
    let client = tokio::spawn(run_client(config, tx));

    let events = collect_until_closed(rx).await;
    let kinds: Vec<&str> = events.iter().map(ClientEvent::kind).collect();
    assert_eq!(
        kinds,
        vec!["opened", "snapshot", "malformed", "snapshot", "closed"]
    );
    match &events[3] {
        ClientEvent::Snapshot(snap) => assert_eq!(snap.score, 20),
        other => panic!("expected snapshot, got {:?}", other.kind()),
    }

    assert!(client.await.unwrap().is_ok());
    assert_eq!(server.await.unwrap().unwrap(), 3);
}

#[tokio::test]
async fn wire_log_records_every_text_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let frames = vec![FRAME.to_string(), "garbage".to_string()];
    let sent = frames.clone();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let _ = serve_connection(stream, &sent, Duration::ZERO).await;
    });

    let log_path = std::env::temp_dir().join(format!("tetris-view-wire-{}.jsonl", port));
    let _ = std::fs::remove_file(&log_path);
    let config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        wire_log: Some(log_path.clone()),
    };
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_client(config, tx));
    collect_until_closed(rx).await;

    let logged = std::fs::read_to_string(&log_path).unwrap();
    let _ = std::fs::remove_file(&log_path);
    assert_eq!(logged.lines().collect::<Vec<_>>(), frames);
}

#[tokio::test]
async fn refused_connection_reports_error_then_closed() {
    // Grab a free port, then release it so nothing is listening.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        wire_log: None,
    };
    let (tx, rx) = mpsc::unbounded_channel();
    let result = tokio::time::timeout(Duration::from_secs(5), run_client(config, tx))
        .await
        .expect("connect attempt hung");
    assert!(result.is_err());

    let events = collect_until_closed(rx).await;
    let kinds: Vec<&str> = events.iter().map(ClientEvent::kind).collect();
    assert_eq!(kinds, vec!["transport_error", "closed"]);
}

#[tokio::test]
async fn wire_log_replays_multiline_frames_intact() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let pretty = r##"{
    "grid": [["#000000", "#000000"], ["#000000", "#F00000"]],
    "current_piece": {
        "shape": [[1]],
        "x": 0,
        "y": 0,
        "color": "#F00000"
    },
    "score": 10,
    "level": 1,
    "high_score": 100
}
"##;
    let sent = vec![pretty.to_string(), FRAME.to_string()];
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let _ = serve_connection(stream, &sent, Duration::ZERO).await;
    });

    let log_path = std::env::temp_dir().join(format!("tetris-view-pretty-{}.jsonl", port));
    let _ = std::fs::remove_file(&log_path);
    let config = ClientConfig {
        wire_log: Some(log_path.clone()),
        ..local(port)
    };
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_client(config, tx));
    let events = collect_until_closed(rx).await;
    assert_eq!(
        events.iter().filter(|e| matches!(e, ClientEvent::Snapshot(_))).count(),
        2
    );

    let logged = std::fs::read_to_string(&log_path).unwrap();
    let _ = std::fs::remove_file(&log_path);
    let replay = load_frames(&logged);
    assert_eq!(replay.len(), 2);
    for frame in &replay {
        let snap = parse_snapshot(frame).unwrap();
        assert_eq!(snap.score, 10);
    }
}

#[tokio::test]
async fn dropped_stream_reports_error_then_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(FRAME.to_string())).await.unwrap();
        // Drop the socket without a close handshake.
        drop(ws);
    });

    let (tx, rx) = mpsc::unbounded_channel();
    let client = tokio::spawn(run_client(local(port), tx));

    let events = collect_until_closed(rx).await;
    let kinds: Vec<&str> = events.iter().map(ClientEvent::kind).collect();
    assert_eq!(kinds, vec!["opened", "snapshot", "transport_error", "closed"]);
    assert!(client.await.unwrap().is_err());
}

#[tokio::test]
async fn binary_frames_are_decoded_as_text() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Binary(FRAME.as_bytes().to_vec()))
            .await
            .unwrap();
        ws.send(Message::Binary(vec![0xff, 0xfe, 0x00]))
            .await
            .unwrap();
        ws.close(None).await.unwrap();
    });

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_client(local(port), tx));

    let events = collect_until_closed(rx).await;
    let kinds: Vec<&str> = events.iter().map(ClientEvent::kind).collect();
    assert_eq!(kinds, vec!["opened", "snapshot", "malformed", "closed"]);
}
