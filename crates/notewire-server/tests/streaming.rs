use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use notewire_core::{Note, cipher};
use notewire_protocol::{Frame, FrameReader, FrameType};
use notewire_server::{
    NoteStore, ServerConfig, SignalHandler, TcpServer, make_connection_handler, prepare_notes,
};
use tempfile::TempDir;
use tokio::net::TcpStream;

async fn start_server(dir: &TempDir) -> (SocketAddr, SignalHandler) {
    let path = dir.path().join("notes.json");
    std::fs::write(
        &path,
        r#"[
  {"title": "plain", "body": "Hi", "tags": ["a", "b"], "encrypted": false},
  {"title": "second", "created": "2024-03-01", "body": "hello world"}
]"#,
    )
    .unwrap();

    let config = ServerConfig::new((Ipv4Addr::LOCALHOST, 0u16))
        .with_notes_path(&path)
        .with_password("secret")
        .with_connection_timeout(Duration::from_secs(5));

    let notes = prepare_notes(&NoteStore::new(&config.notes_path), &config.password).unwrap();
    let server = TcpServer::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();

    let signals = SignalHandler::new();
    let shutdown = signals.shutdown();
    tokio::spawn(async move {
        server
            .run_until_shutdown(make_connection_handler(notes.into()), shutdown.wait())
            .await
            .unwrap();
    });

    (addr, signals)
}

async fn read_all(addr: SocketAddr) -> Vec<Frame> {
    let stream = TcpStream::connect(addr).await.unwrap();
    let mut reader = FrameReader::new(stream);
    let mut frames = Vec::new();
    while let Some(frame) = reader.read_frame().await.unwrap() {
        frames.push(frame);
    }
    assert_eq!(reader.buffered_len(), 0);
    frames
}

#[tokio::test]
async fn streams_encoded_notes_then_closes() {
    let dir = TempDir::new().unwrap();
    let (addr, signals) = start_server(&dir).await;

    let frames = read_all(addr).await;
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0], Frame::new(FrameType::Info, "START_NOTES_STREAM"));
    assert_eq!(frames[3], Frame::new(FrameType::EndOfStream, "END"));

    let first: Note = serde_json::from_str(&frames[1].payload).unwrap();
    assert_eq!(first.title, "plain");
    assert!(first.encrypted);
    assert_eq!(first.body, "d1cf");
    assert_eq!(first.tags, vec!["a", "b"]);

    let second: Note = serde_json::from_str(&frames[2].payload).unwrap();
    assert_eq!(second.title, "second");
    assert_eq!(cipher::decode(&second.body, "secret").unwrap(), "hello world");

    signals.trigger_shutdown();
}

#[tokio::test]
async fn startup_rewrites_notes_file() {
    let dir = TempDir::new().unwrap();
    let (_addr, signals) = start_server(&dir).await;

    let stored = NoteStore::new(dir.path().join("notes.json")).load().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|n| n.encrypted));
    assert_eq!(stored[0].body, cipher::encode("Hi", "secret").unwrap());
    assert_eq!(stored[1].body, cipher::encode("hello world", "secret").unwrap());

    signals.trigger_shutdown();
}

#[tokio::test]
async fn clients_are_served_independently() {
    let dir = TempDir::new().unwrap();
    let (addr, signals) = start_server(&dir).await;

    // A client that disconnects straight away must not disturb the others
    drop(TcpStream::connect(addr).await.unwrap());

    let (a, b, c) = tokio::join!(read_all(addr), read_all(addr), read_all(addr));
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a.len(), 4);

    // Still accepting afterwards
    assert_eq!(read_all(addr).await, a);

    signals.trigger_shutdown();
}
