//! Integration tests for the TCP peer link and the dispatcher.
//!
//! These bind real sockets on a loopback port the OS picks, so they
//! verify the bytes actually flow — framing, clean close, and the
//! dispatcher's fin handling — not just the type signatures.

use std::sync::Arc;

use tessera_relay::{run_dispatcher, Link, Outbound, TcpLink, TcpRelay};
use tokio::sync::mpsc;

/// Binds a relay and connects a client to it, returning both ends.
async fn linked_pair() -> (TcpLink, TcpLink) {
    let relay = TcpRelay::bind("127.0.0.1:0").await.expect("should bind");
    let addr = relay.local_addr().expect("should have an address");

    let server = tokio::spawn(async move {
        relay.accept().await.expect("should accept")
    });
    let client = TcpLink::connect(&addr.to_string())
        .await
        .expect("client should connect");
    let server = server.await.expect("accept task should finish");
    (server, client)
}

#[tokio::test]
async fn test_lines_cross_the_link_intact() {
    let (server, client) = linked_pair().await;

    client
        .send_line("M/p3/null/10/20/null/null/0/0/null/alice")
        .await
        .expect("send should succeed");
    let received = server
        .recv_line()
        .await
        .expect("recv should succeed")
        .expect("should have a line");
    assert_eq!(received, "M/p3/null/10/20/null/null/0/0/null/alice");

    // and the other direction
    server.send_line("-/p3").await.expect("send should succeed");
    let received = client.recv_line().await.unwrap().unwrap();
    assert_eq!(received, "-/p3");
}

#[tokio::test]
async fn test_empty_line_survives_framing() {
    // a no-op command encodes to the empty string; one line per
    // command means it must still arrive as its own (empty) line
    let (server, client) = linked_pair().await;
    client.send_line("").await.unwrap();
    client.send_line("-/p1").await.unwrap();

    assert_eq!(server.recv_line().await.unwrap().unwrap(), "");
    assert_eq!(server.recv_line().await.unwrap().unwrap(), "-/p1");
}

#[tokio::test]
async fn test_recv_returns_none_on_peer_close() {
    let (server, client) = linked_pair().await;
    client.close().await.expect("close should succeed");

    let result = server.recv_line().await.expect("recv should not error");
    assert!(result.is_none(), "clean close should read as None");
}

#[tokio::test]
async fn test_peer_ids_are_unique() {
    let (server, client) = linked_pair().await;
    assert_ne!(server.id(), client.id());
}

#[tokio::test]
async fn test_dispatcher_drains_queue_then_fin_closes() {
    let (server, client) = linked_pair().await;
    let (tx, rx) = mpsc::channel(16);
    let handle = tokio::spawn(run_dispatcher(Arc::new(client), rx));

    tx.send(Outbound::Line("-/p1".to_owned())).await.unwrap();
    tx.send(Outbound::Line("-/p2".to_owned())).await.unwrap();
    tx.send(Outbound::Fin).await.unwrap();

    // every queued line arrives, in order, before the close
    assert_eq!(server.recv_line().await.unwrap().unwrap(), "-/p1");
    assert_eq!(server.recv_line().await.unwrap().unwrap(), "-/p2");
    assert!(server.recv_line().await.unwrap().is_none());

    handle.await.expect("dispatcher should stop cleanly");
}

#[tokio::test]
async fn test_dispatcher_stops_when_senders_drop() {
    let (_server, client) = linked_pair().await;
    let (tx, rx) = mpsc::channel(4);
    let handle = tokio::spawn(run_dispatcher(Arc::new(client), rx));

    drop(tx);
    handle.await.expect("dispatcher should stop cleanly");
}
