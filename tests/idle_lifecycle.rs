//! Idle timer behaviour of connection handles.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hostpool::config::parse_config;
use hostpool::{Collector, Conn, ConnectionState, IdlePolicy, PoolError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

mod common;
use common::MockStream;

#[tokio::test]
async fn mark_active_before_deadline_cancels_delivery() {
    let peer: SocketAddr = "127.0.0.1:7000".parse().unwrap();
    let (stream, _far) = MockStream::pair(peer);
    let conn = Arc::new(Conn::with_stream(stream));

    let (collector, mut gc) = Collector::channel(8);
    let policy = IdlePolicy::new(Duration::from_millis(50), collector);

    assert!(conn.set_idle(&policy));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(conn.set_active());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(gc.try_recv().is_err(), "cancelled connection reached the collector");
    assert_eq!(conn.state(), ConnectionState::Active);
}

#[tokio::test]
async fn uncancelled_timer_delivers_exactly_once() {
    let conn = Arc::new(Conn::new("session"));
    let (collector, mut gc) = Collector::channel(8);
    let policy = IdlePolicy::new(Duration::from_millis(30), collector);

    let started = tokio::time::Instant::now();
    assert!(conn.set_idle(&policy));

    let evicted = tokio::time::timeout(Duration::from_secs(2), gc.recv())
        .await
        .expect("idle connection never delivered")
        .expect("collector closed");
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(Arc::ptr_eq(&evicted, &conn));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(gc.try_recv().is_err(), "connection delivered twice");

    // Reclaiming after expiry must report the race as lost.
    assert!(!conn.set_active());
}

#[tokio::test]
async fn disabled_idle_timeout_never_delivers() {
    let config = parse_config("[idle]\ntimeout_ms = 0\ncollector_capacity = 2\n").unwrap();
    let (policy, mut gc) = IdlePolicy::from_config(&config.idle);
    let conn = Arc::new(Conn::empty());

    assert!(!conn.set_idle(&policy));
    assert_eq!(conn.state(), ConnectionState::Active);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(gc.try_recv().is_err());
}

#[tokio::test]
async fn collector_closes_evicted_connection() {
    let (collector, mut gc) = Collector::channel(1);
    let policy = IdlePolicy::new(Duration::from_millis(5), collector);

    let conns: Vec<_> = (0..3).map(|_| Arc::new(Conn::empty())).collect();
    for conn in &conns {
        assert!(conn.set_idle(&policy));
    }

    // Capacity 1: monitors wait for room rather than dropping handles.
    for _ in 0..conns.len() {
        let evicted = tokio::time::timeout(Duration::from_secs(2), gc.recv())
            .await
            .unwrap()
            .unwrap();
        evicted.set_closed();
    }

    for conn in &conns {
        assert!(conn.is_closed());
        assert!(!conn.set_idle(&policy));
        assert!(!conn.set_active());
    }
}

#[tokio::test]
async fn closing_an_idle_connection_stops_its_timer() {
    let (collector, mut gc) = Collector::channel(1);
    let policy = IdlePolicy::new(Duration::from_millis(20), collector);
    let conn = Arc::new(Conn::empty());

    assert!(conn.set_idle(&policy));
    conn.set_closed();

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(gc.try_recv().is_err());
    assert_eq!(conn.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn stream_capability_reaches_the_wrapped_object() {
    let peer: SocketAddr = "10.1.2.3:5432".parse().unwrap();
    let (stream, mut far) = MockStream::pair(peer);
    let conn = Conn::with_stream(stream);

    {
        let mut stream = conn.stream().await.unwrap();
        assert_eq!(stream.peer_addr().unwrap(), peer);
        stream.write_all(b"PING").await.unwrap();
        stream.shutdown().await.unwrap();
    }

    let mut received = Vec::new();
    far.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"PING");

    assert!(conn.interface::<MockStream>().await.is_some());
    assert!(conn.interface::<String>().await.is_none());
}

#[tokio::test]
async fn opaque_object_is_not_a_stream() {
    let conn = Conn::new(vec![1u8, 2, 3]);
    assert!(matches!(
        conn.stream().await,
        Err(PoolError::CapabilityMismatch { .. })
    ));
    assert_eq!(*conn.interface::<Vec<u8>>().await.unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn expired_connection_is_delivered_only_once() {
    let conn = Arc::new(Conn::empty());
    let (collector, mut gc) = Collector::channel(8);
    let policy = IdlePolicy::new(Duration::from_millis(10), collector);

    assert!(conn.set_idle(&policy));
    let evicted = tokio::time::timeout(Duration::from_secs(2), gc.recv())
        .await
        .expect("idle connection never delivered")
        .expect("collector closed");
    assert!(Arc::ptr_eq(&evicted, &conn));
    assert_eq!(conn.state(), ConnectionState::Expired);

    // The collector owns it now; a late set_idle must not arm a second timer.
    assert!(!conn.set_idle(&policy));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(gc.try_recv().is_err(), "connection delivered twice");
    assert_eq!(conn.state(), ConnectionState::Expired);

    evicted.set_closed();
    assert_eq!(conn.state(), ConnectionState::Closed);
}
