//! Webhook listener integration tests.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    use crate::{ACK, RunningListener, deliver, delivery};

    #[tokio::test]
    async fn test_should_acknowledge_unparsable_json() {
        let listener = RunningListener::start().await;

        let reply = deliver(listener.addr, &delivery(Some("Notification"), "{not json")).await;

        assert_eq!(reply, ACK);
        listener.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_acknowledge_garbage_framing() {
        let listener = RunningListener::start().await;

        let reply = deliver(listener.addr, "hello there").await;

        assert_eq!(reply, ACK);
        listener.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_acknowledge_delivery_without_message_type() {
        let listener = RunningListener::start().await;

        let reply = deliver(listener.addr, &delivery(None, r#"{"Message":"hi"}"#)).await;

        assert_eq!(reply, ACK);
        listener.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_serve_deliveries_one_after_another() {
        let listener = RunningListener::start().await;

        for message in ["first", "second", "third"] {
            let body = format!(r#"{{"Type":"Notification","Message":"{message}"}}"#);
            let reply = deliver(listener.addr, &delivery(Some("Notification"), &body)).await;
            assert_eq!(reply, ACK);
        }

        listener.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_acknowledge_unrecognized_type() {
        let listener = RunningListener::start().await;

        let reply = deliver(
            listener.addr,
            &delivery(Some("UnsubscribeConfirmation"), "{}"),
        )
        .await;

        assert_eq!(reply, ACK);
        listener.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_acknowledge_peer_that_never_closes() {
        use tokio::io::AsyncReadExt;

        let listener = RunningListener::start().await;

        // Keep the write side open: the read has to end by timeout.
        let mut stream = TcpStream::connect(listener.addr).await.unwrap();
        stream
            .write_all(delivery(Some("Notification"), r#"{"Message":"hi"}"#).as_bytes())
            .await
            .unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();

        assert_eq!(reply, ACK);
        listener.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_release_port_on_shutdown() {
        let listener = RunningListener::start().await;
        let addr = listener.addr;

        listener.stop().await.unwrap();

        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_should_close_listener_when_stopped_mid_delivery() {
        let listener = RunningListener::start().await;
        let addr = listener.addr;

        // A peer that keeps the read alive by writing more often than the
        // listener's read timeout.
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"POST / HTTP/1.1\r\n").await.unwrap();
        let peer = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if stream.write_all(b"x").await.is_err() {
                    break;
                }
            }
        });
        tokio::time::sleep(Duration::from_millis(300)).await;

        let stopped = tokio::time::timeout(Duration::from_secs(5), listener.stop()).await;
        assert!(matches!(stopped, Ok(Ok(()))), "listener did not stop: {stopped:?}");
        assert!(TcpStream::connect(addr).await.is_err());
        peer.abort();
    }
}
