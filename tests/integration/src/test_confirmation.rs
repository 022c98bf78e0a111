//! Subscription confirmation integration tests.

#[cfg(test)]
mod tests {
    use crate::{ACK, RunningListener, deliver, delivery, fake_sns};

    #[tokio::test]
    async fn test_should_confirm_subscription_with_unsigned_get() {
        let (sns_addr, sns) = fake_sns().await;
        let listener = RunningListener::start().await;

        let subscribe_url = format!(
            "http://127.0.0.1:{}/?Action=ConfirmSubscription&TopicArn=arn:aws:sns:us-east-1:123456789012:alerts&Token=2336412f37",
            sns_addr.port()
        );
        let body = format!(
            "{{\n  \"Type\" : \"SubscriptionConfirmation\",\n  \"Token\" : \"2336412f37\",\n  \"SubscribeURL\" : \"{subscribe_url}\"\n}}"
        );

        let reply = deliver(
            listener.addr,
            &delivery(Some("SubscriptionConfirmation"), &body),
        )
        .await;
        assert_eq!(reply, ACK);

        let request = sns.await.unwrap();
        assert_eq!(
            request,
            "GET /?Action=ConfirmSubscription&TopicArn=arn:aws:sns:us-east-1:123456789012:alerts&Token=2336412f37 HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n"
        );
        assert!(!request.contains("Authorization"));

        listener.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_stop_when_confirmation_host_does_not_resolve() {
        let listener = RunningListener::start().await;

        let reply = deliver(
            listener.addr,
            &delivery(
                Some("SubscriptionConfirmation"),
                r#"{"SubscribeURL":"https://nowhere.invalid/?Action=ConfirmSubscription"}"#,
            ),
        )
        .await;
        assert_eq!(reply, ACK);

        let err = listener.join().await.unwrap_err();
        assert!(err.is_fatal(), "unexpected error: {err}");
    }
}
