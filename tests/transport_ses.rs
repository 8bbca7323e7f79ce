#[cfg(test)]
#[cfg(feature = "ses-transport")]
mod test {
    use std::{
        error::Error as StdError,
        fmt, io,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use futures_util::stream;
    use sesmail::message::{MessageStream, StreamOptions};
    use sesmail::transport::ses::{
        AckPolicy, ClientFromConfig, RawEmailClient, SendRawEmailRequest, SendRawEmailResponse,
        SesConfig,
    };
    use sesmail::{
        Address, EmailMessage, Envelope, Error, MessageCompiler, PreparedMessage, SesTransport, Transport,
    };
    use tokio1_crate as tokio;

    #[derive(Debug, Clone, PartialEq)]
    struct Throttled(&'static str);

    impl fmt::Display for Throttled {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Throttled {}

    #[derive(Debug, Clone)]
    enum Outcome {
        Fail(Throttled),
        Nothing,
        Respond(SendRawEmailResponse),
    }

    #[derive(Debug)]
    struct FakeClient {
        outcome: Outcome,
        region: Option<String>,
        requests: Mutex<Vec<SendRawEmailRequest>>,
    }

    impl FakeClient {
        fn new(outcome: Outcome) -> Arc<FakeClient> {
            Arc::new(FakeClient {
                outcome,
                region: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<SendRawEmailRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RawEmailClient for FakeClient {
        type Error = Throttled;

        async fn send_raw_email(
            &self,
            request: SendRawEmailRequest,
        ) -> Result<Option<SendRawEmailResponse>, Throttled> {
            self.requests.lock().unwrap().push(request);
            match &self.outcome {
                Outcome::Fail(err) => Err(err.clone()),
                Outcome::Nothing => Ok(None),
                Outcome::Respond(response) => Ok(Some(response.clone())),
            }
        }
    }

    impl ClientFromConfig for FakeClient {
        fn from_config(config: &SesConfig) -> Result<Self, Throttled> {
            Ok(FakeClient {
                outcome: Outcome::Respond(SendRawEmailResponse::with_message_id("abc123")),
                region: config.region().map(str::to_owned),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    /// Message streaming fixed chunks
    struct Streamed {
        envelope: Envelope,
        chunks: Vec<Result<&'static [u8], io::ErrorKind>>,
    }

    impl EmailMessage for Streamed {
        fn envelope(&self) -> &Envelope {
            &self.envelope
        }

        fn stream(&self, _options: StreamOptions) -> MessageStream<'_> {
            let chunks = self
                .chunks
                .iter()
                .map(|chunk| match chunk {
                    Ok(bytes) => Ok(bytes.to_vec()),
                    Err(kind) => Err(io::Error::new(*kind, "stream broke")),
                })
                .collect::<Vec<_>>();
            Box::pin(stream::iter(chunks))
        }
    }

    /// Message whose stream never ends
    struct Endless {
        envelope: Envelope,
    }

    impl EmailMessage for Endless {
        fn envelope(&self) -> &Envelope {
            &self.envelope
        }

        fn stream(&self, _options: StreamOptions) -> MessageStream<'_> {
            Box::pin(stream::pending::<io::Result<Vec<u8>>>())
        }
    }

    fn envelope() -> Envelope {
        Envelope::new(
            Some("nobody@domain.tld".parse().unwrap()),
            vec![
                "hei@domain.tld".parse().unwrap(),
                "hidden@domain.tld".parse().unwrap(),
            ],
        )
        .unwrap()
    }

    fn message() -> PreparedMessage {
        PreparedMessage::new(envelope())
            .header("From", "NoBody <nobody@domain.tld>")
            .header("To", "Hei <hei@domain.tld>")
            .header("Subject", "Happy new year")
            .bcc(vec!["hidden@domain.tld".parse::<Address>().unwrap()])
            .body("Be happy!")
    }

    fn acknowledged() -> Outcome {
        Outcome::Respond(SendRawEmailResponse::with_message_id("abc123"))
    }

    #[tokio::test]
    async fn accepted_with_message_id() {
        let _ = tracing_subscriber::fmt::try_init();

        let client = FakeClient::new(acknowledged());
        let sender = SesTransport::bulk(client.clone());

        let response = sender.send(&message()).await.unwrap();
        assert_eq!(response.message_id(), Some("abc123"));

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.source().map(|a| a.as_ref()), Some("nobody@domain.tld"));
        assert_eq!(
            request
                .destinations()
                .iter()
                .map(|a| a.as_ref())
                .collect::<Vec<&str>>(),
            vec!["hei@domain.tld", "hidden@domain.tld"]
        );

        let raw = String::from_utf8(request.raw_message().decode().unwrap()).unwrap();
        assert_eq!(
            raw,
            "From: NoBody <nobody@domain.tld>\r\n\
             To: Hei <hei@domain.tld>\r\n\
             Subject: Happy new year\r\n\
             Bcc: hidden@domain.tld\r\n\
             \r\n\
             Be happy!"
        );
    }

    #[tokio::test]
    async fn caller_message_untouched() {
        let message = message();
        let sender = SesTransport::bulk(FakeClient::new(acknowledged()));

        sender.send(&message).await.unwrap();

        let compiled = MessageCompiler::new()
            .compile(&message, StreamOptions::new())
            .await
            .unwrap();
        assert!(!compiled.to_string_lossy().contains("Bcc:"));
    }

    #[tokio::test]
    async fn response_missing() {
        let client = FakeClient::new(Outcome::Nothing);

        for sender in vec![
            SesTransport::bulk(client.clone()),
            SesTransport::single(client.clone()),
        ] {
            let err = sender.send(&message()).await.unwrap_err();
            assert!(matches!(err, Error::MissingResponse));
            assert!(err.to_string().contains("response missing"));
        }
    }

    #[tokio::test]
    async fn acknowledgment_missing() {
        let sender = SesTransport::bulk(FakeClient::new(Outcome::Respond(
            SendRawEmailResponse::default(),
        )));

        let err = sender.send(&message()).await.unwrap_err();
        assert!(matches!(err, Error::MissingAcknowledgment));
        assert!(err.to_string().contains("acknowledgment missing"));
    }

    #[tokio::test]
    async fn single_accepts_unacknowledged() {
        let sender = SesTransport::single(FakeClient::new(Outcome::Respond(
            SendRawEmailResponse::default(),
        )));
        assert_eq!(sender.ack_policy(), AckPolicy::Optional);

        let response = sender.send(&message()).await.unwrap();
        assert_eq!(response.message_id(), None);
    }

    #[tokio::test]
    async fn provider_error_unmodified() {
        let client = FakeClient::new(Outcome::Fail(Throttled("throttled")));
        let sender = SesTransport::bulk(client.clone());

        let err = sender.send(&message()).await.unwrap_err();

        let provider = err.provider().unwrap();
        assert_eq!(
            provider.downcast_ref::<Throttled>(),
            Some(&Throttled("throttled"))
        );
        assert_eq!(provider.to_string(), "throttled");
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn empty_message_still_submitted() {
        let client = FakeClient::new(acknowledged());
        let sender = SesTransport::bulk(client.clone());
        let message = Streamed {
            envelope: envelope(),
            chunks: vec![],
        };

        sender.send(&message).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].raw_message().data(), "");
    }

    #[tokio::test]
    async fn chunks_submitted_in_order() {
        let client = FakeClient::new(acknowledged());
        let sender = SesTransport::bulk(client.clone());
        let message = Streamed {
            envelope: envelope(),
            chunks: vec![Ok(&b"He"[..]), Ok(&b"llo"[..])],
        };

        sender.send(&message).await.unwrap();

        assert_eq!(client.requests()[0].raw_message().data(), "SGVsbG8=");
    }

    #[tokio::test]
    async fn non_utf8_submitted_unchanged() {
        let client = FakeClient::new(acknowledged());
        let sender = SesTransport::bulk(client.clone());
        // ISO-8859-1 header and body
        let message = Streamed {
            envelope: envelope(),
            chunks: vec![
                Ok(&b"Content-Type: text/plain; charset=iso-8859-1\r\n"[..]),
                Ok(&b"Subject: Gr\xfc\xdfe\r\n\r\n"[..]),
                Ok(&b"G\xfcnter"[..]),
            ],
        };

        let response = sender.send(&message).await.unwrap();
        assert_eq!(response.message_id(), Some("abc123"));

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].raw_message().decode().unwrap(),
            b"Content-Type: text/plain; charset=iso-8859-1\r\n\
              Subject: Gr\xfc\xdfe\r\n\r\n\
              G\xfcnter"
                .to_vec()
        );
    }

    #[tokio::test]
    async fn endless_stream_never_submitted() {
        let client = FakeClient::new(acknowledged());
        let sender = SesTransport::bulk(client.clone());
        let message = Endless {
            envelope: envelope(),
        };

        let result = tokio::time::timeout(Duration::from_millis(50), sender.send(&message)).await;

        assert!(result.is_err());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn compile_failure_not_submitted() {
        let client = FakeClient::new(acknowledged());
        let sender = SesTransport::bulk(client.clone());
        let message = Streamed {
            envelope: envelope(),
            chunks: vec![Ok(&b"He"[..]), Err(io::ErrorKind::BrokenPipe)],
        };

        let err = sender.send(&message).await.unwrap_err();

        assert!(err.is_compile());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn completion_called_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sender = SesTransport::bulk(FakeClient::new(acknowledged()));

        let counter = calls.clone();
        sender
            .send_mail(&message(), move |result| {
                assert!(result.is_ok());
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        let broken = Streamed {
            envelope: envelope(),
            chunks: vec![Err(io::ErrorKind::Other)],
        };
        let counter = calls.clone();
        sender
            .send_mail(&broken, move |result| {
                assert!(result.unwrap_err().is_compile());
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        let failing = SesTransport::bulk(FakeClient::new(Outcome::Nothing));
        let counter = calls.clone();
        failing
            .send_mail(&message(), move |result| {
                assert!(matches!(result, Err(Error::MissingResponse)));
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn concurrent_sends_share_client() {
        let client = FakeClient::new(acknowledged());
        let sender = SesTransport::bulk(client.clone());
        let first = message();
        let second = message();

        let (a, b) = tokio::join!(sender.send(&first), sender.send(&second));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn client_built_from_config() {
        let config = SesConfig::new().service_url("https://email.eu-west-1.amazonaws.com");

        let sender = SesTransport::<FakeClient>::from_config(config.clone())
            .unwrap()
            .build();

        assert_eq!(sender.config(), &config);
        assert_eq!(sender.client().region.as_deref(), Some("eu-west-1"));
        assert_eq!(sender.ack_policy(), AckPolicy::Required);

        let response = sender.send(&message()).await.unwrap();
        assert_eq!(response.message_id(), Some("abc123"));
    }
}
