//! Chat client tests over the in-crate mock transport.
//!
//! The mock hands out exact chunk sequences, so these tests pin down
//! chunking and mid-stream failure behavior that a real server cannot.

mod common;

use common::*;
use futures::StreamExt;
use promptline::cancel::{cancel_pair, CancelSignal};
use promptline::chat::ChatClient;
use promptline::config::ClientConfig;
use promptline::error::ChatError;
use promptline::sse::{collect_text, StreamItem};
use std::time::Duration;

const URL: &str = "https://flow.mock/api/v1/run/test";

fn client(mock: MockHttpClient) -> ChatClient<MockHttpClient> {
    ChatClient::new(ClientConfig::default().with_chat_url(URL), mock)
}

fn reply_body() -> String {
    let mut body = sse_body(&[
        &delta_chunk("Grüße"),
        &delta_chunk(", "),
        "plain text",
        r#"{"choices":[{"text":" and more"}]}"#,
    ]);
    body.push_str("data: [DONE]\n\n");
    body
}

#[tokio::test]
async fn test_one_byte_chunks_match_single_chunk() {
    let whole = MockHttpConfig::new()
        .with_stream_chunks(URL, vec![reply_body().into_bytes()])
        .build();
    let bytewise = MockHttpConfig::new()
        .with_bytewise_stream(URL, &reply_body())
        .build();

    let expected: Vec<_> = client(whole)
        .send(&test_history(), CancelSignal::never())
        .await
        .unwrap()
        .collect()
        .await;
    let actual: Vec<_> = client(bytewise)
        .send(&test_history(), CancelSignal::never())
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(actual, expected);
    assert_eq!(
        actual,
        vec![
            Ok(StreamItem::fragment("Grüße")),
            Ok(StreamItem::fragment(", ")),
            Ok(StreamItem::fragment("plain text")),
            Ok(StreamItem::fragment(" and more")),
            Ok(StreamItem::Done),
        ]
    );
}

#[tokio::test]
async fn test_every_two_way_split() {
    let body = reply_body().into_bytes();
    for split in 0..=body.len() {
        let mock = MockHttpConfig::new()
            .with_stream_chunks(URL, vec![body[..split].to_vec(), body[split..].to_vec()])
            .build();
        let text = collect_text(
            client(mock)
                .send(&test_history(), CancelSignal::never())
                .await
                .unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(text, "Grüße, plain text and more", "split at {}", split);
    }
}

#[tokio::test]
async fn test_mid_stream_failure_after_fragments() {
    let mock = MockHttpConfig::new()
        .with_broken_stream(
            URL,
            vec!["data: partial\n\n", "data: cut"],
            HttpError::Io("connection reset by peer".to_string()),
        )
        .build();

    let items: Vec<_> = client(mock)
        .send(&test_history(), CancelSignal::never())
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0], Ok(StreamItem::fragment("partial")));
    let err = items[1].clone().unwrap_err();
    assert!(err.is_transport());
    assert!(!err.is_cancelled());
}

#[tokio::test]
async fn test_connection_failure_surfaces_before_stream() {
    let mock = MockHttpConfig::new()
        .with_error(URL, HttpError::Timeout("connect timed out".to_string()))
        .build();

    let result = client(mock)
        .send(&test_history(), CancelSignal::never())
        .await;
    let err = result.err().unwrap();
    assert!(err.is_transport());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_cancel_stops_hanging_stream() {
    let mock = MockHttpClient::new();
    mock.set_response(
        URL,
        MockResponse::StreamThenHang(vec![bytes::Bytes::from("data: thinking\n\n")]),
    );
    let (handle, signal) = cancel_pair();

    let mut stream = client(mock).send(&test_history(), signal).await.unwrap();
    assert_eq!(stream.next().await, Some(Ok(StreamItem::fragment("thinking"))));

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    let rest: Vec<_> = tokio::time::timeout(Duration::from_secs(1), stream.collect::<Vec<_>>())
        .await
        .expect("cancelled stream should end");
    assert_eq!(rest, vec![Err(ChatError::Cancelled)]);
    canceller.await.unwrap();
}

#[tokio::test]
async fn test_request_is_recorded() {
    let mock = MockHttpConfig::new()
        .with_stream_chunks(URL, vec![b"data: [DONE]\n\n".to_vec()])
        .build();

    let text = collect_text(
        client(mock.clone())
            .send(&test_history(), CancelSignal::never())
            .await
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(text, "");

    let requests: Vec<RecordedRequest> = mock.get_requests();
    assert_eq!(requests.len(), 1);
    let body = requests[0].json_body().unwrap();
    assert_eq!(
        body["input_value"],
        "User: Hi\nAssistant: Hello! How can I help?\nUser: Say hi back"
    );
    assert_eq!(body["stream"], true);
}
