use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream;
use serde_json::json;
use wrelay::{
    BoxFuture, CallId, CallPhase, ChatMessage, FunctionName, RelayByteStream, RelayConfig,
    RelayError, RelayErrorKind, RelayHooks, RelayHttpRequest, RelayResponse, RelayTransport,
    StreamOutcome, StreamRequest, StreamingChatClient,
};

enum Script {
    Respond {
        status: u16,
        chunks: Option<Vec<Result<Bytes, RelayError>>>,
    },
    StallAfter(Vec<Bytes>),
    Fail(RelayError),
    Hang,
}

#[derive(Debug, Default)]
struct ScriptedTransport {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<RelayHttpRequest>>,
}

impl std::fmt::Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Script")
    }
}

impl ScriptedTransport {
    fn with(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn event_stream(chunks: Vec<Bytes>) -> Script {
        Script::Respond {
            status: 200,
            chunks: Some(chunks.into_iter().map(Ok).collect()),
        }
    }

    fn requests(&self) -> Vec<RelayHttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl RelayTransport for ScriptedTransport {
    fn post<'a>(
        &'a self,
        request: RelayHttpRequest,
    ) -> BoxFuture<'a, Result<RelayResponse<'a>, RelayError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            let script = self
                .scripts
                .lock()
                .expect("scripts lock")
                .pop_front()
                .expect("a scripted response for every request");

            match script {
                Script::Respond { status, chunks } => Ok(RelayResponse {
                    status,
                    body: chunks.map(|chunks| Box::pin(stream::iter(chunks)) as RelayByteStream<'a>),
                }),
                Script::StallAfter(chunks) => {
                    let body = stream::iter(chunks.into_iter().map(Ok)).chain(stream::pending());
                    Ok(RelayResponse {
                        status: 200,
                        body: Some(Box::pin(body) as RelayByteStream<'a>),
                    })
                }
                Script::Fail(error) => Err(error),
                Script::Hang => futures_util::future::pending().await,
            }
        })
    }
}

fn data_line(content: &str) -> String {
    let payload = json!({ "choices": [{ "delta": { "content": content } }] });
    format!("data: {payload}\n")
}

fn client(transport: Arc<ScriptedTransport>) -> StreamingChatClient {
    let config = RelayConfig::new("https://relay.example", "anon-key").expect("valid config");
    StreamingChatClient::new(config, "ai-interview", transport)
}

fn request() -> StreamRequest {
    StreamRequest::new(vec![ChatMessage::user("hello")])
}

struct Run {
    deltas: Vec<String>,
    done_calls: usize,
    outcome: StreamOutcome,
}

async fn run(client: &StreamingChatClient, request: StreamRequest) -> Run {
    let mut deltas = Vec::new();
    let mut done_calls = 0;
    let outcome = client
        .stream_chat(
            request,
            |delta| deltas.push(delta.to_string()),
            || done_calls += 1,
        )
        .await;

    Run {
        deltas,
        done_calls,
        outcome,
    }
}

#[tokio::test]
async fn deltas_arrive_in_order_and_reconstruct_the_reply() {
    let words = ["Tell ", "me ", "about ", "your ", "craft."];
    let wire = words.iter().map(|word| data_line(word)).collect::<String>() + "data: [DONE]\n";
    let transport = ScriptedTransport::with(vec![ScriptedTransport::event_stream(vec![
        Bytes::from(wire),
    ])]);

    let result = run(&client(transport), request()).await;

    assert_eq!(result.deltas, words);
    assert_eq!(result.deltas.concat(), "Tell me about your craft.");
    assert_eq!(result.done_calls, 1);
    assert_eq!(result.outcome, StreamOutcome::Completed { deltas: 5 });
}

#[tokio::test]
async fn any_two_chunk_split_matches_single_chunk_delivery() {
    let wire = format!(
        "{}: keepalive\n{}{}data: [DONE]\n",
        data_line("Grüße "),
        data_line("日本語 "),
        data_line("🚀")
    )
    .into_bytes();

    let whole = run(
        &client(ScriptedTransport::with(vec![ScriptedTransport::event_stream(
            vec![Bytes::from(wire.clone())],
        )])),
        request(),
    )
    .await;
    assert_eq!(whole.deltas, vec!["Grüße ", "日本語 ", "🚀"]);

    for split in 1..wire.len() {
        let chunks = vec![
            Bytes::copy_from_slice(&wire[..split]),
            Bytes::copy_from_slice(&wire[split..]),
        ];
        let transport = ScriptedTransport::with(vec![ScriptedTransport::event_stream(chunks)]);
        let result = run(&client(transport), request()).await;

        assert_eq!(result.deltas, whole.deltas, "split at byte {split}");
        assert_eq!(result.done_calls, 1);
    }
}

#[tokio::test]
async fn byte_at_a_time_delivery_matches_single_chunk_delivery() {
    let wire = format!("{}{}data: [DONE]\n", data_line("ça "), data_line("va"));
    let chunks = wire
        .as_bytes()
        .iter()
        .map(|byte| Bytes::copy_from_slice(std::slice::from_ref(byte)))
        .collect();

    let transport = ScriptedTransport::with(vec![ScriptedTransport::event_stream(chunks)]);
    let result = run(&client(transport), request()).await;

    assert_eq!(result.deltas, vec!["ça ", "va"]);
}

#[tokio::test]
async fn sentinel_ends_processing_even_with_trailing_garbage() {
    let transport = ScriptedTransport::with(vec![Script::Respond {
        status: 200,
        chunks: Some(vec![
            Ok(Bytes::from(format!(
                "{}data: [DONE]\n{}{{not json",
                data_line("only"),
                data_line("after")
            ))),
            Ok(Bytes::from(data_line("later chunk"))),
            Err(RelayError::transport("never read")),
        ]),
    }]);

    let result = run(&client(transport), request()).await;

    assert_eq!(result.deltas, vec!["only"]);
    assert_eq!(result.done_calls, 1);
    assert!(result.outcome.is_completed());
}

#[tokio::test]
async fn keepalives_and_blank_lines_do_not_change_deltas() {
    let wire = format!(
        ": OPENROUTER PROCESSING\n\n{}\r\n: ping\n{}\n\ndata: [DONE]\n",
        data_line("one"),
        data_line("two")
    );
    let transport =
        ScriptedTransport::with(vec![ScriptedTransport::event_stream(vec![Bytes::from(wire)])]);

    let result = run(&client(transport), request()).await;
    assert_eq!(result.deltas, vec!["one", "two"]);
}

#[tokio::test]
async fn rate_limited_response_surfaces_server_message() {
    let transport = ScriptedTransport::with(vec![Script::Respond {
        status: 429,
        chunks: Some(vec![Ok(Bytes::from_static(br#"{"error":"slow down"}"#))]),
    }]);
    let client = client(transport);

    let call = client.prepare(request());
    let status = call.status();
    let mut delta_calls = 0;
    let mut done_calls = 0;
    let outcome = call.run(|_| delta_calls += 1, || done_calls += 1).await;

    assert_eq!(delta_calls, 0);
    assert_eq!(done_calls, 1);
    assert_eq!(status.phase(), CallPhase::Failed);
    assert_eq!(status.last_error_message().as_deref(), Some("slow down"));

    let error = outcome.error().expect("outcome should carry the error");
    assert_eq!(error.kind, RelayErrorKind::RateLimited);
    assert_eq!(error.status, Some(429));
}

#[tokio::test]
async fn error_status_without_json_body_uses_generic_message() {
    let transport = ScriptedTransport::with(vec![Script::Respond {
        status: 500,
        chunks: Some(vec![Ok(Bytes::from_static(b"upstream exploded"))]),
    }]);

    let result = run(&client(transport), request()).await;
    let error = result.outcome.error().expect("error outcome");

    assert_eq!(error.message, "Error: 500");
    assert_eq!(result.done_calls, 1);
}

#[tokio::test]
async fn payloads_without_content_produce_no_deltas_and_no_error() {
    let wire = concat!(
        "data: {\"id\":\"chatcmpl-1\",\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n",
        "data: [DONE]\n"
    );
    let transport = ScriptedTransport::with(vec![ScriptedTransport::event_stream(vec![
        Bytes::from_static(wire.as_bytes()),
    ])]);

    let result = run(&client(transport), request()).await;

    assert!(result.deltas.is_empty());
    assert_eq!(result.outcome, StreamOutcome::Completed { deltas: 0 });
}

#[tokio::test]
async fn sequential_calls_produce_independent_sequences() {
    let transport = ScriptedTransport::with(vec![
        ScriptedTransport::event_stream(vec![Bytes::from(
            data_line("first") + "data: [DONE]\n",
        )]),
        Script::Respond {
            status: 402,
            chunks: Some(vec![Ok(Bytes::from_static(br#"{"error":"credits"}"#))]),
        },
        ScriptedTransport::event_stream(vec![Bytes::from(
            data_line("third") + "data: [DONE]\n",
        )]),
    ]);
    let client = client(transport);

    let first = run(&client, request()).await;
    let second = run(&client, request()).await;
    let third = run(&client, request()).await;

    assert_eq!(first.deltas, vec!["first"]);
    assert!(second.deltas.is_empty());
    assert_eq!(
        second.outcome.error().map(|error| error.kind),
        Some(RelayErrorKind::QuotaExhausted)
    );
    assert_eq!(third.deltas, vec!["third"]);
    assert!(third.outcome.is_completed());
    assert_eq!(
        [first.done_calls, second.done_calls, third.done_calls],
        [1, 1, 1]
    );
}

#[tokio::test]
async fn missing_body_is_reported() {
    let transport = ScriptedTransport::with(vec![Script::Respond {
        status: 200,
        chunks: None,
    }]);

    let result = run(&client(transport), request()).await;
    let error = result.outcome.error().expect("error outcome");

    assert_eq!(error.kind, RelayErrorKind::MissingBody);
    assert_eq!(error.message, "No response body");
    assert_eq!(result.done_calls, 1);
}

#[tokio::test]
async fn transport_failures_fall_back_to_unknown_error() {
    let transport = ScriptedTransport::with(vec![
        Script::Fail(RelayError::transport("dns lookup failed")),
        Script::Fail(RelayError::transport("")),
    ]);
    let client = client(transport);

    let named = run(&client, request()).await;
    let blank = run(&client, request()).await;

    assert_eq!(
        named.outcome.error().map(|error| error.message.as_str()),
        Some("dns lookup failed")
    );
    assert_eq!(
        blank.outcome.error().map(|error| error.message.as_str()),
        Some("Unknown error")
    );
    assert_eq!(named.done_calls + blank.done_calls, 2);
}

#[tokio::test]
async fn truncated_character_at_end_of_body_keeps_last_delta() {
    let transport = ScriptedTransport::with(vec![Script::Respond {
        status: 200,
        chunks: Some(vec![Ok(Bytes::from_static(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}\xE2\x82",
        ))]),
    }]);

    let result = run(&client(transport), request()).await;

    assert_eq!(result.deltas, vec!["tail"]);
    assert_eq!(result.done_calls, 1);
    assert!(result.outcome.error().is_none());
}

#[tokio::test]
async fn mid_stream_failure_keeps_delivered_deltas() {
    let transport = ScriptedTransport::with(vec![Script::Respond {
        status: 200,
        chunks: Some(vec![
            Ok(Bytes::from(data_line("partial"))),
            Err(RelayError::transport("connection reset by peer")),
        ]),
    }]);

    let result = run(&client(transport), request()).await;

    assert_eq!(result.deltas, vec!["partial"]);
    assert_eq!(result.done_calls, 1);
    assert_eq!(
        result.outcome.error().map(|error| error.kind),
        Some(RelayErrorKind::Transport)
    );
}

#[tokio::test]
async fn request_targets_function_with_bearer_key_and_merged_body() {
    let transport =
        ScriptedTransport::with(vec![ScriptedTransport::event_stream(vec![Bytes::from_static(
            b"data: [DONE]\n",
        )])]);
    let client = client(transport.clone());

    let request = request()
        .with_extra("type", "interview")
        .with_extra("sessionContext", json!({ "topic": "kilns" }));
    let _ = run(&client, request).await;

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "https://relay.example/functions/v1/ai-interview");
    assert_eq!(sent[0].bearer_token.expose(), "anon-key");
    assert_eq!(
        sent[0].payload,
        json!({
            "messages": [{ "role": "user", "content": "hello" }],
            "type": "interview",
            "sessionContext": { "topic": "kilns" }
        })
    );
}

#[tokio::test]
async fn cancellation_before_response_settles_as_cancelled() {
    let transport = ScriptedTransport::with(vec![Script::Hang]);
    let client = client(transport);

    let call = client.prepare(request());
    let status = call.status();
    let token = call.cancellation_token();
    token.cancel();

    let mut done_calls = 0;
    let outcome = call.run(|_| {}, || done_calls += 1).await;

    assert_eq!(outcome, StreamOutcome::Cancelled { deltas: 0 });
    assert_eq!(done_calls, 1);
    assert_eq!(status.phase(), CallPhase::Cancelled);
    assert!(status.last_error().is_none());
}

#[tokio::test]
async fn cancelling_from_a_delta_callback_stops_the_read_loop() {
    let transport = ScriptedTransport::with(vec![Script::StallAfter(vec![Bytes::from(
        data_line("a") + &data_line("b") + &data_line("c"),
    )])]);
    let client = client(transport);

    let call = client.prepare(request());
    let token = call.cancellation_token();
    let mut seen = Vec::new();
    let mut done_calls = 0;

    let outcome = call
        .run(
            |delta| {
                seen.push(delta.to_string());
                if seen.len() == 2 {
                    token.cancel();
                }
            },
            || done_calls += 1,
        )
        .await;

    assert_eq!(seen, vec!["a", "b"]);
    assert_eq!(outcome, StreamOutcome::Cancelled { deltas: 2 });
    assert_eq!(done_calls, 1);
}

#[tokio::test]
async fn dropping_an_in_flight_call_still_fires_done_once() {
    let transport = ScriptedTransport::with(vec![Script::StallAfter(vec![Bytes::from(
        data_line("started"),
    )])]);
    let client = client(transport);

    let call = client.prepare(request());
    let status = call.status();
    let seen = RefCell::new(Vec::new());
    let done_calls = Cell::new(0);

    let elapsed = tokio::time::timeout(
        Duration::from_millis(50),
        call.run(
            |delta| seen.borrow_mut().push(delta.to_string()),
            || done_calls.set(done_calls.get() + 1),
        ),
    )
    .await;

    assert!(elapsed.is_err(), "stalled stream should time out");
    assert_eq!(seen.into_inner(), vec!["started"]);
    assert_eq!(done_calls.get(), 1);
    assert_eq!(status.phase(), CallPhase::Cancelled);
}

#[tokio::test]
async fn status_reports_in_flight_while_deltas_are_delivered() {
    let transport = ScriptedTransport::with(vec![ScriptedTransport::event_stream(vec![
        Bytes::from(data_line("x") + "data: [DONE]\n"),
    ])]);
    let client = client(transport);

    let call = client.prepare(request());
    let status = call.status();
    let observer = status.clone();
    let mut in_flight_during_delta = false;

    let outcome = call
        .run(|_| in_flight_during_delta = observer.is_in_flight(), || {})
        .await;

    assert!(outcome.is_completed());
    assert!(in_flight_during_delta);
    assert_eq!(status.phase(), CallPhase::Completed);
    assert_eq!(status.delta_count(), 1);
}

#[derive(Debug, Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RelayHooks for RecordingHooks {
    fn on_call_start(&self, _call: CallId, function: &FunctionName) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("start:{function}"));
    }

    fn on_delta(&self, _call: CallId, _function: &FunctionName, delta_len: usize) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("delta:{delta_len}"));
    }

    fn on_call_success(
        &self,
        _call: CallId,
        _function: &FunctionName,
        deltas: usize,
        _elapsed: Duration,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("success:{deltas}"));
    }

    fn on_call_failure(
        &self,
        _call: CallId,
        _function: &FunctionName,
        error: &RelayError,
        _elapsed: Duration,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("failure:{:?}", error.kind));
    }
}

#[tokio::test]
async fn hooks_observe_call_lifecycle() {
    let transport = ScriptedTransport::with(vec![
        ScriptedTransport::event_stream(vec![Bytes::from(
            data_line("abc") + &data_line("de") + "data: [DONE]\n",
        )]),
        Script::Respond {
            status: 401,
            chunks: Some(Vec::new()),
        },
    ]);
    let hooks = Arc::new(RecordingHooks::default());
    let client = client(transport).with_hooks(hooks.clone());

    let _ = run(&client, request()).await;
    let _ = run(&client.for_function("ask-knowledge"), request()).await;

    let events = hooks.events.lock().expect("events lock").clone();
    assert_eq!(
        events,
        vec![
            "start:ai-interview",
            "delta:3",
            "delta:2",
            "success:2",
            "start:ask-knowledge",
            "failure:Authentication",
        ]
    );
}

#[tokio::test]
async fn open_exposes_deltas_as_a_stream() {
    let transport = ScriptedTransport::with(vec![ScriptedTransport::event_stream(vec![
        Bytes::from(data_line("s1") + &data_line("s2") + "data: [DONE]\n"),
    ])]);
    let client = client(transport);

    let stream = client.open(request()).await.expect("stream should open");
    let deltas = stream.collect::<Vec<_>>().await;

    assert_eq!(deltas, vec![Ok("s1".to_string()), Ok("s2".to_string())]);
}
