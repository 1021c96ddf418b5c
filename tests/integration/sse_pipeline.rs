//! SSE bytes through decoding, assembly and collection

use super::*;
use integrations_openai_stream::errors::ProtocolError;
use integrations_openai_stream::types::FinishReason;
use serde::Deserialize;
use test_case::test_case;

#[derive(Debug, Deserialize, PartialEq)]
struct WeatherArgs {
    location: String,
    unit: String,
}

#[test_case(1; "byte by byte")]
#[test_case(7; "small reads")]
#[test_case(4096; "single read")]
#[tokio::test]
async fn test_tool_call_reassembled_from_sse(read_size: usize) {
    init_tracing();

    let events = tool_call_events(
        "call_weather",
        "get_weather",
        &["{\"location\":", "\"Paris\",", "\"unit\":\"celsius\"}"],
    );
    let response = decode(&events, read_size).assemble().into_response().await.unwrap();

    assert_eq!(response.units, 1);
    assert_eq!(response.tool_calls.len(), 1);
    let call = &response.tool_calls[0];
    assert_eq!(call.id, "call_weather");
    assert_eq!(call.tool_type, "function");
    assert_eq!(
        call.function.parse_arguments::<WeatherArgs>().unwrap(),
        WeatherArgs {
            location: "Paris".to_string(),
            unit: "celsius".to_string(),
        }
    );
    assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    assert_eq!(response.system_fingerprint.as_deref(), Some("fp_44709d6fcb"));
    assert!(response.requests_tool_execution());
}

#[tokio::test]
async fn test_text_streamed_chunk_by_chunk() {
    init_tracing();

    let events = text_events(&["The ", "sky ", "is ", "blue."]);
    let units: Vec<_> = decode(&events, 16).assemble().collect().await;

    assert_eq!(units.len(), events.len());
    let response = AssembledResponse::collect(futures::stream::iter(units))
        .await
        .unwrap();
    assert_eq!(response.content(), Some("The sky is blue."));
    assert!(response.tool_calls.is_empty());
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));
}

#[tokio::test]
async fn test_mixed_text_and_tool_calls() {
    init_tracing();

    let mut events = text_events(&["Checking two cities."]);
    events.pop();
    events.extend(tool_call_events("call_a", "get_weather", &["{\"location\":\"Oslo\"}"]));
    events.extend(tool_call_events("call_b", "get_weather", &["{\"location\":", "\"Rome\"}"]));

    let response = decode(&events, 32).assemble().into_response().await.unwrap();
    assert_eq!(response.content(), Some("Checking two cities."));

    let ids: Vec<_> = response.tool_calls.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["call_a", "call_b"]);
    assert_eq!(response.tool_calls[1].function.arguments, r#"{"location":"Rome"}"#);
    // 2 text chunks, 2 tool call units
    assert_eq!(response.units, 4);
}

#[tokio::test]
async fn test_truncated_sse_body() {
    init_tracing();

    let mut events = tool_call_events("call_cut", "get_weather", &["{\"loc"]);
    events.pop();
    // No finishing chunk and no [DONE]
    let payload: String = events.iter().map(|e| format!("data: {}\n\n", e)).collect();
    let units: Vec<_> = decode_chunk_stream(byte_stream(payload, 64))
        .assemble()
        .collect()
        .await;

    assert_eq!(units.len(), 1);
    let error = units[0].as_ref().unwrap_err();
    assert!(error.is_truncated_stream());
    assert!(matches!(
        error,
        StreamError::Protocol(ProtocolError::TruncatedToolCallStream { call_id: Some(id), .. }) if id == "call_cut"
    ));
}

#[tokio::test]
async fn test_io_error_from_body_surfaces() {
    init_tracing();

    let reads: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from(sse_payload(&text_events(&["hi"])).replace("data: [DONE]\n\n", ""))),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer")),
    ];
    let units: Vec<_> = decode_chunk_stream(futures::stream::iter(reads))
        .assemble()
        .collect()
        .await;

    let last = units.last().unwrap();
    assert!(last.as_ref().unwrap_err().is_transport_error());
    assert!(units[..units.len() - 1].iter().all(Result::is_ok));
}
