//! Example: Reassembling a streamed tool call
//!
//! Feeds a recorded Server-Sent Events body through the decoder and the
//! assembler. Text chunks are printed as they arrive; the fragmented tool
//! call is printed once, after its finishing chunk.
//!
//! Run the example:
//! ```bash
//! RUST_LOG=integrations_openai_stream=debug cargo run --example streaming
//! ```

use bytes::Bytes;
use futures::{stream, StreamExt};
use integrations_openai_stream::prelude::*;
use std::io::Write;

const RECORDED_BODY: &str = concat!(
    "data: {\"id\":\"chatcmpl-demo\",\"object\":\"chat.completion.chunk\",\"created\":1700000000,\"model\":\"gpt-4o-mini\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"Let me \"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"chatcmpl-demo\",\"object\":\"chat.completion.chunk\",\"created\":1700000000,\"model\":\"gpt-4o-mini\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"check the weather.\"},\"finish_reason\":null}]}\n\n",
    ": keep-alive\n\n",
    "data: {\"id\":\"chatcmpl-demo\",\"object\":\"chat.completion.chunk\",\"created\":1700000001,\"model\":\"gpt-4o-mini\",\"choices\":[{\"index\":0,\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_9f2\",\"type\":\"function\",\"function\":{\"name\":\"get_weather\",\"arguments\":\"\"}}]},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"chatcmpl-demo\",\"object\":\"chat.completion.chunk\",\"created\":1700000001,\"model\":\"gpt-4o-mini\",\"choices\":[{\"index\":0,\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{\\\"location\\\":\"}}]},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"chatcmpl-demo\",\"object\":\"chat.completion.chunk\",\"created\":1700000001,\"model\":\"gpt-4o-mini\",\"choices\":[{\"index\":0,\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"\\\"Lisbon\\\"}\"}}]},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"chatcmpl-demo\",\"object\":\"chat.completion.chunk\",\"created\":1700000002,\"model\":\"gpt-4o-mini\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n",
    "data: [DONE]\n\n",
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AssemblerConfig::from_env()?;

    // Simulate a network body arriving in 40-byte reads
    let body = Bytes::from_static(RECORDED_BODY.as_bytes());
    let reads: Vec<Result<Bytes, StreamError>> = (0..body.len())
        .step_by(40)
        .map(|start| Ok(body.slice(start..(start + 40).min(body.len()))))
        .collect();

    let mut units = decode_chunk_stream(stream::iter(reads)).assemble_with(&config);

    print!("Response: ");
    while let Some(unit) = units.next().await {
        let unit = unit?;
        if let Some(content) = unit.content() {
            print!("{}", content);
            std::io::stdout().flush()?;
        }
        for call in unit.tool_calls() {
            println!(
                "\nTool call {} -> {}({})",
                call.id, call.function.name, call.function.arguments
            );
        }
    }

    println!();
    Ok(())
}
