mod stream_handler;

pub use stream_handler::{decode_chunk_stream, ChunkDecoder, SseEvent, SseStream};
