pub mod sequential_chunk_executor;
pub mod threaded_chunk_executor;
