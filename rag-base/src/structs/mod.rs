pub mod rag_base_config;
pub mod rag_store;
