pub mod codec;
pub mod connection;
pub mod schema;
pub mod vector_store;
