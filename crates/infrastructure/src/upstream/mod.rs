pub mod sinkhole_client;

pub use sinkhole_client::SinkholeLogClient;
