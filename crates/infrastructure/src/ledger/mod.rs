pub mod http_sink;

pub use http_sink::HttpLedgerSink;
