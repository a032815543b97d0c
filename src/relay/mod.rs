//! Upstream relay
//!
//! Takes a resolved provider call, sends it over the outbound transport, and
//! copies the response back to the caller in buffered or streaming mode while
//! handing a copy of the exchange to the audit pipeline.

pub mod context;
pub mod engine;
pub mod headers;
pub mod transport;

pub use context::RelayContext;
pub use engine::{RelayBody, RelayEngine, RelayResponse};
pub use headers::{filter_response_headers, is_hop_by_hop_header};
pub use transport::{
    ByteStream, HttpTransport, OutboundTransport, TransportError, UpstreamResponse,
};
