//! Transport layer: endpoint composition and JSON wire format.

mod call;

pub use call::{
    TransportError, decode_response, encode_payload, endpoint_url, redacted_payload,
};
