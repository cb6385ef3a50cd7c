mod client;
mod transport;

pub use client::{ ApiClient, RequestOptions };
pub use transport::{ ApiRequest, RawResponse, ReqwestTransport, Transport };
pub use reqwest::Method;
