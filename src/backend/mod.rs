//! Backend access

mod http;

pub use self::http::GabHttpClient;
