pub mod http;
pub mod lambda;
