pub mod fetch;
pub mod response;

pub use response::Response;
