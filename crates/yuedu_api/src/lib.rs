//! Types for communication between yuedu_server and its clients.

pub mod request;
pub mod response;
