//! Remote connection service backends

mod grpc;

pub use grpc::{status_to_error, GrpcRemote};
