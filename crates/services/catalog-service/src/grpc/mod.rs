//! gRPC service implementations.

mod catalog_grpc;

pub use catalog_grpc::CatalogGrpcService;
