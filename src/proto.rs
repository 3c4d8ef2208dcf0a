//! Generated protobuf types shared by the server, the gateway and the client.

tonic::include_proto!("greeter.v1");

/// Encoded `FileDescriptorSet` for `greeter.v1`, served by the reflection service.
pub const FILE_DESCRIPTOR_SET: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/greeter_descriptor.bin"));

/// Fully-qualified name of the greeter service.
pub const SERVICE_NAME: &str = "greeter.v1.GreeterService";

/// REST-style HTTP route for `SayHello` (GET with `?name=`, or POST with a JSON body).
pub const HTTP_HELLO_PATH: &str = "/v1/greeter/hello";

/// HTTP route named after the fully-qualified gRPC method (POST with a JSON body).
pub const HTTP_SAY_HELLO_METHOD_PATH: &str = "/greeter.v1.GreeterService/SayHello";
