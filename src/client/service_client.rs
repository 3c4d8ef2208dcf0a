//! [`ServiceClient`]: gRPC client for the greeter listener.
//!
//! Besides `SayHello` it uses the v1 server reflection protocol to discover
//! what the listener serves without a local copy of the schema.

use prost::Message;
use prost_types::FileDescriptorProto;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic_reflection::pb::v1::server_reflection_client::ServerReflectionClient;
use tonic_reflection::pb::v1::server_reflection_request::MessageRequest;
use tonic_reflection::pb::v1::server_reflection_response::MessageResponse;
use tonic_reflection::pb::v1::{ServerReflectionRequest, ServerReflectionResponse};

use crate::proto;
use crate::proto::greeter_service_client::GreeterServiceClient;
use crate::{GreetRequest, GreetResponse, GreeterError, Result};

/// A service advertised through reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescription {
    /// Fully-qualified service name, e.g. `greeter.v1.GreeterService`.
    pub name: String,
    pub methods: Vec<MethodDescription>,
}

/// One RPC method of a [`ServiceDescription`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescription {
    pub name: String,
    /// Fully-qualified request message type, without the leading dot.
    pub input_type: String,
    /// Fully-qualified response message type, without the leading dot.
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

/// gRPC client for a greeter listener.
pub struct ServiceClient {
    channel: Channel,
    inner: GreeterServiceClient<Channel>,
}

impl ServiceClient {
    /// Connect over plaintext HTTP/2.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = ServiceClient::connect("http://127.0.0.1:8080").await?;
    /// ```
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        Self::connect_endpoint(addr.into(), None).await
    }

    /// Connect over TLS. `addr` should use the `https` scheme.
    pub async fn connect_tls(addr: impl Into<String>, tls: ClientTlsConfig) -> Result<Self> {
        Self::connect_endpoint(addr.into(), Some(tls)).await
    }

    async fn connect_endpoint(addr: String, tls: Option<ClientTlsConfig>) -> Result<Self> {
        let dial_error = |message: String| GreeterError::Dial {
            target: addr.clone(),
            message,
        };

        let mut endpoint =
            Endpoint::from_shared(addr.clone()).map_err(|e| dial_error(e.to_string()))?;
        if let Some(tls) = tls {
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| GreeterError::Tls(format!("invalid client TLS config: {e}")))?;
        }
        let channel = endpoint
            .connect()
            .await
            .map_err(|e| dial_error(format!("{e:?}")))?;

        Ok(Self {
            inner: GreeterServiceClient::new(channel.clone()),
            channel,
        })
    }

    /// Call `SayHello`.
    pub async fn say_hello(&self, name: impl Into<String>) -> Result<GreetResponse> {
        let request = proto::SayHelloRequest::from(GreetRequest::new(name));
        let response = self.inner.clone().say_hello(request).await?;
        Ok(response.into_inner().into())
    }

    /// Names of the services the listener advertises through reflection.
    pub async fn list_services(&self) -> Result<Vec<String>> {
        let response = self.reflect(MessageRequest::ListServices(String::new())).await?;
        match response {
            MessageResponse::ListServicesResponse(list) => {
                Ok(list.service.into_iter().map(|s| s.name).collect())
            }
            other => Err(unexpected_reflection(&other)),
        }
    }

    /// Resolve a service's methods through reflection.
    pub async fn describe_service(&self, service: &str) -> Result<ServiceDescription> {
        let response = self
            .reflect(MessageRequest::FileContainingSymbol(service.to_string()))
            .await?;
        let MessageResponse::FileDescriptorResponse(files) = response else {
            return Err(unexpected_reflection(&response));
        };

        for encoded in files.file_descriptor_proto {
            let file = FileDescriptorProto::decode(encoded.as_slice())
                .map_err(|e| GreeterError::Rpc {
                    code: tonic::Code::Internal,
                    message: format!("invalid file descriptor: {e}"),
                })?;
            if let Some(description) = find_service(&file, service) {
                return Ok(description);
            }
        }

        Err(GreeterError::Rpc {
            code: tonic::Code::NotFound,
            message: format!("service {service} not found in reflection response"),
        })
    }

    /// Send one reflection request and return its response payload.
    async fn reflect(&self, request: MessageRequest) -> Result<MessageResponse> {
        let mut client = ServerReflectionClient::new(self.channel.clone());
        let request = ServerReflectionRequest {
            host: String::new(),
            message_request: Some(request),
        };

        let mut stream = client
            .server_reflection_info(tokio_stream::once(request))
            .await?
            .into_inner();
        let response: ServerReflectionResponse =
            stream.message().await?.ok_or_else(|| GreeterError::Rpc {
                code: tonic::Code::Unavailable,
                message: "reflection stream closed without a response".to_string(),
            })?;

        match response.message_response {
            Some(MessageResponse::ErrorResponse(err)) => Err(GreeterError::Rpc {
                code: tonic::Code::from(err.error_code),
                message: err.error_message,
            }),
            Some(payload) => Ok(payload),
            None => Err(GreeterError::Rpc {
                code: tonic::Code::Internal,
                message: "empty reflection response".to_string(),
            }),
        }
    }
}

fn find_service(file: &FileDescriptorProto, service: &str) -> Option<ServiceDescription> {
    let package = file.package();
    file.service.iter().find_map(|s| {
        let full_name = if package.is_empty() {
            s.name().to_string()
        } else {
            format!("{package}.{}", s.name())
        };
        (full_name == service).then(|| ServiceDescription {
            name: full_name,
            methods: s
                .method
                .iter()
                .map(|m| MethodDescription {
                    name: m.name().to_string(),
                    input_type: m.input_type().trim_start_matches('.').to_string(),
                    output_type: m.output_type().trim_start_matches('.').to_string(),
                    client_streaming: m.client_streaming(),
                    server_streaming: m.server_streaming(),
                })
                .collect(),
        })
    })
}

fn unexpected_reflection(response: &MessageResponse) -> GreeterError {
    GreeterError::Rpc {
        code: tonic::Code::Internal,
        message: format!("unexpected reflection response: {response:?}"),
    }
}

#[cfg(test)]
mod tests {
    use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

    use super::*;

    fn descriptor() -> FileDescriptorProto {
        FileDescriptorProto {
            package: Some("greeter.v1".to_string()),
            service: vec![ServiceDescriptorProto {
                name: Some("GreeterService".to_string()),
                method: vec![MethodDescriptorProto {
                    name: Some("SayHello".to_string()),
                    input_type: Some(".greeter.v1.SayHelloRequest".to_string()),
                    output_type: Some(".greeter.v1.SayHelloResponse".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn find_service_resolves_methods() {
        let description = find_service(&descriptor(), "greeter.v1.GreeterService").unwrap();
        assert_eq!(description.methods.len(), 1);
        let method = &description.methods[0];
        assert_eq!(method.name, "SayHello");
        assert_eq!(method.input_type, "greeter.v1.SayHelloRequest");
        assert_eq!(method.output_type, "greeter.v1.SayHelloResponse");
        assert!(!method.client_streaming);
        assert!(!method.server_streaming);
    }

    #[test]
    fn find_service_requires_full_name() {
        assert!(find_service(&descriptor(), "GreeterService").is_none());
    }

    #[test]
    fn compiled_descriptor_contains_greeter() {
        let set = prost_types::FileDescriptorSet::decode(proto::FILE_DESCRIPTOR_SET).unwrap();
        let found = set
            .file
            .iter()
            .find_map(|file| find_service(file, proto::SERVICE_NAME));
        assert_eq!(found.unwrap().methods.len(), 1);
    }
}
