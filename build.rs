use std::path::PathBuf;

use prost::Message;
use vergen_gitcl::{Build, Cargo, Emitter, Gitcl};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = Build::builder().build_timestamp(true).build();
    let cargo = Cargo::builder().build();
    let gitcl = Gitcl::builder().branch(true).sha(true).dirty(true).build();

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&gitcl)?
        .emit()?;

    // Compile protobuf with protox so the build does not depend on a system protoc.
    let proto_file = "proto/greeter/v1/greeter.proto";
    println!("cargo:rerun-if-changed={proto_file}");

    let fds = protox::compile([proto_file], ["proto"])?;

    // Encoded descriptor set backs the reflection service.
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    std::fs::write(
        out_dir.join("greeter_descriptor.bin"),
        fds.encode_to_vec(),
    )?;

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_fds(fds)?;

    Ok(())
}
