fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Bundled protoc and well-known type includes.
    let protoc = protoc_bin_vendored::protoc_bin_path().map_err(|e| e.to_string())?;
    let well_known = protoc_bin_vendored::include_path().map_err(|e| e.to_string())?;

    // SAFETY: build scripts are single-threaded.
    unsafe {
        std::env::set_var("PROTOC", protoc);
    }

    println!("cargo:rerun-if-changed=proto/portfolio.proto");

    // Descriptor set served by gRPC reflection.
    let descriptor = std::path::PathBuf::from(std::env::var("OUT_DIR")?).join("portfolio_descriptor.bin");

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .file_descriptor_set_path(descriptor)
        .compile_protos(
            &["proto/portfolio.proto"],
            &[std::path::PathBuf::from("proto"), well_known],
        )?;

    Ok(())
}
