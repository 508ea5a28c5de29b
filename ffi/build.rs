use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let mut config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("WEBSERVICE_H".to_string()),
        ..Default::default()
    };
    // Passed as raw u32 across the boundary, so not reachable from signatures.
    config.export.include = vec!["FfiParameterEncoding".to_string()];

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("webservice.h"));
        }
        Err(e) => println!("cargo:warning=failed to generate C header: {e}"),
    }
    println!("cargo:rerun-if-changed=src");
}
