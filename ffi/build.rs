//! Generate `include/todo_ffi.h` from the `extern "C"` surface.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let Ok(crate_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping header generation");
        return;
    };
    let config = cbindgen::Config::from_root_or_default(&crate_dir);
    let header = PathBuf::from(&crate_dir).join("include").join("todo_ffi.h");

    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            bindings.write_to_file(header);
        }
        Err(e) => println!("cargo:warning=cbindgen failed, header not updated: {e}"),
    }
}
