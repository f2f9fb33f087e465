//! Put `memory.x` on the linker search path. The linker only looks in
//! cortex-m-rt's output directory and the directory cargo was invoked
//! from, so without this the image cannot link from the workspace root.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // Only re-run when the memory map changes, not on every file edit.
    println!("cargo:rerun-if-changed=memory.x");
}
