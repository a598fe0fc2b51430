use std::env;
use std::fs::File;
use std::path::PathBuf;

use gl_generator::{Api, Fallbacks, GlobalGenerator, Profile, Registry};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut bindings = File::create(out_dir.join("bindings.rs")).unwrap();
    // GLES 3.0, to match the context requested from SDL in main.rs.
    Registry::new(Api::Gles2, (3, 0), Profile::Core, Fallbacks::All, [])
        .write_bindings(GlobalGenerator, &mut bindings)
        .unwrap();
    println!("cargo:rerun-if-changed=build.rs");
}
