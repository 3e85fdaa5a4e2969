use std::env;

fn main() {
    let version =
        env::var("PAWPH_VERSION").unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rustc-env=PAWPH_VERSION={version}");
    println!("cargo:rerun-if-env-changed=PAWPH_VERSION");
}
