//! Build script for the storefront crate.
//!
//! Fingerprints `static/css/main.css` so it can be served with an immutable
//! cache header. The hash is exposed as `CSS_HASH`; an empty hash means the
//! unhashed path is used.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let hash = env::var("CARGO_MANIFEST_DIR")
        .ok()
        .and_then(|dir| hash_css(Path::new(&dir)))
        .unwrap_or_default();

    println!("cargo:rustc-env=CSS_HASH={hash}");
}

/// Copy main.css to `static/css/derived/main.<hash>.css` and return the hash.
fn hash_css(manifest_dir: &Path) -> Option<String> {
    let css_path = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = fs::read(&css_path)
        .map_err(|e| println!("cargo:warning=Could not read main.css: {e}"))
        .ok()?;

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = digest.get(..8)?.to_string();

    let derived_dir = manifest_dir.join("static/css/derived");
    let derived_path = derived_dir.join(format!("main.{short_hash}.css"));
    if let Err(e) = fs::create_dir_all(&derived_dir).and_then(|()| fs::copy(&css_path, &derived_path)) {
        println!("cargo:warning=Could not write hashed CSS: {e}");
        return None;
    }

    Some(short_hash)
}
