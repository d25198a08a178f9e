use std::{env, fs, io::Write, path::Path, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MAPBOX_GL_VERSION");

    let version = env::var("MAPBOX_GL_VERSION").unwrap_or_else(|_| "2.15.0".to_string());

    // frontend/static/vendor/mapbox-gl, picked up by asset!() in app.rs
    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping Mapbox GL download");
        return;
    };
    let vendor_dir = PathBuf::from(manifest_dir)
        .join("static")
        .join("vendor")
        .join("mapbox-gl");

    if let Err(e) = fs::create_dir_all(&vendor_dir) {
        println!("cargo:warning=Failed to create Mapbox GL vendor dir {vendor_dir:?}: {e}");
        return;
    }

    for kind in ["css", "js"] {
        if let Err(e) = download_mapbox_file(&vendor_dir, &version, kind) {
            println!("cargo:warning=Failed to download Mapbox GL {kind}: {e}");
        }
    }
}

fn download_mapbox_file(
    vendor_dir: &Path,
    version: &str,
    kind: &str, // "css" or "js"
) -> Result<(), Box<dyn std::error::Error>> {
    let out_path = vendor_dir.join(format!("mapbox-gl.{kind}"));

    // Already vendored; don't refetch every build.
    if out_path.exists() {
        return Ok(());
    }

    let url = format!("https://api.mapbox.com/mapbox-gl-js/v{version}/mapbox-gl.{kind}");
    println!("Downloading {url} -> {}", out_path.display());

    let resp = reqwest::blocking::get(&url)?;
    if !resp.status().is_success() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }

    let bytes = resp.bytes()?;
    let mut file = fs::File::create(&out_path)?;
    file.write_all(&bytes)?;
    file.flush()?;

    Ok(())
}
