use anyhow::Result;

fn main() -> Result<()> {
    let app_version = env("CARGO_PKG_VERSION")?;
    let app_version = app_version
        .into_string()
        .map_err(|version| anyhow::anyhow!("invalid CARGO_PKG_VERSION: {version:?}"))?;

    let rustc_version = rustc_version::version()?;

    println!("cargo:rustc-env=FLEET_GATEWAY_VERSION={app_version}");
    println!("cargo:rustc-env=FLEET_GATEWAY_RUSTC_VERSION={rustc_version}");
    Ok(())
}

fn env(key: &str) -> Result<std::ffi::OsString> {
    println!("cargo:rerun-if-env-changed={key}");
    std::env::var_os(key).ok_or_else(|| anyhow::anyhow!("missing '{key}' environment variable"))
}
