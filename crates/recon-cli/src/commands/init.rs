//! `recon init`: scaffold a recon.toml in the current directory.

use std::path::Path;

use recon_core::ReconConfig;

pub fn run() -> anyhow::Result<()> {
    write_scaffold(Path::new("recon.toml"))
}

fn write_scaffold(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    let rendered = ReconConfig::scaffold().to_toml_string()?;
    std::fs::write(path, rendered)?;
    println!("wrote {}", path.display());
    Ok(())
}
