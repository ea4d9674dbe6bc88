use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

/// Verify the crate layering: domain depends on nothing in the workspace,
/// shared depends only on domain.
fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;
    if !output.status.success() {
        anyhow::bail!("cargo metadata failed");
    }

    let metadata: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let packages = metadata["packages"]
        .as_array()
        .context("metadata has no packages")?;

    let mut violations = Vec::new();
    for package in packages {
        let name = package["name"].as_str().unwrap_or_default();
        let deps: Vec<&str> = package["dependencies"]
            .as_array()
            .map(|deps| {
                deps.iter()
                    .filter_map(|dep| dep["name"].as_str())
                    .collect()
            })
            .unwrap_or_default();
        match name {
            "skirmish-domain" => {
                if deps.iter().any(|dep| dep.starts_with("skirmish-")) {
                    violations.push("skirmish-domain must not depend on workspace crates");
                }
            }
            "skirmish-shared" => {
                if deps.contains(&"skirmish-client") {
                    violations.push("skirmish-shared must not depend on skirmish-client");
                }
            }
            _ => {}
        }
    }

    if violations.is_empty() {
        println!("arch-check: ok");
        Ok(())
    } else {
        anyhow::bail!("arch-check failed:\n  {}", violations.join("\n  "))
    }
}
