//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves the site over HTTP.

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context};
    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    #[derive(Parser)]
    #[command(name = "cubefx", about = "Build and serve the cube effects demo")]
    struct Cli {
        /// Port for the local HTTP server
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Serve the existing bundle without running wasm-pack
        #[arg(long)]
        skip_build: bool,

        /// Directory to serve
        #[arg(long, default_value = "static")]
        dir: String,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    }

    fn build_wasm(dir: &str) -> anyhow::Result<()> {
        tracing::info!("building WASM pkg");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir"])
            .arg(format!("{dir}/pkg"))
            .status()
            .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
        if !status.success() {
            bail!("wasm-pack finished with {status}");
        }
        Ok(())
    }

    pub fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();

        let filter = if cli.verbose { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
            .init();

        if cli.skip_build {
            tracing::info!("skipping wasm-pack; serving the existing bundle");
        } else {
            build_wasm(&cli.dir)?;
        }

        tracing::info!("serving {} at http://127.0.0.1:{}", cli.dir, cli.port);
        let status = Command::new("python3")
            .args(["-m", "http.server"])
            .arg(cli.port.to_string())
            .args(["--bind", "127.0.0.1", "--directory"])
            .arg(&cli.dir)
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .context("failed to start python3 http.server")?;

        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

// The wasm build is driven by `#[wasm_bindgen(start)]` in the library.
#[cfg(target_arch = "wasm32")]
fn main() {}
