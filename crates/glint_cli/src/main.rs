use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glint_tracer::{render, RenderConfig};

mod demo;

#[derive(Parser, Debug)]
#[clap(name = "glint", about = "Render the Glint demo scene with a recursive ray tracer")]
struct CliArguments {
    /// JSON render config; flags override its values
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    #[clap(short = 'W', long)]
    width: Option<u32>,

    #[clap(short = 'H', long)]
    height: Option<u32>,

    /// Reflection/refraction recursion depth
    #[clap(short = 'd', long)]
    depth: Option<u32>,

    /// Enable adaptive antialiasing
    #[clap(long, action)]
    aa: bool,

    #[clap(long)]
    aa_samples: Option<u32>,

    /// Test every object instead of using the BVH
    #[clap(long, action)]
    no_bvh: bool,

    /// Enable glossy reflections
    #[clap(long, action)]
    glossy: bool,

    #[clap(long)]
    glossy_samples: Option<u32>,

    #[clap(long)]
    seed: Option<u64>,

    /// Log every traced ray (needs RUST_LOG=debug)
    #[clap(long, action)]
    debug: bool,

    /// Image for the floor's diffuse colour
    #[clap(long)]
    texture: Option<String>,

    #[clap(short = 'o', long, default_value = "render.png")]
    output: PathBuf,
}

impl CliArguments {
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(samples) = self.aa_samples {
            config.aa_samples = samples;
        }
        if let Some(samples) = self.glossy_samples {
            config.glossy_samples = samples;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.antialiasing |= self.aa;
        config.glossy |= self.glossy;
        config.debug |= self.debug;
        if self.no_bvh {
            config.use_bvh = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = CliArguments::parse();
    let config = args.render_config()?;

    log::info!("Building demo scene");
    let mut scene = demo::build(args.texture.as_deref())?;

    let output = render(&mut scene, &config)?;
    output
        .image
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Saved {} ({} rays, deepest recursion {}, {:.2?})",
        args.output.display(),
        output.stats.rays_traced,
        output.stats.max_recursion,
        output.stats.elapsed
    );
    Ok(())
}
