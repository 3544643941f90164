use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for simulated sensor detections")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 8)]
    objects: usize,
    #[arg(long, default_value_t = 1)]
    frames: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write one JSON array per frame to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the workflow config as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.objects, args.frames, args.seed)
    };

    if args.dump_config {
        println!("{}", workflow_config.to_json()?);
        return Ok(());
    }

    let runner = Runner::new(workflow_config);
    let result = runner.execute()?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            for frame in &result.frames {
                writeln!(file, "{}", frame)?;
            }
            info!(
                "wrote {} frames ({} objects) to {}",
                result.frames.len(),
                result.object_count,
                path.display()
            );
        }
        None => {
            for frame in &result.frames {
                println!("{}", frame);
            }
        }
    }

    Ok(())
}
