use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;

mod grammar;
mod ids;
mod render;
mod spec;
mod validate;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "bundlec")]
#[command(about = "Smart-device automation bundle compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a bundle spec against a capability schema.
    Validate {
        #[arg(long)]
        spec: String,

        #[arg(long)]
        caps: String,
    },

    /// Render a PlantUML state diagram from a validated spec.
    Diagram {
        #[arg(long)]
        spec: String,

        #[arg(short = 'o', long)]
        out: String,
    },

    /// Fill a UML/XMI template from a validated spec.
    Model {
        #[arg(long)]
        spec: String,

        #[arg(long)]
        template: String,

        #[arg(short = 'o', long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Validate { spec, caps } => {
            let bundle = load_bundle(&spec)?;
            let caps: spec::CapsSpec = serde_json::from_str(&fs::read_to_string(&caps)?)?;

            let diagnostics = validate::validate(&bundle, &caps);
            if diagnostics.is_empty() {
                println!("OK");
            } else {
                for diagnostic in &diagnostics {
                    println!("- {}", diagnostic);
                }
                std::process::exit(1);
            }
        }

        Commands::Diagram { spec, out } => {
            let bundle = load_bundle(&spec)?;
            let text = render::render_diagram(&bundle);
            let path = write_artifact(&out, &render::diagram_file_name(&bundle), &text)?;
            println!("Wrote {}", path);
        }

        Commands::Model {
            spec,
            template,
            out,
        } => {
            let bundle = load_bundle(&spec)?;
            let template = fs::read_to_string(&template)?;
            let text = render::render_model(&bundle, &template)?;
            let path = write_artifact(&out, &render::model_file_name(&bundle)?, &text)?;
            println!("Wrote {}", path);
        }
    }

    Ok(())
}

fn load_bundle(path: &str) -> Result<spec::BundleSpec> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn write_artifact(out_dir: &str, file_name: &str, text: &str) -> Result<String> {
    fs::create_dir_all(out_dir)?;
    let path = Path::new(out_dir).join(file_name);
    fs::write(&path, text)?;
    Ok(path.display().to_string())
}
