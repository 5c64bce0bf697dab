use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use ormedm::edm::NameStyle;
use ormedm::{MapperConfig, Metamodel, SchemaRegistry};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "edm-tool")]
#[command(about = "Developer tooling for ormedm metadata")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the metadata document of a JSON metamodel
    Dump {
        model: PathBuf,
        #[arg(long, default_value = "Default")]
        namespace: String,
        #[arg(long)]
        as_declared: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the resolved key of one entity class
    Key {
        model: PathBuf,
        class: String,
        #[arg(long, default_value = "Default")]
        namespace: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Dump {
            model,
            namespace,
            as_declared,
            out,
        } => {
            let style = if as_declared {
                NameStyle::AsDeclared
            } else {
                NameStyle::Pascal
            };
            dump(&model, MapperConfig::new(&namespace).name_style(style), out.as_deref())
        }
        Command::Key {
            model,
            class,
            namespace,
        } => print_key(&model, &class, MapperConfig::new(&namespace)),
    }
}

fn load_model(path: &Path) -> Result<Metamodel> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read metamodel '{}'", path.display()))?;
    Metamodel::from_json(&json)
        .with_context(|| format!("Failed to parse metamodel '{}'", path.display()))
}

fn dump(model: &Path, config: MapperConfig, out: Option<&Path>) -> Result<()> {
    let metamodel = load_model(model)?;
    let registry = SchemaRegistry::build(&metamodel, config)
        .with_context(|| format!("Invalid mapping in '{}'", model.display()))?;
    let schema = registry.csdl_schema()?;
    let rendered = serde_json::to_string_pretty(&schema)?;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directory '{}'", parent.display())
                })?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            println!(
                "Wrote {} entity types and {} complex types to {}",
                schema.entity_types.len(),
                schema.complex_types.len(),
                path.display()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn print_key(model: &Path, class: &str, config: MapperConfig) -> Result<()> {
    let metamodel = load_model(model)?;
    let registry = SchemaRegistry::new(&metamodel, config)?;
    let entity = registry
        .entity_type(class)
        .map_err(|err| anyhow!("{class}: {err}"))?;

    let key = entity.key()?;
    println!("{} ({} key attributes)", entity.qualified_name(), key.len());
    for property in key {
        println!(
            "  {:<24} {:<20} column {}",
            property.external_name(),
            property.type_name(),
            property.db_field_name()
        );
    }
    if let Some(id_type) = entity.key_type() {
        println!("  id type: {id_type:?}");
    }
    Ok(())
}
