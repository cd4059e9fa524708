use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use javelin_config::JavelinConfig;
use javelin_enhance::{
    predefined_enhancement, ClassUseSiteScope, EnhancedMember, EnhancementScope, ResolvedType,
    SignatureDescriptorBuilder,
};
use javelin_model::{load_declarations_from_path, ClassId, DeclarationStore, Nullability};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "javelin",
    version,
    about = "Javelin CLI (nullability enhancement of Java declarations)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enhance the foreign members of a declarations file and print their signatures
    Enhance(EnhanceArgs),
    /// Print the JVM signatures of a class' methods and which have predefined corrections
    Signatures(SignaturesArgs),
    /// Print the JSON schema of `javelin.toml`
    Schema,
}

#[derive(Args)]
struct EnhanceArgs {
    /// Declarations file (JSON)
    declarations: PathBuf,
    /// Path to a `javelin.toml`
    #[arg(long)]
    config: Option<PathBuf>,
    /// Only enhance members of this class (binary name)
    #[arg(long)]
    class: Option<String>,
    /// Only enhance members with this name
    #[arg(long)]
    member: Option<String>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SignaturesArgs {
    /// Declarations file (JSON)
    declarations: PathBuf,
    /// Class to describe (binary name)
    #[arg(long)]
    class: String,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Enhance(args) => {
            let config = load_config(args.config.as_deref())?;
            javelin_config::init_tracing(&config.logging);
            let store = load_store(&args.declarations)?;
            let report = enhance(&store, &config, &args)?;
            if args.json {
                print_json(&report)?;
            } else {
                print_enhance_report(&report);
            }
            Ok(0)
        }
        Command::Signatures(args) => {
            javelin_config::init_tracing(&JavelinConfig::default().logging);
            let store = load_store(&args.declarations)?;
            let rows = signatures(&store, &args.class)?;
            if args.json {
                print_json(&rows)?;
            } else {
                for row in &rows {
                    if row.predefined {
                        println!("{} [predefined]", row.signature);
                    } else {
                        println!("{}", row.signature);
                    }
                }
            }
            Ok(0)
        }
        Command::Schema => {
            print_json(&javelin_config::json_schema())?;
            Ok(0)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<JavelinConfig> {
    let Some(path) = path else {
        return Ok(JavelinConfig::default());
    };

    let (config, diagnostics) = JavelinConfig::load_from_path_with_diagnostics(path)?;
    for key in &diagnostics.unknown_keys {
        eprintln!("warning: unknown config key `{key}`");
    }
    for warning in &diagnostics.warnings {
        eprintln!("warning: {warning}");
    }
    if !diagnostics.is_ok() {
        let errors: Vec<String> = diagnostics.errors.iter().map(ToString::to_string).collect();
        bail!("invalid config {}: {}", path.display(), errors.join("; "));
    }
    Ok(config)
}

fn load_store(path: &Path) -> Result<DeclarationStore> {
    load_declarations_from_path(path)
        .with_context(|| format!("failed to load declarations from {}", path.display()))
}

fn lookup_class(store: &DeclarationStore, name: &str) -> Result<ClassId> {
    store
        .lookup_class(name)
        .with_context(|| format!("unknown class `{name}`"))
}

#[derive(Serialize)]
struct EnhanceReport {
    classes: Vec<ClassReport>,
}

#[derive(Serialize)]
struct ClassReport {
    name: String,
    members: Vec<EnhancedMember>,
}

fn enhance(store: &DeclarationStore, config: &JavelinConfig, args: &EnhanceArgs) -> Result<EnhanceReport> {
    let class_ids = match &args.class {
        Some(name) => vec![lookup_class(store, name)?],
        None => store.classes().map(|class| class.id).collect(),
    };

    let mut classes = Vec::new();
    for class_id in class_ids {
        let Some(class) = store.class(class_id) else {
            continue;
        };
        let scope = EnhancementScope::new(
            store,
            ClassUseSiteScope::new(store, class_id),
            &config.enhancement,
        );

        let mut members = Vec::new();
        for member in class.members.iter().filter_map(|id| store.member(*id)) {
            if !member.is_foreign() {
                continue;
            }
            if args.member.as_deref().is_some_and(|name| member.name != name) {
                continue;
            }
            let enhanced = scope
                .enhanced(member.id)
                .with_context(|| format!("failed to enhance {}.{}", class.name, member.name))?;
            members.push((*enhanced).clone());
        }

        if !members.is_empty() {
            classes.push(ClassReport {
                name: class.name.to_string(),
                members,
            });
        }
    }

    if classes.is_empty() {
        if let Some(member) = &args.member {
            bail!("no foreign member named `{member}`");
        }
    }
    Ok(EnhanceReport { classes })
}

#[derive(Serialize)]
struct SignatureRow {
    member: String,
    signature: String,
    predefined: bool,
}

fn signatures(store: &DeclarationStore, class_name: &str) -> Result<Vec<SignatureRow>> {
    let class_id = lookup_class(store, class_name)?;
    let class = store
        .class(class_id)
        .with_context(|| format!("unknown class `{class_name}`"))?;
    let descriptors = SignatureDescriptorBuilder::new(store);

    Ok(class
        .members
        .iter()
        .filter_map(|id| store.member(*id))
        .filter(|member| member.as_method().is_some())
        .map(|member| {
            let signature = descriptors.signature(class.name.as_str(), member);
            SignatureRow {
                member: member.name.to_string(),
                predefined: predefined_enhancement(&signature).is_some(),
                signature,
            }
        })
        .collect())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

fn print_enhance_report(report: &EnhanceReport) {
    for class in &report.classes {
        println!("{}", class.name);
        for member in &class.members {
            println!("  {member}");
            for resolved in member.resolved_types() {
                print_warning(resolved);
            }
        }
    }
}

fn print_warning(resolved: &ResolvedType) {
    let Some(claimed) = resolved.warning else {
        return;
    };
    println!(
        "    warning: {} is annotated {} (reported only, resolved as {})",
        resolved.ty,
        nullability_label(claimed),
        nullability_label(resolved.nullability)
    );
}

fn nullability_label(nullability: Nullability) -> &'static str {
    match nullability {
        Nullability::NotNull => "not-null",
        Nullability::Nullable => "nullable",
        Nullability::Flexible => "flexible",
    }
}
