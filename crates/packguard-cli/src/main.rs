//! CLI entry point for packguard.
//!
//! Argument parsing, file IO and exit codes only. Use cases live in `packguard-app`.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use packguard_app::{
    EvaluationContext, ExplainOutput, SetDefaultsInput, format_explanation, format_not_found,
    parse_report_json, render_annotations, render_markdown, render_rule_config_yaml, render_text,
    rule_config_json, run_check, run_explain, run_rule_config, run_set_defaults, run_validate,
    serialize_report, verdict_exit_code,
};
use packguard_settings::Overrides;
use packguard_types::ids;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "packguard",
    version,
    about = "Package boundary protections for modular monoliths"
)]
struct Cli {
    /// Repository root (directory containing the packages).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Path to packguard config TOML, relative to the repository root.
    #[arg(long, default_value = ids::CONFIG_FILE)]
    config: Utf8PathBuf,

    /// Replace the active protection set (comma-separated identifiers).
    #[arg(long, value_delimiter = ',')]
    enable: Option<Vec<String>>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every protection and write a JSON report.
    Check {
        /// JSON file of newly detected violations (omit for none).
        #[arg(long)]
        new_violations: Option<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/packguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/packguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// List every configuration problem across all packages.
    Validate,

    /// Write default protections into package manifests.
    SetDefaults {
        /// Package to update (repeatable; default is every package).
        #[arg(long = "package")]
        packages: Vec<String>,

        /// Protection to default (repeatable; default is every active protection).
        #[arg(long = "protection")]
        protections: Vec<String>,

        /// Do not log per-package progress.
        #[arg(long)]
        quiet: bool,
    },

    /// Print the rule-engine configuration derived from package protections.
    RuleConfig {
        #[arg(long, value_enum, default_value_t = RuleConfigFormat::Yaml)]
        format: RuleConfigFormat,

        /// Where to write the configuration (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a protection by identifier or rule name.
    Explain {
        /// The protection identifier or rule-engine rule name to explain.
        identifier: String,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/packguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/packguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RuleConfigFormat {
    Yaml,
    Json,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("packguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("PACKGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Commands::Check {
            ref new_violations,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => {
            let mut ctx = open_context(&cli)?;
            cmd_check(
                &mut ctx,
                new_violations.as_deref(),
                report_out,
                write_markdown.then_some(markdown_out.as_path()),
            )
        }
        Commands::Validate => {
            let mut ctx = open_context(&cli)?;
            cmd_validate(&mut ctx)
        }
        Commands::SetDefaults {
            ref packages,
            ref protections,
            quiet,
        } => {
            let mut ctx = open_context(&cli)?;
            let input = SetDefaultsInput {
                packages: non_empty(packages),
                identifiers: non_empty(protections),
                verbose: !quiet,
            };
            cmd_set_defaults(&mut ctx, input)
        }
        Commands::RuleConfig { format, ref output } => {
            let mut ctx = open_context(&cli)?;
            cmd_rule_config(&mut ctx, format, output.as_deref())
        }
        Commands::Explain { ref identifier } => Ok(cmd_explain(identifier)),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Annotations { ref report, max } => cmd_annotations(report, max),
    }
}

/// Resolve the repository root and read the config; a missing config file means defaults.
fn open_context(cli: &Cli) -> anyhow::Result<EvaluationContext> {
    let repo_root = cli
        .repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone());
    if !repo_root.exists() {
        anyhow::bail!("repo root does not exist: {}", repo_root);
    }

    let cfg_path = repo_root.join(&cli.config);
    let cfg_text = if cfg_path.exists() {
        std::fs::read_to_string(&cfg_path).with_context(|| format!("read config: {cfg_path}"))?
    } else {
        String::new()
    };

    tracing::debug!(root = %repo_root, config = %cfg_path, "opening repository");

    let overrides = Overrides {
        protections: cli.enable.clone(),
    };
    Ok(EvaluationContext::new(&repo_root, cfg_text, overrides))
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

fn cmd_check(
    ctx: &mut EvaluationContext,
    new_violations: Option<&Utf8Path>,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let new_violations = match new_violations {
        Some(path) => packguard_repo::read_new_violations(path)?,
        None => Vec::new(),
    };

    let output = run_check(ctx, &new_violations)?;

    let data = serialize_report(&output.report)?;
    write_file(report_out, &data).context("write report json")?;
    if let Some(markdown_out) = markdown_out {
        let md = render_markdown(&output.report);
        write_file(markdown_out, md.as_bytes()).context("write markdown")?;
    }

    print!("{}", render_text(&output.report));
    Ok(verdict_exit_code(output.report.verdict))
}

fn cmd_validate(ctx: &mut EvaluationContext) -> anyhow::Result<i32> {
    let messages = run_validate(ctx)?;
    if messages.is_empty() {
        println!("All packages have valid protections.");
        return Ok(0);
    }

    for message in &messages {
        println!("{message}");
    }
    Ok(2)
}

fn cmd_set_defaults(ctx: &mut EvaluationContext, input: SetDefaultsInput) -> anyhow::Result<i32> {
    let output = run_set_defaults(ctx, input)?;
    for name in &output.written {
        println!("Updated {name}");
    }
    Ok(0)
}

fn cmd_rule_config(
    ctx: &mut EvaluationContext,
    format: RuleConfigFormat,
    output: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let configs = run_rule_config(ctx)?;
    let text = match format {
        RuleConfigFormat::Yaml => render_rule_config_yaml(&configs)?,
        RuleConfigFormat::Json => {
            let mut text = serde_json::to_string_pretty(&rule_config_json(&configs))
                .context("serialize rule config")?;
            text.push('\n');
            text
        }
    };

    match output {
        Some(path) => write_file(path, text.as_bytes()).context("write rule config")?,
        None => print!("{text}"),
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available,
        } => {
            eprint!("{}", format_not_found(&identifier, available));
            1
        }
    }
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    match output {
        Some(out_path) => write_file(out_path, md.as_bytes()).context("write markdown output")?,
        None => print!("{}", md),
    }
    Ok(0)
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<i32> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;

    for annotation in render_annotations(&report, max) {
        println!("{}", annotation);
    }
    Ok(0)
}

fn write_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, data).with_context(|| format!("write file: {}", path))?;
    Ok(())
}
