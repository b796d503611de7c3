use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "psbuild", version)]
struct Cli {
    /// Log per-resource and per-node details.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert decompiled PSB documents to another platform.
    Convert(ConvertArgs),
    /// Print platform and resource summary of a decompiled PSB document.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input `<name>.json` files; each needs a `<name>.resx.json` next to it.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Destination platform.
    #[arg(long, value_enum)]
    to: PlatformChoice,

    /// Strip precomputed metadata the destination recomputes.
    #[arg(long)]
    minimum: bool,

    /// Force run-length compression of written resources on or off.
    #[arg(long)]
    rl: Option<bool>,

    /// Pixel layout for resources created by the krkr step.
    #[arg(long, value_enum)]
    pixel_format: Option<PixelFormatChoice>,

    /// Output directory; defaults to `<input dir>/<platform>`.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// PSB version written to the output manifests.
    #[arg(long)]
    psb_version: Option<u16>,

    /// Crypt key written to the output manifests.
    #[arg(long)]
    key: Option<u32>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input `<name>.json` file.
    input: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlatformChoice {
    Krkr,
    Win,
    Common,
    Ems,
}

impl From<PlatformChoice> for psbuild::Platform {
    fn from(p: PlatformChoice) -> Self {
        match p {
            PlatformChoice::Krkr => psbuild::Platform::Krkr,
            PlatformChoice::Win => psbuild::Platform::Win,
            PlatformChoice::Common => psbuild::Platform::Common,
            PlatformChoice::Ems => psbuild::Platform::Ems,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PixelFormatChoice {
    Rgba8,
    Rgba4444,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let to: psbuild::Platform = args.to.into();
    let settings = psbuild::ConversionSettings {
        option: if args.minimum {
            psbuild::ConvertOption::Minimum
        } else {
            psbuild::ConvertOption::Default
        },
        use_run_length: args.rl,
        target_pixel_format: args.pixel_format.map(|f| {
            let raw = match f {
                PixelFormatChoice::Rgba8 => psbuild::PixelFormat::WinRgba8,
                PixelFormatChoice::Rgba4444 => psbuild::PixelFormat::WinRgba4444,
            };
            raw.for_platform(to)
        }),
    };

    let mut failed = 0usize;
    for input in &args.inputs {
        match convert_one(input, to, &settings, &args) {
            Ok(out) => eprintln!("wrote {}", out.display()),
            Err(e) => {
                failed += 1;
                tracing::error!(input = %input.display(), "conversion failed: {e:#}");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} documents failed to convert", args.inputs.len());
    }
    Ok(())
}

fn convert_one(
    input: &Path,
    to: psbuild::Platform,
    settings: &psbuild::ConversionSettings,
    args: &ConvertArgs,
) -> anyhow::Result<PathBuf> {
    let (mut doc, mut manifest) = psbuild::load_document(input)
        .with_context(|| format!("load document '{}'", input.display()))?;
    let from = doc.platform();
    psbuild::convert_document(&mut doc, to, settings)
        .with_context(|| format!("convert '{}' from {from} to {to}", input.display()))?;

    if let Some(version) = args.psb_version {
        manifest.psb_version = version;
    }
    if let Some(key) = args.key {
        manifest.crypt_key = Some(key);
    }

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(to.as_str()),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

    let file_name = input
        .file_name()
        .with_context(|| format!("input '{}' has no file name", input.display()))?;
    let out = out_dir.join(file_name);
    psbuild::save_document(&doc, &manifest, &out)
        .with_context(|| format!("save document '{}'", out.display()))?;
    Ok(out)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let (doc, manifest) = psbuild::load_document(&args.input)
        .with_context(|| format!("load document '{}'", args.input.display()))?;

    println!("platform:  {}", doc.platform());
    println!("version:   {}", manifest.psb_version);
    if let Some(kind) = &manifest.psb_type {
        println!("type:      {kind}");
    }
    let resources = doc.collect_resources(&[]);
    println!("resources: {}", resources.len());
    for meta in &resources {
        let len = doc
            .resource(meta.id)
            .and_then(|r| r.data.as_ref())
            .map_or(0, Vec::len);
        println!(
            "  {}: {}x{} {} {} ({len} bytes)",
            meta.path,
            meta.width,
            meta.height,
            meta.pixel_format.psb_name(),
            meta.compress.label().unwrap_or("-"),
        );
    }
    Ok(())
}
