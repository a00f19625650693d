use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use memegen::{
    AiClient, AiConfig, Compositor, FrameSize, GeminiClient, MemeController, Mode,
    RenderSettings, TextOverlay, config,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "memegen", version)]
struct Cli {
    /// Bold TTF/OTF used for captions (falls back to MEMEGEN_FONT, then system fonts).
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Output frame width in pixels.
    #[arg(long, global = true, default_value_t = FrameSize::DEFAULT.width)]
    width: u32,

    /// Output frame height in pixels.
    #[arg(long, global = true, default_value_t = FrameSize::DEFAULT.height)]
    height: u32,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose an image and overlay JSON into a PNG.
    Render(RenderArgs),
    /// Print caption suggestions for an image.
    Captions(SourceArgs),
    /// Edit an image from an instruction and write the result as a PNG.
    Edit(EditArgs),
    /// Print a title, description and tags for an image.
    Analyze(SourceArgs),
    /// Suggest captions, apply one and export the meme.
    Make(MakeArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Image path, http(s) URL or data: URL.
    #[arg(long, conflicts_with = "template", required_unless_present = "template")]
    image: Option<String>,

    /// Built-in template index instead of --image.
    #[arg(long)]
    template: Option<usize>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Image path, http(s) URL or data: URL; omit for the placeholder frame.
    #[arg(long)]
    image: Option<String>,

    /// JSON array of text overlays, painted in order.
    #[arg(long)]
    overlays: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Edit instruction, e.g. "Add a retro filter".
    #[arg(long)]
    prompt: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct MakeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Index of the suggestion to apply.
    #[arg(long, default_value_t = 0)]
    pick: usize,

    /// Directory receiving `memegen-<millis>.png`.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let frame = FrameSize::new(cli.width, cli.height)?;
    match cli.cmd {
        Command::Render(ref args) => cmd_render(&cli, frame, args).await,
        Command::Captions(ref args) => cmd_captions(frame, args).await,
        Command::Edit(ref args) => cmd_edit(&cli, frame, args).await,
        Command::Analyze(ref args) => cmd_analyze(frame, args).await,
        Command::Make(ref args) => cmd_make(&cli, frame, args).await,
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn compositor(cli: &Cli) -> anyhow::Result<Compositor> {
    let font = config::resolve_font(cli.font.as_deref())?;
    let settings = RenderSettings {
        placeholder_font: config::resolve_placeholder_font(),
        ..RenderSettings::default()
    };
    Ok(Compositor::new(&font, settings)?)
}

fn controller(frame: FrameSize) -> anyhow::Result<MemeController<GeminiClient>> {
    let cfg = AiConfig::from_env()?;
    let http = reqwest::Client::new();
    Ok(MemeController::new(
        AiClient::gemini(http.clone(), &cfg),
        http,
        frame,
    )?)
}

async fn load(ctl: &mut MemeController<GeminiClient>, src: &SourceArgs) -> anyhow::Result<()> {
    match (&src.image, src.template) {
        (Some(location), _) => ctl.load_location(location).await?,
        (None, Some(index)) => ctl.select_template(index).await?,
        (None, None) => anyhow::bail!("pass --image or --template"),
    }
    Ok(())
}

fn flush_notices(ctl: &mut MemeController<GeminiClient>) {
    for notice in ctl.take_notices() {
        eprintln!("{}", notice.message);
    }
}

fn read_overlays(path: &Path) -> anyhow::Result<Vec<TextOverlay>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read overlays '{}'", path.display()))?;
    memegen::parse_overlays(&json)
        .with_context(|| format!("parse overlays '{}'", path.display()))
}

async fn cmd_render(cli: &Cli, frame: FrameSize, args: &RenderArgs) -> anyhow::Result<()> {
    let image = match &args.image {
        Some(location) => Some(memegen::ImageSource::open(&reqwest::Client::new(), location).await?),
        None => None,
    };
    let overlays = match &args.overlays {
        Some(path) => read_overlays(path)?,
        None => Vec::new(),
    };

    let mut comp = compositor(cli)?;
    let out = comp.render(frame, image.as_ref().map(|s| s.image()), &overlays)?;
    out.write_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_captions(frame: FrameSize, args: &SourceArgs) -> anyhow::Result<()> {
    let mut ctl = controller(frame)?;
    load(&mut ctl, args).await?;

    let result = ctl.generate_captions().await.map(|c| c.to_vec());
    flush_notices(&mut ctl);
    for (i, caption) in result?.iter().enumerate() {
        match &caption.category {
            Some(category) => println!("{i}: {} [{category}]", caption.text),
            None => println!("{i}: {}", caption.text),
        }
    }
    Ok(())
}

async fn cmd_edit(cli: &Cli, frame: FrameSize, args: &EditArgs) -> anyhow::Result<()> {
    let mut ctl = controller(frame)?;
    load(&mut ctl, &args.source).await?;
    ctl.set_mode(Mode::Edit);
    ctl.set_edit_prompt(args.prompt.clone());

    let applied = ctl.edit_image().await;
    flush_notices(&mut ctl);
    if !applied? {
        return Ok(());
    }

    let mut comp = compositor(cli)?;
    ctl.render(&mut comp)?.write_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_analyze(frame: FrameSize, args: &SourceArgs) -> anyhow::Result<()> {
    let mut ctl = controller(frame)?;
    load(&mut ctl, args).await?;
    ctl.set_mode(Mode::Analyze);

    let result = ctl.analyze_image().await.cloned();
    flush_notices(&mut ctl);
    let analysis = result?;
    println!("{}", analysis.title);
    println!();
    println!("{}", analysis.description);
    if !analysis.tags.is_empty() {
        println!();
        println!(
            "{}",
            analysis
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
    Ok(())
}

async fn cmd_make(cli: &Cli, frame: FrameSize, args: &MakeArgs) -> anyhow::Result<()> {
    let mut comp = compositor(cli)?;
    let mut ctl = controller(frame)?;
    load(&mut ctl, &args.source).await?;

    let result = ctl.generate_captions().await.map(|c| c.len());
    flush_notices(&mut ctl);
    if result? == 0 {
        anyhow::bail!("the model returned no usable captions");
    }
    ctl.apply_suggestion(args.pick)?;

    let path = ctl.export_png(&mut comp, &args.out_dir)?;
    println!("{}", path.display());
    Ok(())
}
