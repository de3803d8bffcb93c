use anyhow::Context as _;
use clap::{Parser, Subcommand};

use kinetica::{Millis, StageSize, Timeline, presets};

#[derive(Parser, Debug)]
#[command(name = "kinetica", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a preset timeline, printing one JSON frame per step.
    Simulate(SimulateArgs),
    /// List the available presets.
    Presets,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Preset name (see `kinetica presets`).
    #[arg(long)]
    preset: String,

    /// End of the simulated clock, in milliseconds.
    #[arg(long, default_value_t = 8000)]
    until_ms: u64,

    /// Clock step between printed frames, in milliseconds.
    #[arg(long, default_value_t = 250)]
    step_ms: u64,

    /// Seed for the stochastic engines.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stage size for placement presets, as WIDTHxHEIGHT pixels.
    #[arg(long, default_value = "520x200")]
    stage: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Presets => {
            for name in presets::names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn parse_stage(s: &str) -> anyhow::Result<StageSize> {
    let (w, h) = s
        .split_once('x')
        .with_context(|| format!("stage '{s}' must be WIDTHxHEIGHT"))?;
    let width: f64 = w.parse().with_context(|| "parse stage width")?;
    let height: f64 = h.parse().with_context(|| "parse stage height")?;
    Ok(StageSize::new(width, height)?)
}

fn build_timeline(args: &SimulateArgs) -> anyhow::Result<Timeline> {
    let tl = match args.preset.as_str() {
        presets::INTRO => Timeline::new().with_sequencer(presets::intro_sequencer()?),
        presets::HOME_SHAPES => {
            let mut placement = presets::home_shapes(args.seed)?;
            placement.measure(parse_stage(&args.stage)?);
            Timeline::new().with_placement(placement)
        }
        presets::NAVIGATION => Timeline::new().with_mapper("nav", presets::navigation_bar()?),
        presets::HERO_FADE => {
            // hero fills the viewport top with a tall scroll range
            Timeline::new().with_mapper("hero", presets::hero_fade(0.0, 3000.0, 800.0)?)
        }
        presets::OVERLAY_PARTICLES => {
            Timeline::new().with_particles(presets::overlay_particles(args.seed)?)
        }
        other => anyhow::bail!("unknown preset '{other}' (try `kinetica presets`)"),
    };
    Ok(tl)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.step_ms > 0, "--step-ms must be > 0");
    let mut tl = build_timeline(&args)?;

    let scroll_driven = matches!(args.preset.as_str(), presets::NAVIGATION | presets::HERO_FADE);
    let mut now = 0u64;
    loop {
        if scroll_driven {
            // sweep the scroll offset linearly: one pixel per 4 ms
            let offset = now as f64 / 4.0;
            tl.set_scroll("nav", offset);
            tl.set_scroll("hero", offset);
        }
        tl.advance_to(Millis(now));
        let frame = tl.eval(Millis(now));
        println!("{}", serde_json::to_string(&frame)?);
        if now >= args.until_ms {
            break;
        }
        now = (now + args.step_ms).min(args.until_ms);
    }
    Ok(())
}
