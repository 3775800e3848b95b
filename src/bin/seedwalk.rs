use std::path::PathBuf;

use clap::{Parser, Subcommand};

use seedwalk::{
    AnimOptions, ColorField, FetchedSeed, HttpTransport, RetryPolicy, Seed, SeedClient,
    TargetSize, WalkerLayout,
};

#[derive(Parser, Debug)]
#[command(name = "seedwalk", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch or parse seeds, then render the still PNG and the animations.
    Generate(GenerateArgs),
    /// Print the sizing-pass result for one seed.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Token ids whose seeds are fetched from the contract, in path order.
    token_ids: Vec<u64>,

    /// Literal hex seed(s) appended after any fetched ones (e.g. 0x01).
    #[arg(long = "seed")]
    seeds: Vec<String>,

    /// Output directory.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Color walk seed.
    #[arg(long, default_value = seedwalk::DEFAULT_COLOR_SEED_HEX)]
    color_seed: String,

    /// Also render white-background variants of both animations.
    #[arg(long)]
    white_bg: bool,

    /// Skip MP4 encoding (still PNG only; no ffmpeg needed).
    #[arg(long)]
    skip_video: bool,

    /// JSON-RPC endpoint for seed fetches.
    #[arg(long, default_value = seedwalk::DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Contract address holding the seeds.
    #[arg(long, default_value = seedwalk::DEFAULT_CONTRACT)]
    contract: String,

    /// Give up on seed fetches after this many attempts (default: retry
    /// forever).
    #[arg(long)]
    max_attempts: Option<u32>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Hex seed (e.g. 0x01).
    #[arg(long)]
    seed: String,

    #[arg(long, default_value_t = seedwalk::DEFAULT_TARGET.width)]
    target_width: i64,

    #[arg(long, default_value_t = seedwalk::DEFAULT_TARGET.height)]
    target_height: i64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let seed = Seed::from_hex(&args.seed)?;
    let target = TargetSize::new(args.target_width, args.target_height)?;
    let plan = seedwalk::plan(&seed, target);
    println!("step_count: {}", plan.step_count);
    println!("flipped: {}", plan.flipped);
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    if args.token_ids.is_empty() && args.seeds.is_empty() {
        anyhow::bail!("provide at least one token id or --seed");
    }

    let mut seeds = Vec::new();
    if !args.token_ids.is_empty() {
        let policy = RetryPolicy {
            max_attempts: args.max_attempts,
            ..RetryPolicy::default()
        };
        let mut client =
            SeedClient::new(HttpTransport::new(&args.rpc_url), &args.contract, policy);
        for &token_id in &args.token_ids {
            match client.fetch(token_id)? {
                FetchedSeed::Seed(seed) => {
                    eprintln!("token #{token_id}: {seed}");
                    seeds.push(seed);
                }
                FetchedSeed::Nonexistent => {
                    // Clean exit, not an error: the token was never minted.
                    println!("token #{token_id} does not exist");
                    return Ok(());
                }
            }
        }
    }
    for s in &args.seeds {
        seeds.push(Seed::from_hex(s)?);
    }

    let (path, plans) = seedwalk::derive_path(&seeds, seedwalk::DEFAULT_TARGET);
    for (seed, plan) in seeds.iter().zip(&plans) {
        eprintln!(
            "{seed}: {} steps{}",
            plan.step_count,
            if plan.flipped { " (flipped)" } else { "" }
        );
    }

    let color_seed = Seed::from_hex(&args.color_seed)?;
    let colors = ColorField::generate(&color_seed, path.len());

    let still = seedwalk::render_still(&path, &colors, seedwalk::STILL_CANVAS);
    let png_path = args.out_dir.join("res.png");
    seedwalk::write_png(&still, &png_path)?;
    eprintln!("wrote {}", png_path.display());

    if args.skip_video {
        return Ok(());
    }

    let mut variants = vec![
        (WalkerLayout::Single, [0u8, 0, 0], "single.mp4"),
        (WalkerLayout::Triple, [0, 0, 0], "triple.mp4"),
    ];
    if args.white_bg {
        variants.push((WalkerLayout::Single, [255, 255, 255], "single_white.mp4"));
        variants.push((WalkerLayout::Triple, [255, 255, 255], "triple_white.mp4"));
    }

    for (layout, background, file_name) in variants {
        let opts = AnimOptions::default().with_background(background);
        let out = args.out_dir.join(file_name);
        seedwalk::render_animation_mp4(&path, &colors, layout, &opts, &out)?;
        eprintln!("wrote {}", out.display());
    }

    Ok(())
}
