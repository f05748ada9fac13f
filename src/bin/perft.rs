use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use passant::perft::{divide, perft};
use passant::{Position, START_FEN};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};

#[derive(Parser, Debug)]
#[command(author, version, about = "Count move-tree leaves with make/take", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u8,

    /// Print the node count below every root move
    #[arg(long)]
    divide: bool,

    /// Cross-check the total against shakmaty
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    passant::init();

    let mut pos = Position::from_fen(&args.fen).with_context(|| format!("parsing FEN {:?}", args.fen))?;
    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let start = Instant::now();
    let nodes = if args.divide && args.depth > 0 {
        let counts = divide(&mut pos, args.depth);
        for (mv, n) in &counts {
            println!("{mv}: {n}");
        }
        counts.iter().map(|(_, n)| n).sum::<u64>()
    } else {
        perft(&mut pos, args.depth)
    };
    let duration = start.elapsed();
    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / duration.as_micros().max(1) as f64
    );
    log::debug!("final key {:016x}", pos.key());

    if args.verify {
        let fen: Fen = args.fen.parse().context("shakmaty rejected the FEN")?;
        let reference: Chess = fen
            .into_position(CastlingMode::Standard)
            .context("shakmaty rejected the position")?;
        let expected = perft_shakmaty(&reference, args.depth);
        if expected != nodes {
            bail!("perft mismatch: got {nodes}, shakmaty says {expected}");
        }
        println!("verified against shakmaty");
    }
    Ok(())
}

fn perft_shakmaty(pos: &Chess, depth: u8) -> u64 {
    use shakmaty::Position as _;

    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
