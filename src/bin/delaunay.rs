use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use rdelaunay::algorithms::{triangulate, Cuts};
use rdelaunay::data::Subdivision;
use rdelaunay::io::{read_node, write_ele, NodeFile};

/// Delaunay triangulation of a 2-D point set, read from a `.node`
/// file and written as an `.ele` file.
// no `version` flag: its default -V short would shadow vertical cuts
#[derive(Parser)]
#[command(name = "delaunay", about)]
struct Cmd {
  /// Input .node file
  #[arg(short = 'i', long = "input")]
  input: PathBuf,

  /// Output .ele file; defaults to the input path with the extension
  /// replaced
  #[arg(short = 'o', long = "output")]
  output: Option<PathBuf>,

  /// Use vertical cuts instead of alternating cuts
  #[arg(short = 'V', long = "vertical")]
  vertical: bool,

  /// Report the triangulation time, excluding file I/O
  #[arg(short = 'T', long = "time")]
  time: bool,
}

fn main() -> Result<()> {
  SubscriberBuilder::default().with_target(false).init();
  let cmd = Cmd::parse();

  ensure!(
    cmd.input.extension().is_some_and(|ext| ext == "node"),
    "expected an input file with a .node extension: {}",
    cmd.input.display()
  );
  let output = cmd
    .output
    .unwrap_or_else(|| cmd.input.with_extension("ele"));

  let NodeFile { indices, points } = read_node(&cmd.input)?;
  let mut sub = Subdivision::new(points);
  let cuts = if cmd.vertical {
    Cuts::Vertical
  } else {
    Cuts::Alternating
  };

  let started = Instant::now();
  triangulate(&mut sub, cuts).context("triangulation failed")?;
  if cmd.time {
    tracing::info!(
      "{:.6} seconds to compute the triangulation",
      started.elapsed().as_secs_f64()
    );
  }

  let triangles: Vec<[usize; 3]> = sub
    .triangles()
    .into_iter()
    .map(|[a, b, c]| [indices[a.0], indices[b.0], indices[c.0]])
    .collect();
  write_ele(&output, &triangles)?;
  tracing::info!("wrote {} triangles to {}", triangles.len(), output.display());
  Ok(())
}
