//! Command handlers for the `zrange` CLI.
//!
//! Each handler writes its report to the supplied writer so the output can be
//! checked without spawning the binary.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result, bail};
use tracing::debug;
use zrange::{Fragment, QueryRect, ZCurve, ZIndex};

use crate::Corner;

/// Build a validated query from two corners.
pub fn query(curve: &ZCurve<u64>, lower: Corner, upper: Corner) -> Result<QueryRect<u64>> {
    curve
        .query(lower.x, lower.y, upper.x, upper.y)
        .context("invalid rectangle")
}

/// Print the curve address of `(x, y)`.
pub fn encode(curve: &ZCurve<u64>, x: u64, y: u64, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", curve.encode(x, y))?;
    Ok(())
}

/// Print the coordinates stored at address `d`.
pub fn decode(curve: &ZCurve<u64>, d: u64, out: &mut impl Write) -> Result<()> {
    let (x, y) = curve.decode(d);
    writeln!(out, "{x} {y}")?;
    Ok(())
}

/// Print one `lo hi` line per fragment, then a summary line.
///
/// Fragments are streamed as they are discovered; the first write error stops
/// further output and is returned once the walk ends.
pub fn cover(
    curve: &ZCurve<u64>,
    query: &QueryRect<u64>,
    summary_only: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut fragments = 0u64;
    let mut points = 0u128;
    let mut failed = None;
    let visits = curve.decompose(query, &mut |f: Fragment<u64>| {
        fragments += 1;
        points += f.size();
        if summary_only || failed.is_some() {
            return;
        }
        if let Err(e) = writeln!(out, "{} {}", f.lo(), f.hi()) {
            failed = Some(e);
        }
    });
    if let Some(e) = failed {
        return Err(e.into());
    }
    writeln!(out, "visits {visits} fragments {fragments} points {points}")?;
    Ok(())
}

/// Parse whitespace-separated `x y` pairs.
pub fn parse_points(text: &str) -> Result<Vec<(u64, u64)>> {
    let values = text
        .split_whitespace()
        .map(|tok| {
            tok.parse::<u64>()
                .with_context(|| format!("invalid coordinate '{tok}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    if values.len() % 2 != 0 {
        bail!("point list has an odd number of coordinates");
    }
    Ok(values.chunks_exact(2).map(|p| (p[0], p[1])).collect())
}

/// Read a point file from disk.
pub fn read_points(path: &Path) -> Result<Vec<(u64, u64)>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read points from {}", path.display()))?;
    let points = parse_points(&text)
        .with_context(|| format!("failed to parse points in {}", path.display()))?;
    debug!(path = %path.display(), count = points.len(), "loaded points");
    Ok(points)
}

/// Index `points` and report how many fall inside `query`.
pub fn count(
    curve: ZCurve<u64>,
    query: &QueryRect<u64>,
    points: Vec<(u64, u64)>,
    skip: bool,
    out: &mut impl Write,
) -> Result<()> {
    let index = ZIndex::from_points(curve, points);
    let result = if skip {
        index.count_skipping(query)
    } else {
        index.count(query)
    };
    let selectivity = result.selectivity(index.len());
    writeln!(out, "matches {}", result.matches)?;
    writeln!(out, "fragments {}", result.fragments)?;
    writeln!(out, "visits {}", result.visits)?;
    writeln!(out, "selectivity {selectivity:.6}")?;
    Ok(())
}
