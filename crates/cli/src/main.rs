use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hullmesh::sample::{sample, SampleKind};
use hullmesh::{ConvexHull, DelaunayTriangulation, HullCfg, VoronoiMesh};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod output;
mod provenance;

use output::{write_json, DelaunayDoc, HullDoc, VoronoiDoc};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "hullmesh-cli")]
#[command(about = "Convex hulls, Delaunay triangulations and Voronoi meshes of point sets")]
struct Cmd {
    /// Log verbosity on stderr: -v debug, -vv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Clone)]
struct BuildArgs {
    /// Points as .json (array of coordinate arrays) or .csv (one column per axis)
    #[arg(long)]
    input: PathBuf,
    /// Result document (.json); a `.provenance.json` sidecar is written next to it
    #[arg(long)]
    out: PathBuf,
    /// Plane-distance tolerance for visibility and membership tests;
    /// defaults to one scaled by the largest absolute input coordinate
    #[arg(long)]
    tolerance: Option<f64>,
}

impl BuildArgs {
    fn cfg(&self, points: &[Vec<f64>]) -> HullCfg {
        match self.tolerance {
            Some(tol) => HullCfg::with_tolerance(tol),
            None => HullCfg::for_points(points),
        }
    }

    fn params(&self, cfg: &HullCfg) -> serde_json::Value {
        json!({
            "input": self.input.to_string_lossy(),
            "plane_distance_tolerance": cfg.plane_distance_tolerance,
            "merge_tolerance": cfg.merge_tolerance,
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Cube,
    Ball,
    Sphere,
}

impl From<KindArg> for SampleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Cube => SampleKind::Cube,
            KindArg::Ball => SampleKind::Ball,
            KindArg::Sphere => SampleKind::Sphere,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Convex hull: faces, facets, volume
    Hull(BuildArgs),
    /// Delaunay triangulation: cells with circumspheres
    Delaunay(BuildArgs),
    /// Voronoi mesh: circumcenters, edges, rays, regions
    Voronoi(BuildArgs),
    /// Write a reproducible random point cloud as JSON
    Sample {
        #[arg(long, value_enum, default_value_t = KindArg::Ball)]
        kind: KindArg,
        #[arg(long, default_value_t = 3)]
        dim: usize,
        #[arg(long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    run(cmd.action)
}

fn run(action: Action) -> Result<()> {
    match action {
        Action::Hull(args) => hull(&args).map(|_| ()),
        Action::Delaunay(args) => delaunay(&args).map(|_| ()),
        Action::Voronoi(args) => voronoi(&args).map(|_| ()),
        Action::Sample {
            kind,
            dim,
            count,
            seed,
            out,
        } => sample_points(kind.into(), dim, count, seed, &out).map(|_| ()),
        Action::Report => report(),
    }
}

fn hull(args: &BuildArgs) -> Result<PathBuf> {
    let points = input::read_points(&args.input)?;
    let cfg = args.cfg(&points);
    let hull = ConvexHull::from_coordinates(points, cfg)
        .with_context(|| format!("convex hull of {}", args.input.display()))?;
    let doc = HullDoc::new(&hull);
    tracing::info!(
        vertices = doc.vertices.len(),
        faces = doc.faces.len(),
        facets = doc.facets.len(),
        volume = doc.volume,
        "hull"
    );
    write_json(&args.out, &doc)?;
    let summary = json!({
        "vertices": doc.vertices.len(),
        "faces": doc.faces.len(),
        "facets": doc.facets.len(),
        "volume": doc.volume,
    });
    write_sidecar(&args.out, Payload::new("hull", args.params(&cfg)).with_summary(summary))
}

fn delaunay(args: &BuildArgs) -> Result<PathBuf> {
    let points = input::read_points(&args.input)?;
    let cfg = args.cfg(&points);
    let tri = DelaunayTriangulation::from_coordinates(points, cfg)
        .with_context(|| format!("delaunay triangulation of {}", args.input.display()))?;
    let doc = DelaunayDoc::new(&tri);
    tracing::info!(cells = doc.cells.len(), volume = doc.volume, "delaunay");
    write_json(&args.out, &doc)?;
    let summary = json!({ "cells": doc.cells.len(), "volume": doc.volume });
    write_sidecar(
        &args.out,
        Payload::new("delaunay", args.params(&cfg)).with_summary(summary),
    )
}

fn voronoi(args: &BuildArgs) -> Result<PathBuf> {
    let points = input::read_points(&args.input)?;
    let cfg = args.cfg(&points);
    let mesh = VoronoiMesh::from_coordinates(points, cfg)
        .with_context(|| format!("voronoi mesh of {}", args.input.display()))?;
    let doc = VoronoiDoc::new(&mesh);
    tracing::info!(
        vertices = doc.vertices.len(),
        edges = doc.edges.len(),
        rays = doc.rays.len(),
        "voronoi"
    );
    write_json(&args.out, &doc)?;
    let summary = json!({
        "vertices": doc.vertices.len(),
        "edges": doc.edges.len(),
        "rays": doc.rays.len(),
    });
    write_sidecar(
        &args.out,
        Payload::new("voronoi", args.params(&cfg)).with_summary(summary),
    )
}

fn sample_points(
    kind: SampleKind,
    dim: usize,
    count: usize,
    seed: u64,
    out: &Path,
) -> Result<PathBuf> {
    let points = sample(kind, dim, count, seed)
        .with_context(|| format!("sampling {count} points from {}", kind.name()))?;
    tracing::info!(kind = kind.name(), dim, count, seed, "sample");
    write_json(out, &points)?;
    let params = json!({ "kind": kind.name(), "dim": dim, "count": count, "seed": seed });
    write_sidecar(out, Payload::new("sample", params))
}

fn report() -> Result<()> {
    let mut obj = provenance::base_record();
    obj["defaults"] = json!({
        "plane_distance_tolerance": hullmesh::cfg::DEFAULT_PLANE_DISTANCE_TOLERANCE,
        "merge_tolerance": hullmesh::cfg::DEFAULT_MERGE_TOLERANCE,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
