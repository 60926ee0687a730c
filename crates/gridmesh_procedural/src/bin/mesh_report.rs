//! # Mesh Report
//!
//! Command-line tool that builds the buffers described by a mesh file and
//! prints their shape.
//!
//! Log level comes from `RUST_LOG` (default `info`).

use std::process::ExitCode;

use gridmesh_procedural::{MeshBufferGenerator, MeshBuffers, MeshFile};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = descriptor_path(&args) else {
        println!("Usage: mesh_report <descriptor.toml>");
        println!();
        println!("Options:");
        println!("  --quiet    Print counts only");
        return ExitCode::FAILURE;
    };
    let quiet = args.iter().any(|a| a == "--quiet");

    let file = match MeshFile::load(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: could not load {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let buffers = match MeshBufferGenerator::new(file.generator)
        .and_then(|generator| generator.build(&file.descriptor()))
    {
        Ok(buffers) => buffers,
        Err(e) => {
            eprintln!("Error: build failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    print_report(path, &file, &buffers, quiet);
    ExitCode::SUCCESS
}

/// First argument that is not a `--flag`.
fn descriptor_path(args: &[String]) -> Option<&str> {
    args.iter().map(String::as_str).find(|arg| !arg.starts_with("--"))
}

fn print_report(path: &str, file: &MeshFile, buffers: &MeshBuffers, quiet: bool) {
    println!("┌─ MESH REPORT ──────────────────────────────────────────────────┐");
    println!("│ File:               {path}");
    println!("│ Grid:               {}x{} cells", file.grid.columns(), file.grid.rows());
    println!("│ Base elevation:     {:.3}", file.grid.base_elevation());
    println!("│ Vertices:           {}", buffers.vertex_count());
    println!("│ Triangles:          {}", buffers.triangle_count());

    if quiet {
        println!("└────────────────────────────────────────────────────────────────┘");
        return;
    }

    let (low, high) = buffers
        .vertices()
        .as_slice()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(low, high), v| {
            (low.min(v.z), high.max(v.z))
        });
    println!("│ Elevation:          {low:.3} .. {high:.3}");
    println!("├─ SOURCES ──────────────────────────────────────────────────────┤");
    for source in buffers.sources() {
        println!(
            "│ {:<18} {:>12} bytes  ({} x {} components)",
            format!("{:?}", source.semantic),
            source.data.len(),
            source.vector_count,
            source.components_per_vector
        );
    }
    let element = buffers.element();
    println!(
        "│ {:<18} {:>12} bytes  ({} {:?})",
        "Indices",
        element.data.len(),
        element.primitive_count,
        element.primitive_type
    );
    println!("│ Total:             {:>13} bytes", buffers.byte_len());
    println!("└────────────────────────────────────────────────────────────────┘");
}
