//! CLX CLI - Tool for inspecting and editing CLX archives.

use clx::clx::{Archive, ArchiveSummary};
use clx::edit::{self, EditOptions};
use clx::util::library_version;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter set by flags.
const LOG_ENV: &str = "CLX_LOG";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return ExitCode::SUCCESS;
    }

    let result = match filtered_args[0] {
        // Info command - group table overview
        "info" | "i" => match filtered_args.get(1) {
            Some(path) => {
                let json = filtered_args[2..].iter().any(|&s| s == "--json" || s == "-j");
                cmd_info(path, json)
            }
            None => usage_error("Usage: clx info <file.clx> [--json]"),
        },

        // Tree command - every group and frame
        "tree" | "t" => match filtered_args.get(1) {
            Some(path) => cmd_tree(path),
            None => usage_error("Usage: clx tree <file.clx>"),
        },

        // Remove command - strip groups into a new archive
        "rm" | "r" | "remove" => {
            if filtered_args.len() < 3 {
                usage_error("Usage: clx rm <file.clx> <group>... [-o <out.clx>]")
            } else {
                cmd_remove(filtered_args[1], &filtered_args[2..])
            }
        }

        // Copy command - round-trip through the model
        "copy" | "c" => {
            if filtered_args.len() < 3 {
                usage_error("Usage: clx copy <input.clx> <output.clx>")
            } else {
                cmd_copy(filtered_args[1], filtered_args[2])
            }
        }

        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        "version" | "-V" | "--version" => {
            println!("{}", library_version());
            Ok(())
        }

        // Default: if file exists, show info; otherwise error
        other => {
            if Path::new(other).exists() {
                cmd_info(other, false)
            } else {
                eprintln!("Unknown command: {}", other);
                eprintln!();
                print_help();
                Err(())
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn usage_error(usage: &str) -> Result<(), ()> {
    eprintln!("Error: missing arguments");
    eprintln!("{}", usage);
    Err(())
}

fn print_help() {
    println!("clx - CLX archive toolkit");
    println!();
    println!("USAGE:");
    println!("    clx [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file> [--json]           Show group table and sizes");
    println!("    t, tree   <file>                    Show every group and frame");
    println!("    r, rm     <file> <group>... [-o out] Remove groups (writes <file>.stripped)");
    println!("    c, copy   <in> <out>                Re-offset and rewrite an archive");
    println!("    h, help                             Show this help");
    println!("    --version                           Show version");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}           Log filter, overrides -v/-q (e.g. clx=debug)", LOG_ENV);
    println!();
    println!("EXAMPLES:");
    println!("    clx info towner.clx               # Quick overview");
    println!("    clx info towner.clx --json        # Machine-readable layout");
    println!("    clx rm towner.clx 1 3             # Drop groups 1 and 3");
    println!("    clx rm towner.clx 0 -o out.clx    # Explicit output path");
}

fn open_archive(path: &str) -> Result<Archive, ()> {
    info!("Opening archive: {}", path);
    Archive::open(path).map_err(|e| {
        eprintln!("Failed to open {}: {}", path, e);
        if e.is_malformed() {
            eprintln!("{} is not a readable CLX archive", path);
        }
    })
}

fn cmd_info(path: &str, json: bool) -> Result<(), ()> {
    let archive = open_archive(path)?;
    let summary = ArchiveSummary::new(&archive);

    if json {
        let text = serde_json::to_string_pretty(&summary).map_err(|e| {
            eprintln!("Failed to serialize summary: {}", e);
        })?;
        println!("{}", text);
        return Ok(());
    }

    println!("Archive: {}", path);
    println!("Layout:  {}", if summary.mono_group { "mono-group" } else { "multi-group" });
    println!("Size:    {} bytes", summary.file_size);
    println!("Groups:  {}", summary.group_count);
    println!("Frames:  {}", summary.frame_count());
    if !summary.contiguous {
        println!("Note:    layout has gaps; rewriting will compact it");
    }
    println!();
    println!("  {:>5}  {:>10}  {:>10}  {:>6}", "group", "offset", "size", "frames");
    for group in &summary.groups {
        println!(
            "  {:>5}  {:>10}  {:>10}  {:>6}",
            group.index, group.offset, group.next_offset, group.frame_count
        );
    }
    Ok(())
}

fn cmd_tree(path: &str) -> Result<(), ()> {
    let archive = open_archive(path)?;
    println!("Archive: {}", path);
    println!();

    for (i, clip) in archive.clips().iter().enumerate() {
        println!(
            "group {} @ {} ({} bytes, {} frames)",
            i,
            clip.offset(),
            clip.next_offset(),
            clip.frame_count()
        );
        for (f, frame) in clip.frames().iter().enumerate() {
            match frame.header() {
                Some(h) => println!(
                    "  frame {} @ {} ({} bytes) {}x{}",
                    f,
                    frame.offset(),
                    frame.size(),
                    h.width,
                    h.height
                ),
                None => println!("  frame {} @ {} ({} bytes)", f, frame.offset(), frame.size()),
            }
        }
    }
    Ok(())
}

fn cmd_remove(path: &str, rest: &[&str]) -> Result<(), ()> {
    let mut options = EditOptions::default();
    let mut indices = Vec::new();

    let mut iter = rest.iter();
    while let Some(&arg) = iter.next() {
        match arg {
            "-o" | "--output" => match iter.next() {
                Some(&out) => options.output = Some(PathBuf::from(out)),
                None => return usage_error("Usage: clx rm <file.clx> <group>... [-o <out.clx>]"),
            },
            _ => match arg.parse::<usize>() {
                Ok(index) => indices.push(index),
                Err(_) => {
                    eprintln!("Invalid group index: {}", arg);
                    return Err(());
                }
            },
        }
    }
    if indices.is_empty() {
        return usage_error("Usage: clx rm <file.clx> <group>... [-o <out.clx>]");
    }

    debug!("Removing groups {:?} from {}", indices, path);
    let report = edit::remove_groups(path, &indices, &options).map_err(|e| {
        eprintln!("Failed to edit {}: {}", path, e);
    })?;

    println!(
        "{} groups -> {} groups, wrote {} bytes to {}",
        report.groups_before,
        report.groups_after,
        report.bytes_written,
        report.output.display()
    );
    Ok(())
}

fn cmd_copy(input: &str, output: &str) -> Result<(), ()> {
    info!("Copying {} -> {}", input, output);
    let report = edit::rewrite(input, output).map_err(|e| {
        eprintln!("Failed to copy {}: {}", input, e);
    })?;
    println!(
        "{} groups, wrote {} bytes to {}",
        report.groups_after,
        report.bytes_written,
        report.output.display()
    );
    Ok(())
}
