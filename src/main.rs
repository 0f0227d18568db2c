use anyhow::{Context, Result};
use clap::Parser;
use imgtidy::core::scanner::normalize_path;
use imgtidy::{Organizer, OrganizerConfig, Report};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "imgtidy",
    version,
    about = "Deduplicate, rename and gather the images of a site into one folder"
)]
struct Cli {
    /// Directory to organize; text files directly inside it get their references rewritten
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    path: PathBuf,

    /// Folder (relative to the root) that receives the renamed images
    #[arg(long, value_name = "DIR", default_value = "images")]
    target_dir: PathBuf,

    /// Folder (relative to the root) that receives a copy of every image found
    #[arg(long, value_name = "DIR", default_value = "images_backup")]
    backup_dir: PathBuf,

    /// Markdown report file (relative to the root)
    #[arg(long, value_name = "FILE", default_value = "image_organization_report.md")]
    report: PathBuf,

    /// Also write the report as JSON (relative to the root)
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Only treat equal-size files as duplicates when their content hashes match
    #[arg(long)]
    verify_content: bool,

    /// Only show what would be removed and renamed
    #[arg(long)]
    dry_run: bool,

    /// Log every file visited
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    /// Output files are placed relative to the organized directory.
    fn output_path(&self, file: &Path) -> PathBuf {
        self.path.join(file)
    }

    fn config(&self) -> OrganizerConfig {
        OrganizerConfig {
            target_dir: self.target_dir.clone(),
            backup_dir: self.backup_dir.clone(),
            verify_content: self.verify_content,
            ..OrganizerConfig::with_root(&self.path)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let organizer = Organizer::new(cli.config());

    if cli.dry_run {
        print_plan(&organizer);
        return Ok(());
    }

    println!("▶ Organizing images in: {}", cli.path.display());
    let report = benchmark("organizing", || organizer.organize());

    let report_path = cli.output_path(&cli.report);
    report
        .write_markdown(&report_path)
        .with_context(|| format!("Failed to write report {:?}", report_path))?;
    if let Some(json) = cli.json.as_deref().map(|p| cli.output_path(p)) {
        report
            .write_json(&json)
            .with_context(|| format!("Failed to write JSON report {:?}", json))?;
    }

    print_summary(&report);
    println!("\n✅ Check {} for details.", report_path.display());
    Ok(())
}

fn print_plan(organizer: &Organizer) {
    let plan = organizer.plan();
    println!("Found {} image file(s).", plan.files.len());
    for err in &plan.errors {
        eprintln!("⚠️  {}", err);
    }
    for dup in &plan.duplicates {
        println!("   🗑️  [dry-run] REMOVE {}", dup.display_path());
    }
    for (file, to) in plan.moves() {
        println!(
            "   📦 [dry-run] MOVE {} → {}",
            file.display_path(),
            normalize_path(to)
        );
    }
    println!("\n⚠️  Dry-run only; no files were changed.");
}

fn print_summary(report: &Report) {
    println!("\nSummary:");
    println!("- Files renamed: {}", report.renamed_files.len());
    println!("- Duplicates removed: {}", report.duplicates_removed.len());
    println!("- Code updates: {}", report.code_updates.len());
    println!("- Errors: {}", report.errors.len());
}

/// Run `f()`, print how long it took (with `label`), and return its result.
fn benchmark<T, F: FnOnce() -> T>(label: &str, f: F) -> T {
    let start = Instant::now();
    let result = f();
    println!("⏱ {} took {:.2?}", label, start.elapsed());
    result
}
