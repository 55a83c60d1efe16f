use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use dn_acoustics::{
    SpaceType, SpectrumShape, analyze_octave_band_data, compare_to_standards,
    estimate_octave_bands_from_dba,
};
use dn_app::{
    AnalysisConfig, AnalysisOptions, AppError, AppResult, PathAnalysis, PathDataAssembler,
    analyze_all, analyze_path, load_config, project_service,
};
use dn_core::{BAND_LABELS, OctaveBands};
use dn_engine::ReplayEngine;
use dn_project::DrawingPayload;
use dn_results::ResultStore;

#[derive(Parser)]
#[command(name = "dn-cli")]
#[command(about = "ductnoise CLI - HVAC duct path noise analysis", long_about = None)]
struct Cli {
    /// Analysis configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// List noise paths in a project
    Paths {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Show the resolved source-to-terminal segment order of a path
    Order {
        project_path: PathBuf,
        path_id: String,
    },
    /// Print the engine input assembled for a path
    Assemble {
        project_path: PathBuf,
        path_id: String,
    },
    /// Run the propagation engine on one path (or all paths)
    Analyze {
        project_path: PathBuf,
        /// Path ID; all paths when omitted
        path_id: Option<String>,
        /// Recorded engine output (JSON) to replay
        #[arg(long)]
        engine: PathBuf,
        /// Skip cache and force recalculation
        #[arg(long)]
        no_cache: bool,
        /// Do not persist the analyses
        #[arg(long)]
        no_store: bool,
        /// Write cached results back into the project file
        #[arg(long)]
        save: bool,
    },
    /// List stored analyses of a path
    History {
        project_path: PathBuf,
        path_id: String,
    },
    /// Rate an octave-band spectrum (63 Hz - 8 kHz, comma separated)
    Rate {
        #[arg(value_delimiter = ',', required = true)]
        levels: Vec<f64>,
        /// Target NC curve to check against
        #[arg(long)]
        target: Option<u8>,
    },
    /// Estimate an octave-band spectrum from an overall dBA level
    Estimate {
        dba: f64,
        /// typical_hvac, fan_noise, diffuser_noise, duct_breakout or flat
        #[arg(long, default_value = "typical_hvac")]
        shape: String,
    },
    /// Compare a spectrum with the criteria of a space type
    Compare {
        #[arg(value_delimiter = ',', required = true)]
        levels: Vec<f64>,
        #[arg(long, default_value = "open_office")]
        space: String,
    },
    /// Add drawn ductwork (YAML or JSON payload) to a project as a new path
    Ingest {
        project_path: PathBuf,
        drawing_path: PathBuf,
        /// Name of the created path
        #[arg(long)]
        name: String,
        /// Output project file; defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_max_level(config.diagnostics.max_level())
        .init();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Paths { project_path } => cmd_paths(&project_path),
        Commands::Order {
            project_path,
            path_id,
        } => cmd_order(&project_path, &path_id, &config),
        Commands::Assemble {
            project_path,
            path_id,
        } => cmd_assemble(&project_path, &path_id, &config),
        Commands::Analyze {
            project_path,
            path_id,
            engine,
            no_cache,
            no_store,
            save,
        } => cmd_analyze(
            &project_path,
            path_id.as_deref(),
            &engine,
            &config,
            &AnalysisOptions {
                use_cache: !no_cache,
                store_results: !no_store,
            },
            save,
        ),
        Commands::History {
            project_path,
            path_id,
        } => cmd_history(&project_path, &path_id, &config),
        Commands::Rate { levels, target } => cmd_rate(&levels, target),
        Commands::Estimate { dba, shape } => cmd_estimate(dba, &shape),
        Commands::Compare { levels, space } => cmd_compare(&levels, &space),
        Commands::Ingest {
            project_path,
            drawing_path,
            name,
            output,
        } => cmd_ingest(&project_path, &drawing_path, &name, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_paths(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let paths = project_service::list_paths(&project);

    if paths.is_empty() {
        println!("No paths found in project");
        return Ok(());
    }
    println!("Paths in project:");
    for path in paths {
        let last = match (path.last_terminal_dba, path.last_nc) {
            (Some(dba), Some(nc)) => format!("  last: {dba:.1} dBA, NC-{nc}"),
            _ => String::new(),
        };
        println!(
            "  {} - {} ({} segments){}",
            path.id, path.name, path.segment_count, last
        );
    }
    Ok(())
}

fn cmd_order(project_path: &Path, path_id: &str, config: &AnalysisConfig) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    project_service::get_path(&project, path_id)?;
    let assembly = PathDataAssembler::new(config).build(&project, path_id);

    println!("Segment order for {path_id}:");
    for (i, id) in assembly.ordered_segment_ids.iter().enumerate() {
        println!("  {}. {}", i + 1, id);
    }
    match assembly.source_tier {
        Some(tier) => println!("Source: {tier:?}"),
        None => println!("Source: none"),
    }
    print_messages(&assembly.validation);
    Ok(())
}

fn cmd_assemble(project_path: &Path, path_id: &str, config: &AnalysisConfig) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    project_service::get_path(&project, path_id)?;
    let assembly = PathDataAssembler::new(config).build(&project, path_id);

    let Some(data) = assembly.data else {
        print_messages(&assembly.validation);
        return Err(AppError::InvalidInput(format!(
            "path {path_id} has no usable noise source"
        )));
    };
    let yaml = serde_yaml::to_string(&data).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    print!("{yaml}");
    if assembly.degraded {
        eprintln!("warning: assembled from fallback defaults");
    }
    Ok(())
}

fn cmd_analyze(
    project_path: &Path,
    path_id: Option<&str>,
    engine_path: &Path,
    config: &AnalysisConfig,
    options: &AnalysisOptions,
    save: bool,
) -> AppResult<()> {
    let mut project = project_service::load_project(project_path)?;
    let engine = ReplayEngine::from_file(engine_path)?;
    let store = open_store(project_path, config)?;

    let analyses = match path_id {
        Some(id) => vec![analyze_path(
            &mut project,
            id,
            &engine,
            config,
            Some(&store),
            options,
        )?],
        None => analyze_all(&mut project, &engine, config, Some(&store), options)?,
    };
    for analysis in &analyses {
        print_analysis(analysis);
    }

    if save {
        project_service::save_project(project_path, &project)?;
        println!("\n✓ Saved results to {}", project_path.display());
    }
    Ok(())
}

fn print_analysis(analysis: &PathAnalysis) {
    let result = &analysis.result;
    println!("\n{} - {}", result.path_id, result.path_name);
    match &analysis.analysis_id {
        Some(id) if analysis.loaded_from_cache => println!("  ✓ Loaded from cache: {id}"),
        Some(id) => println!("  ✓ Calculated: {id}"),
        None => {}
    }
    if !result.calculation_valid {
        println!(
            "  ✗ Calculation invalid: {}",
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    println!("  Source:      {:.1} dBA", result.source_noise);
    println!("  Terminal:    {:.1} dBA", result.terminal_noise);
    println!("  Attenuation: {:.1} dB", result.total_attenuation);
    println!("  NC rating:   NC-{}", result.nc_rating);
    if analysis.degraded {
        println!("  (assembled from fallback defaults)");
    }

    if !result.segment_results.is_empty() {
        println!("  Elements:");
        for seg in &result.segment_results {
            println!(
                "    {:>2}. {:<9} {:<12} {:>6.1} -> {:>6.1} dBA",
                seg.element_order,
                seg.element_type,
                seg.element_id,
                seg.noise_before_dba,
                seg.noise_after_dba
            );
        }
    }
    if let Some(comparison) = &analysis.comparison {
        println!(
            "  {}: NC-{} recommended, NC-{} maximum -> {}",
            comparison.space_type.as_str(),
            comparison.criteria.recommended_nc,
            comparison.criteria.maximum_nc,
            comparison.status.as_str()
        );
        for rec in &comparison.recommendations {
            println!("    - {rec}");
        }
    }
    for warning in &result.warnings {
        println!("  warning: {warning}");
    }
}

fn cmd_history(project_path: &Path, path_id: &str, config: &AnalysisConfig) -> AppResult<()> {
    let store = open_store(project_path, config)?;
    let records = store.list_for_path(path_id)?;

    if records.is_empty() {
        println!("No stored analyses for path: {path_id}");
    } else {
        println!("Stored analyses for path '{path_id}':");
        for record in records {
            println!(
                "  {} ({}, {}) {:.1} dBA NC-{}",
                record.analysis_id,
                record.timestamp,
                record.engine_version,
                record.result.terminal_noise,
                record.result.nc_rating
            );
        }
    }
    Ok(())
}

fn cmd_rate(levels: &[f64], target: Option<u8>) -> AppResult<()> {
    let spectrum = spectrum_arg(levels)?;
    let analysis = analyze_octave_band_data(&spectrum, target)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    println!("NC rating: NC-{}", analysis.nc_rating);
    println!("Overall:   {:.1} dBA", analysis.overall_dba);
    if let Some(target) = target {
        let verdict = if analysis.meets_criteria { "meets" } else { "exceeds" };
        println!("Target NC-{target}: {verdict}");
        for (freq, over) in &analysis.exceedances {
            println!("  {freq} Hz: +{over:.1} dB");
        }
    }
    for warning in &analysis.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

fn cmd_estimate(dba: f64, shape: &str) -> AppResult<()> {
    let shape: SpectrumShape = shape
        .parse()
        .map_err(|e: dn_acoustics::AcousticsError| AppError::InvalidInput(e.to_string()))?;
    let spectrum = estimate_octave_bands_from_dba(dba, shape);
    println!("Estimated {shape} spectrum for {dba:.1} dBA:");
    print_spectrum(&spectrum);
    Ok(())
}

fn cmd_compare(levels: &[f64], space: &str) -> AppResult<()> {
    let spectrum = spectrum_arg(levels)?;
    let space_type = SpaceType::lookup(space);
    let criteria = space_type.criteria();
    let analysis = analyze_octave_band_data(&spectrum, Some(criteria.recommended_nc))
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let comparison = compare_to_standards(&analysis, space_type);

    println!(
        "{}: NC-{} (recommended NC-{}, maximum NC-{}) -> {}",
        space_type.as_str(),
        comparison.actual_nc,
        criteria.recommended_nc,
        criteria.maximum_nc,
        comparison.status.as_str()
    );
    for rec in &comparison.recommendations {
        println!("  - {rec}");
    }
    Ok(())
}

fn cmd_ingest(
    project_path: &Path,
    drawing_path: &Path,
    name: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut project = project_service::load_project(project_path)?;
    let content = std::fs::read_to_string(drawing_path).map_err(|e| AppError::FileRead {
        path: drawing_path.to_path_buf(),
        source: e,
    })?;
    // JSON is valid YAML
    let payload: DrawingPayload =
        serde_yaml::from_str(&content).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let report = dn_project::materialize(&mut project, &payload, name)?;
    let target = output.unwrap_or(project_path);
    project_service::save_project(target, &project)?;

    println!("✓ Created path {} in {}", report.path_id, target.display());
    println!(
        "  Components: {} created, {} reused",
        report.components_created, report.components_reused
    );
    for (idx, end) in &report.unmatched_endpoints {
        println!("  warning: segment {idx} {end} endpoint matched no component");
    }
    Ok(())
}

fn open_store(project_path: &Path, config: &AnalysisConfig) -> AppResult<ResultStore> {
    let store = match &config.results_dir {
        Some(dir) => ResultStore::new(dir.clone())?,
        None => ResultStore::for_project(project_path)?,
    };
    Ok(store)
}

fn spectrum_arg(levels: &[f64]) -> AppResult<OctaveBands> {
    OctaveBands::from_slice(levels).map_err(|e| AppError::InvalidInput(e.to_string()))
}

fn print_spectrum(spectrum: &OctaveBands) {
    for (label, level) in BAND_LABELS.iter().zip(spectrum.levels()) {
        println!("  {label:>6}: {level:.1} dB");
    }
}

fn print_messages(validation: &dn_core::ValidationResult) {
    for e in validation.errors() {
        println!("  error: {e}");
    }
    for w in validation.warnings() {
        println!("  warning: {w}");
    }
    for i in validation.info() {
        println!("  info: {i}");
    }
}
