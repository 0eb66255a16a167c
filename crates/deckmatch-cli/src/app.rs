//! CLI application logic
//!
//! Contains the command-line interface implementation: template
//! analysis, design-property extraction, content validation, and deck
//! generation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::warn;

use deckmatch_content::{load_record, validate, MappingSet, ValidationIssue};
use deckmatch_design::analysis::{ImageAnalysis, TemplateAnalysis};
use deckmatch_design::{DesignMerger, DesignSpecification};
use deckmatch_pptx::{DeckWriter, PptxTemplate, SlideAssembler};

/// Output format for validation reports
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "deckmatch")]
#[command(author, version, about = "Template-matched slide deck generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract structural properties from a PPTX template
    Analyze {
        /// Input PPTX/POTX template file
        template: PathBuf,

        /// Output analysis JSON file
        #[arg(short, long, default_value = "template_analysis.json")]
        output: PathBuf,
    },

    /// Merge template and image analysis into a design specification
    Extract {
        /// Structural analysis JSON file
        #[arg(long, default_value = "template_analysis.json")]
        template_analysis: PathBuf,

        /// Visual analysis JSON file
        #[arg(long, default_value = "image_analysis.json")]
        image_analysis: PathBuf,

        /// Full design specification output
        #[arg(short, long, default_value = "design_properties.json")]
        output: PathBuf,

        /// Reduced generator configuration output
        #[arg(long, default_value = "enhanced_template_config.json")]
        config_output: PathBuf,
    },

    /// Validate a content record against the slide mappings
    Validate {
        /// Content record JSON file
        content: PathBuf,

        /// Mapping set TOML file (built-in defaults when omitted)
        #[arg(short, long)]
        mappings: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Exit with an error when any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Generate a presentation from a content record
    Generate {
        /// Content record JSON file
        content: PathBuf,

        /// Template file (standard layouts when omitted)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Design specification JSON file
        #[arg(short, long, default_value = "design_properties.json")]
        design: PathBuf,

        /// Mapping set TOML file (built-in defaults when omitted)
        #[arg(short, long)]
        mappings: Option<PathBuf>,

        /// Output presentation file
        #[arg(short, long, default_value = "generated_presentation.pptx")]
        output: PathBuf,

        /// Presentation title for document properties
        #[arg(long)]
        title: Option<String>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { template, output } => analyze_command(&template, &output),
        Commands::Extract {
            template_analysis,
            image_analysis,
            output,
            config_output,
        } => extract_command(&template_analysis, &image_analysis, &output, &config_output),
        Commands::Validate {
            content,
            mappings,
            format,
            strict,
        } => validate_command(&content, mappings.as_deref(), format, strict),
        Commands::Generate {
            content,
            template,
            design,
            mappings,
            output,
            title,
        } => generate_command(
            &content,
            template.as_deref(),
            &design,
            mappings.as_deref(),
            &output,
            title,
        ),
    }
}

/// Extract theme, dimensions, and layouts from a template file.
fn analyze_command(template_path: &Path, output: &Path) -> Result<()> {
    let template = PptxTemplate::from_file(template_path)
        .with_context(|| format!("could not read template {}", template_path.display()))?;

    let analysis = template.to_analysis();
    let json = serde_json::to_string_pretty(&analysis)?;
    fs::write(output, json)
        .with_context(|| format!("could not write {}", output.display()))?;

    println!(
        "Analyzed {}: {} color roles, {} layouts",
        template_path.display(),
        analysis.color_scheme.len(),
        analysis.layouts.len()
    );
    println!("Wrote {}", output.display());
    Ok(())
}

/// Merge the two analysis files into the design outputs.
fn extract_command(
    template_analysis: &Path,
    image_analysis: &Path,
    output: &Path,
    config_output: &Path,
) -> Result<()> {
    let template = TemplateAnalysis::from_file(template_analysis)
        .context("loading template analysis")?;
    let image = ImageAnalysis::from_file(image_analysis).context("loading image analysis")?;

    let spec = DesignMerger::new(template, image).merge();

    fs::write(output, spec.to_json()?)
        .with_context(|| format!("could not write {}", output.display()))?;
    fs::write(
        config_output,
        serde_json::to_string_pretty(&spec.generator_config())?,
    )
    .with_context(|| format!("could not write {}", config_output.display()))?;

    if let Some(dims) = &spec.slide_dimensions {
        println!("Slide format: {}", dims.format);
    }
    println!(
        "Primary color: {}",
        spec.brand_guidelines.color_palette.primary
    );
    println!("Font family: {}", spec.brand_guidelines.font_family);
    println!("Layout templates: {}", spec.layout_templates.len());
    println!("Wrote {} and {}", output.display(), config_output.display());
    Ok(())
}

/// Validate a content record and report every issue.
fn validate_command(
    content_path: &Path,
    mappings_path: Option<&Path>,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let record = load_record(content_path)
        .with_context(|| format!("could not load {}", content_path.display()))?;
    let mappings = load_mappings(mappings_path)?;

    let issues = validate(&record, &mappings);
    report_issues(&issues, format)?;

    if strict && !issues.is_empty() {
        anyhow::bail!("validation found {} issue(s)", issues.len());
    }
    Ok(())
}

/// Run the full pipeline: validate, assemble, and write the deck.
fn generate_command(
    content_path: &Path,
    template_path: Option<&Path>,
    design_path: &Path,
    mappings_path: Option<&Path>,
    output: &Path,
    title: Option<String>,
) -> Result<()> {
    let record = load_record(content_path)
        .with_context(|| format!("could not load {}", content_path.display()))?;
    let mappings = load_mappings(mappings_path)?;

    let design = match DesignSpecification::from_file(design_path) {
        Ok(design) => design,
        // A missing specification degrades to defaults; a malformed one
        // aborts the stage
        Err(err @ deckmatch_design::DesignError::MissingInput { .. }) => {
            warn!("{err}; using default design specification");
            DesignSpecification::default()
        }
        Err(err) => return Err(err.into()),
    };

    let template = match template_path {
        Some(path) => PptxTemplate::from_file(path)
            .with_context(|| format!("could not read template {}", path.display()))?,
        None => PptxTemplate::standard(),
    };

    // Advisory: report issues but keep going, output degrades per field
    let issues = validate(&record, &mappings);
    for issue in &issues {
        warn!("{}", issue.message);
    }

    let assembler = SlideAssembler::new(&design, &template, &mappings);
    let deck = assembler.assemble(&record);

    for warning in &deck.warnings {
        warn!("{}: {}", warning.slide_key, warning.message);
    }

    let mut writer = DeckWriter::new(&design);
    if let Some(title) = title {
        writer = writer.with_title(title);
    }
    let bytes = writer.generate(&deck)?;
    fs::write(output, bytes)
        .with_context(|| format!("could not write {}", output.display()))?;

    println!(
        "Generated {} slide(s) into {}",
        deck.slides.len(),
        output.display()
    );
    if !deck.warnings.is_empty() {
        println!("{} warning(s); run with RUST_LOG=warn for details", deck.warnings.len());
    }
    Ok(())
}

/// Load a mapping set from a file, or fall back to the built-in set.
fn load_mappings(path: Option<&Path>) -> Result<MappingSet> {
    match path {
        Some(path) => MappingSet::from_file(path)
            .with_context(|| format!("could not load mappings {}", path.display())),
        None => Ok(MappingSet::default_set()),
    }
}

/// Print a validation report in the requested format.
fn report_issues(issues: &[ValidationIssue], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if issues.is_empty() {
                println!("Content record is valid");
            } else {
                for issue in issues {
                    println!("{:?}: {}", issue.severity, issue.message);
                }
                println!("{} issue(s) found", issues.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(issues)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_extract_and_generate_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let template_analysis = write_json(
            dir.path(),
            "template_analysis.json",
            &json!({
                "color_scheme": {"accent1": "456446"},
                "font_scheme": {
                    "majorFont": {"latin": "Gothic A1"},
                    "minorFont": {"latin": "Gothic A1"}
                },
                "slide_dimensions": {"width": "12192000", "height": "6858000"}
            }),
        );
        let image_analysis = write_json(
            dir.path(),
            "image_analysis.json",
            &json!({
                "color_palette": {
                    "most_common_colors": [["#456446", 10], ["#ffffff", 8]],
                    "total_unique_colors": 2,
                    "color_consistency": 1.0
                },
                "layout_patterns": {"avg_elements_per_slide": 2.0}
            }),
        );
        let design_out = dir.path().join("design_properties.json");
        let config_out = dir.path().join("enhanced_template_config.json");

        extract_command(&template_analysis, &image_analysis, &design_out, &config_out).unwrap();

        let design: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&design_out).unwrap()).unwrap();
        assert_eq!(design["slide_dimensions"]["format"], "Widescreen (16:9)");
        // #456446 is low-saturation, so the primary bucket is empty and
        // the fallback literal applies (which is the same value)
        assert_eq!(
            design["color_scheme"]["brand_colors"]["primary"],
            "#456446"
        );

        let config: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&config_out).unwrap()).unwrap();
        assert_eq!(config["slide_dimensions"]["width"], 12_192_000);
        assert_eq!(config["fonts"]["primary"], "Gothic A1");

        // Now generate a deck from the extracted design
        let content = write_json(
            dir.path(),
            "content.json",
            &json!({
                "presentation_data": {
                    "title_slide": {"title": "T", "subtitle": "S"},
                    "benefits_slide": {
                        "slide_title": "B",
                        "text_body": ["one", "two"],
                        "image_description": "img"
                    },
                    "impact_slide": {"slide_title": "I", "table_data": [["a", "b"]]}
                }
            }),
        );
        let output = dir.path().join("out.pptx");

        generate_command(&content, None, &design_out, None, &output, None).unwrap();

        let bytes = fs::read(&output).unwrap();
        assert!(!bytes.is_empty());
        // ZIP local file header magic
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn test_extract_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let out = dir.path().join("out.json");
        let config = dir.path().join("config.json");

        let err = extract_command(&missing, &missing, &out, &config).unwrap_err();
        assert!(err.to_string().contains("template analysis"));
    }

    #[test]
    fn test_validate_strict_fails_on_issues() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_json(dir.path(), "content.json", &json!({}));

        let result = validate_command(&content, None, OutputFormat::Text, true);
        assert!(result.is_err());

        // Non-strict reports but succeeds
        let result = validate_command(&content, None, OutputFormat::Json, false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_generate_with_missing_design_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let content = write_json(
            dir.path(),
            "content.json",
            &json!({
                "presentation_data": {
                    "title_slide": {"title": "T", "subtitle": "S"},
                    "benefits_slide": {
                        "slide_title": "B",
                        "text_body": ["x"],
                        "image_description": "img"
                    },
                    "impact_slide": {"slide_title": "I", "table_data": [["a"]]}
                }
            }),
        );
        let missing_design = dir.path().join("no_design.json");
        let output = dir.path().join("out.pptx");

        generate_command(&content, None, &missing_design, None, &output, Some("T".into()))
            .unwrap();
        assert!(output.exists());
    }
}
