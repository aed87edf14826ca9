// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, info};

use versewheel_core::{Catalogue, VerseId};
use versewheel_engine::crossref::import_cross_references_file;
use versewheel_engine::geometry::{normalize_angle, polar_from_offset};
use versewheel_engine::json::{
    VerseTexts, catalogue_to_json, cross_refs_to_json, layout_document_schema, layout_to_json,
    load_catalogue, load_cross_refs, load_verse_texts, verse_texts_to_json,
};
use versewheel_engine::panel::describe_verse;
use versewheel_engine::usfx::{BookNames, import_usfx_file, read_book_names_file};
use versewheel_engine::{CrossRefIndex, Diagram, LayoutConfig, find_verse_at};

const META_FILE: &str = "bibleMeta.json";
const REFS_FILE: &str = "crossRefs.json";
const TEXT_FILE: &str = "webBibleText.json";

#[derive(Parser)]
#[command(name = "versewheel", version, about = "Verse cross-reference wheels")]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    /// More logging; repeat for more detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DataArgs {
    /// Directory holding bibleMeta.json, crossRefs.json and webBibleText.json
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Outer radius of the wheel
    #[arg(long, global = true)]
    radius: Option<f64>,

    /// Fraction of the circle used for verses, in (0, 1]
    #[arg(long, global = true)]
    fraction: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Write the computed layout as JSON
    Layout {
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the JSON schema of the layout document instead
        #[arg(long)]
        schema: bool,
    },
    /// Find the verse under a pointer position
    Locate {
        /// Angle in radians, clockwise from the top
        #[arg(long, conflicts_with_all = ["x", "y"], allow_negative_numbers = true)]
        angle: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        distance: f64,
        /// Horizontal offset from the center
        #[arg(long, requires = "y", allow_negative_numbers = true)]
        x: Option<f64>,
        /// Vertical offset from the center, growing downward
        #[arg(long, requires = "x", allow_negative_numbers = true)]
        y: Option<f64>,
    },
    /// Count or list connections
    Connections {
        /// Only connections touching this verse, e.g. "GEN 1:1"
        #[arg(long)]
        verse: Option<VerseId>,
        #[arg(long)]
        list: bool,
    },
    /// Render the wheel as SVG
    Render {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        select: Option<VerseId>,
        #[arg(long)]
        hover: Option<VerseId>,
    },
    /// Show a verse with its text and cross references
    Show { verse: VerseId },
    /// Build bibleMeta.json and webBibleText.json from a USFX scripture file
    ImportUsfx {
        input: PathBuf,
        /// BookNames.xml giving each book's display name
        #[arg(long)]
        book_names: Option<PathBuf>,
        /// Where to write the datasets; defaults to --data-dir
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Convert a tab-separated cross-reference list to crossRefs.json
    ImportRefs {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn read_catalogue(data: &DataArgs) -> Result<Catalogue> {
    let path = data.data_dir.join(META_FILE);
    let catalogue =
        load_catalogue(open(&path)?).with_context(|| format!("reading {}", path.display()))?;
    info!("loaded {} books from {}", catalogue.books().len(), path.display());
    Ok(catalogue)
}

fn read_cross_refs(data: &DataArgs) -> Result<CrossRefIndex> {
    let path = data.data_dir.join(REFS_FILE);
    let refs =
        load_cross_refs(open(&path)?).with_context(|| format!("reading {}", path.display()))?;
    info!("loaded references for {} verses", refs.len());
    Ok(refs)
}

fn read_texts(data: &DataArgs) -> Result<VerseTexts> {
    let path = data.data_dir.join(TEXT_FILE);
    let texts =
        load_verse_texts(open(&path)?).with_context(|| format!("reading {}", path.display()))?;
    Ok(texts)
}

fn layout_config(data: &DataArgs) -> LayoutConfig {
    let base = match data.radius {
        Some(radius) => LayoutConfig::with_radius(radius),
        None => LayoutConfig::default(),
    };
    LayoutConfig {
        angle_fraction: data.fraction,
        ..base
    }
}

fn build_diagram(data: &DataArgs, with_refs: bool) -> Result<Diagram> {
    let catalogue = read_catalogue(data)?;
    let refs = if with_refs {
        read_cross_refs(data)?
    } else {
        CrossRefIndex::new()
    };
    Ok(Diagram::new(catalogue, &refs, layout_config(data))?)
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(contents.as_bytes())?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let data = &cli.data;

    match cli.command {
        Command::Layout { output, schema } => {
            let json = if schema {
                serde_json::to_string_pretty(&layout_document_schema())?
            } else {
                let diagram = build_diagram(data, false)?;
                layout_to_json(diagram.layout())?
            };
            write_output(output.as_deref(), &json)
        }
        Command::Locate {
            angle,
            distance,
            x,
            y,
        } => {
            let (angle, distance) = match (angle, x, y) {
                (Some(angle), _, _) => (normalize_angle(angle), distance),
                (None, Some(x), Some(y)) => polar_from_offset(x, y),
                _ => bail!("pass either --angle or both --x and --y"),
            };
            let diagram = build_diagram(data, false)?;
            let max_distance = diagram.config().max_hit_distance;
            match find_verse_at(angle, distance, &diagram.layout().verses, max_distance) {
                Some(position) => println!(
                    "{}\t{}\t{:.6}\t{:.6}",
                    position.verse_id,
                    diagram.catalogue().display_reference(&position.verse_id),
                    position.start_angle,
                    position.end_angle
                ),
                None => println!("none"),
            }
            Ok(())
        }
        Command::Connections { verse, list } => {
            let diagram = build_diagram(data, true)?;
            let pairs: Vec<_> = match &verse {
                Some(verse) => diagram.connections_for(verse).collect(),
                None => diagram.connections().iter().collect(),
            };
            if list {
                for pair in &pairs {
                    println!("{}\t{}", pair.a, pair.b);
                }
            } else {
                println!("{}", pairs.len());
            }
            Ok(())
        }
        Command::Render {
            output,
            select,
            hover,
        } => {
            let mut diagram = build_diagram(data, true)?;
            if let Some(verse) = hover {
                let Some(position) = diagram.layout().position(&verse) else {
                    bail!("{verse} isn't part of the catalogue");
                };
                let angle = position.mid_angle;
                diagram.interaction_mut().on_pointer_move(angle, 0.0);
            }
            if let Some(verse) = select {
                if !diagram.layout().contains(&verse) {
                    bail!("{verse} isn't part of the catalogue");
                }
                diagram.interaction_mut().select(Some(verse));
            }
            write_output(output.as_deref(), &diagram.render_svg())
        }
        Command::Show { verse } => {
            let catalogue = read_catalogue(data)?;
            let refs = read_cross_refs(data)?;
            let texts = read_texts(data)?;
            let Some(details) = describe_verse(&catalogue, &verse, &texts, &refs) else {
                bail!("{verse} isn't part of the catalogue");
            };

            println!("{}", details.reference);
            println!("{}", details.text.as_deref().unwrap_or("(text unavailable)"));
            if details.connections.is_empty() {
                println!("\nNo cross references.");
            } else {
                println!("\nCross references ({}):", details.connections.len());
                for entry in &details.connections {
                    match &entry.text {
                        Some(text) => println!("  {}: {}", entry.reference, text),
                        None => println!("  {}", entry.reference),
                    }
                }
            }
            Ok(())
        }
        Command::ImportUsfx {
            input,
            book_names,
            output_dir,
        } => {
            let names = match &book_names {
                Some(path) => read_book_names_file(path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => BookNames::new(),
            };
            let (catalogue, texts) = import_usfx_file(&input, &names)
                .with_context(|| format!("importing {}", input.display()))?;
            eprintln!(
                "{} books: {} verses, {} with text",
                catalogue.books().len(),
                catalogue.total_verses(),
                texts.len()
            );

            let dir = output_dir.as_deref().unwrap_or(data.data_dir.as_path());
            let meta = catalogue_to_json(&catalogue)?;
            write_output(Some(dir.join(META_FILE).as_path()), &meta)?;
            let text = verse_texts_to_json(&texts, &catalogue)?;
            write_output(Some(dir.join(TEXT_FILE).as_path()), &text)
        }
        Command::ImportRefs { input, output } => {
            let catalogue = read_catalogue(data)?;
            let (refs, stats) = import_cross_references_file(&input, &catalogue)
                .with_context(|| format!("importing {}", input.display()))?;
            eprintln!(
                "{} records: {} pairs across {} verses, {} skipped, {} unmatched",
                stats.records,
                stats.unique_pairs,
                refs.len(),
                stats.skipped,
                stats.unmatched
            );
            write_output(output.as_deref(), &cross_refs_to_json(&refs)?)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
