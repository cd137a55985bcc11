use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use morph_align::{
    AggregateOptions, AnalysisLayer, CorpusStatistics, DiffBuilder, DiffOptions, DocumentDiff,
    GoldCorrector, GoldLayer, LabelStyle, PartOfSpeech, RecordAligner, aggregate, correct_layer,
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

/// Compare gold treebank annotations with automatic morphological analyses
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diff every gold document against its analysis, one JSON line per document
    Diff {
        /// Gold layers, one JSON object per line
        #[arg(short, long)]
        gold: PathBuf,

        /// Analyzer layers, one JSON object per line
        #[arg(short, long)]
        analysis: PathBuf,

        /// Where to write the document diffs
        #[arg(short, long)]
        out: PathBuf,

        /// Compare the gold records as they are, without post-corrections
        #[arg(long)]
        no_correct: bool,

        /// Skip the per-category mismatch counters
        #[arg(long)]
        no_mismatch_details: bool,

        #[arg(long)]
        hide_lemmas: bool,

        #[arg(long)]
        hide_postags: bool,

        #[arg(long)]
        hide_forms: bool,
    },
    /// Aggregate document diffs into corpus statistics
    Stats {
        /// Document diffs written by `diff`
        #[arg(short, long)]
        diffs: PathBuf,

        /// Universal tags to leave out (e.g. PUNCT SYM)
        #[arg(short, long, num_args = 1..)]
        exclude: Vec<PartOfSpeech>,

        /// How mismatch patterns are labelled (ascii, compact)
        #[arg(long, default_value_t = LabelStyle::Ascii)]
        label_style: LabelStyle,

        /// Write the statistics here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the JSON schema of an output format
    Schema {
        #[arg(value_enum, default_value_t = SchemaTarget::Statistics)]
        target: SchemaTarget,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SchemaTarget {
    Statistics,
    Diff,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Args::parse().command {
        Command::Diff {
            gold,
            analysis,
            out,
            no_correct,
            no_mismatch_details,
            hide_lemmas,
            hide_postags,
            hide_forms,
        } => {
            let options = DiffOptions {
                count_mismatch_details: !no_mismatch_details,
                show_lemmas: !hide_lemmas,
                show_postags: !hide_postags,
                show_forms: !hide_forms,
            };
            run_diff(&gold, &analysis, &out, !no_correct, options)
        }
        Command::Stats {
            diffs,
            exclude,
            label_style,
            out,
        } => {
            let diffs: Vec<DocumentDiff> = read_jsonl(&diffs)?;
            let options = AggregateOptions {
                exclude_tags: exclude.into_iter().collect(),
                label_style,
            };
            let stats = aggregate(&diffs, &options);
            let json = serde_json::to_string_pretty(&stats)?;
            match out {
                Some(path) => std::fs::write(&path, json + "\n")
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Command::Schema { target } => {
            let schema = match target {
                SchemaTarget::Statistics => schemars::schema_for!(CorpusStatistics),
                SchemaTarget::Diff => schemars::schema_for!(DocumentDiff),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn run_diff(
    gold_path: &Path,
    analysis_path: &Path,
    out_path: &Path,
    correct: bool,
    options: DiffOptions,
) -> anyhow::Result<()> {
    let gold_layers: Vec<GoldLayer> = read_jsonl(gold_path)?;
    let analysis_layers: Vec<AnalysisLayer> = read_jsonl(analysis_path)?;
    println!(
        "Loaded {} gold and {} analysed documents",
        gold_layers.len(),
        analysis_layers.len()
    );

    let mut analysis_by_document: FxHashMap<String, AnalysisLayer> = FxHashMap::default();
    for layer in analysis_layers {
        let document = layer.document.clone();
        if analysis_by_document.insert(document.clone(), layer).is_some() {
            return Err(anyhow!(
                "Document {document:?} appears twice in {}",
                analysis_path.display()
            ));
        }
    }
    let pairs = gold_layers
        .into_iter()
        .map(|gold| -> anyhow::Result<(GoldLayer, AnalysisLayer)> {
            let analysis = analysis_by_document
                .remove(&gold.document)
                .ok_or_else(|| anyhow!("No analysis for document {:?}", gold.document))?;
            Ok((gold, analysis))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if !analysis_by_document.is_empty() {
        log::warn!(
            "{} analysed documents have no gold counterpart",
            analysis_by_document.len()
        );
    }

    let corrector = GoldCorrector::default();
    let builder = DiffBuilder::new(RecordAligner, options);

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
                 {pos}/{len} documents ({per_sec}, {eta})",
            )
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let results = pairs
        .into_par_iter()
        .map(|(mut gold, analysis)| -> anyhow::Result<(DocumentDiff, usize)> {
            let corrected = if correct {
                correct_layer(&corrector, &mut gold)
                    .with_context(|| format!("Failed to correct {}", gold.document))?
            } else {
                0
            };
            let diff = builder
                .build(&gold, &analysis)
                .with_context(|| format!("Failed to diff {}", gold.document))?;
            pb.inc(1);
            Ok((diff, corrected))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    pb.finish_and_clear();

    let corrections: usize = results.iter().map(|(_, corrected)| corrected).sum();
    let diffs: Vec<DocumentDiff> = results.into_iter().map(|(diff, _)| diff).collect();

    let file = File::create(out_path)
        .with_context(|| format!("Failed to create {}", out_path.display()))?;
    let mut writer = BufWriter::new(file);
    for diff in &diffs {
        serde_json::to_writer(&mut writer, diff)
            .with_context(|| format!("Failed to serialize diff of {}", diff.document))?;
        writeln!(writer)?;
    }
    writer.flush()?;

    let stats = aggregate(&diffs, &AggregateOptions::default());
    println!(
        "Corrected {corrections} gold records; {} of {} words have no fully matching \
         analysis ({}%)",
        stats.mismatches_total, stats.words_total, stats.mismatches_percent
    );
    let mut by_class: BTreeMap<PartOfSpeech, usize> = BTreeMap::new();
    for word in diffs.iter().flat_map(|diff| &diff.words) {
        *by_class.entry(word.fine_tag).or_default() += 1;
    }
    for (pos, count) in &by_class {
        println!("  {count:>6}  {pos}");
    }
    println!("Wrote {} document diffs to {}", diffs.len(), out_path.display());
    Ok(())
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    reader
        .lines()
        .enumerate()
        .filter(|(_, line)| !matches!(line, Ok(line) if line.trim().is_empty()))
        .map(|(idx, line)| {
            let line = line
                .with_context(|| format!("Failed to read line {idx} of {}", path.display()))?;
            serde_json::from_str::<T>(&line)
                .with_context(|| format!("Failed to deserialize line {idx} of {}", path.display()))
        })
        .collect()
}
