//! CLI tool for tablegrid - converts tables and applies edits from the shell
//!
//! Usage:
//!   tablegrid_cli page.html --to markdown
//!   tablegrid_cli page.html --merge A1:B2 --resize-column B:+40 -o out.html
//!   tablegrid_cli tables.json --table 1 --unmerge C3

#![allow(clippy::exit)]

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tablegrid::cell_ref::{parse_cell_ref, parse_shape};
use tablegrid::{
    export, parser, NodeKey, Outcome, Selection, TableConfig, TableEngine, TableError, TableFormat,
    TableMap,
};

#[derive(Debug, Parser)]
#[command(name = "tablegrid_cli")]
#[command(version)]
#[command(about = "Convert and edit tables in HTML, Markdown or JSON")]
struct CliArgs {
    /// Input file
    input: PathBuf,

    /// Input format (guessed from the extension when omitted)
    #[arg(long)]
    from: Option<TableFormat>,

    /// Output format
    #[arg(long, default_value_t = TableFormat::Html)]
    to: TableFormat,

    /// JSON engine configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Index of the table the edits apply to
    #[arg(long, default_value_t = 0)]
    table: usize,

    /// Merge a range such as A1:B2 (repeatable)
    #[arg(long)]
    merge: Vec<String>,

    /// Unmerge the cell at a reference such as B2 (repeatable)
    #[arg(long)]
    unmerge: Vec<String>,

    /// Resize the column of a cell by a pixel delta, e.g. B:+40 or A:-20
    #[arg(long = "resize-column", allow_hyphen_values = true)]
    resize_column: Vec<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> tablegrid::Result<()> {
    let config = match &args.config {
        Some(path) => TableConfig::from_json(&fs::read_to_string(path)?)?,
        None => TableConfig::default(),
    };
    let from = args
        .from
        .or_else(|| TableFormat::from_path(&args.input))
        .unwrap_or_default();
    let input = fs::read_to_string(&args.input)?;

    let mut engine = TableEngine::new(config);
    let tables = engine.load_tables(&parser::parse(&input, from)?)?;
    log::info!("loaded {} table(s) from {}", tables.len(), args.input.display());

    let has_edits =
        !(args.merge.is_empty() && args.unmerge.is_empty() && args.resize_column.is_empty());
    if has_edits {
        let table = *tables
            .get(args.table)
            .ok_or_else(|| TableError::Parse(format!("no table at index {}", args.table)))?;
        apply_edits(&mut engine, table, args)?;
    }

    let rendered = export::render(&engine.document().export_tables()?, args.to)?;
    match &args.output {
        Some(path) => fs::write(path, rendered)?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }
    Ok(())
}

fn apply_edits(engine: &mut TableEngine, table: NodeKey, args: &CliArgs) -> tablegrid::Result<()> {
    for range in &args.merge {
        let shape = parse_shape(range)
            .ok_or_else(|| TableError::Parse(format!("invalid range '{range}'")))?;
        report("merge", range, engine.merge_selection(table, shape)?);
    }

    for reference in &args.unmerge {
        let (col, row) = parse_cell_ref(reference)
            .ok_or_else(|| TableError::Parse(format!("invalid cell '{reference}'")))?;
        let cell = cell_at(engine, table, row, col)?;
        engine.set_selection(Some(Selection::cursor(cell)));
        report("unmerge", reference, engine.unmerge_selection()?);
    }

    for arg in &args.resize_column {
        let (column, delta) = arg
            .split_once(':')
            .and_then(|(c, d)| Some((parse_cell_ref(&format!("{c}1"))?.0, d.parse::<f32>().ok()?)))
            .ok_or_else(|| TableError::Parse(format!("invalid column resize '{arg}'")))?;
        report("resize-column", arg, engine.resize_column_at(table, column, delta)?);
    }
    Ok(())
}

fn cell_at(engine: &TableEngine, table: NodeKey, row: u32, col: u32) -> tablegrid::Result<NodeKey> {
    TableMap::compute_lenient(engine.tree(), table)?
        .get(row, col)
        .map(|m| m.cell)
        .ok_or_else(|| TableError::Parse(format!("no cell at row {row}, column {col}")))
}

fn report(op: &str, target: &str, outcome: Outcome) {
    if let Outcome::Skipped(reason) = outcome {
        eprintln!("warning: {op} {target} skipped: {reason}");
    }
}
