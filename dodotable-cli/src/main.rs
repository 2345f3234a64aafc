//! dodotable CLI
//!
//! Runs a declarative table definition against a SQLite database for one
//! request query string and prints the selected page.

use std::fs;
use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dodotable_lib::Table;
use dodotable_lib::model::RequestParams;
use dodotable_lib::source::SqliteSource;
use dodotable_lib::table::TableDefinition;
use log::info;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

#[derive(Parser, Debug)]
#[command(name = "dodotable")]
#[command(about = "Query a SQLite database through a declarative table", long_about = None)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "DODOTABLE_DB")]
    db: PathBuf,

    /// Table definition (JSON)
    #[arg(short, long)]
    definition: PathBuf,

    /// Request query string, e.g. "select.genre=jazz&order_by=title.asc"
    #[arg(short, long, default_value = "")]
    query: String,

    /// First row to show (default: read from the query string)
    #[arg(long)]
    offset: Option<usize>,

    /// Rows per page (default: read from the query string)
    #[arg(long)]
    limit: Option<usize>,

    /// Print rows and pager as JSON
    #[arg(long)]
    json: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let json = fs::read_to_string(&args.definition)
        .with_context(|| format!("Failed to read {}", args.definition.display()))?;
    let definition = TableDefinition::from_json(&json)?;
    let source = SqliteSource::open(&args.db)
        .with_context(|| format!("Failed to open {}", args.db.display()))?;
    let params = RequestParams::parse(&args.query);
    info!("Running {} with {} parameter(s)", definition.entity, params.len());

    let mut table = definition.build(&params, &source)?;
    match (args.offset, args.limit) {
        (None, None) => table.select_page()?,
        (offset, limit) => {
            let page = table.limit();
            table.select(offset.unwrap_or(page.offset()), limit.unwrap_or(page.limit()))?
        }
    };

    if args.json {
        print_json(&table)?;
    } else {
        print_text(&table);
    }
    Ok(())
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            WriteLogger::init(args.log_level, Config::default(), file)?;
        }
        None => {
            TermLogger::init(
                args.log_level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )?;
        }
    }
    Ok(())
}

fn print_text(table: &Table<'_, &SqliteSource>) {
    let header: Vec<&str> = table.columns().map(|c| c.label()).collect();
    println!("{}", header.join("\t"));
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|cell| cell.display()).collect();
        println!("{}", cells.join("\t"));
    }

    let pager = table.pager();
    let pages: Vec<String> = pager
        .pages()
        .iter()
        .map(|page| {
            if page.selected {
                format!("[{}]", page.number)
            } else {
                page.number.to_string()
            }
        })
        .collect();
    println!();
    println!(
        "{}: {} {}(s), page {} of {} | {}",
        table.label(),
        pager.count(),
        table.unit_label(),
        pager.current_page(),
        pager.page_count(),
        pages.join(" ")
    );
}

fn print_json(table: &Table<'_, &SqliteSource>) -> anyhow::Result<()> {
    let labels: Vec<&str> = table.columns().map(|c| c.label()).collect();
    let mut rows = Vec::with_capacity(table.rows().len());
    for row in table.rows() {
        let mut object = serde_json::Map::new();
        for (label, cell) in labels.iter().zip(row.iter()) {
            object.insert(label.to_string(), serde_json::to_value(cell.data())?);
        }
        rows.push(object);
    }
    let output = serde_json::json!({
        "label": table.label(),
        "rows": rows,
        "count": table.pager().count(),
        "pages": table.pager().pages(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
