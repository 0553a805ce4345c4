use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;
use tablegrid::{
    ColumnDescriptor, FilterValue, Grid, GridBuilder, GridConfig, GridError, KeyValueStore,
    SortKey, SqliteStorage,
};

/// tablegrid CLI: filter, search, sort and page a JSON array of rows
#[derive(Parser)]
#[command(name = "tablegrid", version, about)]
struct Cli {
    /// Grid config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Args)]
struct StoreArgs {
    /// SQLite file holding persisted filters
    #[arg(long)]
    store: Option<PathBuf>,
    /// Storage key of this grid's filters
    #[arg(long, default_value = "tablegrid")]
    key: String,
}

#[derive(Args)]
struct QueryArgs {
    /// Text filters (e.g. --filter name=alice)
    #[arg(long = "filter", value_parser = parse_key_value)]
    filters: Vec<(String, String)>,
    /// Facet filters (e.g. --facet category=alpha,beta)
    #[arg(long = "facet", value_parser = parse_facet)]
    facets: Vec<(String, Vec<String>)>,
    /// Range filters, either bound optional (e.g. --range n=5..9, --range n=..9)
    #[arg(long = "range", value_parser = parse_range)]
    ranges: Vec<RangeArg>,
    /// Free-text search across every string value
    #[arg(long)]
    search: Option<String>,
    /// Sort keys (e.g. --sort n:desc); repeat with multi_sort enabled
    #[arg(long = "sort", value_parser = parse_sort)]
    sort: Vec<SortKey>,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of rows
    View {
        /// JSON file holding an array of objects
        input: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show each column's filter kind and facet chips
    Columns {
        /// JSON file holding an array of objects
        input: PathBuf,
    },

    /// Delete persisted filters
    Clear {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Re-read the input on the refresh interval and print counts
    Watch {
        /// JSON file holding an array of objects
        input: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
        /// Override the refresh interval
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<usize>,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct RangeArg {
    column: String,
    min: Option<f64>,
    max: Option<f64>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or_else(|| {
        format!("Invalid key=value pair: no '=' found in '{s}'")
    })?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn parse_facet(s: &str) -> Result<(String, Vec<String>), String> {
    let (column, values) = parse_key_value(s)?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok((column, values))
}

fn parse_range(s: &str) -> Result<RangeArg, String> {
    let (column, bounds) = parse_key_value(s)?;
    let (min, max) = bounds
        .split_once("..")
        .ok_or_else(|| format!("Invalid range '{bounds}': expected min..max"))?;
    let parse_bound = |raw: &str| -> Result<Option<f64>, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| format!("Invalid range bound '{raw}'"))
    };
    Ok(RangeArg {
        column,
        min: parse_bound(min)?,
        max: parse_bound(max)?,
    })
}

fn parse_sort(s: &str) -> Result<SortKey, String> {
    match s.rsplit_once(':') {
        Some((column, "desc")) => Ok(SortKey::desc(column)),
        Some((column, "asc")) => Ok(SortKey::asc(column)),
        Some((_, other)) => Err(format!("Invalid sort direction '{other}'")),
        None => Ok(SortKey::asc(s)),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };

    match cli.command {
        Command::View {
            input,
            query,
            page,
            page_size,
            store,
        } => {
            let rows = load_rows(&input)?;
            let mut builder = GridBuilder::new(rows.clone(), columns_for(&rows)).config(config);
            if let Some(path) = &store.store {
                builder = builder.persist(SqliteStorage::open(path)?, store.key.clone());
            }
            let mut grid = builder.build()?;
            apply_query(&mut grid, &query)?;
            if let Some(size) = page_size {
                grid.set_page_size(size);
            }
            grid.set_page_index(page);

            let view = grid.view();
            print_output(
                &serde_json::json!({
                    "total": view.total_rows,
                    "filtered": view.filtered_rows,
                    "page": view.page_index,
                    "page_count": view.page_count,
                    "page_size": view.page_size,
                    "filters": serde_json::to_value(grid.filters())?,
                    "rows": view.rows,
                }),
                &cli.format,
            )?;
        }

        Command::Columns { input } => {
            let rows = load_rows(&input)?;
            let grid = GridBuilder::new(rows.clone(), columns_for(&rows))
                .config(config)
                .build()?;
            print_output(&serde_json::to_value(grid.column_classes())?, &cli.format)?;
        }

        Command::Clear { store } => {
            let path = store
                .store
                .ok_or("--store is required to clear persisted filters")?;
            SqliteStorage::open(&path)?.remove(&store.key)?;
            print_output(
                &serde_json::json!({ "ok": true, "cleared": store.key }),
                &cli.format,
            )?;
        }

        Command::Watch {
            input,
            query,
            interval_secs,
            ticks,
        } => {
            let mut config = config;
            if let Some(secs) = interval_secs {
                config.refresh_interval_secs = secs.max(1);
            }

            let rows = load_rows(&input)?;
            let (tx, rx) = mpsc::channel();
            let mut grid = GridBuilder::new(rows.clone(), columns_for(&rows))
                .config(config)
                .on_refresh(move || {
                    let _ = tx.send(());
                })
                .auto_refresh_enabled(true)
                .build()?;
            apply_query(&mut grid, &query)?;

            let mut tick = 0;
            while ticks.map_or(true, |limit| tick < limit) {
                rx.recv()?;
                tick += 1;
                match load_rows(&input) {
                    Ok(rows) => grid.set_rows(rows),
                    Err(e) => {
                        log::warn!("Keeping previous rows, reload failed: {e}");
                    }
                }
                print_output(
                    &serde_json::json!({
                        "tick": tick,
                        "total": grid.total_rows(),
                        "filtered": grid.filtered_count(),
                    }),
                    &cli.format,
                )?;
            }
            grid.set_auto_refresh_enabled(false);
        }
    }

    Ok(())
}

fn load_rows(path: &Path) -> tablegrid::Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(GridError::Other(format!(
            "{} does not hold a JSON array",
            path.display()
        ))),
    }
}

/// One column per top-level key found in any row, in the maps' sorted key order.
fn columns_for(rows: &[Value]) -> Vec<ColumnDescriptor<Value>> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if seen.insert(key.clone()) {
                    columns.push(ColumnDescriptor::field(key));
                }
            }
        }
    }
    columns
}

fn apply_query(grid: &mut Grid<Value>, query: &QueryArgs) -> tablegrid::Result<()> {
    let named = query
        .filters
        .iter()
        .map(|(column, _)| column)
        .chain(query.facets.iter().map(|(column, _)| column))
        .chain(query.ranges.iter().map(|range| &range.column))
        .chain(query.sort.iter().map(|key| &key.column));
    for column in named {
        if grid.column(column).is_none() {
            return Err(GridError::UnknownColumn(column.clone()));
        }
    }

    for (column, text) in &query.filters {
        grid.set_filter(column, FilterValue::text(text));
    }
    for (column, values) in &query.facets {
        grid.set_filter(column, FilterValue::facets(values.iter().cloned()));
    }
    for range in &query.ranges {
        grid.set_filter(&range.column, FilterValue::range(range.min, range.max));
    }
    if let Some(search) = &query.search {
        grid.set_global_query(search.clone());
    }
    if !query.sort.is_empty() {
        grid.set_sorting(query.sort.clone());
    }
    Ok(())
}

fn print_output(
    value: &Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_facet() {
        assert_eq!(
            parse_facet("category=alpha, beta,").unwrap(),
            ("category".to_string(), vec!["alpha".to_string(), "beta".to_string()])
        );
        assert!(parse_facet("category").is_err());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            parse_range("n=5..9").unwrap(),
            RangeArg { column: "n".into(), min: Some(5.0), max: Some(9.0) }
        );
        assert_eq!(parse_range("n=..9").unwrap().min, None);
        assert_eq!(parse_range("n=5..").unwrap().max, None);
        assert!(parse_range("n=5").is_err());
        assert!(parse_range("n=a..b").is_err());
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("n:desc").unwrap(), SortKey::desc("n"));
        assert_eq!(parse_sort("name").unwrap(), SortKey::asc("name"));
        assert!(parse_sort("n:sideways").is_err());
    }

    #[test]
    fn test_apply_query_rejects_unknown_column() {
        let rows = vec![json!({"n": 1}), json!({"n": 5})];
        let mut grid = Grid::new(rows.clone(), columns_for(&rows)).unwrap();
        let query = QueryArgs {
            filters: vec![],
            facets: vec![],
            ranges: vec![parse_range("m=1..").unwrap()],
            search: None,
            sort: vec![],
        };
        let err = apply_query(&mut grid, &query).unwrap_err();
        assert!(matches!(err, GridError::UnknownColumn(c) if c == "m"));

        let query = QueryArgs {
            ranges: vec![parse_range("n=2..").unwrap()],
            ..query
        };
        apply_query(&mut grid, &query).unwrap();
        assert_eq!(grid.filtered_count(), 1);
    }

    #[test]
    fn test_columns_for_sorted_key_order() {
        let rows = vec![json!({"b": 1, "a": 2}), json!({"c": 3, "a": 4})];
        let ids: Vec<String> = columns_for(&rows).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
