use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use csvql::{CsvOptions, Engine, EngineConfig, JoinType, Query, export_csv, format_table};

#[derive(Parser)]
#[command(author, version, about = "csvql - SQL-like queries over CSV files")]
struct Cli {
    /// Field delimiter of the input files
    #[arg(short, long, default_value_t = ',', global = true)]
    delimiter: char,

    /// Trim whitespace around every field
    #[arg(long, global = true)]
    trim: bool,

    /// Worksheet to read from .xlsx tables (default: the first sheet)
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Always use the nested loop join
    #[arg(long, global = true)]
    no_hash_join: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns and row counts of tables
    Describe {
        /// Table to load, as ALIAS=PATH (.csv or .xlsx)
        #[arg(short, long = "table", value_parser = parse_table, required = true)]
        tables: Vec<(String, PathBuf)>,
    },

    /// Run a query
    Query {
        /// Table to load, as ALIAS=PATH (.csv or .xlsx)
        #[arg(short, long = "table", value_parser = parse_table, required = true)]
        tables: Vec<(String, PathBuf)>,

        /// Table to select from
        #[arg(short, long)]
        from: String,

        /// Columns to select (col, table.col, *, table.*)
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<String>,

        /// Condition as "COLUMN OPERATOR VALUE"; repeated conditions are AND-ed
        #[arg(short = 'w', long = "where", value_parser = parse_where)]
        conditions: Vec<WhereArg>,

        /// Join as KIND:TABLE:LEFT_TABLE.COL=RIGHT_TABLE.COL (KIND: inner, left, right, full)
        #[arg(short, long = "join", value_parser = parse_join)]
        joins: Vec<JoinArg>,

        /// Write the result to a CSV file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct WhereArg {
    column: String,
    operator: String,
    value: String,
}

#[derive(Debug, Clone, PartialEq)]
struct JoinArg {
    kind: JoinType,
    table: String,
    left: (String, String),
    right: (String, String),
}

fn parse_table(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((alias, path)) if !alias.is_empty() && !path.is_empty() => Ok((alias.to_string(), PathBuf::from(path))),
        _ => Err(format!("expected ALIAS=PATH, got '{}'", arg)),
    }
}

fn parse_where(arg: &str) -> Result<WhereArg, String> {
    let mut parts = arg.trim().splitn(3, char::is_whitespace);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(column), Some(operator), Some(value)) if !column.is_empty() => Ok(WhereArg {
            column: column.to_string(),
            operator: operator.to_string(),
            value: value.trim().to_string(),
        }),
        _ => Err(format!("expected \"COLUMN OPERATOR VALUE\", got '{}'", arg)),
    }
}

fn parse_qualified(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('.') {
        Some((table, column)) if !table.is_empty() && !column.is_empty() => Ok((table.to_string(), column.to_string())),
        _ => Err(format!("expected TABLE.COLUMN, got '{}'", arg)),
    }
}

fn parse_join(arg: &str) -> Result<JoinArg, String> {
    let parts: Vec<&str> = arg.splitn(3, ':').collect();
    let [kind, table, on] = parts.as_slice() else {
        return Err(format!("expected KIND:TABLE:LEFT=RIGHT, got '{}'", arg));
    };
    let kind = match kind.to_ascii_lowercase().as_str() {
        "inner" => JoinType::Inner,
        "left" => JoinType::Left,
        "right" => JoinType::Right,
        "full" => JoinType::Full,
        other => return Err(format!("unknown join kind '{}'", other)),
    };
    let (left, right) = on
        .split_once('=')
        .ok_or_else(|| format!("expected LEFT=RIGHT in '{}'", on))?;

    Ok(JoinArg {
        kind,
        table: table.to_string(),
        left: parse_qualified(left)?,
        right: parse_qualified(right)?,
    })
}

fn engine(cli: &Cli, tables: &[(String, PathBuf)]) -> Result<Engine> {
    let delimiter = u8::try_from(cli.delimiter).map_err(|_| anyhow!("delimiter must be a single byte character"))?;
    let engine = Engine::with_config(EngineConfig {
        hash_join: !cli.no_hash_join,
        csv: CsvOptions {
            delimiter,
            trim: cli.trim,
        },
    });

    for (alias, path) in tables {
        let loaded = if is_workbook(path) {
            engine.register_xlsx(alias, path, cli.sheet.as_deref())
        } else {
            engine.register_csv(alias, path)
        };
        loaded.with_context(|| format!("Failed to load table {}", alias))?;
    }
    Ok(engine)
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

fn build_query(from: &str, select: &[String], conditions: &[WhereArg], joins: &[JoinArg]) -> Result<Query> {
    let mut builder = Query::builder().from(from).select(select);

    for join in joins {
        builder = builder
            .join(&join.table, join.kind)
            .on(&join.left.0, &join.left.1, "=", &join.right.0, &join.right.1);
    }

    if let Some((first, rest)) = conditions.split_first() {
        builder = builder.filter(&first.column, &first.operator, &first.value);
        for condition in rest {
            builder = builder.and(Query::builder().filter(&condition.column, &condition.operator, &condition.value));
        }
    }

    Ok(builder.build()?)
}

fn describe(engine: &Engine) {
    for alias in engine.tables() {
        if let Some(table) = engine.table(&alias) {
            println!("{} ({} rows)", alias, table.len());
            for header in table.headers() {
                println!("  {}", header);
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Describe { tables } => {
            let engine = engine(&cli, tables)?;
            describe(&engine);
        }
        Commands::Query {
            tables,
            from,
            select,
            conditions,
            joins,
            output,
        } => {
            let engine = engine(&cli, tables)?;
            let query = build_query(from, select, conditions, joins).context("Invalid query")?;
            let rows = engine.execute(&query).context("Query failed")?;

            match output {
                Some(path) => {
                    export_csv(&rows, path)?;
                    println!("Wrote {} rows to {}", rows.len().saturating_sub(1), path.display());
                }
                None => print!("{}", format_table(&rows)),
            }
        }
    }

    Ok(())
}
