use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use talkdata::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use talkdata::prompts::{self, DEFAULT_TABLE_DESCRIPTION, TableContext};
use talkdata::viz::{self, LegendMode};
use talkdata::{
    ChartOutcome, ChatClient, CommandExecutor, DisplayTable, QueryExecutor, Session, Turn,
};
use talkdata::{classify, numeric, reshape, stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "talkdata",
    version,
    about = "Ask competition data questions in Turkish, get SQL, tables and charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn a query result (CSV) into a display table and a chart.
    Chart(ChartArgs),
    /// Print the system prompt for a table whose columns are given as CSV.
    Prompt(PromptArgs),
    /// Ask questions; the model writes SQL, `--exec` runs it.
    Ask(AskArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Right,
    Bottom,
}

impl From<LegendArg> for LegendMode {
    fn from(l: LegendArg) -> Self {
        match l {
            LegendArg::Right => LegendMode::Right,
            LegendArg::Bottom => LegendMode::Bottom,
        }
    }
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Width of rendered charts (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of rendered charts (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Legend placement for rendered charts.
    #[arg(long, value_enum, default_value_t = LegendArg::Right)]
    legend: LegendArg,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Query result as CSV with a header row.
    #[arg(short, long)]
    input: PathBuf,
    /// Save the display table (.csv or .json).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Render the chart to the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Write the Vega-Lite spec (JSON).
    #[arg(long)]
    vega: Option<PathBuf>,
    /// Write the chart description (JSON).
    #[arg(long)]
    spec: Option<PathBuf>,
    /// Print per-series statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
    #[command(flatten)]
    plot_opts: PlotArgs,
}

#[derive(Args, Debug)]
struct PromptArgs {
    /// Fully qualified table name (DATABASE.SCHEMA.TABLE).
    #[arg(short, long)]
    table: String,
    /// CSV with COLUMN_NAME and DATA_TYPE columns.
    #[arg(long)]
    schema_csv: PathBuf,
    /// Optional CSV with VARIABLE_NAME and DEFINITION columns.
    #[arg(long)]
    variables_csv: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_TABLE_DESCRIPTION)]
    description: String,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// Question to ask once; omit for an interactive session on stdin.
    #[arg(short, long)]
    question: Option<String>,
    /// Tables the model may query (DATABASE.SCHEMA.TABLE), repeatable.
    #[arg(short, long, required = true)]
    table: Vec<String>,
    /// Command that reads SQL on stdin and prints CSV on stdout.
    #[arg(long)]
    exec: String,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "TALKDATA_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, env = "TALKDATA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Write each turn's chart into this directory as turn-N.svg.
    #[arg(long)]
    plot_dir: Option<PathBuf>,
    /// Save the whole session (log and turns) as JSON on exit.
    #[arg(long)]
    save_session: Option<PathBuf>,
    #[command(flatten)]
    plot_opts: PlotArgs,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Chart(args) => cmd_chart(args),
        Command::Prompt(args) => cmd_prompt(args),
        Command::Ask(args) => cmd_ask(args),
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn print_table(table: &DisplayTable) {
    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            table
                .rows
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", line(&table.headers));
    println!(
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in &table.rows {
        println!("{}", line(row));
    }
    println!("({} satır)", table.row_count());
}

fn save_table(table: &DisplayTable, path: &Path) -> Result<()> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase()
        .as_str()
    {
        "csv" => storage::save_csv(table, path),
        "json" => storage::save_json(table, path),
        other => anyhow::bail!("unsupported format: {}", other),
    }
}

fn cmd_chart(args: ChartArgs) -> Result<()> {
    let raw = storage::load_csv(&args.input)?;
    let table = talkdata::display_table(&raw);
    print_table(&table);

    if let Some(path) = args.out.as_ref() {
        save_table(&table, path)?;
        eprintln!("Saved {} rows to {}", table.row_count(), path.display());
    }

    let chart = match viz::chart_from_table(&raw) {
        Ok(chart) => chart,
        Err(reason) => {
            eprintln!("{}", reason);
            return Ok(());
        }
    };

    if let Some(path) = args.spec.as_ref() {
        storage::save_json(&chart, path)?;
        eprintln!("Wrote chart description to {}", path.display());
    }
    if let Some(path) = args.vega.as_ref() {
        storage::save_json(&viz::vega::to_vega_lite(&chart), path)?;
        eprintln!("Wrote Vega-Lite spec to {}", path.display());
    }
    if let Some(path) = args.plot.as_ref() {
        let o = &args.plot_opts;
        viz::draw::plot_chart(&chart, path, o.width, o.height, o.legend.into())?;
        eprintln!("Wrote plot to {}", path.display());
    }

    if args.stats {
        let normalized = numeric::normalize_table(&raw);
        let rows = classify::classify(&normalized)
            .and_then(|c| reshape::aggregate(&normalized, &c))
            .map_err(|e| anyhow!("{}", e))?;
        for s in stats::series_summary(&rows) {
            println!(
                "{}  count={}  min={} max={} mean={} median={}",
                s.series,
                s.count,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }
    Ok(())
}

fn cmd_prompt(args: PromptArgs) -> Result<()> {
    prompts::split_table_name(&args.table)?;
    let columns = storage::load_csv(&args.schema_csv)?;
    let mut ctx = TableContext::from_columns_table(&args.table, &args.description, &columns);
    if let Some(path) = args.variables_csv.as_ref() {
        ctx = ctx.with_variables_table(&storage::load_csv(path)?);
    }
    println!("{}", prompts::system_prompt(&[ctx]));
    Ok(())
}

fn table_context(executor: &CommandExecutor, name: &str) -> Result<TableContext> {
    let sql = prompts::columns_query(name)?;
    let columns = executor
        .execute(&sql)
        .with_context(|| format!("list columns of {}", name))?;
    Ok(TableContext::from_columns_table(
        name,
        DEFAULT_TABLE_DESCRIPTION,
        &columns,
    ))
}

fn report_turn(turn: &Turn, index: usize, args: &AskArgs) -> Result<()> {
    println!("{}", turn.response);
    if let Some(err) = turn.error.as_ref() {
        eprintln!("Sorgu çalıştırılamadı: {}", err);
    }
    if let Some(table) = turn.table.as_ref() {
        print_table(table);
    }
    match turn.chart.as_ref() {
        Some(ChartOutcome::Chart(chart)) => {
            if let Some(dir) = args.plot_dir.as_ref() {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("turn-{}.svg", index));
                let o = &args.plot_opts;
                viz::draw::plot_chart(chart, &path, o.width, o.height, o.legend.into())?;
                eprintln!("Wrote plot to {}", path.display());
            }
        }
        Some(ChartOutcome::NotChartable(reason)) => eprintln!("{}", reason),
        None => {}
    }
    Ok(())
}

fn cmd_ask(args: AskArgs) -> Result<()> {
    let executor = CommandExecutor::from_command_line(&args.exec)
        .ok_or_else(|| anyhow!("--exec must name a program"))?;
    let llm = ChatClient::new(args.api_key.clone(), args.model.clone())?
        .with_base_url(args.base_url.clone());

    let contexts = args
        .table
        .iter()
        .map(|t| table_context(&executor, t))
        .collect::<Result<Vec<_>>>()?;
    let mut session = Session::new(prompts::system_prompt(&contexts));

    if let Some(q) = args.question.as_deref() {
        let turn = session.ask(q, &llm, &executor)?;
        report_turn(turn, 1, &args)?;
    } else {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        loop {
            print!("> ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let q = line.trim();
            if q.is_empty() {
                continue;
            }
            if q == ":q" {
                break;
            }
            let index = session.turns.len() + 1;
            match session.ask(q, &llm, &executor) {
                Ok(turn) => report_turn(turn, index, &args)?,
                Err(e) => eprintln!("Hata: {}", e),
            }
        }
    }

    if let Some(path) = args.save_session.as_ref() {
        storage::save_json(&session, path)?;
        eprintln!("Saved session to {}", path.display());
    }
    Ok(())
}
