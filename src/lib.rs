//! talkdata
//!
//! Ask questions about advertising-competition tables in Turkish, let a language
//! model write the SQL, and turn whatever the query returns into a tidy table
//! and a time-series line chart. Pairs with the `talkdata` CLI.
//!
//! ### Features
//! - Locale-tolerant number parsing (`1.234,56`, `1,234.56`, `12,5`)
//! - Turkish month names in any casing or diacritics folded to one calendar order
//! - Day-first date parsing (`23.08.2023`)
//! - Column classification: time axis, year grouping, numeric metrics, money columns
//! - Vega-Lite spec export and SVG/PNG rendering with plotters
//!
//! ### Example
//! ```no_run
//! use talkdata::{storage, viz};
//!
//! let table = storage::load_csv("result.csv")?;
//! match viz::chart_from_table(&table) {
//!     Ok(chart) => {
//!         let spec = viz::vega::to_vega_lite(&chart);
//!         storage::save_json(&spec, "chart.vl.json")?;
//!         viz::draw::plot_chart(&chart, "chart.svg", 1000, 600, viz::DEFAULT_LEGEND_MODE)?;
//!     }
//!     Err(reason) => eprintln!("{}", reason),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod calendar;
pub mod classify;
pub mod display;
pub mod error;
pub mod llm;
pub mod models;
pub mod numeric;
pub mod prompts;
pub mod query;
pub mod reshape;
pub mod session;
pub mod sql;
pub mod stats;
pub mod storage;
pub mod viz;

pub use classify::{Classification, NotChartable, TimeAxis, classify};
pub use display::{DisplayTable, display_table};
pub use error::{Error, QueryError, Result};
pub use llm::{ChatClient, ChatMessage, LanguageModel, Role};
pub use models::{CanonicalMonth, CellValue, Column, ResultTable};
pub use query::{CommandExecutor, QueryExecutor};
pub use reshape::{LongFormRow, TimeKey, aggregate};
pub use session::{ChartOutcome, ConversationLog, Session, Turn};
pub use sql::extract_sql;
