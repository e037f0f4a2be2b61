use std::{
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser as ClapParser, Subcommand};
use filtex::{
    Filtex,
    cli::{self, CliError, CompileOptions, EvalOptions, Target},
    config,
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "filtex")]
#[command(
    about = "Filtex - compile end-user filter text into predicates, document queries and SQL"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter against the declared fields
    Check {
        /// The filter expression
        expression: String,

        /// JSON file of field declarations
        #[arg(short, long)]
        fields: PathBuf,

        /// Print the parsed expression tree
        #[arg(long)]
        tree: bool,
    },

    /// Compile a filter to a document query or a SQL condition
    Compile {
        /// The filter expression
        expression: String,

        /// JSON file of field declarations
        #[arg(short, long)]
        fields: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Target::Relational)]
        target: Target,

        /// Number of the first SQL placeholder
        #[arg(long, default_value_t = 1)]
        start: usize,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the JSON records matching a filter
    Eval {
        /// The filter expression
        expression: String,

        /// JSON file of field declarations
        #[arg(short, long)]
        fields: PathBuf,

        /// JSON object or array of objects (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show documentation, optionally for one category
    Docs {
        /// Category name (omit to list categories)
        category: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FILTEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            expression,
            fields,
            tree,
        } => run_check(expression, fields, tree),
        Commands::Compile {
            expression,
            fields,
            target,
            start,
            pretty,
        } => run_compile(
            CompileOptions {
                expression,
                target,
                start,
            },
            fields,
            pretty,
        ),
        Commands::Eval {
            expression,
            fields,
            input,
            pretty,
        } => run_eval(expression, fields, input, pretty),
        Commands::Docs { category: None } => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Docs {
            category: Some(category),
        } => cli::get_doc_category(&category).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn load(fields: PathBuf) -> Result<Filtex, CliError> {
    Ok(Filtex::new(config::load_fields_file(fields)?))
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_check(expression: String, fields: PathBuf, tree: bool) -> Result<(), CliError> {
    let filtex = load(fields)?;
    let parsed = cli::execute_check(&filtex, &expression)?;
    if tree {
        println!("{:#?}", parsed);
    } else {
        println!("Filter is valid");
    }
    Ok(())
}

fn run_compile(options: CompileOptions, fields: PathBuf, pretty: bool) -> Result<(), CliError> {
    let filtex = load(fields)?;
    let output = cli::execute_compile(&filtex, &options)?;
    print_json(&output, pretty)
}

fn run_eval(
    expression: String,
    fields: PathBuf,
    input: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let filtex = load(fields)?;

    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let output = cli::execute_eval(&filtex, &EvalOptions { expression, input })?;
    print_json(&output, pretty)
}
