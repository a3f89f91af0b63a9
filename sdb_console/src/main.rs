use clap::Parser;
use sdb_expr::config::runtime::{LogLevel, LoggingPreferences, RuntimeConfig};
use sdb_expr::pipeline::{self, PipelineError, PipelineResult};
use sdb_expr::{logging, MachineSnapshot, SimulatedMachine, Word};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Evaluate sdb debugger expressions against a simulated RISC-V 32 machine.
///
/// With no EXPR, reads one expression per line from stdin until `q`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML machine snapshot providing register and memory contents
    #[arg(short, long, value_name = "FILE")]
    machine: Option<PathBuf>,

    /// Print the token sequence before each result
    #[arg(short, long)]
    tokens: bool,

    /// Print lexical and evaluation statistics after each result
    #[arg(short, long)]
    stats: bool,

    /// Minimum level of diagnostic events written to stderr
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Emit diagnostic events as JSON lines
    #[arg(long)]
    structured_logs: bool,

    /// Expression to evaluate; multiple words are joined with spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    expr: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct DisplayOptions {
    show_tokens: bool,
    show_stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logging::config::init_runtime_preferences(logging_preferences(&args))?;

    // Initialize global logging system
    logging::init_global_logging()?;

    // Validate pipeline configuration
    pipeline::validate_pipeline()?;

    let machine = match &args.machine {
        Some(path) => {
            let machine = load_machine(path).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            sdb_expr::log_info!("Machine snapshot ready",
                "path" => path.display(),
                "mapped_bytes" => machine.mapped_bytes()
            );
            machine
        }
        None => SimulatedMachine::new(),
    };

    let options = DisplayOptions {
        show_tokens: args.tokens,
        show_stats: args.stats,
    };

    let stdout = io::stdout();
    let stderr = io::stderr();

    if !args.expr.is_empty() {
        let text = args.expr.join(" ");
        let ok = evaluate_line(
            &text,
            &machine,
            options,
            &mut stdout.lock(),
            &mut stderr.lock(),
        )?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let failures = run_session(
        stdin.lock(),
        &machine,
        options,
        interactive,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )?;

    if session_failed(failures, interactive) {
        std::process::exit(1);
    }

    Ok(())
}

/// Logging preferences for the console.
///
/// Failed lines are already reported on stderr as `error[...]`, so events
/// only reach the console logger when `--log-level` or `--structured-logs`
/// asks for them. Otherwise they stay in the in-memory buffer.
fn logging_preferences(args: &Args) -> LoggingPreferences {
    let mut preferences = LoggingPreferences::default();
    if let Some(level) = args.log_level {
        preferences.min_log_level = level;
    }
    preferences.use_structured_logging |= args.structured_logs;
    preferences.enable_console_logging = args.log_level.is_some() || args.structured_logs;
    preferences
}

/// A piped session fails when any line failed; an interactive one never does
fn session_failed(failures: usize, interactive: bool) -> bool {
    failures > 0 && !interactive
}

fn load_machine(path: &Path) -> Result<SimulatedMachine, sdb_expr::evaluation::MachineError> {
    MachineSnapshot::load(path)?.into_machine()
}

/// Read-evaluate loop. Returns the number of lines that failed.
fn run_session<R: BufRead, W: Write, E: Write>(
    input: R,
    machine: &SimulatedMachine,
    options: DisplayOptions,
    prompt: bool,
    out: &mut W,
    err: &mut E,
) -> io::Result<usize> {
    let mut failures = 0;

    if prompt {
        write!(out, "(sdb) ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        let text = line.trim();

        if text == "q" || text == "quit" {
            break;
        }

        if !text.is_empty() && !evaluate_line(text, machine, options, out, err)? {
            failures += 1;
        }

        if prompt {
            write!(out, "(sdb) ")?;
            out.flush()?;
        }
    }

    Ok(failures)
}

/// Evaluate one expression, writing the result to `out` or the diagnostic
/// to `err`. Returns whether evaluation succeeded.
fn evaluate_line<W: Write, E: Write>(
    text: &str,
    machine: &SimulatedMachine,
    options: DisplayOptions,
    out: &mut W,
    err: &mut E,
) -> io::Result<bool> {
    let config = RuntimeConfig::default();

    let tokenized = match pipeline::tokenize_expression(text, &config) {
        Ok(tokenized) => tokenized,
        Err(e) => return report_error(&e, text, err),
    };
    if options.show_tokens {
        writeln!(out, "tokens: {}", tokenized.tokens.describe())?;
    }

    match pipeline::evaluate_tokenized(tokenized, machine, &config) {
        Ok(result) => {
            writeln!(out, "{}", format_value(result.value))?;
            if options.show_stats {
                for line in format_stats(&result) {
                    writeln!(out, "  {}", line)?;
                }
            }
            Ok(true)
        }
        Err(e) => report_error(&e, text, err),
    }
}

fn report_error<E: Write>(error: &PipelineError, text: &str, err: &mut E) -> io::Result<bool> {
    writeln!(err, "error[{}]: {}", error.error_code(), error.diagnostic(text))?;
    Ok(false)
}

/// `value (0xhex)`, plus the signed reading when the top bit is set
fn format_value(value: Word) -> String {
    let signed = value as i32;
    if signed < 0 {
        format!("{} (0x{:08x}) [{}]", value, value, signed)
    } else {
        format!("{} (0x{:08x})", value, value)
    }
}

fn format_stats(result: &PipelineResult) -> Vec<String> {
    let lexical = &result.lexical_metrics;
    let evaluation = &result.evaluation_metrics;
    vec![
        format!(
            "tokens: {} ({} operands, {} operators, {} unary)",
            result.token_count(),
            lexical.operand_tokens,
            lexical.operator_tokens,
            lexical.unary_reclassifications
        ),
        format!(
            "ranges: {} (max depth {})",
            evaluation.ranges_evaluated, evaluation.max_depth_reached
        ),
        format!(
            "reads: {} register, {} memory",
            evaluation.register_reads, evaluation.memory_reads
        ),
        format!(
            "time: {:.3} ms",
            result.processing_duration.as_secs_f64() * 1000.0
        ),
    ]
}
