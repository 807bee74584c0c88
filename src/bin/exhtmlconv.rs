use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use exhtml::{ConvertOptions, Doctype, convert, output};

#[derive(Parser)]
#[command(version, about = "Convert tag-soup HTML into valid XHTML 1.0")]
struct Cli {
    /// Input HTML file (standard input when omitted).
    input: Option<PathBuf>,

    /// Write the XHTML document here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force the target DTD variant instead of resolving it from the input.
    #[arg(short = 't', long, value_enum)]
    doctype: Option<DoctypeArg>,

    /// Discard subtrees that cannot be repaired instead of keeping them.
    #[arg(long)]
    strict: bool,

    /// Abort once this many recovery errors were needed.
    #[arg(long, default_value_t = 20, value_name = "N")]
    max_errors: u32,

    /// Report repair decisions on standard error (twice for trace output).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DoctypeArg {
    Strict,
    Transitional,
    Frameset,
}

impl From<DoctypeArg> for Doctype {
    fn from(arg: DoctypeArg) -> Doctype {
        match arg {
            DoctypeArg::Strict => Doctype::Strict,
            DoctypeArg::Transitional => Doctype::Transitional,
            DoctypeArg::Frameset => Doctype::Frameset,
        }
    }
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln!("{}: {}", record.level().as_str().to_ascii_lowercase(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("exhtmlconv: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(match cli.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        });
    }

    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read standard input")?;
            buffer
        }
    };

    let options = ConvertOptions {
        doctype: cli.doctype.map(Doctype::from),
        strict: cli.strict,
        max_errors: cli.max_errors,
    };
    let conv = convert(&source, options).context("conversion failed")?;

    match &cli.output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("cannot write {}", path.display()))?;
            output::write_document(&conv, &mut file)?;
        }
        None => {
            output::write_document(&conv, &mut io::stdout().lock())?;
        }
    }

    if conv.error_count > 0 || conv.warning_count > 0 {
        eprintln!(
            "exhtmlconv: repaired {} errors and {} warnings",
            conv.error_count, conv.warning_count
        );
    }
    Ok(ExitCode::SUCCESS)
}
