//! Command-line front-end: reads lineprinter data from files or standard input and feeds it to
//! an [`lptpdf::Printer`] session.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lptpdf::types::unit::Unit;
use lptpdf::{FileMode, FormKind, Printer};
use tracing_subscriber::EnvFilter;

/// Exit code when an input file cannot be opened or read.
const EXIT_INPUT: u8 = 1;
/// Exit code when the output file cannot be opened.
const EXIT_OUTPUT: u8 = 2;
/// Exit code for bad arguments.
const EXIT_BAD_ARG: u8 = 3;
/// Exit code when printing or closing fails.
const EXIT_PRINT: u8 = 4;
/// Exit code for internal failures.
const EXIT_INTERNAL: u8 = 7;

#[derive(Debug, Parser)]
#[command(
    name = "lpt2pdf",
    about = "Convert lineprinter output to PDF on emulated greenbar stationery.",
    after_help = "The last path is the output PDF; earlier paths are inputs, `-` is standard \
                  input. With a single path, input comes from standard input."
)]
struct Opts {
    /// Append to an existing PDF produced by this tool
    #[arg(long, conflicts_with = "replace")]
    append: bool,

    /// Overwrite the output file if it exists
    #[arg(long)]
    replace: bool,

    /// Page width, e.g. "14.875", "27.94cm"
    #[arg(long, value_name = "SIZE")]
    page_width: Option<Unit>,

    /// Page length
    #[arg(long, value_name = "SIZE")]
    page_length: Option<Unit>,

    /// Top margin
    #[arg(long, value_name = "SIZE")]
    top_margin: Option<Unit>,

    /// Bottom margin
    #[arg(long, value_name = "SIZE")]
    bottom_margin: Option<Unit>,

    /// Side margins
    #[arg(long, value_name = "SIZE")]
    side_margin: Option<Unit>,

    /// Characters per inch
    #[arg(long, value_name = "N")]
    cpi: Option<f64>,

    /// Lines per inch (6 or 8)
    #[arg(long, value_name = "N")]
    lpi: Option<u32>,

    /// Text columns, used to center the printed region
    #[arg(long, value_name = "N")]
    cols: Option<u32>,

    /// Logical line a form feed advances to
    #[arg(long, value_name = "LINE")]
    tof_offset: Option<u32>,

    /// Width of the line-number columns; 0 disables numbering
    #[arg(long, value_name = "SIZE")]
    number_width: Option<Unit>,

    /// Height of one stationery bar
    #[arg(long, value_name = "SIZE")]
    bar_height: Option<Unit>,

    /// Form style: PLAIN, GREENBAR, BLUEBAR, GRAYBAR or YELLOWBAR
    #[arg(long, value_name = "NAME")]
    form: Option<String>,

    /// JPEG image drawn as the page background instead of a bar form
    #[arg(long, value_name = "FILE")]
    form_image: Option<PathBuf>,

    /// Font for the printed text
    #[arg(long, value_name = "FONT")]
    text_font: Option<String>,

    /// Font for the margin line numbers
    #[arg(long, value_name = "FONT")]
    number_font: Option<String>,

    /// Font for the margin labels
    #[arg(long, value_name = "FONT")]
    label_font: Option<String>,

    /// Document title
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Disable LZW compression of page streams
    #[arg(long)]
    no_lzw: bool,

    /// List the usable fonts and exit
    #[arg(long)]
    font_list: bool,

    /// List the form names and exit
    #[arg(long)]
    form_list: bool,

    /// Log progress to standard error
    #[arg(short, long)]
    verbose: bool,

    /// Output PDF, instead of taking the last positional path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Input files followed by the output PDF
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let default_filter = if opts.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if opts.font_list {
        for font in lptpdf::font_list() {
            println!("{font}");
        }
        return ExitCode::SUCCESS;
    }
    if opts.form_list {
        for form in lptpdf::form_list() {
            println!("{form}");
        }
        return ExitCode::SUCCESS;
    }

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run(opts: Opts) -> Result<(), u8> {
    let (output, inputs) = match &opts.output {
        Some(path) => (path, opts.paths.as_slice()),
        None => match opts.paths.split_last() {
            Some((output, inputs)) => (output, inputs),
            None => {
                eprintln!("lpt2pdf: an output file is required");
                return Err(EXIT_BAD_ARG);
            }
        },
    };

    let mut printer = Printer::open(output).map_err(|error| {
        eprintln!("lpt2pdf: {}: {error}", output.display());
        EXIT_OUTPUT
    })?;

    configure(&mut printer, &opts).map_err(|error| {
        eprintln!("lpt2pdf: {error}");
        EXIT_BAD_ARG
    })?;

    if inputs.is_empty() {
        copy_input(&mut printer, &mut io::stdin().lock(), "stdin")?;
    } else {
        for input in inputs {
            if input.as_os_str() == "-" {
                copy_input(&mut printer, &mut io::stdin().lock(), "stdin")?;
                continue;
            }
            let mut file = File::open(input).map_err(|error| {
                eprintln!("lpt2pdf: {}: {error}", input.display());
                EXIT_INPUT
            })?;
            copy_input(&mut printer, &mut file, &input.display().to_string())?;
        }
    }

    printer.close().map_err(|error| {
        eprintln!("lpt2pdf: {}: {error}", output.display());
        EXIT_PRINT
    })
}

fn configure(printer: &mut Printer, opts: &Opts) -> Result<(), lptpdf::Error> {
    if opts.append {
        printer.set_file_mode(FileMode::Append)?;
    }
    if opts.replace {
        printer.set_file_mode(FileMode::Replace)?;
    }
    if let Some(value) = opts.page_width {
        printer.set_page_width(value)?;
    }
    if let Some(value) = opts.page_length {
        printer.set_page_length(value)?;
    }
    if let Some(value) = opts.top_margin {
        printer.set_top_margin(value)?;
    }
    if let Some(value) = opts.bottom_margin {
        printer.set_bottom_margin(value)?;
    }
    if let Some(value) = opts.side_margin {
        printer.set_side_margin(value)?;
    }
    if let Some(value) = opts.cpi {
        printer.set_cpi(value)?;
    }
    if let Some(value) = opts.lpi {
        printer.set_lpi(value)?;
    }
    if let Some(value) = opts.cols {
        printer.set_cols(value)?;
    }
    if let Some(value) = opts.tof_offset {
        printer.set_tof_offset(value)?;
    }
    if let Some(value) = opts.number_width {
        printer.set_number_width(value)?;
    }
    if let Some(value) = opts.bar_height {
        printer.set_bar_height(value)?;
    }
    if let Some(name) = &opts.form {
        printer.set_form(FormKind::from_name(name)?)?;
    }
    if let Some(path) = &opts.form_image {
        printer.set_form_image(path)?;
    }
    if let Some(font) = &opts.text_font {
        printer.set_text_font(font)?;
    }
    if let Some(font) = &opts.number_font {
        printer.set_number_font(font)?;
    }
    if let Some(font) = &opts.label_font {
        printer.set_label_font(font)?;
    }
    if let Some(title) = &opts.title {
        printer.set_title(title)?;
    }
    if opts.no_lzw {
        printer.set_uncompressed(true)?;
    }
    Ok(())
}

/// Streams one input into the session in page-sized chunks.
fn copy_input(printer: &mut Printer, input: &mut dyn Read, name: &str) -> Result<(), u8> {
    let mut buffer = [0u8; 16 * 1024];
    loop {
        let got = input.read(&mut buffer).map_err(|error| {
            eprintln!("lpt2pdf: {name}: {error}");
            EXIT_INPUT
        })?;
        if got == 0 {
            return Ok(());
        }
        printer.print(&buffer[..got]).map_err(|error| {
            eprintln!("lpt2pdf: {name}: {error}");
            if matches!(error, lptpdf::Error::Bugcheck(_)) {
                EXIT_INTERNAL
            } else {
                EXIT_PRINT
            }
        })?;
    }
}
