/*
 * Invoice PDF generator
 *
 * Reads an invoice from a YAML file:
 *  - invoice id, invoice date, due date, payment terms
 *  - client name and two address lines
 *  - line items: description, quantity, amount, optional hourly rate
 *  - free text notes, optional client slug for the file name
 *
 * To generate an invoice:
 *  - Format line items, switch on the rate column if any item has a rate
 *  - Sum the amounts into subtotal and total
 *  - Split notes into lines
 *  - Render the HTML template
 *  - Hand the HTML to WeasyPrint to write the PDF
 *
 * Output: <output-dir>/invoice-#<id>-<MM-DD-YYYY>-<client>.pdf
 */

mod args;
mod billing;
mod cli;
mod config;
mod error;
mod notes;
mod pdf;
mod run;
mod slug;
mod templates;

use std::env;
use std::process;

use clap::Parser;
use crate::cli::Opts;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let opts = Opts::parse_from(args::normalize(env::args_os()));

    match run::run(opts) {
        Ok(output) => println!("Generated: {}", output.display()),
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    }
}
