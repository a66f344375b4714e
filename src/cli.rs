use clap::{Parser, ValueHint};
use std::path::PathBuf;

/* Argument Stucture
 *
 * generate-invoice <config.yaml> [--output-dir <path>] [--logo <path>]
 *
 * Output: <output-dir>/invoice-#<id>-<date>-<client>.pdf
 */

#[derive(Parser, Debug)]
#[clap(name = "generate-invoice", version,
    about = "Generate a PDF invoice from a YAML definition")]
pub struct Opts {
    /// YAML file describing the invoice
    #[clap(value_hint=ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory to save PDFs [default: <assets-dir>/invoices]
    #[clap(long, value_hint=ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Custom logo file [default: <assets-dir>/logo.png]
    #[clap(long, value_hint=ValueHint::FilePath)]
    pub logo: Option<PathBuf>,

    /// Directory holding the default logo and invoices folder
    /// [default: directory of this executable]
    #[clap(long, env = "INVOICE_ASSETS_DIR",
        value_hint=ValueHint::DirPath)]
    pub assets_dir: Option<PathBuf>,

    /// HTML to PDF renderer executable
    #[clap(long, env = "INVOICE_WEASYPRINT", default_value = "weasyprint",
        value_hint=ValueHint::CommandName)]
    pub weasyprint: PathBuf,
}
