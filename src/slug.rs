use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::InvoiceConfig;

static UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid slug pattern"));
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_]+").expect("valid slug pattern"));
static HYPHENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-+").expect("valid slug pattern"));

/// Lowercase, hyphen separated form of `text` safe to put in a file name.
pub fn slugify(text: &str) -> String {
    let text = text.to_lowercase();
    let text = UNSAFE.replace_all(text.trim(), "");
    let text = SEPARATORS.replace_all(&text, "-");
    let text = HYPHENS.replace_all(&text, "-");
    text.trim_matches('-').to_string()
}

/// `invoice-#<id>-<MM-DD-YYYY>-<client>.pdf`
pub fn output_filename(config: &InvoiceConfig) -> String {
    format!(
        "invoice-#{}-{}-{}.pdf",
        config.invoice_number(),
        config.invoice_date.replace('/', "-"),
        slugify(config.slug_source())
    )
}
