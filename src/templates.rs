use std::io;
use std::path::{self, Path};

use crate::billing::{display_items, show_rate, DisplayItem, InvoiceTotal};
use crate::config::InvoiceConfig;
use crate::error::BillingError;
use crate::notes::note_lines;

use askama::Template;

/// Values available to `templates/invoice.html`. Field names are the
/// template's contract.
#[derive(Template, Debug)]
#[template(path = "invoice.html")]
pub struct RenderContext<'a> {
    pub invoice_id_display: String,
    pub invoice_date: &'a str,
    pub due_date: &'a str,
    pub payment_terms: &'a str,
    pub client_name: &'a str,
    pub client_address_1: &'a str,
    pub client_address_2: &'a str,
    pub items: Vec<DisplayItem>,
    pub show_rate: bool,
    pub subtotal_display: String,
    pub total_display: String,
    pub notes: bool,
    pub notes_lines: Vec<String>,
    pub logo_path: String,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        config: &'a InvoiceConfig,
        logo_path: String,
    ) -> Result<Self, BillingError> {
        let total = InvoiceTotal::calculate(&config.items)?;
        let notes_lines = note_lines(config.notes.as_deref());

        Ok(Self {
            invoice_id_display: config.invoice_id_display(),
            invoice_date: &config.invoice_date,
            due_date: &config.due_date,
            payment_terms: &config.payment_terms,
            client_name: &config.client.name,
            client_address_1: &config.client.address_1,
            client_address_2: &config.client.address_2,
            items: display_items(&config.items),
            show_rate: show_rate(&config.items),
            subtotal_display: total.subtotal.to_string(),
            total_display: total.total.to_string(),
            notes: !notes_lines.is_empty(),
            notes_lines,
            logo_path,
        })
    }
}

/// Absolute `file://` URI for `path`, which need not exist.
pub fn file_uri(path: &Path) -> io::Result<String> {
    let absolute = match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(_) => path::absolute(path)?,
    };
    let text = absolute.to_string_lossy().replace('\\', "/");
    let encoded: Vec<String> = text
        .trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    Ok(format!("file:///{}", encoded.join("/")))
}
