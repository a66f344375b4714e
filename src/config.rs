use std::fs;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_yaml::{Number, Value};

use crate::billing::LineItem;
use crate::error::ConfigError;

#[derive(Debug, PartialEq, Clone)]
pub struct Client {
    pub name: String,
    pub address_1: String,
    pub address_2: String,
}

/// A fully validated invoice definition.
#[derive(Debug, PartialEq, Clone)]
pub struct InvoiceConfig {
    pub invoice_id: String,
    pub invoice_date: String,
    pub due_date: String,
    pub payment_terms: String,
    pub client: Client,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
    pub client_slug: Option<String>,
}

impl InvoiceConfig {
    /// Invoice id without any leading `#`.
    pub fn invoice_number(&self) -> &str {
        self.invoice_id.trim_start_matches('#')
    }

    pub fn invoice_id_display(&self) -> String {
        format!("#{}", self.invoice_number())
    }

    /// Text the client part of the file name is built from.
    pub fn slug_source(&self) -> &str {
        self.client_slug.as_deref().unwrap_or(&self.client.name)
    }
}

// Everything is loose here so that every problem can be reported at once.
#[derive(Deserialize, Debug, Default)]
struct RawConfig {
    invoice_id: Option<Value>,
    invoice_date: Option<Value>,
    due_date: Option<Value>,
    payment_terms: Option<Value>,
    client: Option<Value>,
    items: Option<Value>,
    notes: Option<Value>,
    client_slug: Option<Value>,
}

pub fn load(path: &Path) -> Result<InvoiceConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let source = fs::read_to_string(path)?;
    parse(&source, path)
}

pub fn parse(source: &str, origin: &Path) -> Result<InvoiceConfig, ConfigError> {
    let raw: RawConfig = serde_yaml::from_str(source)?;
    let mut check = Checker::default();

    let invoice_id = check.scalar(raw.invoice_id.as_ref(), "invoice_id");
    let invoice_date = check.text(raw.invoice_date.as_ref(), "invoice_date");
    let due_date = check.text(raw.due_date.as_ref(), "due_date");
    let payment_terms =
        check.text(raw.payment_terms.as_ref(), "payment_terms");
    let client = check.client(raw.client.as_ref());
    let items = check.items(raw.items.as_ref());
    let notes = check.optional_text(raw.notes.as_ref(), "notes");
    let client_slug =
        check.optional_text(raw.client_slug.as_ref(), "client_slug");

    match (
        invoice_id,
        invoice_date,
        due_date,
        payment_terms,
        client,
        items,
    ) {
        (
            Some(invoice_id),
            Some(invoice_date),
            Some(due_date),
            Some(payment_terms),
            Some(client),
            Some(items),
        ) if check.problems.is_empty() => Ok(InvoiceConfig {
            invoice_id,
            invoice_date,
            due_date,
            payment_terms,
            client,
            items,
            notes,
            client_slug,
        }),
        _ => Err(ConfigError::Invalid {
            path: origin.to_path_buf(),
            problems: check.problems,
        }),
    }
}

#[derive(Default)]
struct Checker {
    problems: Vec<String>,
}

impl Checker {
    fn missing(&mut self, name: &str) {
        self.problems.push(format!("{} is missing", name));
    }

    fn invalid(&mut self, name: &str, expected: &str) {
        self.problems.push(format!("{} must be {}", name, expected));
    }

    fn text(&mut self, value: Option<&Value>, name: &str) -> Option<String> {
        match value {
            None | Some(Value::Null) => {
                self.missing(name);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.invalid(name, "a string");
                None
            }
        }
    }

    fn optional_text(
        &mut self,
        value: Option<&Value>,
        name: &str,
    ) -> Option<String> {
        match value {
            None | Some(Value::Null) => None,
            Some(_) => self.text(value, name),
        }
    }

    fn scalar(&mut self, value: Option<&Value>, name: &str) -> Option<String> {
        match value {
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => self.text(value, name),
        }
    }

    fn number(&mut self, value: Option<&Value>, name: &str) -> Option<Decimal> {
        match value {
            None | Some(Value::Null) => {
                self.missing(name);
                None
            }
            Some(Value::Number(n)) => {
                let decimal = to_decimal(n);
                if decimal.is_none() {
                    self.invalid(name, "a finite decimal number");
                }
                decimal
            }
            Some(_) => {
                self.invalid(name, "a number");
                None
            }
        }
    }

    fn client(&mut self, value: Option<&Value>) -> Option<Client> {
        match value {
            None | Some(Value::Null) => {
                self.missing("client");
                None
            }
            Some(client) if client.is_mapping() => {
                let name = self.text(client.get("name"), "client.name");
                let address_1 =
                    self.text(client.get("address_1"), "client.address_1");
                let address_2 =
                    self.text(client.get("address_2"), "client.address_2");
                Some(Client {
                    name: name?,
                    address_1: address_1?,
                    address_2: address_2?,
                })
            }
            Some(_) => {
                self.invalid("client", "a mapping");
                None
            }
        }
    }

    fn items(&mut self, value: Option<&Value>) -> Option<Vec<LineItem>> {
        let entries = match value {
            None | Some(Value::Null) => {
                self.missing("items");
                return None;
            }
            Some(Value::Sequence(entries)) => entries,
            Some(_) => {
                self.invalid("items", "a list");
                return None;
            }
        };

        let items: Vec<Option<LineItem>> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| self.item(i, entry))
            .collect();
        items.into_iter().collect()
    }

    fn item(&mut self, index: usize, entry: &Value) -> Option<LineItem> {
        let prefix = format!("items[{}]", index);
        if !entry.is_mapping() {
            self.invalid(&prefix, "a mapping");
            return None;
        }

        let field = |name: &str| format!("{}.{}", prefix, name);
        let description =
            self.text(entry.get("description"), &field("description"));
        let quantity = self.number(entry.get("quantity"), &field("quantity"));
        let amount = self.number(entry.get("amount"), &field("amount"));
        let rate = match entry.get("rate") {
            None | Some(Value::Null) => None,
            rate => Some(self.number(rate, &field("rate"))?),
        };

        Some(LineItem {
            description: description?,
            quantity: quantity?,
            amount: amount?,
            rate,
        })
    }
}

fn to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let repr = n.to_string();
    Decimal::from_str(&repr)
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}
