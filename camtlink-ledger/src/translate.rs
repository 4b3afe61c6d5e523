//! Human-readable ledger labels.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    /// A translation key embedded in a label, e.g. `(CustomerInvoicePayment)`
    static ref TRANSLATION_KEY: Regex = Regex::new(r"\((.+)\)").unwrap();
}

/// Legacy label of salary payments, predating translation keys
const LEGACY_SALARY_LABEL: &str = "(payment_salary)";
const SALARY_KEY: &str = "SalaryPayment";
const SALARY_TEXT: &str = "Salary payment";

/// Translate keys into display text. Unknown keys are echoed back.
pub trait Translate {
    fn translate(&self, key: &str) -> String;
}

impl Translate for HashMap<String, String> {
    fn translate(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

/// Translations that know no keys
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTranslation;

impl Translate for NoTranslation {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Build the display name of a ledger record from its label and link label.
pub fn display_label<T: Translate + ?Sized>(
    label: &str,
    link_label: Option<&str>,
    translations: &T,
) -> String {
    let translated = TRANSLATION_KEY.captures(label).and_then(|caps| {
        let key = &caps[1];
        let text = translations.translate(key);
        match text != key {
            true => Some(text),
            false => None,
        }
    });

    let mut name = match translated {
        Some(text) => text,
        None if label == LEGACY_SALARY_LABEL => match translations.translate(SALARY_KEY) {
            text if text == SALARY_KEY => SALARY_TEXT.to_string(),
            text => text,
        },
        None => label.to_string(),
    };

    if let Some(link) = link_label.map(str::trim).filter(|l| !l.is_empty()) {
        name.push_str(" - ");
        name.push_str(link);
    }

    name
}
