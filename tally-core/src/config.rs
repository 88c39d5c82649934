//! Engine configuration: thresholds, keyword sets and label sets.
//!
//! Every section defaults field by field, so a partial TOML file only overrides what it
//! names.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub direction: DirectionConfig,
    pub counterparty: CounterpartyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// A column is a date column when more than this fraction of its non-empty cells parse.
    pub date_threshold: f64,
    /// Same, for amounts.
    pub amount_threshold: f64,
    pub type_keywords: Vec<String>,
    pub description_keywords: Vec<String>,
    pub reference_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            date_threshold: 0.5,
            amount_threshold: 0.6,
            type_keywords: strings(&["tipo", "movimiento", "operacion"]),
            description_keywords: strings(&[
                "descripcion",
                "detalle",
                "concepto",
                "nombre",
                "remitente",
            ]),
            reference_keywords: strings(&["numero", "cuenta", "transferencia"]),
        }
    }
}

/// Labels found in a type column, mapped onto inflow/outflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionConfig {
    pub inflow_labels: Vec<String>,
    pub outflow_labels: Vec<String>,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            inflow_labels: strings(&[
                "ingreso", "abono", "credito", "deposito", "entrada", "inflow", "credit",
            ]),
            outflow_labels: strings(&[
                "egreso", "cargo", "debito", "retiro", "salida", "pago", "outflow", "debit",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterpartyConfig {
    /// Capitalized words that describe the movement rather than a party
    /// ("Pago Juan Perez" names Juan Perez).
    pub stopwords: Vec<String>,
}

impl Default for CounterpartyConfig {
    fn default() -> Self {
        Self {
            stopwords: strings(&[
                "Pago",
                "Transferencia",
                "Deposito",
                "Abono",
                "Compra",
                "Retiro",
                "Cargo",
                "Cobro",
                "Envio",
                "Recibido",
                "Enviado",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Lowercase and strip Spanish diacritics so "Descripción" matches "descripcion".
pub fn fold(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
