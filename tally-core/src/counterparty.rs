//! Counterparty name extraction from free-text descriptions.

use crate::config::{CounterpartyConfig, fold};
use regex::Regex;

pub trait CounterpartyExtractor: Send + Sync {
    fn extract(&self, description: &str) -> Option<String>;
}

/// First pair of consecutive title-cased words ("Juan Perez"), skipping words such as
/// "Pago" or "Transferencia" that name the movement rather than a person.
#[derive(Debug, Clone)]
pub struct TitleCasePair {
    word_re: Regex,
    stopwords: Vec<String>,
}

impl TitleCasePair {
    pub fn new(cfg: &CounterpartyConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            word_re: Regex::new(r"\b\p{Lu}\p{Ll}+\b")?,
            stopwords: cfg.stopwords.iter().map(|w| fold(w)).collect(),
        })
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&fold(word))
    }
}

impl CounterpartyExtractor for TitleCasePair {
    fn extract(&self, description: &str) -> Option<String> {
        let words: Vec<_> = self.word_re.find_iter(description).collect();
        words.windows(2).find_map(|pair| {
            let (first, second) = (pair[0], pair[1]);
            let gap = &description[first.end()..second.start()];
            let single_space = gap.chars().count() == 1 && gap.chars().all(char::is_whitespace);
            if single_space && !self.is_stopword(first.as_str()) && !self.is_stopword(second.as_str())
            {
                Some(format!("{} {}", first.as_str(), second.as_str()))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TitleCasePair {
        TitleCasePair::new(&CounterpartyConfig::default()).unwrap()
    }

    #[test]
    fn test_skips_movement_words() {
        assert_eq!(extractor().extract("Pago Juan Perez"), Some("Juan Perez".into()));
        assert_eq!(
            extractor().extract("Transferencia de Maria Lopez Garcia"),
            Some("Maria Lopez".into())
        );
    }

    #[test]
    fn test_accented_names() {
        assert_eq!(extractor().extract("Envío a José Núñez"), Some("José Núñez".into()));
    }

    #[test]
    fn test_no_pair() {
        assert_eq!(extractor().extract("Deposito"), None);
        assert_eq!(extractor().extract("PAGO JUAN PEREZ"), None);
        assert_eq!(extractor().extract("Juan, Perez"), None);
        assert_eq!(extractor().extract("Juan  Perez"), None);
    }
}
