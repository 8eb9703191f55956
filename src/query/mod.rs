use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 100;
/// Shortest keyword sent to the backend, whatever `min_length` says.
pub const MIN_KEYWORD_LENGTH: usize = 2;

/// Two-word domain phrases that older backends accepted as a single query.
const LEGACY_PHRASES: &[&str] = &[
    "cinto segurança",
    "cinto seguranca",
    "pneu desgastado",
    "telefone celular",
    "bebida alcoólica",
    "bebida alcoolica",
    "velocidade máxima",
    "velocidade maxima",
    "faixa pedestre",
    "luz vermelha",
    "sinal vermelho",
    "carteira motorista",
    "carteira habilitação",
    "carteira habilitacao",
    "documento veiculo",
    "documento veículo",
    "documento obrigatório",
    "documento obrigatorio",
    "via preferencial",
    "mão direção",
    "mao direcao",
    "capacete proteção",
    "capacete protecao",
    "viseira capacete",
    "placa identificação",
    "placa identificacao",
    "dispositivo segurança",
    "dispositivo seguranca",
];

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueryRejection {
    #[error("enter a search term")]
    Empty,
    #[error("the search term must have at least {min} characters")]
    TooShort { min: usize },
    #[error("the search term must have at most {max} characters")]
    TooLong { max: usize },
    #[error("the search term may only contain letters, digits, spaces and hyphens")]
    InvalidCharacters,
    #[error("use a single word or an infraction code to search, e.g. cinto, bafômetro, velocidade, 60501")]
    MultipleWords,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryRules {
    pub min_length: usize,
    pub max_length: usize,
    pub allow_legacy_phrases: bool,
}

impl Default for QueryRules {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_QUERY_LENGTH,
            max_length: DEFAULT_MAX_QUERY_LENGTH,
            allow_legacy_phrases: false,
        }
    }
}

fn numeric_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9\-.\s]+$").expect("valid numeric code regex"))
}

fn allowed_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ0-9\s\-]+$").expect("valid allowed characters regex")
    })
}

#[derive(Clone, Debug, Default)]
pub struct QueryValidator {
    rules: QueryRules,
}

impl QueryValidator {
    pub fn new(rules: QueryRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &QueryRules {
        &self.rules
    }

    /// Returns the trimmed query when it may be sent to the backend.
    pub fn validate<'a>(&self, raw: &'a str) -> Result<&'a str, QueryRejection> {
        let query = raw.trim();
        if query.is_empty() {
            return Err(QueryRejection::Empty);
        }
        let len = query.chars().count();
        if len < self.rules.min_length {
            return Err(QueryRejection::TooShort {
                min: self.rules.min_length,
            });
        }
        if len > self.rules.max_length {
            return Err(QueryRejection::TooLong {
                max: self.rules.max_length,
            });
        }
        if numeric_code_re().is_match(query) {
            return Ok(query);
        }
        if !allowed_chars_re().is_match(query) {
            return Err(QueryRejection::InvalidCharacters);
        }
        if self.rules.allow_legacy_phrases && contains_legacy_phrase(query) {
            return Ok(query);
        }
        if query.split_whitespace().count() != 1 {
            return Err(QueryRejection::MultipleWords);
        }
        if len < MIN_KEYWORD_LENGTH {
            return Err(QueryRejection::TooShort {
                min: MIN_KEYWORD_LENGTH,
            });
        }
        Ok(query)
    }
}

fn contains_legacy_phrase(query: &str) -> bool {
    let normalized = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    LEGACY_PHRASES.iter().any(|p| normalized.contains(p))
}
