//! # Configuração de um Experimento
//!
//! Todos os campos têm valor padrão, então um JSON parcial (ou vazio, `{}`)
//! é válido:
//!
//! ```json
//! {
//!   "corpus": { "delimiter": ";", "boundary": { "kind": "marker", "word": "<E>", "tag": "<E>" } },
//!   "train_ratio": 0.8,
//!   "seed": 469283984701,
//!   "phases": 1,
//!   "search": "viterbi",
//!   "max_paths": 500000
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::corpus::{delimiter_byte, CorpusFormat};
use crate::errors::{PosTagError, Result};
use crate::split::{check_ratio, DEFAULT_TRAIN_RATIO};
use crate::viterbi::{SearchStrategy, DEFAULT_MAX_PATHS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    pub corpus: CorpusFormat,
    /// Fração das sentenças usada no treino.
    pub train_ratio: f64,
    /// Semente do embaralhamento. `None` usa entropia do sistema.
    pub seed: Option<u64>,
    /// Número de rodadas divisão→treino→avaliação cuja média é reportada.
    pub phases: usize,
    pub search: SearchStrategy,
    /// Válvula de segurança da busca.
    pub max_paths: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusFormat::default(),
            train_ratio: DEFAULT_TRAIN_RATIO,
            seed: None,
            phases: 1,
            search: SearchStrategy::default(),
            max_paths: DEFAULT_MAX_PATHS,
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let fh = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(fh))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_ratio(self.train_ratio)?;
        delimiter_byte(self.corpus.delimiter)?;
        if self.phases == 0 {
            return Err(PosTagError::invalid_argument("phases", "precisa ser pelo menos 1"));
        }
        if self.max_paths == 0 {
            return Err(PosTagError::invalid_argument("max_paths", "precisa ser pelo menos 1"));
        }
        Ok(())
    }
}
