//! # Erros do Etiquetador
//!
//! Apenas as bordas do sistema falham: leitura do corpus, leitura da
//! configuração e parâmetros inválidos. Predição e avaliação nunca retornam
//! erro; palavras desconhecidas e caminhos com probabilidade zero são
//! representados como valores ([`crate::viterbi::Prediction`]).

use thiserror::Error;

pub type Result<T, E = PosTagError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PosTagError {
    /// Falha de E/S ao abrir ou ler um arquivo.
    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    /// Registro delimitado que o leitor CSV não conseguiu decodificar.
    #[error("erro ao ler o corpus: {0}")]
    Csv(#[from] csv::Error),

    /// Arquivo de configuração JSON malformado.
    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),

    #[error("argumento inválido `{arg}`: {msg}")]
    InvalidArgument { arg: &'static str, msg: String },

    /// Nenhuma sentença de treino após a divisão: não há o que estimar.
    #[error("o conjunto de treino está vazio")]
    EmptyTrainingSet,
}

impl PosTagError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument {
            arg,
            msg: msg.into(),
        }
    }
}
