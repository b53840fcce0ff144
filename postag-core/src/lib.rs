//! # postag-core — Etiquetador Morfossintático com HMM Bigrama
//!
//! Este crate estima um Hidden Markov Model bigrama a partir de sentenças
//! anotadas com tags morfossintáticas (POS) e o usa para prever as tags de
//! sentenças novas, medindo a acurácia por sentença e por tag.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em linha reta:
//!
//! 1.  **Corpus** ([`corpus`]): texto delimitado → pares (palavra, tag) → sentenças.
//! 2.  **Divisão** ([`split`]): embaralhamento (opcionalmente com semente) e corte treino/teste.
//! 3.  **Estimação** ([`hmm`]): probabilidades de transição $P(t_j|t_i)$ e de emissão $P(w|t)$.
//! 4.  **Busca** ([`viterbi`]): o caminho de tags mais provável para cada sentença de teste.
//! 5.  **Avaliação** ([`evaluation`]): comparação com as tags de referência.
//!
//! O módulo [`experiment`] encadeia tudo isso em várias fases e tira a média.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use postag_core::{HmmModel, Predictor, Sentence};
//!
//! // 1. Sentenças de treino
//! let train = vec![
//!     Sentence::from_iter([("the", "D"), ("cat", "N"), ("sleeps", "V")]),
//!     Sentence::from_iter([("a", "D"), ("dog", "N"), ("barks", "V")]),
//! ];
//!
//! // 2. Estima o modelo
//! let model = HmmModel::train(&train);
//!
//! // 3. Prevê as tags de uma sentença nova
//! let prediction = Predictor::new(&model).predict(&["a", "cat", "sleeps"]);
//! let path = prediction.path().expect("todas as palavras são conhecidas");
//! assert_eq!(path.labels(model.tagset()), vec!["D", "N", "V"]);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`tagset`]: vocabulário de tags com `<S>` e `<E>`.
//! - [`config`]: parâmetros de um experimento (JSON).
//! - [`errors`]: o tipo de erro do crate.

pub mod config;
pub mod corpus;
pub mod errors;
pub mod evaluation;
pub mod experiment;
pub mod hmm;
pub mod split;
pub mod tagset;
pub mod viterbi;

pub use config::ExperimentConfig;
pub use corpus::{load_corpus, CorpusFormat, Sentence, SentenceBoundary, TaggedWord};
pub use errors::{PosTagError, Result};
pub use evaluation::{EvaluationReport, Evaluator, SentenceOutcome};
pub use experiment::{Experiment, ExperimentEvent, ExperimentReport};
pub use hmm::{HmmModel, TransitionTable};
pub use split::split_train_test;
pub use tagset::{TagId, TagSet};
pub use viterbi::{PathCandidate, Prediction, Predictor, SearchStrategy, Unpredictable};
