//! # Experimento — Orquestrador com Eventos Observáveis
//!
//! Um experimento repete `phases` vezes:
//! 1. Divisão aleatória treino/teste.
//! 2. Estimação do [`HmmModel`] sobre o treino.
//! 3. Avaliação das sentenças de teste.
//!
//! e reporta a média das acurácias. Cada passo emite um [`ExperimentEvent`]
//! por um canal `mpsc`, para quem quiser acompanhar o progresso.

use std::sync::mpsc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ExperimentConfig;
use crate::corpus::Sentence;
use crate::errors::{PosTagError, Result};
use crate::evaluation::{EvaluationReport, Evaluator, SentenceOutcome};
use crate::hmm::HmmModel;
use crate::split::split_train_test;
use crate::viterbi::Predictor;

/// Eventos emitidos durante o experimento.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ExperimentEvent {
    /// Divisão feita para a fase `phase` (base 0).
    PhaseStarted {
        phase: usize,
        phases: usize,
        train_sentences: usize,
        test_sentences: usize,
    },
    ModelTrained {
        phase: usize,
        tags: usize,
        vocabulary: usize,
    },
    /// Uma sentença de teste foi avaliada.
    SentenceEvaluated {
        phase: usize,
        index: usize,
        total: usize,
        outcome: SentenceOutcome,
    },
    PhaseDone {
        phase: usize,
        report: EvaluationReport,
    },
    /// **Conclusão**: médias de todas as fases.
    Done { report: ExperimentReport },
}

/// Resultado final: um relatório por fase e as médias.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub phases: Vec<EvaluationReport>,
    /// Média da acurácia de sentenças sobre as fases.
    pub sentence_accuracy: f64,
    /// Média da acurácia de tags sobre as fases.
    pub tag_accuracy: f64,
}

impl ExperimentReport {
    fn from_phases(phases: Vec<EvaluationReport>) -> Self {
        let n = phases.len().max(1) as f64;
        let sentence_accuracy = phases.iter().map(|r| r.sentence_accuracy()).sum::<f64>() / n;
        let tag_accuracy = phases.iter().map(|r| r.tag_accuracy()).sum::<f64>() / n;
        Self {
            phases,
            sentence_accuracy,
            tag_accuracy,
        }
    }
}

pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    /// Valida a configuração e prepara o experimento.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Executa todas as fases e devolve o relatório final, sem eventos.
    pub fn run(&self, sentences: &[Sentence]) -> Result<ExperimentReport> {
        let (tx, rx) = mpsc::channel();
        // Ninguém escuta: os envios falham e são ignorados
        drop(rx);
        self.run_streaming(sentences, tx)
    }

    /// Executa todas as fases enviando eventos de progresso por `tx`.
    ///
    /// # Fluxo de Eventos
    /// Para cada fase: `PhaseStarted` → `ModelTrained` → `SentenceEvaluated`
    /// (uma por sentença de teste) → `PhaseDone`. Ao final, `Done`.
    pub fn run_streaming(
        &self,
        sentences: &[Sentence],
        tx: mpsc::Sender<ExperimentEvent>,
    ) -> Result<ExperimentReport> {
        let phases = self.config.phases;
        let mut reports = Vec::with_capacity(phases);

        for phase in 0..phases {
            let seed = self.config.seed.map(|s| s.wrapping_add(phase as u64));
            let (train, test) = split_train_test(sentences.to_vec(), self.config.train_ratio, seed)?;
            if train.is_empty() {
                return Err(PosTagError::EmptyTrainingSet);
            }

            info!(
                "fase {}/{}: {} sentenças de treino, {} de teste",
                phase + 1,
                phases,
                train.len(),
                test.len()
            );
            let _ = tx.send(ExperimentEvent::PhaseStarted {
                phase,
                phases,
                train_sentences: train.len(),
                test_sentences: test.len(),
            });

            // === Passo 1: Estimação ===
            let model = HmmModel::train(&train);
            let _ = tx.send(ExperimentEvent::ModelTrained {
                phase,
                tags: model.tagset().real_len(),
                vocabulary: model.vocabulary_size(),
            });

            // === Passo 2: Avaliação ===
            let predictor = Predictor::new(&model)
                .with_strategy(self.config.search)
                .with_max_paths(self.config.max_paths);
            let evaluator = Evaluator::new(predictor);

            let mut report = EvaluationReport::default();
            for (index, sentence) in test.iter().enumerate() {
                let outcome = evaluator.evaluate_sentence(sentence);
                debug!("{}/{}: {:?}", index + 1, test.len(), outcome);
                report.record(&outcome);
                let _ = tx.send(ExperimentEvent::SentenceEvaluated {
                    phase,
                    index,
                    total: test.len(),
                    outcome,
                });
            }

            info!(
                "fase {}/{}: acurácia de sentenças {:.4}, de tags {:.4} ({} sentenças puladas)",
                phase + 1,
                phases,
                report.sentence_accuracy(),
                report.tag_accuracy(),
                report.skipped_sentences
            );
            let _ = tx.send(ExperimentEvent::PhaseDone {
                phase,
                report: report.clone(),
            });
            reports.push(report);
        }

        let report = ExperimentReport::from_phases(reports);
        let _ = tx.send(ExperimentEvent::Done {
            report: report.clone(),
        });
        Ok(report)
    }
}
